//! OpenSASE Menu
//!
//! Ordering core for a single restaurant's QR menu, plus the offline job that
//! shrinks the menu's product photos.
//!
//! ## Features
//! - Catalog browsing by category and name
//! - Locally persisted cart
//! - Delivery fee, tip and cash change rules
//! - Checkout validation per service type
//! - Order hand-off as a chat deep link
//! - Batch image recompression with size reports

pub mod catalog;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod optimizer;

use thiserror::Error;
use crate::domain::aggregates::OrderErrors;

pub use catalog::Catalog;
pub use config::{OptimizerSettings, OrderSettings};
pub use domain::aggregates::{validate, Cart, CartLine, Checkout, OrderDraft, PaymentMethod, Product, ServiceType, Table};
pub use domain::services::{AddressHeuristicFee, DeliveryFee, DeliveryFeePolicy, FeeTier, OrderMessage, OrderQuote};
pub use domain::value_objects::{Coordinates, Money, ProductId};
pub use infrastructure::{CartStorage, CartStore, FileStorage, LocationCapture, MemoryStorage, PositionSource};

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum MenuError {
    #[error("Invalid catalog: {0}")]
    Catalog(String),

    #[error("Table {0} is not available")]
    TableUnavailable(String),

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Order is missing required fields: {0}")]
    InvalidOrder(OrderErrors),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MenuError>;
