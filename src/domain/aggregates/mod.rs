//! Aggregates module
pub mod product;
pub mod order;
pub mod cart;

pub use product::{Product, Table};
pub use order::{validate, Checkout, OrderDraft, OrderErrors, PaymentMethod, ServiceType};
pub use cart::{Cart, CartLine};
