//! Domain services
pub mod message;
pub mod pricing;

pub use message::OrderMessage;
pub use pricing::{AddressHeuristicFee, DeliveryFee, DeliveryFeePolicy, FeeTier, OrderQuote, TIP_PRESETS};
