//! Domain layer: catalog records, cart, checkout and pricing rules
pub mod aggregates;
pub mod events;
pub mod services;
pub mod value_objects;
