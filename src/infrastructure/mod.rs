//! Platform boundaries: local cart storage and device geolocation
pub mod geolocation;
pub mod storage;

pub use geolocation::{CancelHandle, CaptureOutcome, GeolocationError, LocationCapture, PositionSource};
pub use storage::{CartStorage, CartStore, FileStorage, MemoryStorage, CART_KEY};
