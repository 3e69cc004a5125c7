//! Cart persistence.
//!
//! The cart lives under a single storage key as a JSON array of `{product, quantity}`
//! records, rewritten in full after every mutation.

use std::cell::RefCell;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use crate::domain::aggregates::{Cart, CartLine, Checkout, Product};
use crate::domain::events::DomainEvent;
use crate::domain::services::{DeliveryFeePolicy, OrderMessage};
use crate::{MenuError, Result};

pub const CART_KEY: &str = "cart";

/// Where the serialized cart is kept.
pub trait CartStorage {
    /// `Ok(None)` when nothing was stored yet.
    fn read(&self) -> Result<Option<String>>;
    fn write(&self, contents: &str) -> Result<()>;
}

/// Keeps the cart value in one file on disk.
#[derive(Clone, Debug)]
pub struct FileStorage { path: PathBuf }

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }
    pub fn path(&self) -> &Path { &self.path }
}

impl CartStorage for FileStorage {
    fn read(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(MenuError::Storage(format!("{}: {}", self.path.display(), e))),
        }
    }

    fn write(&self, contents: &str) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, contents).map_err(|e| MenuError::Storage(format!("{}: {}", self.path.display(), e)))
    }
}

#[derive(Debug, Default)]
pub struct MemoryStorage { slot: RefCell<Option<String>> }

impl MemoryStorage {
    pub fn new() -> Self { Self::default() }
    pub fn with_contents(contents: impl Into<String>) -> Self { Self { slot: RefCell::new(Some(contents.into())) } }
    pub fn contents(&self) -> Option<String> { self.slot.borrow().clone() }
}

impl CartStorage for MemoryStorage {
    fn read(&self) -> Result<Option<String>> { Ok(self.slot.borrow().clone()) }
    fn write(&self, contents: &str) -> Result<()> { *self.slot.borrow_mut() = Some(contents.to_string()); Ok(()) }
}

pub fn encode_cart(cart: &Cart) -> Result<String> { Ok(serde_json::to_string(cart.lines())?) }

pub fn decode_cart(contents: &str) -> Result<Cart> {
    let lines: Vec<CartLine> = serde_json::from_str(contents)?;
    Ok(Cart::from_lines(lines))
}

/// The session's cart plus its storage. Every mutation is written through immediately;
/// storage trouble is logged and never reaches the caller.
pub struct CartStore<S: CartStorage> {
    cart: Cart,
    storage: S,
}

impl<S: CartStorage> CartStore<S> {
    /// Loads the stored cart, starting empty when nothing usable is stored.
    pub fn open(storage: S) -> Self {
        let cart = match storage.read() {
            Ok(Some(contents)) => decode_cart(&contents).unwrap_or_else(|e| {
                warn!(key = CART_KEY, error = %e, "Stored cart is unreadable, starting empty");
                Cart::new()
            }),
            Ok(None) => Cart::new(),
            Err(e) => {
                warn!(key = CART_KEY, error = %e, "Failed to read stored cart, starting empty");
                Cart::new()
            }
        };
        debug!(lines = cart.lines().len(), "Cart loaded");
        Self { cart, storage }
    }

    pub fn cart(&self) -> &Cart { &self.cart }
    pub fn storage(&self) -> &S { &self.storage }
    pub fn total_item_count(&self) -> u32 { self.cart.total_item_count() }

    pub fn add_item(&mut self, product: &Product) { self.cart.add_item(product); self.persist(); }

    pub fn remove_item(&mut self, id: &str) {
        if self.cart.remove_item(id) { self.persist(); }
    }

    pub fn set_quantity(&mut self, id: &str, quantity: i64) {
        if self.cart.set_quantity(id, quantity) { self.persist(); }
    }

    pub fn clear(&mut self) { self.cart.clear(); self.persist(); }

    /// Empties the cart and resets the open form with it.
    pub fn clear_with_checkout(&mut self, checkout: &mut Checkout) {
        self.clear();
        checkout.reset();
    }

    /// Submits the checkout against this cart and empties the cart once the message is built.
    pub fn submit_order(&mut self, checkout: &mut Checkout, policy: &dyn DeliveryFeePolicy, recipient: &str) -> Result<OrderMessage> {
        let message = checkout.submit(&self.cart, policy, recipient)?;
        self.clear();
        Ok(message)
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> { self.cart.take_events() }

    fn persist(&self) {
        let written = encode_cart(&self.cart).and_then(|json| self.storage.write(&json));
        if let Err(e) = written {
            warn!(key = CART_KEY, error = %e, "Failed to persist cart");
        }
    }
}
