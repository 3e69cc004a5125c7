//! Cart Aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::domain::aggregates::Product;
use crate::domain::events::{CartEvent, DomainEvent};
use crate::domain::value_objects::Money;

/// Ordered list of selected products. Line order follows insertion and only matters for display.
#[derive(Clone, Debug, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
    updated_at: Option<DateTime<Utc>>,
    events: Vec<DomainEvent>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
}

impl CartLine {
    pub fn line_total(&self) -> Money { self.product.price().multiply(self.quantity) }
}

impl Cart {
    pub fn new() -> Self { Self::default() }

    /// Rebuilds a cart from stored lines, folding duplicate ids together and dropping empty lines.
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        let mut cart = Self::new();
        for line in lines.into_iter().filter(|l| l.quantity > 0) {
            match cart.lines.iter_mut().find(|l| l.product.id() == line.product.id()) {
                Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
                None => cart.lines.push(line),
            }
        }
        cart
    }

    pub fn lines(&self) -> &[CartLine] { &self.lines }
    pub fn is_empty(&self) -> bool { self.lines.is_empty() }
    pub fn updated_at(&self) -> Option<DateTime<Utc>> { self.updated_at }
    pub fn total_item_count(&self) -> u32 { self.lines.iter().map(|l| l.quantity).sum() }
    pub fn subtotal(&self) -> Money { self.lines.iter().map(CartLine::line_total).sum() }

    pub fn add_item(&mut self, product: &Product) {
        let quantity = match self.lines.iter_mut().find(|l| l.product.id() == product.id()) {
            Some(existing) => { existing.quantity = existing.quantity.saturating_add(1); existing.quantity }
            None => { self.lines.push(CartLine { product: product.clone(), quantity: 1 }); 1 }
        };
        self.raise_event(CartEvent::ItemAdded { product_id: product.id().clone(), quantity });
        self.touch();
    }

    /// Returns false when no line matched; that is not an error.
    pub fn remove_item(&mut self, id: &str) -> bool {
        let Some(pos) = self.position(id) else { return false };
        let line = self.lines.remove(pos);
        self.raise_event(CartEvent::ItemRemoved { product_id: line.product.id().clone() });
        self.touch();
        true
    }

    /// Sets a line's quantity; zero or below removes it. Absent ids are ignored.
    pub fn set_quantity(&mut self, id: &str, quantity: i64) -> bool {
        let Some(pos) = self.position(id) else { return false };
        if quantity <= 0 { return self.remove_item(id); }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        let line = &mut self.lines[pos];
        line.quantity = quantity;
        let product_id = line.product.id().clone();
        self.raise_event(CartEvent::QuantityChanged { product_id, quantity });
        self.touch();
        true
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.raise_event(CartEvent::Cleared);
        self.touch();
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> { std::mem::take(&mut self.events) }

    fn position(&self, id: &str) -> Option<usize> { self.lines.iter().position(|l| l.product.id().matches(id)) }
    fn raise_event(&mut self, e: CartEvent) { self.events.push(DomainEvent::Cart(e)); }
    fn touch(&mut self) { self.updated_at = Some(Utc::now()); }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hot_dog() -> Product { Product::new(1, "Perros Calientes", "Perro Sencillo", Money::new(9000)) }
    fn burger() -> Product { Product::new("h-2", "Hamburguesas", "Hamburguesa Doble", Money::new(20000)) }

    #[test]
    fn test_cart_operations() {
        let mut cart = Cart::new();
        cart.add_item(&hot_dog());
        cart.add_item(&hot_dog());
        cart.add_item(&burger());
        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.lines()[0].quantity, 2); // Merged
        assert_eq!(cart.subtotal(), Money::new(38000));
        assert_eq!(cart.total_item_count(), 3);
    }

    #[test]
    fn test_set_quantity_zero_removes_line() {
        let mut cart = Cart::new();
        cart.add_item(&burger());
        assert!(cart.set_quantity("h-2", 4));
        assert_eq!(cart.subtotal(), Money::new(80000));
        assert!(cart.set_quantity("h-2", 0));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_missing_ids_are_no_ops() {
        let mut cart = Cart::new();
        cart.add_item(&hot_dog());
        cart.take_events();
        assert!(!cart.remove_item("99"));
        assert!(!cart.set_quantity("99", 3));
        assert_eq!(cart.lines().len(), 1);
        assert!(cart.take_events().is_empty());
    }

    #[test]
    fn test_numeric_ids_compare_as_strings() {
        let mut cart = Cart::new();
        cart.add_item(&hot_dog());
        assert!(cart.remove_item("1"));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_from_lines_merges_duplicates() {
        let cart = Cart::from_lines(vec![
            CartLine { product: hot_dog(), quantity: 1 },
            CartLine { product: burger(), quantity: 0 },
            CartLine { product: hot_dog(), quantity: 2 },
        ]);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.total_item_count(), 3);
    }

    #[test]
    fn test_events_raised() {
        let mut cart = Cart::new();
        cart.add_item(&hot_dog());
        cart.clear();
        let events = cart.take_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1], DomainEvent::Cart(CartEvent::Cleared));
    }
}
