//! Order Aggregate: the checkout form, its validation and submission.

use std::fmt;
use serde::{Deserialize, Serialize};
use crate::domain::aggregates::{Cart, Table};
use crate::domain::events::{DomainEvent, OrderEvent};
use crate::domain::services::message::OrderMessage;
use crate::domain::services::pricing::{self, DeliveryFeePolicy, OrderQuote};
use crate::domain::value_objects::{Coordinates, Money};
use crate::{MenuError, Result};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ServiceType { #[default] InStore, Delivery, TakeAway }

impl ServiceType {
    pub fn label(&self) -> &'static str {
        match self { Self::InStore => "mesa", Self::Delivery => "domicilio", Self::TakeAway => "para llevar" }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod { #[default] Cash, Card, Nequi, Daviplata, Llave }

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 5] = [Self::Cash, Self::Card, Self::Nequi, Self::Daviplata, Self::Llave];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Cash => "Efectivo", Self::Card => "Tarjeta", Self::Nequi => "Nequi",
            Self::Daviplata => "Daviplata", Self::Llave => "Llave",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.label().eq_ignore_ascii_case(label.trim()))
    }
}

/// Everything the customer fills in before sending the order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OrderDraft {
    pub customer_name: String,
    pub service_type: ServiceType,
    pub table: Option<Table>,
    pub address: String,
    pub coordinates: Option<Coordinates>,
    pub instructions: String,
    pub payment: PaymentMethod,
    pub cash_tendered: String,
    pub tip: Money,
}

/// Missing or wrong fields. Each flag is computed on its own so every problem shows at once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderErrors {
    pub name_missing: bool,
    pub location_missing: bool,
    pub cash_insufficient_or_missing: bool,
}

impl OrderErrors {
    pub fn is_empty(&self) -> bool { !self.name_missing && !self.location_missing && !self.cash_insufficient_or_missing }
}

impl fmt::Display for OrderErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = [
            (self.name_missing, "name"),
            (self.location_missing, "location"),
            (self.cash_insufficient_or_missing, "cash"),
        ].into_iter().filter_map(|(set, name)| set.then_some(name)).collect();
        if fields.is_empty() { write!(f, "none") } else { write!(f, "{}", fields.join(", ")) }
    }
}

pub fn validate(draft: &OrderDraft, total: Money) -> OrderErrors {
    let location_missing = match draft.service_type {
        ServiceType::Delivery => draft.address.trim().is_empty(),
        ServiceType::InStore => draft.table.is_none(),
        ServiceType::TakeAway => false,
    };
    let cash_insufficient_or_missing = match draft.payment {
        PaymentMethod::Cash => {
            let missing = pricing::parse_tender(&draft.cash_tendered).is_none();
            let short = pricing::change_due(&draft.payment, &draft.cash_tendered, total).is_some_and(|c| c.is_negative());
            missing || short
        }
        _ => false,
    };
    OrderErrors { name_missing: draft.customer_name.trim().is_empty(), location_missing, cash_insufficient_or_missing }
}

/// Open cart form: the draft plus the errors from the last validation.
#[derive(Clone, Debug, Default)]
pub struct Checkout {
    draft: OrderDraft,
    errors: OrderErrors,
    events: Vec<DomainEvent>,
}

impl Checkout {
    pub fn new() -> Self { Self::default() }

    pub fn draft(&self) -> &OrderDraft { &self.draft }
    pub fn errors(&self) -> &OrderErrors { &self.errors }

    pub fn set_customer_name(&mut self, name: impl Into<String>) { self.draft.customer_name = name.into(); }
    pub fn set_address(&mut self, address: impl Into<String>) { self.draft.address = address.into(); }
    pub fn set_coordinates(&mut self, coordinates: Option<Coordinates>) { self.draft.coordinates = coordinates; }
    pub fn set_instructions(&mut self, text: impl Into<String>) { self.draft.instructions = text.into(); }
    pub fn set_payment(&mut self, payment: PaymentMethod) { self.draft.payment = payment; }
    pub fn set_cash_tendered(&mut self, input: &str) { self.draft.cash_tendered = pricing::format_tender_input(input); }
    pub fn set_tip(&mut self, tip: Money) { self.draft.tip = if tip.is_negative() { Money::ZERO } else { tip }; }

    /// Switching service drops any location error from the previous mode.
    pub fn set_service_type(&mut self, service: ServiceType) {
        self.draft.service_type = service;
        self.errors.location_missing = false;
    }

    pub fn select_table(&mut self, table: &Table) -> Result<()> {
        if !table.available { return Err(MenuError::TableUnavailable(table.name.clone())); }
        self.draft.table = Some(table.clone());
        Ok(())
    }

    pub fn quote(&self, cart: &Cart, policy: &dyn DeliveryFeePolicy) -> OrderQuote {
        OrderQuote::compute(cart, self.draft.service_type, &self.draft.address, self.draft.tip, policy)
    }

    pub fn change_due(&self, cart: &Cart, policy: &dyn DeliveryFeePolicy) -> Option<Money> {
        let total = self.quote(cart, policy).total;
        pricing::change_due(&self.draft.payment, &self.draft.cash_tendered, total)
    }

    pub fn validate(&mut self, cart: &Cart, policy: &dyn DeliveryFeePolicy) -> OrderErrors {
        self.errors = validate(&self.draft, self.quote(cart, policy).total);
        self.errors
    }

    /// Validates and serializes the order. On success the draft goes back to defaults;
    /// emptying the cart is up to the caller.
    pub fn submit(&mut self, cart: &Cart, policy: &dyn DeliveryFeePolicy, recipient: &str) -> Result<OrderMessage> {
        if cart.is_empty() { return Err(MenuError::EmptyCart); }
        let errors = self.validate(cart, policy);
        if !errors.is_empty() { return Err(MenuError::InvalidOrder(errors)); }
        let quote = self.quote(cart, policy);
        let message = OrderMessage::compose(&self.draft, cart, &quote, recipient);
        self.events.push(DomainEvent::Order(OrderEvent::Submitted {
            service_type: self.draft.service_type, total: quote.total, items: cart.total_item_count(),
        }));
        self.reset();
        Ok(message)
    }

    pub fn reset(&mut self) {
        self.draft = OrderDraft::default();
        self.errors = OrderErrors::default();
        self.events.push(DomainEvent::Order(OrderEvent::Reset));
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> { std::mem::take(&mut self.events) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::Product;
    use crate::domain::services::pricing::AddressHeuristicFee;

    fn cart() -> Cart {
        let mut cart = Cart::new();
        let p = Product::new(5, "Hamburguesas", "Hamburguesa Especial", Money::new(20000));
        cart.add_item(&p);
        cart.add_item(&p);
        cart
    }

    fn draft(service_type: ServiceType) -> OrderDraft {
        OrderDraft { customer_name: "Ana".into(), service_type, payment: PaymentMethod::Card, ..Default::default() }
    }

    #[test]
    fn test_empty_name_always_flagged() {
        let mut d = draft(ServiceType::TakeAway);
        d.customer_name = "   ".into();
        let errors = validate(&d, Money::new(40000));
        assert_eq!(errors, OrderErrors { name_missing: true, location_missing: false, cash_insufficient_or_missing: false });
    }

    #[test]
    fn test_in_store_requires_table() {
        let mut d = draft(ServiceType::InStore);
        d.address = "Calle 1".into();
        assert!(validate(&d, Money::ZERO).location_missing);
        d.table = Some(Table::new("mesa1", "Mesa 1", true));
        d.address.clear();
        assert!(!validate(&d, Money::ZERO).location_missing);
    }

    #[test]
    fn test_delivery_requires_address() {
        let mut d = draft(ServiceType::Delivery);
        d.address = "  ".into();
        assert!(validate(&d, Money::ZERO).location_missing);
        d.address = "Calle 10 # 5-20".into();
        assert!(!validate(&d, Money::ZERO).location_missing);
    }

    #[test]
    fn test_cash_rules() {
        let mut d = draft(ServiceType::TakeAway);
        d.payment = PaymentMethod::Cash;
        assert!(validate(&d, Money::new(45000)).cash_insufficient_or_missing);
        d.cash_tendered = "40.000".into();
        assert!(validate(&d, Money::new(45000)).cash_insufficient_or_missing);
        d.cash_tendered = "50.000".into();
        assert!(validate(&d, Money::new(45000)).is_empty());
    }

    #[test]
    fn test_all_flags_reported_together() {
        let d = OrderDraft { service_type: ServiceType::Delivery, ..Default::default() };
        let errors = validate(&d, Money::new(1000));
        assert!(errors.name_missing && errors.location_missing && errors.cash_insufficient_or_missing);
        assert_eq!(errors.to_string(), "name, location, cash");
    }

    #[test]
    fn test_take_away_without_name_blocks_submit() {
        let cart = cart();
        let mut checkout = Checkout::new();
        checkout.set_service_type(ServiceType::TakeAway);
        checkout.set_payment(PaymentMethod::Nequi);
        let err = checkout.submit(&cart, &AddressHeuristicFee::default(), "573000000000").unwrap_err();
        match err {
            MenuError::InvalidOrder(e) => assert_eq!(e, OrderErrors { name_missing: true, ..Default::default() }),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(checkout.draft().service_type, ServiceType::TakeAway);
    }

    #[test]
    fn test_switching_service_clears_location_error() {
        let cart = cart();
        let mut checkout = Checkout::new();
        assert!(checkout.validate(&cart, &AddressHeuristicFee::default()).location_missing);
        checkout.set_service_type(ServiceType::Delivery);
        assert!(!checkout.errors().location_missing);
    }

    #[test]
    fn test_unavailable_table_rejected() {
        let mut checkout = Checkout::new();
        let err = checkout.select_table(&Table::new("privada", "Sala Privada", false)).unwrap_err();
        assert!(matches!(err, MenuError::TableUnavailable(_)));
        assert!(checkout.draft().table.is_none());
    }

    #[test]
    fn test_successful_submit_resets_draft() {
        let cart = cart();
        let mut checkout = Checkout::new();
        checkout.set_customer_name("Ana");
        checkout.select_table(&Table::new("mesa1", "Mesa 1", true)).unwrap();
        checkout.set_cash_tendered("50000");
        checkout.set_tip(Money::new(2000));
        let message = checkout.submit(&cart, &AddressHeuristicFee::default(), "573000000000").unwrap();
        assert!(message.text().contains("Mesa 1"));
        assert_eq!(checkout.draft(), &OrderDraft::default());
        let events = checkout.take_events();
        assert!(matches!(events[0], DomainEvent::Order(OrderEvent::Submitted { total, .. }) if total == Money::new(42000)));
    }

    #[test]
    fn test_empty_cart_cannot_submit() {
        let mut checkout = Checkout::new();
        let err = checkout.submit(&Cart::new(), &AddressHeuristicFee::default(), "573000000000").unwrap_err();
        assert!(matches!(err, MenuError::EmptyCart));
    }

    #[test]
    fn test_payment_labels_round_trip() {
        for method in PaymentMethod::ALL {
            assert_eq!(PaymentMethod::from_label(method.label()), Some(method));
        }
        assert_eq!(PaymentMethod::from_label("bitcoin"), None);
    }
}
