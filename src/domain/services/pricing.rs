//! Pricing: subtotal, delivery fee, tip, total and cash change.
//!
//! Every amount is whole pesos, so nothing here rounds.

use serde::{Deserialize, Serialize};
use crate::domain::aggregates::{Cart, PaymentMethod, ServiceType};
use crate::domain::value_objects::{group_thousands, Money};

/// Quick-pick tip amounts offered next to the free-entry field.
pub const TIP_PRESETS: [Money; 4] = [Money::new(0), Money::new(1000), Money::new(2000), Money::new(5000)];

pub fn subtotal(cart: &Cart) -> Money { cart.subtotal() }

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeeTier { #[default] None, Base, Far }

impl FeeTier {
    pub fn label(&self) -> &'static str {
        match self { Self::None => "sin domicilio", Self::Base => "tarifa base", Self::Far => "tarifa extendida" }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryFee { pub amount: Money, pub tier: FeeTier }

impl DeliveryFee {
    pub fn none() -> Self { Self::default() }
    pub fn applies(&self) -> bool { self.tier != FeeTier::None }
}

/// Decides what a delivery costs. Callers only ever see this trait, so the address
/// heuristic can be swapped for a real distance lookup.
pub trait DeliveryFeePolicy {
    fn fee(&self, service: ServiceType, address: &str) -> DeliveryFee;
}

impl<F> DeliveryFeePolicy for F where F: Fn(ServiceType, &str) -> DeliveryFee {
    fn fee(&self, service: ServiceType, address: &str) -> DeliveryFee { self(service, address) }
}

/// Guesses distance from the address text: long addresses or ones naming a far keyword
/// pay the elevated tier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressHeuristicFee {
    pub base_fee: Money,
    pub far_fee: Money,
    pub far_length: usize,
    pub far_keywords: Vec<String>,
}

impl Default for AddressHeuristicFee {
    fn default() -> Self {
        Self { base_fee: Money::new(3000), far_fee: Money::new(5000), far_length: 40, far_keywords: vec!["lejos".to_string()] }
    }
}

impl AddressHeuristicFee {
    pub fn is_far(&self, address: &str) -> bool {
        if address.chars().count() > self.far_length { return true; }
        let address = address.to_lowercase();
        self.far_keywords.iter().filter(|k| !k.trim().is_empty()).any(|k| address.contains(&k.trim().to_lowercase()))
    }
}

impl DeliveryFeePolicy for AddressHeuristicFee {
    fn fee(&self, service: ServiceType, address: &str) -> DeliveryFee {
        match service {
            ServiceType::Delivery if self.is_far(address) => DeliveryFee { amount: self.far_fee, tier: FeeTier::Far },
            ServiceType::Delivery => DeliveryFee { amount: self.base_fee, tier: FeeTier::Base },
            ServiceType::InStore | ServiceType::TakeAway => DeliveryFee::none(),
        }
    }
}

/// Free-entry tip. Anything that is not a non-negative integer counts as no tip.
pub fn parse_tip(input: &str) -> Money {
    input.trim().parse::<i64>().ok().filter(|v| *v >= 0).map(Money::new).unwrap_or(Money::ZERO)
}

/// Priced view of a cart under the current form choices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderQuote {
    pub subtotal: Money,
    pub delivery_fee: DeliveryFee,
    pub tip: Money,
    pub total: Money,
}

impl OrderQuote {
    pub fn compute(cart: &Cart, service: ServiceType, address: &str, tip: Money, policy: &dyn DeliveryFeePolicy) -> Self {
        let subtotal = subtotal(cart);
        let delivery_fee = policy.fee(service, address);
        let tip = if tip.is_negative() { Money::ZERO } else { tip };
        Self { subtotal, delivery_fee, tip, total: subtotal.add(delivery_fee.amount).add(tip) }
    }
}

pub fn total(cart: &Cart, service: ServiceType, address: &str, tip: Money, policy: &dyn DeliveryFeePolicy) -> Money {
    OrderQuote::compute(cart, service, address, tip, policy).total
}

/// Reads a typed cash amount by keeping only its digits, so `"50.000"` and `"$50,000"`
/// both mean 50000. Returns `None` when there are no digits at all.
pub fn parse_tender(input: &str) -> Option<Money> {
    let mut seen = false;
    let value = input.chars().filter_map(|c| c.to_digit(10)).fold(0i64, |acc, d| {
        seen = true;
        acc.saturating_mul(10).saturating_add(i64::from(d))
    });
    seen.then_some(Money::new(value))
}

/// Change owed for a cash payment; negative means the tender falls short.
/// Only cash payments have change, every other method yields `None`.
pub fn change_due(payment: &PaymentMethod, tendered: &str, total: Money) -> Option<Money> {
    match payment {
        PaymentMethod::Cash => Some(parse_tender(tendered).unwrap_or(Money::ZERO).subtract(total)),
        _ => None,
    }
}

/// Normalizes what the customer types into the cash field, e.g. `"50000"` becomes `"50.000"`.
pub fn format_tender_input(input: &str) -> String {
    parse_tender(input).map(|m| group_thousands(m.amount().unsigned_abs())).unwrap_or_default()
}
