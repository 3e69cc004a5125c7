//! Value Objects for the menu

use serde::{Deserialize, Serialize};
use std::fmt;

/// Catalog identifier. Catalog files mix numeric and string ids, so both are accepted
/// and compared through their string form.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    Number(i64),
    Text(String),
}

impl ProductId {
    pub fn as_key(&self) -> String {
        match self { Self::Number(n) => n.to_string(), Self::Text(s) => s.clone() }
    }
    pub fn matches(&self, key: &str) -> bool {
        match self { Self::Number(n) => n.to_string() == key, Self::Text(s) => s == key }
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self { Self::Number(n) => write!(f, "{}", n), Self::Text(s) => write!(f, "{}", s) }
    }
}

impl From<i64> for ProductId { fn from(n: i64) -> Self { Self::Number(n) } }
impl From<i32> for ProductId { fn from(n: i32) -> Self { Self::Number(i64::from(n)) } }
impl From<&str> for ProductId { fn from(s: &str) -> Self { Self::Text(s.to_string()) } }

/// Money value object, whole pesos. Prices carry no fractional part.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);
    pub const fn new(amount: i64) -> Self { Self(amount) }
    pub fn amount(&self) -> i64 { self.0 }
    pub fn is_zero(&self) -> bool { self.0 == 0 }
    pub fn is_negative(&self) -> bool { self.0 < 0 }
    pub fn add(&self, other: Money) -> Money { Money(self.0.saturating_add(other.0)) }
    pub fn subtract(&self, other: Money) -> Money { Money(self.0.saturating_sub(other.0)) }
    pub fn multiply(&self, qty: u32) -> Money { Money(self.0.saturating_mul(i64::from(qty))) }
    pub fn abs(&self) -> Money { Money(self.0.saturating_abs()) }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self { iter.fold(Money::ZERO, |acc, m| acc.add(m)) }
}

/// Renders as `$45.000`, the way the menu prints prices.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}", sign, group_thousands(self.0.unsigned_abs()))
    }
}

/// Groups digits in threes with `.` separators.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 { out.push('.'); }
        out.push(c);
    }
    out
}

/// A captured device position.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates { pub lat: f64, pub lng: f64 }

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self { Self { lat, lng } }
    pub fn maps_link(&self) -> String { format!("https://www.google.com/maps?q={},{}", self.lat, self.lng) }
}
