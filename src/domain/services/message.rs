//! Order message for the restaurant's chat line.
//!
//! The text goes out as a `wa.me` deep link; opening it is the caller's job.

use std::fmt::Write;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use crate::domain::aggregates::{Cart, OrderDraft, PaymentMethod, ServiceType};
use crate::domain::services::pricing::{self, OrderQuote};

/// Characters left readable in a query value; everything else is percent-encoded.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-').remove(b'_').remove(b'.').remove(b'!').remove(b'~')
    .remove(b'*').remove(b'\'').remove(b'(').remove(b')');

const CHAT_BASE_URL: &str = "https://wa.me";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderMessage {
    text: String,
    link: String,
}

impl OrderMessage {
    pub fn compose(draft: &OrderDraft, cart: &Cart, quote: &OrderQuote, recipient: &str) -> Self {
        let text = render_text(draft, cart, quote);
        let link = chat_link(recipient, &text);
        Self { text, link }
    }

    pub fn text(&self) -> &str { &self.text }
    pub fn link(&self) -> &str { &self.link }
}

pub fn encode_query_value(text: &str) -> String { utf8_percent_encode(text, QUERY_VALUE).to_string() }

pub fn chat_link(recipient: &str, text: &str) -> String {
    format!("{}/{}?text={}", CHAT_BASE_URL, recipient, encode_query_value(text))
}

pub fn render_text(draft: &OrderDraft, cart: &Cart, quote: &OrderQuote) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_text(&mut out, draft, cart, quote);
    out
}

fn write_text(out: &mut String, draft: &OrderDraft, cart: &Cart, quote: &OrderQuote) -> std::fmt::Result {
    writeln!(out, "🛒 Nuevo pedido ({}):", draft.service_type.label())?;
    writeln!(out)?;
    for line in cart.lines() {
        writeln!(out, "• {} x{}", line.product.name(), line.quantity)?;
    }
    writeln!(out)?;
    writeln!(out, "Subtotal: {}", quote.subtotal)?;
    if quote.delivery_fee.applies() {
        writeln!(out, "🚚 Domicilio ({}): {}", quote.delivery_fee.tier.label(), quote.delivery_fee.amount)?;
    }
    if !quote.tip.is_zero() {
        writeln!(out, "🙏 Propina: {}", quote.tip)?;
    }
    writeln!(out, "TOTAL: {}", quote.total)?;
    writeln!(out)?;
    writeln!(out, "👤 Nombre: {}", draft.customer_name.trim())?;
    match draft.service_type {
        ServiceType::Delivery => {
            writeln!(out, "📍 Dirección: {}", draft.address.trim())?;
            if let Some(coords) = draft.coordinates {
                writeln!(out, "🗺️ Ubicación: {}", coords.maps_link())?;
            }
        }
        ServiceType::InStore => {
            let table = draft.table.as_ref().map(|t| t.name.as_str()).unwrap_or_default();
            writeln!(out, "🍽️ Mesa: {}", table)?;
        }
        ServiceType::TakeAway => writeln!(out, "📦 Tipo: Para llevar")?,
    }
    let instructions = draft.instructions.trim();
    writeln!(out, "📝 Instrucciones: {}", if instructions.is_empty() { "Ninguna" } else { instructions })?;
    match draft.payment {
        PaymentMethod::Cash => {
            let tendered = pricing::parse_tender(&draft.cash_tendered).unwrap_or_default();
            writeln!(out, "💵 Paga con: {}", tendered)?;
            writeln!(out, "🪙 Cambio: {}", tendered.subtract(quote.total))?;
        }
        other => writeln!(out, "💳 Pago: {}", other.label())?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::{Product, Table};
    use crate::domain::services::pricing::AddressHeuristicFee;
    use crate::domain::value_objects::{Coordinates, Money};

    fn cart() -> Cart {
        let mut cart = Cart::new();
        cart.add_item(&Product::new(1, "Perros Calientes", "Perro Sencillo", Money::new(9000)));
        cart.add_item(&Product::new(2, "Bebidas", "Limonada Natural", Money::new(7000)));
        cart.add_item(&Product::new(1, "Perros Calientes", "Perro Sencillo", Money::new(9000)));
        cart
    }

    fn compose(draft: &OrderDraft) -> OrderMessage {
        let cart = cart();
        let quote = OrderQuote::compute(&cart, draft.service_type, &draft.address, draft.tip, &AddressHeuristicFee::default());
        OrderMessage::compose(draft, &cart, &quote, "573028645014")
    }

    #[test]
    fn test_delivery_message_field_order() {
        let draft = OrderDraft {
            customer_name: "Ana".into(),
            service_type: ServiceType::Delivery,
            address: "Calle 10 # 5-20".into(),
            coordinates: Some(Coordinates::new(6.25, -75.56)),
            payment: PaymentMethod::Cash,
            cash_tendered: "50.000".into(),
            tip: Money::new(1000),
            ..Default::default()
        };
        let text = compose(&draft).text().to_string();
        let order = [
            "Nuevo pedido (domicilio)", "• Perro Sencillo x2", "• Limonada Natural x1", "Subtotal: $25.000",
            "Domicilio (tarifa base): $3.000", "Propina: $1.000", "TOTAL: $29.000", "Nombre: Ana",
            "Dirección: Calle 10 # 5-20", "https://www.google.com/maps?q=6.25,-75.56", "Instrucciones: Ninguna",
            "Paga con: $50.000", "Cambio: $21.000",
        ];
        let positions: Vec<usize> = order.iter().map(|s| text.find(s).unwrap_or_else(|| panic!("missing {s}"))).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{text}");
    }

    #[test]
    fn test_table_message_omits_optional_lines() {
        let draft = OrderDraft {
            customer_name: "Luis".into(),
            table: Some(Table::new("terraza1", "Terraza 1", true)),
            instructions: "Sin cebolla".into(),
            payment: PaymentMethod::Daviplata,
            ..Default::default()
        };
        let text = compose(&draft).text().to_string();
        assert!(text.contains("🍽️ Mesa: Terraza 1"));
        assert!(text.contains("Instrucciones: Sin cebolla"));
        assert!(text.contains("💳 Pago: Daviplata"));
        assert!(!text.contains("Domicilio"));
        assert!(!text.contains("Propina"));
        assert!(!text.contains("Cambio"));
    }

    #[test]
    fn test_take_away_marker() {
        let draft = OrderDraft { customer_name: "Eva".into(), service_type: ServiceType::TakeAway, payment: PaymentMethod::Card, ..Default::default() };
        assert!(compose(&draft).text().contains("📦 Tipo: Para llevar"));
    }

    #[test]
    fn test_link_is_percent_encoded() {
        let draft = OrderDraft { customer_name: "Eva".into(), service_type: ServiceType::TakeAway, payment: PaymentMethod::Card, ..Default::default() };
        let message = compose(&draft);
        let link = message.link();
        assert!(link.starts_with("https://wa.me/573028645014?text="));
        let query = &link["https://wa.me/573028645014?text=".len()..];
        assert!(!query.contains(' ') && !query.contains('\n') && !query.contains('#') && !query.contains('&'));
        assert_eq!(encode_query_value("a b\n$1.000 #5"), "a%20b%0A%241.000%20%235");
    }
}
