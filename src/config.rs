//! Runtime settings read from the environment (a `.env` file is honoured by the binary).

use std::path::PathBuf;
use std::str::FromStr;
use validator::Validate;
use crate::domain::services::AddressHeuristicFee;
use crate::domain::value_objects::Money;
use crate::optimizer::OutputFormat;
use crate::{MenuError, Result};

pub const DEFAULT_RECIPIENT: &str = "573028645014";

/// Asset folders the optimizer walks, in order.
pub const ASSET_FOLDERS: [&str; 9] = [
    "perros", "hamburguesas", "arepas", "bebidas", "salchipapas", "matador", "otros", "sandwichs", "servicios_mini",
];

#[derive(Clone, Debug, PartialEq)]
pub struct OrderSettings {
    pub cart_path: PathBuf,
    pub recipient: String,
    pub delivery: AddressHeuristicFee,
}

impl Default for OrderSettings {
    fn default() -> Self {
        Self { cart_path: PathBuf::from("cart.json"), recipient: DEFAULT_RECIPIENT.to_string(), delivery: AddressHeuristicFee::default() }
    }
}

impl OrderSettings {
    pub fn from_env() -> Result<Self> { Self::from_lookup(|key| std::env::var(key).ok()) }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let delivery = AddressHeuristicFee {
            base_fee: parse_var(&lookup, "MENU_DELIVERY_BASE_FEE")?.map(Money::new).unwrap_or(defaults.delivery.base_fee),
            far_fee: parse_var(&lookup, "MENU_DELIVERY_FAR_FEE")?.map(Money::new).unwrap_or(defaults.delivery.far_fee),
            far_length: parse_var(&lookup, "MENU_DELIVERY_FAR_LENGTH")?.unwrap_or(defaults.delivery.far_length),
            far_keywords: lookup("MENU_DELIVERY_FAR_KEYWORDS")
                .map(|v| v.split(',').map(|k| k.trim().to_string()).filter(|k| !k.is_empty()).collect())
                .unwrap_or(defaults.delivery.far_keywords),
        };
        if delivery.base_fee.is_negative() || delivery.far_fee.is_negative() {
            return Err(MenuError::Config("delivery fees must not be negative".into()));
        }
        Ok(Self {
            cart_path: lookup("MENU_CART_PATH").map(PathBuf::from).unwrap_or(defaults.cart_path),
            recipient: lookup("MENU_WHATSAPP_RECIPIENT").map(|v| v.trim().to_string()).filter(|v| !v.is_empty()).unwrap_or(defaults.recipient),
            delivery,
        })
    }
}

/// Transform settings for one optimizer run.
#[derive(Clone, Debug, PartialEq, Validate)]
pub struct OptimizerSettings {
    pub assets_dir: PathBuf,
    #[validate(length(min = 1))]
    pub folders: Vec<String>,
    #[validate(range(min = 1, max = 100))]
    pub quality: u8,
    #[validate(range(min = 1))]
    pub max_width: u32,
    #[validate(range(min = 1))]
    pub max_height: u32,
    pub output_format: OutputFormat,
    pub preserve_original: bool,
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        Self {
            assets_dir: PathBuf::from("./public/assets"),
            folders: ASSET_FOLDERS.iter().map(|f| f.to_string()).collect(),
            quality: 80,
            max_width: 800,
            max_height: 600,
            output_format: OutputFormat::WebP,
            preserve_original: false,
        }
    }
}

impl OptimizerSettings {
    pub fn from_env() -> Result<Self> { Self::from_lookup(|key| std::env::var(key).ok()) }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut settings = Self::default();
        if let Some(dir) = lookup("MENU_ASSETS_DIR").filter(|d| !d.trim().is_empty()) {
            settings.assets_dir = PathBuf::from(dir);
        }
        settings.validate().map_err(|e| MenuError::Config(e.to_string()))?;
        Ok(settings)
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>> {
    match lookup(key) {
        Some(raw) => raw.trim().parse().map(Some).map_err(|_| MenuError::Config(format!("{key} has an invalid value: {raw}"))),
        None => Ok(None),
    }
}
