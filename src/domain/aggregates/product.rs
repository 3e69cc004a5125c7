//! Product and Table catalog records

use serde::{Deserialize, Serialize};
use crate::domain::value_objects::{Money, ProductId};

/// Menu entry. Built once from the catalog and never mutated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    id: ProductId,
    category: String,
    name: String,
    #[serde(default)]
    short_description: String,
    #[serde(default)]
    long_description: String,
    price: Money,
    #[serde(default)]
    image: String,
}

impl Product {
    pub fn new(id: impl Into<ProductId>, category: impl Into<String>, name: impl Into<String>, price: Money) -> Self {
        Self {
            id: id.into(), category: category.into(), name: name.into(),
            short_description: String::new(), long_description: String::new(), price, image: String::new(),
        }
    }

    pub fn with_descriptions(mut self, short: impl Into<String>, long: impl Into<String>) -> Self {
        self.short_description = short.into();
        self.long_description = long.into();
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self { self.image = image.into(); self }

    pub fn id(&self) -> &ProductId { &self.id }
    pub fn category(&self) -> &str { &self.category }
    pub fn name(&self) -> &str { &self.name }
    pub fn short_description(&self) -> &str { &self.short_description }
    pub fn long_description(&self) -> &str { &self.long_description }
    pub fn price(&self) -> Money { self.price }
    pub fn image(&self) -> &str { &self.image }
}

/// Dine-in seating option.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub id: String,
    pub name: String,
    pub available: bool,
}

impl Table {
    pub fn new(id: impl Into<String>, name: impl Into<String>, available: bool) -> Self {
        Self { id: id.into(), name: name.into(), available }
    }
}
