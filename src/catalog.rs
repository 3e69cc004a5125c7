//! Menu catalog: products grouped by category plus the dine-in tables.
//!
//! The catalog ships inside the binary and is loaded whole at startup.

use std::collections::HashSet;
use serde::Deserialize;
use crate::domain::aggregates::{Product, Table};
use crate::{MenuError, Result};

/// Pseudo category that matches every product.
pub const ALL_CATEGORIES: &str = "Todos";

const EMBEDDED_CATALOG: &str = include_str!("../data/catalog.json");

#[derive(Debug, Deserialize)]
struct CatalogFile {
    categories: Vec<String>,
    products: Vec<Product>,
    #[serde(default)]
    tables: Vec<Table>,
}

#[derive(Clone, Debug)]
pub struct Catalog {
    categories: Vec<String>,
    products: Vec<Product>,
    tables: Vec<Table>,
}

impl Catalog {
    pub fn embedded() -> Result<Self> { Self::from_json(EMBEDDED_CATALOG) }

    pub fn from_json(json: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(json)?;
        let mut seen = HashSet::new();
        for product in &file.products {
            if !seen.insert(product.id().as_key()) {
                return Err(MenuError::Catalog(format!("duplicate product id {}", product.id())));
            }
            if product.price().is_negative() {
                return Err(MenuError::Catalog(format!("negative price for {}", product.name())));
            }
        }
        tracing::debug!(products = file.products.len(), tables = file.tables.len(), "Catalog loaded");
        Ok(Self { categories: file.categories, products: file.products, tables: file.tables })
    }

    /// Category tabs in display order, led by the match-all entry.
    pub fn categories(&self) -> Vec<&str> {
        std::iter::once(ALL_CATEGORIES).chain(self.categories.iter().map(String::as_str)).collect()
    }

    pub fn products(&self) -> &[Product] { &self.products }
    pub fn tables(&self) -> &[Table] { &self.tables }
    pub fn available_tables(&self) -> impl Iterator<Item = &Table> { self.tables.iter().filter(|t| t.available) }

    pub fn product(&self, id: &str) -> Option<&Product> { self.products.iter().find(|p| p.id().matches(id)) }
    pub fn table(&self, id: &str) -> Option<&Table> { self.tables.iter().find(|t| t.id == id) }

    /// Products in `category` (or all of them) whose name contains `search`, ignoring case.
    pub fn filter(&self, category: &str, search: &str) -> Vec<&Product> {
        let needle = search.trim().to_lowercase();
        self.products.iter()
            .filter(|p| category == ALL_CATEGORIES || p.category() == category)
            .filter(|p| needle.is_empty() || p.name().to_lowercase().contains(&needle))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_catalog_loads() {
        let catalog = Catalog::embedded().unwrap();
        assert_eq!(
            catalog.categories(),
            vec![ALL_CATEGORIES, "Perros Calientes", "Hamburguesas", "Salchipapas", "Bebidas", "Matador", "Sándwich", "Servicios (Mini)"],
        );
        assert_eq!(catalog.products().len(), 37);
        assert_eq!(catalog.tables().len(), 11);
        assert_eq!(catalog.available_tables().count(), 10);
        assert!(catalog.available_tables().all(|t| t.id != "privada"));
        assert!(catalog.table("hold").is_some_and(|t| t.available));
        assert_eq!(catalog.product("1").map(|p| p.name()), Some("Limonada Natural"));
        assert_eq!(catalog.product("hb8").map(|p| p.name()), Some("Hamburguesa Gourmet"));
        assert_eq!(catalog.product("pc10").map(|p| p.name()), Some("Perro Gourmet"));
        assert_eq!(catalog.product("sp5").map(|p| p.price().amount()), Some(51000));
        for category in catalog.categories().into_iter().skip(1) {
            assert!(!catalog.filter(category, "").is_empty(), "{category} has no products");
        }
    }

    #[test]
    fn test_filter_by_category_and_search() {
        let catalog = Catalog::embedded().unwrap();
        assert_eq!(catalog.filter(ALL_CATEGORIES, "").len(), catalog.products().len());
        assert!(catalog.filter("Bebidas", "").iter().all(|p| p.category() == "Bebidas"));
        let hawaiian = catalog.filter(ALL_CATEGORIES, "HAWAI");
        assert_eq!(hawaiian.len(), 2);
        assert_eq!(catalog.filter("Hamburguesas", "hawai").len(), 1);
        assert_eq!(catalog.filter("Hamburguesas", "").len(), 10);
        assert_eq!(catalog.filter("Matador", "trolebus").len(), 1);
        assert!(catalog.filter("Bebidas", "perro").is_empty());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let json = r#"{"categories":["A"],"products":[
            {"id":1,"category":"A","name":"x","price":1},
            {"id":"1","category":"A","name":"y","price":2}]}"#;
        assert!(matches!(Catalog::from_json(json), Err(MenuError::Catalog(_))));
    }
}
