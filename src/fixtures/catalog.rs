//! Catalog Fixtures

use serde::Deserialize;

use crate::{catalog::Product, categories::Category};

/// Wrapper for a catalog in YAML
#[derive(Debug, Default, Deserialize)]
pub struct CatalogFixture {
    /// Categories, parents before or after children
    #[serde(default)]
    pub categories: Vec<Category>,

    /// Products in display order
    #[serde(default)]
    pub products: Vec<Product>,
}
