//! Fixtures

use std::{fs, path::PathBuf};

use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;
use tracing::debug;

use crate::{catalog::Product, categories::Category, fixtures::catalog::CatalogFixture};

pub mod catalog;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Two products share an id
    #[error("Duplicate product id: {0}")]
    DuplicateProduct(String),

    /// Two categories share an id
    #[error("Duplicate category id: {0}")]
    DuplicateCategory(String),

    /// A product is listed under a category that does not exist
    #[error("Product {product} references unknown category {category}")]
    UnknownCategory {
        /// Product id
        product: String,

        /// Missing category id
        category: String,
    },

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),
}

/// A storefront catalog loaded from YAML.
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Products in file order
    products: Vec<Product>,

    /// Product id -> index into `products`
    product_index: FxHashMap<String, usize>,

    /// Categories in file order
    categories: Vec<Category>,
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            products: Vec::new(),
            product_index: FxHashMap::default(),
            categories: Vec::new(),
        }
    }

    /// Load products and categories from `catalogs/<name>.yml`
    ///
    /// The whole catalog is validated before anything is added, so a failed load leaves
    /// the fixture unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, if a product or category id
    /// repeats, or if a product references a category that was never loaded.
    #[tracing::instrument(name = "fixtures.load_catalog", skip(self), fields(base_path = %self.base_path.display()), err)]
    pub fn load_catalog(&mut self, name: &str) -> Result<(), FixtureError> {
        let file_path = self.base_path.join("catalogs").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: CatalogFixture = serde_norway::from_str(&contents)?;

        let mut category_ids: FxHashSet<&str> = self
            .categories
            .iter()
            .map(|category| category.id.as_str())
            .collect();

        for category in &fixture.categories {
            if !category_ids.insert(category.id.as_str()) {
                return Err(FixtureError::DuplicateCategory(category.id.clone()));
            }
        }

        let mut product_ids: FxHashSet<&str> = FxHashSet::default();

        for product in &fixture.products {
            if self.product_index.contains_key(&product.id)
                || !product_ids.insert(product.id.as_str())
            {
                return Err(FixtureError::DuplicateProduct(product.id.clone()));
            }

            if let Some(category) = product
                .category_id
                .as_deref()
                .filter(|category| !category_ids.contains(category))
            {
                return Err(FixtureError::UnknownCategory {
                    product: product.id.clone(),
                    category: category.to_string(),
                });
            }
        }

        self.categories.extend(fixture.categories);

        for product in fixture.products {
            self.product_index
                .insert(product.id.clone(), self.products.len());
            self.products.push(product);
        }

        debug!(
            products = self.products.len(),
            categories = self.categories.len(),
            "loaded catalog"
        );

        Ok(())
    }

    /// Load a catalog by name from the default fixtures directory
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_catalog(name)?;

        Ok(fixture)
    }

    /// Get a product by its id
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn product(&self, id: &str) -> Result<&Product, FixtureError> {
        self.product_index
            .get(id)
            .and_then(|index| self.products.get(*index))
            .ok_or_else(|| FixtureError::ProductNotFound(id.to_string()))
    }

    /// Get all products
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Get all categories
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }
}
