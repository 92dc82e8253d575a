//! Product catalog.
//!
//! The catalog is the read-only list of products the storefront offers. Each
//! product supplies the `(name, price, tag)` triple an add-to-cart action
//! passes to [`CartStore::add`]. Catalogs are loaded from JSON:
//!
//! ```json
//! [
//!   {"id": 1, "name": "Ring A", "description": "Sterling silver ring", "price": 15000, "tag": "Plata 925"}
//! ]
//! ```
//!
//! A missing `tag` reads as `Plata 925` and a missing `image` as
//! `default.jpg`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::CartStore;
use crate::types::Price;

/// Tag given to products that do not name one.
pub const DEFAULT_TAG: &str = "Plata 925";

/// Image given to products that do not name one.
pub const DEFAULT_IMAGE: &str = "default.jpg";

/// Errors loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Duplicate product id {0}")]
    DuplicateId(u32),
}

/// A product offered in the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(default = "default_tag")]
    pub tag: String,
    #[serde(default = "default_image")]
    pub image: String,
}

fn default_tag() -> String {
    DEFAULT_TAG.to_string()
}

fn default_image() -> String {
    DEFAULT_IMAGE.to_string()
}

impl Product {
    /// Add one unit of this product to `cart`, returning the line index.
    pub fn add_to(&self, cart: &mut CartStore) -> usize {
        cart.add(&self.name, self.price, &self.tag)
    }
}

/// Products in listing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Create a catalog from products.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateId`] if two products share an id.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        for (i, product) in products.iter().enumerate() {
            if products
                .iter()
                .skip(i + 1)
                .any(|other| other.id == product.id)
            {
                return Err(CatalogError::DuplicateId(product.id));
            }
        }
        Ok(Self { products })
    }

    /// Parse a catalog from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a JSON array of products or two
    /// products share an id.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Self::new(serde_json::from_str(json)?)
    }

    /// All products in listing order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: u32) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
