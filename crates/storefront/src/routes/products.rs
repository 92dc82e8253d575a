//! Product catalog route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use plata_core::Product;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Product display data.
///
/// `name`, `price` and `tag` are what an add-to-cart button posts to
/// `/cart/add`; `id` is what it posts to `/cart/add-product`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductView {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub price_display: String,
    pub tag: String,
    pub image: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.amount(),
            price_display: product.price.to_string(),
            tag: product.tag.clone(),
            image: product.image.clone(),
        }
    }
}

/// List all products.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Json<Vec<ProductView>> {
    Json(
        state
            .catalog()
            .products()
            .iter()
            .map(ProductView::from)
            .collect(),
    )
}

/// Display a single product.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<u32>) -> Result<Json<ProductView>> {
    state
        .catalog()
        .get(id)
        .map(|product| Json(ProductView::from(product)))
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}
