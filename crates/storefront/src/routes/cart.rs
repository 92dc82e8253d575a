//! Cart route handlers.
//!
//! Each request loads the visitor's cart from the session, applies one
//! operation, and writes the cart back only if it changed. Mutations respond
//! with the full cart view and an `HX-Trigger: cart-updated` header so the
//! front end can re-render badges and panels.

use axum::{
    Form, Json,
    extract::State,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use plata_core::{CartStore, LineItem, Price};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::session_keys;
use crate::state::AppState;

/// Cart line display data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartItemView {
    /// Position to pass back to `/cart/remove` and `/cart/update`.
    pub index: usize,
    pub name: String,
    pub tag: String,
    pub quantity: u32,
    pub unit_price: i64,
    pub line_total: i64,
    pub price_display: String,
    pub line_total_display: String,
}

/// Cart display data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: i64,
    pub total_display: String,
    /// Sum of quantities (the badge count).
    pub item_count: u32,
    /// Number of distinct lines.
    pub line_count: usize,
}

/// Cart count badge data.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartCountView {
    pub count: u32,
}

// =============================================================================
// Type Conversions
// =============================================================================

impl From<&CartStore> for CartView {
    fn from(cart: &CartStore) -> Self {
        let total = cart.total();
        Self {
            items: cart
                .items()
                .iter()
                .enumerate()
                .map(|(index, item)| CartItemView::new(index, item))
                .collect(),
            total: total.amount(),
            total_display: total.to_string(),
            item_count: cart.item_count(),
            line_count: cart.line_count(),
        }
    }
}

impl CartItemView {
    fn new(index: usize, item: &LineItem) -> Self {
        let line_total = item.line_total();
        Self {
            index,
            name: item.name().to_string(),
            tag: item.tag().to_string(),
            quantity: item.quantity(),
            unit_price: item.unit_price().amount(),
            line_total: line_total.amount(),
            price_display: item.unit_price().to_string(),
            line_total_display: line_total.to_string(),
        }
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Load the visitor's cart from the session.
///
/// A missing cart is empty. A malformed one is logged, dropped from the
/// session, and replaced with an empty cart.
async fn load_cart(session: &Session) -> Result<CartStore> {
    let Some(value) = session
        .get::<serde_json::Value>(session_keys::CART)
        .await?
    else {
        return Ok(CartStore::new());
    };

    let parsed = match &value {
        serde_json::Value::String(blob) => CartStore::try_deserialize(blob),
        other => CartStore::try_deserialize(&other.to_string()),
    };

    match parsed {
        Ok(cart) => Ok(cart),
        Err(e) => {
            tracing::warn!(error = %e, "Discarding malformed persisted cart");
            session.remove_value(session_keys::CART).await?;
            Ok(CartStore::new())
        }
    }
}

/// Persist the cart to the session if it changed.
async fn save_cart(session: &Session, cart: &mut CartStore) -> Result<()> {
    if cart.is_dirty() {
        session
            .insert(session_keys::CART, cart.serialize()?)
            .await?;
        cart.mark_clean();
    }
    Ok(())
}

/// Response for a cart mutation.
fn updated(cart: &CartStore) -> Response {
    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        Json(CartView::from(cart)),
    )
        .into_response()
}

// =============================================================================
// Forms
// =============================================================================

/// Add to cart form data (from the add-to-cart button's data attributes).
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub name: String,
    pub price: i64,
    pub tag: Option<String>,
}

/// Add catalog product form data.
#[derive(Debug, Deserialize)]
pub struct AddProductForm {
    pub id: u32,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub index: usize,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub index: usize,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the cart.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<Json<CartView>> {
    let cart = load_cart(&session).await?;
    Ok(Json(CartView::from(&cart)))
}

/// Add one unit of an item to the cart.
#[instrument(skip(session))]
pub async fn add(session: Session, Form(form): Form<AddToCartForm>) -> Result<Response> {
    let mut cart = load_cart(&session).await?;
    let tag = form.tag.unwrap_or_default();

    let index = cart.add(&form.name, Price::new(form.price), &tag);
    save_cart(&session, &mut cart).await?;

    add_breadcrumb(
        "cart",
        "Added item",
        Some(&[("name", form.name.as_str()), ("tag", tag.as_str())]),
    );
    tracing::debug!(
        index,
        item_count = cart.item_count(),
        "Item added to cart"
    );

    Ok(updated(&cart))
}

/// Add one unit of a catalog product to the cart.
#[instrument(skip(state, session))]
pub async fn add_product(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddProductForm>,
) -> Result<Response> {
    let product = state
        .catalog()
        .get(form.id)
        .ok_or_else(|| AppError::NotFound(format!("product {}", form.id)))?;

    let mut cart = load_cart(&session).await?;
    let index = product.add_to(&mut cart);
    save_cart(&session, &mut cart).await?;

    add_breadcrumb(
        "cart",
        "Added product",
        Some(&[("name", product.name.as_str()), ("tag", product.tag.as_str())]),
    );
    tracing::debug!(
        index,
        product_id = product.id,
        item_count = cart.item_count(),
        "Product added to cart"
    );

    Ok(updated(&cart))
}

/// Set the quantity of a line. A quantity of 0 removes it.
#[instrument(skip(session))]
pub async fn update(session: Session, Form(form): Form<UpdateCartForm>) -> Result<Response> {
    let mut cart = load_cart(&session).await?;

    if !cart.set_quantity(form.index, form.quantity) {
        tracing::debug!(
            index = form.index,
            line_count = cart.line_count(),
            "Ignoring update of missing cart line"
        );
    }
    save_cart(&session, &mut cart).await?;

    Ok(updated(&cart))
}

/// Remove a line from the cart.
///
/// An index outside the cart leaves it unchanged; indices come from the last
/// rendered view, so a stale one is not an error.
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<RemoveFromCartForm>) -> Result<Response> {
    let mut cart = load_cart(&session).await?;

    match cart.remove_at(form.index) {
        Some(item) => tracing::debug!(name = item.name(), "Item removed from cart"),
        None => tracing::debug!(
            index = form.index,
            line_count = cart.line_count(),
            "Ignoring removal of missing cart line"
        ),
    }
    save_cart(&session, &mut cart).await?;

    Ok(updated(&cart))
}

/// Empty the cart.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<Response> {
    let mut cart = load_cart(&session).await?;
    cart.clear();
    save_cart(&session, &mut cart).await?;

    Ok(updated(&cart))
}

/// Get the cart count badge.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<Json<CartCountView>> {
    let cart = load_cart(&session).await?;
    Ok(Json(CartCountView {
        count: cart.item_count(),
    }))
}

/// Redirect to the checkout link and empty the cart.
///
/// An empty cart is refused with a user-facing message and nothing changes.
#[instrument(skip(state, session))]
pub async fn checkout(State(state): State<AppState>, session: Session) -> Result<Response> {
    let mut cart = load_cart(&session).await?;
    let link = state.checkout().build(&cart)?;

    tracing::info!(
        lines = cart.line_count(),
        total = cart.total().amount(),
        "Checkout link issued"
    );

    cart.clear();
    save_cart(&session, &mut cart).await?;

    Ok(Redirect::to(&link).into_response())
}
