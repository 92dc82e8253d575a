//! Session-related types.
//!
//! Keys under which per-visitor state is stored in the session.

/// Session keys for storefront data.
pub mod keys {
    /// Key for the visitor's persisted cart (JSON text of its line items).
    pub const CART: &str = "plata.cart";
}
