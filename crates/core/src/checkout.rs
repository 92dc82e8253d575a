//! Checkout link construction.
//!
//! Checkout hands the order off to a messaging endpoint (for example a
//! `https://wa.me/<number>` contact link) with the order pre-filled as the
//! message text:
//!
//! ```text
//! Hola! Quiero realizar el siguiente pedido:
//!
//! ✨ Ring A x2 (gold) - $30.000
//! ✨ Necklace B x1 (silver) - $8.000
//!
//! 💎 Total: $38.000
//! ```
//!
//! The whole message is percent-encoded into the `text` query parameter, so
//! product names and tags can never break out of it. Endpoints are checked
//! once, when the builder is created: only absolute `http`/`https` URLs
//! without a fragment are accepted, since anything after `#` would swallow
//! the message.

use thiserror::Error;
use url::Url;

use crate::cart::CartStore;
use crate::types::LineItem;

/// Opening line used when no greeting is configured.
pub const DEFAULT_GREETING: &str = "Hola! Quiero realizar el siguiente pedido:";

/// Errors building a checkout link.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    /// There is nothing to order.
    #[error("cart is empty")]
    EmptyCart,

    /// The messaging endpoint cannot carry the order text.
    #[error("invalid checkout endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
}

/// Builds checkout links for a fixed messaging endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutLinkBuilder {
    endpoint: Url,
    greeting: String,
}

impl CheckoutLinkBuilder {
    /// Create a builder for `endpoint` with the default greeting.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InvalidEndpoint`] unless the endpoint is an
    /// `http` or `https` URL without a fragment.
    pub fn new(endpoint: Url) -> Result<Self, CheckoutError> {
        let invalid = |reason: String| CheckoutError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason,
        };

        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", endpoint.scheme())));
        }
        if endpoint.fragment().is_some() {
            return Err(invalid("must not contain a fragment".to_string()));
        }

        Ok(Self {
            endpoint,
            greeting: DEFAULT_GREETING.to_string(),
        })
    }

    /// Parse `endpoint` and create a builder for it.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InvalidEndpoint`] if `endpoint` is not an
    /// absolute URL or fails the checks of [`CheckoutLinkBuilder::new`].
    pub fn parse(endpoint: &str) -> Result<Self, CheckoutError> {
        let url = Url::parse(endpoint).map_err(|e| CheckoutError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })?;
        Self::new(url)
    }

    /// Replace the opening line of the message.
    #[must_use]
    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.greeting = greeting.into();
        self
    }

    /// The endpoint links are built against.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Plain-text order message for `cart`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] if the cart has no lines.
    pub fn message(&self, cart: &CartStore) -> Result<String, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let mut text = format!("{}\n\n", self.greeting);
        for item in cart {
            text.push_str(&order_line(item));
            text.push('\n');
        }
        text.push_str(&format!("\n💎 Total: {}", cart.total()));

        Ok(text)
    }

    /// Full checkout link for `cart`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] if the cart has no lines.
    pub fn build(&self, cart: &CartStore) -> Result<String, CheckoutError> {
        let message = self.message(cart)?;
        let separator = match self.endpoint.query() {
            None => "?",
            Some("") => "",
            Some(_) => "&",
        };
        Ok(format!(
            "{}{separator}text={}",
            self.endpoint,
            urlencoding::encode(&message)
        ))
    }
}

fn order_line(item: &LineItem) -> String {
    if item.tag().is_empty() {
        format!(
            "✨ {} x{} - {}",
            item.name(),
            item.quantity(),
            item.line_total()
        )
    } else {
        format!(
            "✨ {} x{} ({}) - {}",
            item.name(),
            item.quantity(),
            item.tag(),
            item.line_total()
        )
    }
}
