//! Cart line items.

use core::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use super::price::Price;

/// One distinct product and tag entry in a cart, with its aggregated quantity.
///
/// Two line items refer to the same entry when both `name` and `tag` match;
/// the unit price is not part of the identity.
///
/// The quantity is never zero. Serialized field names follow the persisted
/// cart format (`price`, `qty`); `unitPrice` and `quantity` are accepted as
/// aliases when reading, a missing `tag` reads as empty and a missing `qty`
/// reads as 1. An object that spells the same field twice (for example both
/// `price` and `unitPrice`) is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    name: String,
    #[serde(rename = "price", alias = "unitPrice", alias = "unit_price")]
    unit_price: Price,
    #[serde(default)]
    tag: String,
    #[serde(rename = "qty", alias = "quantity", default = "one")]
    quantity: NonZeroU32,
}

const fn one() -> NonZeroU32 {
    NonZeroU32::MIN
}

impl LineItem {
    /// Create a line item with a quantity of one.
    #[must_use]
    pub fn new(name: impl Into<String>, unit_price: Price, tag: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            unit_price,
            tag: tag.into(),
            quantity: one(),
        }
    }

    /// Product name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Price of a single unit.
    #[must_use]
    pub const fn unit_price(&self) -> Price {
        self.unit_price
    }

    /// Category tag (may be empty).
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Number of units, always at least 1.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity.get()
    }

    /// `unit_price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity())
    }

    /// Whether this line is the entry for `(name, tag)`.
    #[must_use]
    pub fn matches(&self, name: &str, tag: &str) -> bool {
        self.name == name && self.tag == tag
    }

    pub(crate) const fn increment(&mut self) {
        self.quantity = self.quantity.saturating_add(1);
    }

    pub(crate) const fn absorb(&mut self, other: &Self) {
        self.quantity = self.quantity.saturating_add(other.quantity.get());
    }

    pub(crate) const fn set_quantity(&mut self, quantity: NonZeroU32) {
        self.quantity = quantity;
    }
}
