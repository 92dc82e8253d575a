//! In-memory cart state.
//!
//! [`CartStore`] owns the ordered list of line items. It performs no I/O:
//! callers load it from persisted text with [`CartStore::deserialize`], apply
//! one or more operations, and write it back with [`CartStore::serialize`]
//! when [`CartStore::is_dirty`] reports a change.
//!
//! # Invariants
//!
//! - At most one line per `(name, tag)` pair. Adding a pair that is already
//!   present increments its quantity.
//! - Every line has a quantity of at least 1. Lines are removed, never kept
//!   at zero.
//! - Line order is insertion order.

use core::num::NonZeroU32;

use thiserror::Error;

use crate::types::{LineItem, Price};

/// Errors reading or writing persisted cart data.
#[derive(Debug, Error)]
pub enum CartError {
    /// The persisted text is not a valid cart.
    #[error("invalid cart data: {0}")]
    Json(#[from] serde_json::Error),
}

/// The authoritative list of line items for one cart.
///
/// Equality compares line items only; the dirty flag is bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct CartStore {
    items: Vec<LineItem>,
    dirty: bool,
}

impl PartialEq for CartStore {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl Eq for CartStore {}

impl CartStore {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            dirty: false,
        }
    }

    /// Build a cart from line items, merging any repeated `(name, tag)` pairs
    /// into the first occurrence.
    #[must_use]
    pub fn from_items(items: impl IntoIterator<Item = LineItem>) -> Self {
        let mut merged: Vec<LineItem> = Vec::new();
        for item in items {
            match merged
                .iter_mut()
                .find(|existing| existing.matches(item.name(), item.tag()))
            {
                Some(existing) => existing.absorb(&item),
                None => merged.push(item),
            }
        }

        Self {
            items: merged,
            dirty: false,
        }
    }

    /// Add one unit of `(name, tag)`.
    ///
    /// If the pair is already in the cart its quantity goes up by one and the
    /// existing unit price is kept; otherwise a new line with quantity 1 is
    /// appended. Inputs are taken as given.
    ///
    /// Returns the index of the affected line.
    pub fn add(&mut self, name: &str, unit_price: Price, tag: &str) -> usize {
        self.dirty = true;

        if let Some(index) = self.position(name, tag) {
            if let Some(item) = self.items.get_mut(index) {
                item.increment();
            }
            return index;
        }

        self.items.push(LineItem::new(name, unit_price, tag));
        self.items.len() - 1
    }

    /// Remove the line at `index`.
    ///
    /// Returns the removed line, or `None` (and leaves the cart untouched) if
    /// `index` is out of range.
    pub fn remove_at(&mut self, index: usize) -> Option<LineItem> {
        if index >= self.items.len() {
            return None;
        }
        self.dirty = true;
        Some(self.items.remove(index))
    }

    /// Set the quantity of the line at `index`. A quantity of 0 removes it.
    ///
    /// Returns `false` if `index` is out of range.
    pub fn set_quantity(&mut self, index: usize, quantity: u32) -> bool {
        let Some(quantity) = NonZeroU32::new(quantity) else {
            return self.remove_at(index).is_some();
        };

        match self.items.get_mut(index) {
            Some(item) => {
                item.set_quantity(quantity);
                self.dirty = true;
                true
            }
            None => false,
        }
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        if !self.items.is_empty() {
            self.items.clear();
            self.dirty = true;
        }
    }

    /// Sum of `unit_price * quantity` over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Number of units in the cart (sum of quantities).
    ///
    /// This is the count shown on the cart badge. See [`Self::line_count`]
    /// for the number of distinct lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |count, item| count.saturating_add(item.quantity()))
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Lines in display order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Line at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&LineItem> {
        self.items.get(index)
    }

    /// Whether the cart changed since it was loaded or last marked clean.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Record that the current state has been persisted.
    pub const fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Encode the lines as JSON text for persistence.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Json`] if encoding fails.
    pub fn serialize(&self) -> Result<String, CartError> {
        Ok(serde_json::to_string(&self.items)?)
    }

    /// Decode persisted JSON text.
    ///
    /// Repeated `(name, tag)` entries are merged. The result is clean.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Json`] if the text is not a JSON array of line
    /// items, or any entry has a zero or negative quantity.
    pub fn try_deserialize(blob: &str) -> Result<Self, CartError> {
        let items: Vec<LineItem> = serde_json::from_str(blob)?;
        Ok(Self::from_items(items))
    }

    /// Decode persisted JSON text, falling back to an empty cart when the
    /// text is malformed.
    #[must_use]
    pub fn deserialize(blob: &str) -> Self {
        Self::try_deserialize(blob).unwrap_or_default()
    }

    fn position(&self, name: &str, tag: &str) -> Option<usize> {
        self.items.iter().position(|item| item.matches(name, tag))
    }
}

impl<'a> IntoIterator for &'a CartStore {
    type Item = &'a LineItem;
    type IntoIter = core::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn jewelry_cart() -> CartStore {
        let mut cart = CartStore::new();
        cart.add("Ring A", Price::new(15_000), "gold");
        cart.add("Ring A", Price::new(15_000), "gold");
        cart.add("Necklace B", Price::new(8_000), "silver");
        cart
    }

    #[test]
    fn test_new_cart_is_empty_and_clean() {
        let cart = CartStore::new();
        assert!(cart.is_empty());
        assert!(!cart.is_dirty());
        assert_eq!(cart.total(), Price::ZERO);
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_add_merges_same_name_and_tag() {
        let cart = jewelry_cart();

        assert_eq!(cart.line_count(), 2);
        assert_eq!(cart.items()[0].name(), "Ring A");
        assert_eq!(cart.items()[0].quantity(), 2);
        assert_eq!(cart.items()[0].line_total(), Price::new(30_000));
        assert_eq!(cart.items()[1].name(), "Necklace B");
        assert_eq!(cart.items()[1].quantity(), 1);
        assert_eq!(cart.items()[1].line_total(), Price::new(8_000));
        assert_eq!(cart.total(), Price::new(38_000));
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_add_returns_line_index() {
        let mut cart = CartStore::new();
        assert_eq!(cart.add("Ring A", Price::new(15_000), "gold"), 0);
        assert_eq!(cart.add("Ring A", Price::new(15_000), "silver"), 1);
        assert_eq!(cart.add("Ring A", Price::new(15_000), "gold"), 0);
    }

    #[test]
    fn test_add_same_name_different_tag_is_separate_line() {
        let mut cart = CartStore::new();
        cart.add("Ring A", Price::new(15_000), "gold");
        cart.add("Ring A", Price::new(12_000), "silver");
        cart.add("Ring A", Price::new(15_000), "");

        assert_eq!(cart.line_count(), 3);
        assert!(cart.items().iter().all(|item| item.quantity() == 1));
    }

    #[test]
    fn test_add_keeps_first_unit_price() {
        let mut cart = CartStore::new();
        cart.add("Ring A", Price::new(15_000), "gold");
        cart.add("Ring A", Price::new(99_000), "gold");

        assert_eq!(cart.items()[0].unit_price(), Price::new(15_000));
        assert_eq!(cart.total(), Price::new(30_000));
    }

    #[test]
    fn test_add_accepts_unvalidated_input() {
        let mut cart = CartStore::new();
        cart.add("", Price::new(-500), "");
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total(), Price::new(-500));
    }

    #[test]
    fn test_line_count_matches_distinct_pairs() {
        let adds = [
            ("Ring A", "gold"),
            ("Ring A", "silver"),
            ("Necklace B", "silver"),
            ("Ring A", "gold"),
            ("Earrings C", ""),
            ("Necklace B", "silver"),
            ("Ring A", "gold"),
        ];

        let mut cart = CartStore::new();
        for (name, tag) in adds {
            cart.add(name, Price::new(1_000), tag);
        }

        assert_eq!(cart.line_count(), 4);
        for item in &cart {
            let expected = adds
                .iter()
                .filter(|(name, tag)| item.matches(name, tag))
                .count();
            assert_eq!(item.quantity() as usize, expected);
        }
        assert_eq!(cart.item_count() as usize, adds.len());
    }

    #[test]
    fn test_total_matches_independent_sum() {
        let mut cart = CartStore::new();
        for (i, price) in [1_200_i64, 35_000, 990, 0, 15_000].into_iter().enumerate() {
            for _ in 0..=i {
                cart.add(&format!("item-{i}"), Price::new(price), "tag");
            }
        }

        let expected: i64 = cart
            .items()
            .iter()
            .map(|item| item.unit_price().amount() * i64::from(item.quantity()))
            .sum();
        assert_eq!(cart.total().amount(), expected);
        assert!(cart.total() >= Price::ZERO);
    }

    #[test]
    fn test_remove_at_preserves_order() {
        let mut cart = CartStore::new();
        for name in ["a", "b", "c", "d"] {
            cart.add(name, Price::new(100), "");
        }
        cart.mark_clean();

        let removed = cart.remove_at(1).unwrap();
        assert_eq!(removed.name(), "b");
        assert!(cart.is_dirty());

        let names: Vec<&str> = cart.items().iter().map(LineItem::name).collect();
        assert_eq!(names, ["a", "c", "d"]);
    }

    #[test]
    fn test_remove_at_out_of_range_is_noop() {
        let mut cart = jewelry_cart();
        cart.mark_clean();
        let before = cart.clone();

        assert!(cart.remove_at(2).is_none());
        assert!(cart.remove_at(usize::MAX).is_none());
        assert_eq!(cart, before);
        assert!(!cart.is_dirty());
    }

    #[test]
    fn test_set_quantity() {
        let mut cart = jewelry_cart();

        assert!(cart.set_quantity(1, 5));
        assert_eq!(cart.items()[1].quantity(), 5);
        assert_eq!(cart.total(), Price::new(70_000));

        assert!(cart.set_quantity(0, 0));
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.items()[0].name(), "Necklace B");

        assert!(!cart.set_quantity(4, 2));
        assert!(!cart.set_quantity(4, 0));
    }

    #[test]
    fn test_clear() {
        let mut cart = jewelry_cart();
        cart.mark_clean();
        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.total(), Price::ZERO);
        assert!(cart.is_dirty());
    }

    #[test]
    fn test_clear_empty_cart_stays_clean() {
        let mut cart = CartStore::new();
        cart.clear();
        assert!(!cart.is_dirty());
    }

    #[test]
    fn test_serialize_round_trip() {
        let cart = jewelry_cart();
        let blob = cart.serialize().unwrap();
        let restored = CartStore::deserialize(&blob);

        assert_eq!(restored, cart);
        assert!(!restored.is_dirty());
        assert_eq!(restored.total(), Price::new(38_000));
    }

    #[test]
    fn test_serialize_format() {
        let blob = jewelry_cart().serialize().unwrap();
        assert_eq!(
            blob,
            r#"[{"name":"Ring A","price":15000,"tag":"gold","qty":2},{"name":"Necklace B","price":8000,"tag":"silver","qty":1}]"#
        );
    }

    #[test]
    fn test_deserialize_malformed_yields_empty_cart() {
        for blob in [
            "",
            "not json",
            "{}",
            "null",
            "[1, 2, 3]",
            r#"[{"price": 100}]"#,
            r#"[{"name": "Ring A", "price": 100, "qty": 0}]"#,
            r#"[{"name": "Ring A", "price": 100, "qty": -2}]"#,
            r#"[{"name": "Ring A", "price": "cheap"}]"#,
        ] {
            let cart = CartStore::deserialize(blob);
            assert!(cart.is_empty(), "expected empty cart for {blob:?}");
            assert!(CartStore::try_deserialize(blob).is_err());
        }
    }

    #[test]
    fn test_deserialize_legacy_field_names() {
        let cart = CartStore::deserialize(
            r#"[{"name": "Ring A", "unitPrice": 15000, "tag": "gold", "quantity": 2},
                {"name": "Necklace B", "price": 8000, "tag": "silver"}]"#,
        );

        assert_eq!(cart.line_count(), 2);
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.total(), Price::new(38_000));
    }

    #[test]
    fn test_deserialize_conflicting_price_fields_is_malformed() {
        let blob = r#"[{"name": "Ring A", "price": 15000, "unitPrice": 14000, "tag": "gold"}]"#;

        let err = CartStore::try_deserialize(blob).unwrap_err();
        assert!(err.to_string().contains("duplicate field `price`"));
        assert!(CartStore::deserialize(blob).is_empty());
    }

    #[test]
    fn test_deserialize_merges_duplicate_pairs() {
        let cart = CartStore::deserialize(
            r#"[{"name": "Ring A", "price": 15000, "tag": "gold", "qty": 1},
                {"name": "Necklace B", "price": 8000, "tag": "silver", "qty": 1},
                {"name": "Ring A", "price": 15000, "tag": "gold", "qty": 2}]"#,
        );

        assert_eq!(cart.line_count(), 2);
        assert_eq!(cart.items()[0].quantity(), 3);
        assert_eq!(cart.items()[1].name(), "Necklace B");
    }

    #[test]
    fn test_equality_ignores_dirty_flag() {
        let mut a = jewelry_cart();
        let b = jewelry_cart();
        a.mark_clean();
        assert_eq!(a, b);
    }
}
