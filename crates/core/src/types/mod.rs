//! Core types for Plata.
//!
//! This module provides type-safe wrappers for the cart's domain concepts.

pub mod line_item;
pub mod price;

pub use line_item::LineItem;
pub use price::Price;
