//! Plata Core - Cart state library.
//!
//! This crate provides the cart logic shared by all Plata components:
//! - `storefront` - HTTP service keeping each visitor's cart in their session
//! - `cli` - Command-line tools for carts persisted to files
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no logging,
//! no HTTP. Callers load a [`CartStore`], apply operations, and persist it.
//!
//! # Modules
//!
//! - [`types`] - [`Price`] and [`LineItem`]
//! - [`cart`] - [`CartStore`] and its persistence format
//! - [`catalog`] - [`Catalog`] of products offered for sale
//! - [`checkout`] - Checkout link construction

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod types;

pub use cart::{CartError, CartStore};
pub use catalog::{Catalog, CatalogError, Product};
pub use checkout::{CheckoutError, CheckoutLinkBuilder, DEFAULT_GREETING};
pub use types::*;
