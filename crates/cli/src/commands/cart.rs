//! Cart file commands.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart stored in ./plata-cart.json
//! plata-cli cart show
//!
//! # Add an item to a specific cart file
//! plata-cli --cart /tmp/cart.json cart add "Ring A" 15000 --tag gold
//!
//! # Print the checkout link and empty the cart
//! plata-cli cart checkout --endpoint https://wa.me/56912345678
//! ```
//!
//! Each command loads the cart file, applies one operation, writes the file
//! back if the cart changed, and returns the text to print. Writes go to a
//! temporary file in the same directory that then replaces the cart file, so
//! an interrupted write never leaves a truncated cart behind.

use std::fmt::Write as _;
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};

use plata_core::{CartError, CartStore, CheckoutError, CheckoutLinkBuilder, Price};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during cart commands.
#[derive(Debug, Error)]
pub enum CartCommandError {
    /// Cart file could not be read or written.
    #[error("Cart file error ({path}): {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Cart could not be encoded.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Checkout was refused or the endpoint is invalid.
    #[error("Cannot check out: {0}")]
    Checkout(#[from] CheckoutError),
}

/// A cart persisted as JSON text in a file.
#[derive(Debug, Clone)]
pub struct CartFile {
    path: PathBuf,
}

impl CartFile {
    /// Cart stored at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the cart file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the cart. A missing file is an empty cart; a malformed one is
    /// logged and treated as empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn load(&self) -> Result<CartStore, CartCommandError> {
        let blob = match std::fs::read_to_string(&self.path) {
            Ok(blob) => blob,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No cart file, starting empty");
                return Ok(CartStore::new());
            }
            Err(source) => {
                return Err(CartCommandError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        Ok(CartStore::try_deserialize(&blob).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "Discarding malformed cart file");
            CartStore::new()
        }))
    }

    /// Write the cart back if it changed, atomically replacing the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, cart: &mut CartStore) -> Result<(), CartCommandError> {
        if !cart.is_dirty() {
            return Ok(());
        }

        let blob = cart.serialize()?;
        let io_error = |source| CartCommandError::Io {
            path: self.path.clone(),
            source,
        };

        let mut file = tempfile::NamedTempFile::new_in(self.dir()).map_err(io_error)?;
        file.write_all(blob.as_bytes()).map_err(io_error)?;
        file.as_file().sync_all().map_err(io_error)?;
        file.persist(&self.path).map_err(|e| io_error(e.error))?;

        cart.mark_clean();
        debug!(path = %self.path.display(), "Cart file written");
        Ok(())
    }

    /// Directory holding the cart file.
    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }
}

/// Render the cart as a table with a total line.
#[must_use]
pub fn render(cart: &CartStore) -> String {
    if cart.is_empty() {
        return "Cart is empty".to_string();
    }

    let mut out = String::new();
    for (index, item) in cart.items().iter().enumerate() {
        let tag = if item.tag().is_empty() {
            String::new()
        } else {
            format!(" ({})", item.tag())
        };
        let _ = writeln!(
            out,
            "{index:>3}  {} x{}{tag}  {}",
            item.name(),
            item.quantity(),
            item.line_total()
        );
    }
    let _ = write!(
        out,
        "Total: {} ({} items, {} lines)",
        cart.total(),
        cart.item_count(),
        cart.line_count()
    );
    out
}

/// Show the cart.
///
/// # Errors
///
/// Returns an error if the cart file cannot be read.
pub fn show(file: &CartFile) -> Result<String, CartCommandError> {
    Ok(render(&file.load()?))
}

/// Add one unit of `(name, tag)` at `price`.
///
/// # Errors
///
/// Returns an error if the cart file cannot be read or written.
pub fn add(file: &CartFile, name: &str, price: i64, tag: &str) -> Result<String, CartCommandError> {
    let mut cart = file.load()?;
    let index = cart.add(name, Price::new(price), tag);
    file.save(&mut cart)?;

    info!(index, name, tag, "Item added to cart");
    Ok(render(&cart))
}

/// Remove the line at `index`. An index outside the cart changes nothing.
///
/// # Errors
///
/// Returns an error if the cart file cannot be read or written.
pub fn remove(file: &CartFile, index: usize) -> Result<String, CartCommandError> {
    let mut cart = file.load()?;
    match cart.remove_at(index) {
        Some(item) => info!(index, name = item.name(), "Item removed from cart"),
        None => warn!(
            index,
            line_count = cart.line_count(),
            "No cart line at index, nothing removed"
        ),
    }
    file.save(&mut cart)?;

    Ok(render(&cart))
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if the cart file cannot be read or written.
pub fn clear(file: &CartFile) -> Result<String, CartCommandError> {
    let mut cart = file.load()?;
    cart.clear();
    file.save(&mut cart)?;

    Ok(render(&cart))
}

/// Build the checkout link and empty the cart.
///
/// # Errors
///
/// Returns [`CartCommandError::Checkout`] for an empty cart (the file is left
/// untouched), or an error if the cart file cannot be read or written.
pub fn checkout(
    file: &CartFile,
    builder: &CheckoutLinkBuilder,
) -> Result<String, CartCommandError> {
    let mut cart = file.load()?;
    let link = builder.build(&cart)?;

    info!(
        lines = cart.line_count(),
        total = cart.total().amount(),
        "Checkout link issued"
    );

    cart.clear();
    file.save(&mut cart)?;

    Ok(link)
}
