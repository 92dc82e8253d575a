//! Plata CLI - Tools for carts persisted to files.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart
//! plata-cli cart show
//!
//! # Add an item
//! plata-cli cart add "Ring A" 15000 --tag gold
//!
//! # Remove the line at index 0
//! plata-cli cart remove 0
//!
//! # Print the checkout link and empty the cart
//! plata-cli cart checkout --endpoint https://wa.me/56912345678
//! ```
//!
//! # Environment Variables
//!
//! - `PLATA_CART_FILE` - Cart file path (default: `plata-cart.json`)
//! - `PLATA_CHECKOUT_URL` - Checkout endpoint (instead of `--endpoint`)
//! - `PLATA_CHECKOUT_GREETING` - Opening line of the checkout message

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use plata_core::{CheckoutLinkBuilder, DEFAULT_GREETING};

mod commands;

use commands::cart::{self, CartCommandError, CartFile};

#[derive(Parser)]
#[command(name = "plata-cli")]
#[command(author, version, about = "Plata CLI tools")]
struct Cli {
    /// Cart file to operate on
    #[arg(long, global = true, env = "PLATA_CART_FILE", default_value = "plata-cart.json")]
    cart: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and edit a persisted cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart's lines and total
    Show,
    /// Add one unit of an item
    Add {
        /// Product name
        name: String,

        /// Unit price in whole currency units
        #[arg(allow_negative_numbers = true)]
        price: i64,

        /// Category tag
        #[arg(short, long, default_value = "")]
        tag: String,
    },
    /// Remove the line at an index (as shown by `show`)
    Remove {
        /// Line index
        index: usize,
    },
    /// Remove every line
    Clear,
    /// Print the checkout link and empty the cart
    Checkout {
        /// Messaging endpoint the order is sent to
        #[arg(long, env = "PLATA_CHECKOUT_URL")]
        endpoint: String,

        /// Opening line of the order message
        #[arg(long, env = "PLATA_CHECKOUT_GREETING", default_value = DEFAULT_GREETING)]
        greeting: String,
    },
}

fn main() {
    // Load .env file if present (ignore errors if not found)
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "plata_cli=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(output) => print_output(&output),
        Err(e) => {
            tracing::error!("Command failed: {e}");
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<String, CartCommandError> {
    let file = CartFile::new(cli.cart);

    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::Show => cart::show(&file),
            CartAction::Add { name, price, tag } => cart::add(&file, &name, price, &tag),
            CartAction::Remove { index } => cart::remove(&file, index),
            CartAction::Clear => cart::clear(&file),
            CartAction::Checkout { endpoint, greeting } => {
                let builder = CheckoutLinkBuilder::parse(&endpoint)?.with_greeting(greeting);
                cart::checkout(&file, &builder)
            }
        },
    }
}

#[allow(clippy::print_stdout)]
fn print_output(output: &str) {
    println!("{output}");
}
