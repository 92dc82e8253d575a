//! Integration tests for Plata.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p plata-integration-tests
//! ```
//!
//! Each test starts its own storefront on an ephemeral local port with an
//! in-memory `SQLite` session database, so tests need no external services
//! and do not share carts.

use std::net::SocketAddr;

use plata_core::{Catalog, CheckoutLinkBuilder};
use plata_storefront::config::StorefrontConfig;
use plata_storefront::db;
use plata_storefront::state::AppState;
use reqwest::Client;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Checkout endpoint used by test servers.
pub const CHECKOUT_ENDPOINT: &str = "https://wa.me/56912345678";

/// Catalog served by test servers.
pub const CATALOG: &str = r#"[
    {"id": 1, "name": "Ring A", "description": "Sterling silver ring", "price": 15000, "tag": "gold"},
    {"id": 2, "name": "Necklace B", "description": "Sterling silver chain", "price": 8000, "tag": "silver"}
]"#;

/// A storefront running in the background for the duration of a test.
pub struct TestServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a storefront on `127.0.0.1` with an OS-assigned port.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound or the database cannot be
    /// created.
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local address");

        let config = test_config(addr);
        let pool = db::create_pool(&config.database_url, config.database_max_connections)
            .await
            .expect("Failed to create test database");
        let catalog = Catalog::from_json(CATALOG).expect("valid test catalog");

        let app = plata_storefront::app(AppState::new(config, pool, catalog));
        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                panic!("Test server failed: {e}");
            }
        });

        Self { addr, handle }
    }

    /// Absolute URL for `path` on this server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// A client that keeps the session cookie and does not follow redirects,
    /// so checkout's `Location` can be inspected.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    pub fn client(&self) -> Client {
        Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn test_config(addr: SocketAddr) -> StorefrontConfig {
    StorefrontConfig {
        host: addr.ip(),
        port: addr.port(),
        base_url: format!("http://{addr}"),
        database_url: "sqlite::memory:".to_string(),
        database_max_connections: 1,
        catalog_path: None,
        checkout: CheckoutLinkBuilder::parse(CHECKOUT_ENDPOINT).expect("valid checkout endpoint"),
        sentry_dsn: None,
        sentry_environment: None,
    }
}
