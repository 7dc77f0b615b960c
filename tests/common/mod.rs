//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which creates an in-memory DB, default config
//! with a signing key, and full [`AppContext`]. The [`with_server`]
//! constructor starts Axum on a random port for HTTP-level testing.

use std::net::SocketAddr;
use std::sync::Arc;

use versecast::config::Config;
use versecast::server::{create_router, AppContext};
use versecast::streaming::{PlaylistCache, UrlSigner};
use versecast_db::pool::{init_memory_pool, DbPool, PooledConnection};

/// Test harness wrapping a fully-constructed [`AppContext`] backed by an
/// in-memory database.
pub struct TestHarness {
    pub ctx: AppContext,
    pub db: DbPool,
}

impl TestHarness {
    /// Create a new harness with default configuration, a signing key, and
    /// an in-memory DB.
    pub fn new() -> Self {
        let mut config = Config::default();
        config.signing.key = "integration-test-key".to_string();
        config.signing.base_url = "https://cdn.test".to_string();
        Self::with_config(config)
    }

    /// Create a new harness with a custom configuration and in-memory DB.
    pub fn with_config(config: Config) -> Self {
        let db = init_memory_pool().expect("failed to create in-memory pool");

        let ctx = AppContext {
            signer: Arc::new(UrlSigner::new(&config.signing)),
            playlist_cache: Arc::new(PlaylistCache::new(
                config.streaming.cache_capacity,
                config.streaming.cache_ttl_secs,
            )),
            config: Arc::new(config),
            db_pool: db.clone(),
        };

        Self { ctx, db }
    }

    /// Start an Axum server on a random port and return the harness together
    /// with the bound socket address.
    pub async fn with_server() -> (Self, SocketAddr) {
        let harness = Self::new();
        let app = create_router(harness.ctx.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (harness, addr)
    }

    /// Get a database connection from the pool.
    pub fn conn(&self) -> PooledConnection {
        versecast_db::pool::get_conn(&self.db).expect("failed to get db connection")
    }
}
