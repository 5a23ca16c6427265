//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which creates an in-memory DB and the
//! [`AppContext`]. The [`TestHarness::with_server`] constructors
//! start Axum on a random port for HTTP-level testing.

#![allow(dead_code)]

use std::net::SocketAddr;

use ff_core::{AuthorId, BookId, UserId};
use ff_db::pool::{init_memory_pool, DbPool};
use ff_server::context::AppContext;
use ff_server::router::build_router;

/// bcrypt cost for fixture credentials; the minimum keeps seeding fast.
pub const TEST_BCRYPT_COST: u32 = 4;

/// Test harness wrapping an [`AppContext`] backed by an in-memory database.
pub struct TestHarness {
    pub ctx: AppContext,
    pub db: DbPool,
}

impl TestHarness {
    /// Create a new harness over an empty DB.
    pub fn new() -> Self {
        let db = init_memory_pool().expect("failed to create in-memory pool");
        let ctx = AppContext { db: db.clone() };
        Self { ctx, db }
    }

    /// Create a harness whose DB holds the sample fixtures.
    pub fn seeded() -> Self {
        let harness = Self::new();
        ff_db::seed::seed_if_empty(&harness.conn(), TEST_BCRYPT_COST)
            .expect("failed to seed fixtures");
        harness
    }

    /// Start an Axum server for this harness on a random port.
    pub async fn serve(self) -> (Self, SocketAddr) {
        let app = build_router(self.ctx.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (self, addr)
    }

    /// Start a server over an empty DB.
    pub async fn with_server() -> (Self, SocketAddr) {
        Self::new().serve().await
    }

    /// Start a server over the seeded sample catalog.
    pub async fn with_seeded_server() -> (Self, SocketAddr) {
        Self::seeded().serve().await
    }

    /// Get a database connection from the pool.
    pub fn conn(&self) -> ff_db::pool::PooledConnection {
        ff_db::pool::get_conn(&self.db).expect("failed to get db connection")
    }

    /// Insert a book (and its author) and return the book id.
    pub fn add_book(&self, title: &str, author: &str, content: Option<&[u8]>) -> BookId {
        let conn = self.conn();
        let author_id: AuthorId = ff_db::queries::authors::create_author(&conn, author)
            .expect("failed to create author")
            .id;
        ff_db::queries::books::create_book(&conn, title, author_id, None, content)
            .expect("failed to create book")
            .id
    }

    /// Insert a user without a credential and return the id.
    pub fn add_user(&self, username: &str) -> UserId {
        ff_db::queries::users::create_user(&self.conn(), username, None)
            .expect("failed to create user")
            .id
    }

    /// Insert a review.
    pub fn add_review(&self, book: BookId, user: UserId, rating: i64, text: &str) {
        ff_db::queries::reviews::create_review(&self.conn(), book, user, rating, text)
            .expect("failed to create review");
    }
}
