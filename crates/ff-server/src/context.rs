//! Application context shared by all handlers via Axum state.

use ff_db::pool::DbPool;

/// Cheaply cloneable: the pool is reference counted internally.
#[derive(Clone)]
pub struct AppContext {
    /// Database connection pool.
    pub db: DbPool,
}
