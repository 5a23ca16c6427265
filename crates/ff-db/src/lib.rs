//! ff-db: database access and persistence layer.
//!
//! This crate provides SQLite-backed storage with connection pooling,
//! embedded migrations, typed models, the catalog queries and the
//! insert-if-empty fixture seeding.

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
pub mod seed;
