//! SQLite storage implementation for Ratefeed.
//!
//! This crate provides the database-related functionality using Diesel ORM with SQLite.
//! It implements the settings repository trait defined in `ratefeed-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - The single-writer actor that serializes writes
//! - The key/value settings repository holding the cached rate
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! `core` is database-agnostic and works with traits.
//!
//! ```text
//!        core (domain)
//!              │
//!              ▼
//!   storage-sqlite (this crate)
//!              │
//!              ▼
//!          SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod settings;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, get_db_path, init, run_migrations, spawn_writer, DbConnection,
    DbPool, WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from ratefeed-core for convenience
pub use ratefeed_core::errors::{DatabaseError, Error, Result};
