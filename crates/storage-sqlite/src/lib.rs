//! SQLite storage implementation for Waypoint.
//!
//! This crate provides all database-related functionality using Diesel ORM
//! with SQLite. It implements the repository traits defined in
//! `waypoint-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for all domain entities
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where SQL exists. The
//! `core` crate is schema-agnostic and works with traits; the transaction
//! executor it defines runs here against a pooled connection in an immediate
//! transaction.

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod accounts;
pub mod goals;
pub mod journal;
pub mod milestones;
pub mod progress;
pub mod streaks;
pub mod tasks;

// Re-export database utilities
pub use db::{create_pool, get_connection, init, run_migrations};

// Re-export storage errors
pub use errors::StorageError;

// Re-export from waypoint-core for convenience
pub use waypoint_core::db::{DbConnection, DbPool, DbTransactionExecutor};
pub use waypoint_core::errors::{DatabaseError, Error, Result};
