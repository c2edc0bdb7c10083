//! # Fitness Center Database Crate
//!
//! This crate is the application's only doorway to the relational store that
//! owns the `Members` and `WorkoutSessions` tables.
//!
//! ## Architectural Principles
//!
//! - **Adapter:** All SQL lives here. Callers see typed operations on
//!   [`Member`](core_types::Member) and [`WorkoutSession`](core_types::WorkoutSession).
//! - **Parameterized only:** Every value reaches the store as a bound
//!   positional parameter.
//! - **Connection per request:** [`PgConnectionManager`] opens a fresh
//!   connection for each request. It sits behind the [`ConnectionManager`]
//!   trait so a pooled implementation can replace it without touching callers.
//!
//! ## Public API
//!
//! - `ConnectionManager` / `PgConnectionManager`: acquiring connections.
//! - `StoreConnection` / `PgStoreConnection`: the statements a request can run,
//!   transaction control, and `release`.
//! - `DbError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod store;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect_options, ConnectionManager, PgConnectionManager};
pub use error::DbError;
pub use store::{PgStoreConnection, StoreConnection};

/// Reference DDL for the two tables. Not applied by the service.
pub const SCHEMA_SQL: &str = include_str!("../sql/schema.sql");
