//! Database module: models and schema for persistent storage.
//!
//! Layout:
//! - `models.rs`: structs mirroring DB rows and conversions to domain types
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `sqlite.rs`: the credential store itself

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::{DbProfile, DbUser};
pub use schema::SQLITE_INIT;
pub use sqlite::{CredentialStore, SqlitePool, StoreSettings};
