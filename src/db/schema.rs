//! SQL DDL for initializing the account storage.
//! SQLite-first design; can be adapted for other RDBMS.

/// SQLite schema with:
/// - `id` INTEGER PRIMARY KEY AUTOINCREMENT (ids are never reused)
/// - `user_type` restricted to the two account kinds
/// - `username` UNIQUE (creates an index implicitly)
/// - `location` nullable; the house-owner rule is enforced by the forms, not here
/// - `created_at` set by the store on insert
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_type TEXT NOT NULL CHECK (user_type IN ('Student', 'House Owner')),
    name TEXT NOT NULL,
    phone TEXT NOT NULL,
    username TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL,
    location TEXT NULL,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);
"#;
