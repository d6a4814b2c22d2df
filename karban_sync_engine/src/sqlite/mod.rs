//! SQLite backend for the Karban Sync Engine.
//!
//! Migrations live in `src/sqlite/migrations` and can be applied with `sqlx migrate run` or
//! [`SqliteDatabase::run_migrations`].
mod sqlite_impl;

pub mod db;
pub use sqlite_impl::SqliteDatabase;
