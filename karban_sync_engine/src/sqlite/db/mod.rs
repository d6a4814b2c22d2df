//! # SQLite Database methods
//!
//! This module contains "low-level" SQLite database interactions.
//!
//! All these interactions are simple functions (rather than stateful structs) that accept a `&mut SqliteConnection`
//! argument. Callers can obtain a connection from a pool, or open a transaction when several statements must be
//! atomic, and call through to the functions without any other changes.
use std::env;

use log::info;
use sqlx::{sqlite::SqlitePoolOptions, Error as SqlxError, SqlitePool};

pub mod audit_log;
pub mod catalog;
pub mod checkpoints;
pub mod customers;
pub mod invoices;
pub mod orders;

const SQLITE_DB_URL: &str = "sqlite://data/karban_sync.db?mode=rwc";

pub fn db_url() -> String {
    let result = env::var("KSS_DATABASE_URL").unwrap_or_else(|_| {
        info!("KSS_DATABASE_URL is not set. Using the default.");
        SQLITE_DB_URL.to_string()
    });
    info!("Using database URL: {result}");
    result
}

pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, SqlxError> {
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect(url).await?;
    Ok(pool)
}
