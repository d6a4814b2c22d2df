//! # Karban sync server
//! This crate hosts the service around the Karban sync engine. It is responsible for:
//! Running the scheduled Unicommerce order sync.
//! Accepting manual sync triggers and order payloads pushed by Unicommerce.
//! Serializing all of that work through a single job queue.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/api/force_sync/{target}`: Queues a forced sync job. Requires the admin API key.
//! * `/api/orders`: Queues an upstream order payload for materialization. Requires the admin API key.

pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod integrations;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod sync_worker;

#[cfg(test)]
mod endpoint_tests;
