//! # Order reconciliation pipeline
//!
//! The `sync_api` module turns upstream sale orders into local records.
//!
//! * [`address_normalizer`] maps upstream addresses onto canonical address records.
//! * [`tax_mapper`] derives the order's tax lines from its line items.
//! * [`customer_reconciler`] finds or creates the customer for an order and keeps its tax identity current.
//! * [`order_materializer`] builds, persists and submits the order. It is idempotent on the upstream order code.
//! * [`sync_driver`] polls the upstream source and feeds each new order through the materializer.
//!
//! # API usage
//!
//! All the APIs are created by supplying a backend that implements the traits in [`crate::traits`], along with the
//! integration settings.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use karban_sync_engine::{IntegrationSettings, OrderMaterializer, SqliteDatabase, SyncDriver};
//! let db = SqliteDatabase::new_with_url(...).await?;
//! let settings = Arc::new(IntegrationSettings::from_file("karban.toml")?);
//! let driver = SyncDriver::new(OrderMaterializer::new(db, settings.clone()), source, settings);
//! let report = driver.sync_new_orders(false).await?;
//! ```
pub mod address_normalizer;
pub mod customer_reconciler;
pub mod errors;
pub mod frequency_gate;
pub mod order_materializer;
pub mod sync_driver;
pub mod sync_objects;
pub mod tax_mapper;

#[cfg(test)]
pub(crate) mod test_mocks;
