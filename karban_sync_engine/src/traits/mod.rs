//! # Collaborator interfaces
//!
//! The reconciliation pipeline never talks to a database or an HTTP API directly. Everything it reads or writes goes
//! through the traits in this module, and a backend that implements them can host the pipeline.
//!
//! * [`IdentityStore`] looks up, creates and updates customers and their addresses.
//! * [`CatalogSync`] makes sure every item on an order exists in the local catalog.
//! * [`OrderStore`] persists, submits and cancels orders, and generates invoices.
//! * [`AuditLog`] records every materialization attempt and its outcome. A failed outcome may ask the store to roll
//!   back everything written under the attempt's correlation id.
//! * [`SyncCheckpoints`] stores the timestamps the sync driver uses to decide whether a run is due.
//! * [`UpstreamOrderSource`] fetches new orders from the upstream order management system.
//!
//! [`crate::SqliteDatabase`] implements all the store traits.
mod audit_log;
mod catalog_sync;
mod identity_store;
mod order_store;
mod store_error;
mod sync_checkpoints;
mod upstream;

pub use audit_log::AuditLog;
pub use catalog_sync::CatalogSync;
pub use identity_store::IdentityStore;
pub use order_store::OrderStore;
pub use store_error::StoreError;
pub use sync_checkpoints::SyncCheckpoints;
pub use upstream::{UpstreamError, UpstreamOrderSource};
