//! Karban Sync Engine
//!
//! The Karban Sync Engine reconciles sale orders from Unicommerce into the local record store. For every upstream
//! order it finds or creates the customer, normalizes the customer's addresses, maps the GST fields on the line items
//! onto tax lines, and materializes exactly one submitted order per upstream order code.
//!
//! The library is divided into the following sections:
//! 1. The collaborator interfaces ([`mod@traits`]). The pipeline only reads and writes through these traits, so any
//!    backend that implements them can host it. [`SqliteDatabase`] is the backend that ships with the engine.
//! 2. The reconciliation pipeline ([`mod@sync_api`]). [`OrderMaterializer`] handles a single order and
//!    [`SyncDriver`] polls the upstream source on a schedule.
//! 3. Static mapping tables ([`mod@mapping`]) for country codes, Indian state codes and GST tax heads.
//! 4. The integration settings ([`mod@settings`]), loaded from a TOML file.
//!
//! The data types shared by all of these are defined in [`mod@db_types`].
#[cfg(feature = "sqlite")]
mod sqlite;

pub mod db_types;
pub mod mapping;
pub mod settings;
pub mod sync_api;
pub mod traits;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use settings::IntegrationSettings;
pub use sync_api::{
    errors::{MaterializeError, SyncError},
    order_materializer::OrderMaterializer,
    sync_driver::SyncDriver,
    sync_objects::{MaterializeOutcome, SyncReport, SyncRunStatus, SyncTarget, UnknownSyncTarget},
};
