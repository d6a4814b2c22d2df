//! # Unicommerce tools
//!
//! Types and a thin REST client for the Unicommerce order management system.
//!
//! * [`SaleOrder`] is the validated form of an upstream sale order payload. Parse payloads with
//!   [`SaleOrder::from_payload`] as soon as they enter the system, so that missing required fields fail fast.
//! * [`UnicommerceApi`] fetches orders from a Unicommerce tenant.
mod api;
mod config;
mod error;
pub mod helpers;
mod sale_order;

pub use api::UnicommerceApi;
pub use config::UnicommerceConfig;
pub use error::UnicommerceApiError;
pub use sale_order::{ItemStatus, SaleOrder, SaleOrderItem, SaleOrderStatus, SaleOrderSummary, UnicommerceAddress};
