//! `SqliteDatabase` is a concrete implementation of a Karban Sync Engine backend.
//!
//! It uses SQLite as the record store and implements all the store traits defined in the [`crate::traits`] module.
use std::fmt::Debug;

use chrono::{DateTime, Utc};
use log::*;
use serde_json::Value;
use sqlx::SqlitePool;
use unicommerce_tools::SaleOrder;

use super::db::{audit_log, catalog, checkpoints, customers, db_url, invoices, new_pool, orders};
use crate::{
    db_types::{
        AttemptContext,
        AuditEntry,
        AuditOutcome,
        CanonicalAddress,
        CanonicalOrder,
        CorrelationId,
        Customer,
        IdentityMarkers,
        Invoice,
        NewCustomer,
        NewOrder,
        OrderCode,
        TaxIdentity,
    },
    traits::{AuditLog, CatalogSync, IdentityStore, OrderStore, StoreError, SyncCheckpoints},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl IdentityStore for SqliteDatabase {
    async fn find_customer(&self, markers: &IdentityMarkers) -> Result<Option<Customer>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        customers::fetch_by_markers(markers, &mut conn).await
    }

    async fn persist_customer(&self, customer: NewCustomer, ctx: &AttemptContext) -> Result<Customer, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let customer = customers::insert_customer(customer, ctx, &mut conn).await?;
        debug!("🗃️ Customer #{} ({}) saved under attempt {}", customer.id, customer.customer_name, ctx.correlation_id);
        Ok(customer)
    }

    async fn update_tax_identity(
        &self,
        customer_id: i64,
        identity: &TaxIdentity,
        ctx: &AttemptContext,
    ) -> Result<Customer, StoreError> {
        let mut conn = self.pool.acquire().await?;
        customers::update_tax_identity(customer_id, identity, ctx, &mut conn).await
    }

    async fn persist_address(
        &self,
        address: CanonicalAddress,
        customer_id: i64,
        ctx: &AttemptContext,
    ) -> Result<i64, StoreError> {
        let mut conn = self.pool.acquire().await?;
        customers::insert_address(address, customer_id, ctx, &mut conn).await
    }
}

impl CatalogSync for SqliteDatabase {
    async fn sync_line_items(&self, order: &SaleOrder, ctx: &AttemptContext) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        catalog::insert_missing_items(order, ctx, &mut tx).await?;
        tx.commit().await?;
        Ok(())
    }
}

impl OrderStore for SqliteDatabase {
    async fn find_order_by_external_code(&self, code: &OrderCode) -> Result<Option<CanonicalOrder>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_order_by_code(code, &mut conn).await
    }

    /// Validation happens before anything is written, and the insert and submission share a transaction, so a
    /// rejected order leaves no row behind.
    async fn persist_and_submit(&self, order: NewOrder, ctx: &AttemptContext) -> Result<CanonicalOrder, StoreError> {
        orders::validate_for_submission(&order)?;
        let mut tx = self.pool.begin().await?;
        let code = order.order_code.clone();
        let inserted = orders::insert_order(order, ctx, &mut tx).await?;
        let name = orders::record_name(inserted.naming_series.as_deref(), inserted.id);
        let submitted = orders::submit_order(inserted.id, &name, ctx, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Order {code} saved and submitted as {name}");
        Ok(submitted)
    }

    async fn cancel(&self, order: &CanonicalOrder, ctx: &AttemptContext) -> Result<CanonicalOrder, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let cancelled = orders::cancel_order(order.id, ctx, &mut conn).await?;
        debug!("🗃️ Order {} ({}) cancelled", cancelled.order_code, cancelled.name);
        Ok(cancelled)
    }

    async fn generate_invoice(&self, raw: &SaleOrder, order: &CanonicalOrder) -> Result<Invoice, StoreError> {
        let mut conn = self.pool.acquire().await?;
        invoices::insert_invoice(order, raw.to_payload(), &mut conn).await
    }
}

impl AuditLog for SqliteDatabase {
    async fn record_attempt(
        &self,
        method: &str,
        payload: &Value,
        request_id: Option<String>,
    ) -> Result<CorrelationId, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let id = audit_log::new_correlation_id();
        audit_log::insert_entry(&id, method, payload, request_id.as_deref(), &mut conn).await?;
        if let Some(request_id) = request_id {
            debug!("🗃️ Attempt {id} opened for request {request_id}");
        }
        Ok(id)
    }

    async fn record_outcome(&self, correlation_id: &CorrelationId, outcome: AuditOutcome) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        audit_log::upsert_outcome(correlation_id, &outcome, &mut tx).await?;
        if outcome.rollback {
            let id = correlation_id.as_str();
            let orders = orders::delete_for_correlation_id(id, &mut tx).await?;
            let identities = customers::delete_for_correlation_id(id, &mut tx).await?;
            let items = catalog::delete_for_correlation_id(id, &mut tx).await?;
            info!(
                "🗃️ Attempt {correlation_id} rolled back. Removed {orders} orders, {identities} customers and addresses, \
                 {items} items"
            );
        }
        tx.commit().await?;
        debug!("🗃️ Attempt {correlation_id} closed with status {}", outcome.status);
        Ok(())
    }
}

impl SyncCheckpoints for SqliteDatabase {
    async fn last_synced(&self, key: &str) -> Result<Option<DateTime<Utc>>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        checkpoints::fetch_checkpoint(key, &mut conn).await
    }

    async fn advance_checkpoint(&self, key: &str, at: DateTime<Utc>) -> Result<(), StoreError> {
        let mut conn = self.pool.acquire().await?;
        checkpoints::upsert_checkpoint(key, at, &mut conn).await?;
        trace!("🗃️ Checkpoint {key} advanced to {at}");
        Ok(())
    }
}

impl SqliteDatabase {
    /// Creates a new database API object using the URL in `KSS_DATABASE_URL`
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Applies any outstanding migrations.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./src/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Database migrations are up to date");
        Ok(())
    }

    pub async fn fetch_audit_entry(&self, id: &CorrelationId) -> Result<Option<AuditEntry>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        audit_log::fetch_entry(id, &mut conn).await
    }

    pub async fn fetch_audit_entries_for_request(&self, request_id: &str) -> Result<Vec<AuditEntry>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        audit_log::fetch_entries_for_request(request_id, &mut conn).await
    }

    pub async fn fetch_customer(&self, id: i64) -> Result<Option<Customer>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        customers::fetch_by_id(id, &mut conn).await
    }

    pub async fn count_addresses_for_customer(&self, customer_id: i64) -> Result<i64, StoreError> {
        let mut conn = self.pool.acquire().await?;
        customers::count_addresses_for_customer(customer_id, &mut conn).await
    }

    pub async fn fetch_orders_for_customer(&self, customer_id: i64) -> Result<Vec<CanonicalOrder>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_orders_for_customer(customer_id, &mut conn).await
    }

    pub async fn fetch_invoice_for_order(&self, order_id: i64) -> Result<Option<Invoice>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        invoices::fetch_invoice_for_order(order_id, &mut conn).await
    }

    pub async fn item_exists(&self, item_code: &str) -> Result<bool, StoreError> {
        let mut conn = self.pool.acquire().await?;
        catalog::item_exists(item_code, &mut conn).await
    }
}
