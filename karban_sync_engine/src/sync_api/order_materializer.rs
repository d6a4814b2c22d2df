use std::{fmt::Debug, sync::Arc};

use karban_common::helpers::non_blank;
use log::*;
use unicommerce_tools::{helpers::unicommerce_date, SaleOrder};

use crate::{
    db_types::{AttemptContext, AuditOutcome, CanonicalOrder, Customer, NewOrder, OrderCode, OrderLineItem},
    settings::{ChannelSettings, IntegrationSettings},
    sync_api::{
        customer_reconciler::reconcile_customer,
        errors::MaterializeError,
        sync_objects::MaterializeOutcome,
        tax_mapper::map_taxes,
    },
    traits::{AuditLog, CatalogSync, IdentityStore, OrderStore},
};

/// The method name recorded in the audit log for materialization attempts.
pub const CREATE_ORDER_METHOD: &str = "karban_sync_engine::order_materializer::materialize";
/// Every write made during an attempt is made as this user.
pub const SYSTEM_ACTOR: &str = "Administrator";

/// `OrderMaterializer` turns a single upstream sale order into a submitted local order.
///
/// Materialization is idempotent on the upstream order code. Failures never escape [`Self::materialize`]: they are
/// recorded in the audit log along with a rollback request, and reported as [`MaterializeOutcome::Failed`].
pub struct OrderMaterializer<B> {
    db: B,
    settings: Arc<IntegrationSettings>,
}

impl<B> Debug for OrderMaterializer<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderMaterializer")
    }
}

impl<B> OrderMaterializer<B> {
    pub fn new(db: B, settings: Arc<IntegrationSettings>) -> Self {
        Self { db, settings }
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    pub fn settings(&self) -> &IntegrationSettings {
        &self.settings
    }
}

impl<B> OrderMaterializer<B>
where B: IdentityStore + CatalogSync + OrderStore + AuditLog
{
    /// Materializes the order.
    ///
    /// If an order with the same code already exists it is returned as is, and nothing else happens. Otherwise a
    /// fresh audit entry is opened for the attempt (tagged with the caller's `request_id`, if any), the items and
    /// customer are synced, and the order is persisted and submitted. Orders that are cancelled upstream are
    /// cancelled straight after submission.
    pub async fn materialize(&self, order: &SaleOrder, request_id: Option<String>) -> MaterializeOutcome {
        let code = OrderCode::from(order.code.as_str());
        match self.db.find_order_by_external_code(&code).await {
            Ok(Some(existing)) => {
                debug!("🔄️📦️ Order {code} already exists as {}. Nothing to do.", existing.name);
                return MaterializeOutcome::AlreadyExists(existing);
            },
            Ok(None) => {},
            Err(e) => {
                error!("🔄️📦️ Could not check whether order {code} exists. {e}");
                return MaterializeOutcome::Failed(e.to_string());
            },
        }
        let correlation_id = match self.db.record_attempt(CREATE_ORDER_METHOD, &order.to_payload(), request_id).await {
            Ok(id) => id,
            Err(e) => {
                error!("🔄️📦️ Could not open an audit entry for order {code}. {e}");
                return MaterializeOutcome::Failed(e.to_string());
            },
        };
        let ctx = AttemptContext::new(correlation_id, SYSTEM_ACTOR);
        match self.create_order(order, &ctx).await {
            Ok(created) => {
                self.close_attempt(&ctx, AuditOutcome::success()).await;
                info!("🔄️📦️ Order {code} materialized as {} ({})", created.name, created.doc_status);
                MaterializeOutcome::Created(created)
            },
            Err(e) => {
                warn!("🔄️📦️ Materializing order {code} failed. Rolling back attempt {}. {e}", ctx.correlation_id);
                self.close_attempt(&ctx, AuditOutcome::failure(e.to_string())).await;
                MaterializeOutcome::Failed(e.to_string())
            },
        }
    }

    async fn close_attempt(&self, ctx: &AttemptContext, outcome: AuditOutcome) {
        if let Err(e) = self.db.record_outcome(&ctx.correlation_id, outcome).await {
            error!("🔄️📦️ Could not record the outcome of attempt {}. {e}", ctx.correlation_id);
        }
    }

    async fn create_order(&self, order: &SaleOrder, ctx: &AttemptContext) -> Result<CanonicalOrder, MaterializeError> {
        self.db.sync_line_items(order, ctx).await?;
        trace!("🔄️📦️ Items for order {} synced", order.code);
        let customer = reconcile_customer(&self.db, &self.settings, order, ctx).await?;
        let new_order = self.build_order(order, &customer)?;
        let cancelled = new_order.is_cancelled_upstream();
        let submitted = self.db.persist_and_submit(new_order, ctx).await?;
        debug!("🔄️📦️ Order {} submitted as {}", order.code, submitted.name);
        if cancelled {
            let cancelled = self.db.cancel(&submitted, ctx).await?;
            info!("🔄️📦️ Order {} is cancelled upstream. {} has been cancelled.", order.code, cancelled.name);
            return Ok(cancelled);
        }
        Ok(submitted)
    }

    /// Builds the local order from the upstream order and its reconciled customer.
    pub fn build_order(&self, order: &SaleOrder, customer: &Customer) -> Result<NewOrder, MaterializeError> {
        let channel =
            self.settings.channel(&order.channel).ok_or_else(|| MaterializeError::UnknownChannel(order.channel.clone()))?;
        let facility_code = facility_code(order);
        let (company_address, dispatch_address) = self.settings.company_addresses(facility_code.as_deref());
        let naming_series = non_blank(channel.sales_order_series.as_deref())
            .or_else(|| non_blank(self.settings.sales_order_series.as_deref()))
            .map(String::from);
        let transaction_date = unicommerce_date(order.display_order_date_time).ok_or_else(|| {
            MaterializeError::InvalidPayload(format!("displayOrderDateTime {} is out of range", order.display_order_date_time))
        })?;
        let delivery_date = order.fulfillment_tat.and_then(unicommerce_date);
        let new_order = NewOrder {
            order_code: OrderCode::from(order.code.as_str()),
            order_status: order.status.to_string(),
            customer_id: customer.id,
            channel: order.channel.clone(),
            naming_series,
            facility_code,
            is_cod: order.cod,
            transaction_date,
            delivery_date,
            items: self.line_items(order, channel),
            company: channel.company.clone(),
            taxes: map_taxes(&order.sale_order_items, &channel.tax_accounts),
            company_address,
            dispatch_address,
            currency: order.currency_code.clone(),
            raw_data: order.to_payload(),
        };
        Ok(new_order)
    }

    /// Cancelled items are dropped, unless the whole order is cancelled.
    fn line_items(&self, order: &SaleOrder, channel: &ChannelSettings) -> Vec<OrderLineItem> {
        let order_cancelled = order.is_cancelled();
        order
            .sale_order_items
            .iter()
            .filter(|item| order_cancelled || !item.is_cancelled())
            .map(|item| {
                let warehouse = self
                    .settings
                    .facility_warehouse(item.facility_code.as_deref())
                    .or(channel.warehouse.as_deref())
                    .map(String::from);
                OrderLineItem {
                    item_code: item.item_sku.clone(),
                    item_name: item.item_name.clone(),
                    rate: item.selling_price,
                    qty: 1,
                    warehouse,
                    upstream_item_code: item.code.clone(),
                }
            })
            .collect()
    }
}

/// The first facility code found on the order's line items.
pub fn facility_code(order: &SaleOrder) -> Option<String> {
    order.sale_order_items.iter().find_map(|item| non_blank(item.facility_code.as_deref())).map(String::from)
}
