use chrono::{DateTime, Utc};
use karban_sync_engine::traits::{UpstreamError, UpstreamOrderSource};
use log::*;
use unicommerce_tools::{helpers::minutes_since, SaleOrder, SaleOrderStatus, UnicommerceApi, UnicommerceApiError};

/// Fetches new orders from a Unicommerce tenant.
///
/// Unicommerce only searches by "updated in the last N minutes", and the search only returns order summaries, so
/// every order is then fetched in full. A failed search fails the whole fetch. A single order that cannot be fetched
/// is logged and skipped, and will be picked up again by a later sync that still covers it.
#[derive(Clone)]
pub struct UnicommerceOrderSource {
    api: UnicommerceApi,
}

impl UnicommerceOrderSource {
    pub fn new(api: UnicommerceApi) -> Self {
        Self { api }
    }
}

impl UpstreamOrderSource for UnicommerceOrderSource {
    async fn fetch_new_orders(
        &self,
        since: DateTime<Utc>,
        status: Option<SaleOrderStatus>,
    ) -> Result<Option<Vec<SaleOrder>>, UpstreamError> {
        let minutes = minutes_since(since, Utc::now());
        let summaries = self.api.search_sale_orders(minutes, status.as_ref()).await.map_err(upstream_error)?;
        let mut orders = Vec::with_capacity(summaries.len());
        for summary in summaries {
            match self.api.get_sale_order(&summary.code).await {
                Ok(Some(order)) => orders.push(order),
                Ok(None) => warn!("🛒️ Sale order {} was in the search results but could not be fetched", summary.code),
                Err(e) => warn!("🛒️ Could not fetch sale order {}. Skipping it. {e}", summary.code),
            }
        }
        debug!("🛒️ Fetched {} sale orders updated in the last {minutes} minutes", orders.len());
        Ok(Some(orders))
    }
}

fn upstream_error(e: UnicommerceApiError) -> UpstreamError {
    match e {
        UnicommerceApiError::JsonError(_) | UnicommerceApiError::InvalidPayload(_) => {
            UpstreamError::InvalidResponse(e.to_string())
        },
        _ => UpstreamError::Unavailable(e.to_string()),
    }
}
