use chrono::{DateTime, Utc};
use thiserror::Error;
use unicommerce_tools::{SaleOrder, SaleOrderStatus};

#[derive(Debug, Clone, Error)]
pub enum UpstreamError {
    #[error("The upstream order source is unavailable. {0}")]
    Unavailable(String),
    #[error("The upstream order source returned an invalid response. {0}")]
    InvalidResponse(String),
}

#[allow(async_fn_in_trait)]
pub trait UpstreamOrderSource {
    /// Fetches the orders updated since `since`, optionally restricted to a single status.
    ///
    /// Returns `None` when the upstream system returned no result at all, which is distinct from an empty result.
    async fn fetch_new_orders(
        &self,
        since: DateTime<Utc>,
        status: Option<SaleOrderStatus>,
    ) -> Result<Option<Vec<SaleOrder>>, UpstreamError>;
}
