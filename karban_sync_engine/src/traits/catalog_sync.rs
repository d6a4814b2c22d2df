use unicommerce_tools::SaleOrder;

use crate::{db_types::AttemptContext, traits::StoreError};

#[allow(async_fn_in_trait)]
pub trait CatalogSync {
    /// Ensures that every item referenced by the order exists in the local catalog. Items that already exist are left
    /// untouched.
    async fn sync_line_items(&self, order: &SaleOrder, ctx: &AttemptContext) -> Result<(), StoreError>;
}
