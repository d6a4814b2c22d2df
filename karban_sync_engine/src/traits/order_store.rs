use unicommerce_tools::SaleOrder;

use crate::{
    db_types::{AttemptContext, CanonicalOrder, Invoice, NewOrder, OrderCode},
    traits::StoreError,
};

/// Order persistence and lifecycle.
#[allow(async_fn_in_trait)]
pub trait OrderStore {
    async fn find_order_by_external_code(&self, code: &OrderCode) -> Result<Option<CanonicalOrder>, StoreError>;

    /// Saves the order and submits it in a single step. The returned record is in the `Submitted` state.
    ///
    /// The external order code is unique. Persisting a second order with the same code is rejected with
    /// [`StoreError::Duplicate`].
    async fn persist_and_submit(&self, order: NewOrder, ctx: &AttemptContext) -> Result<CanonicalOrder, StoreError>;

    /// Cancels a submitted order. Cancelling any other state is rejected.
    async fn cancel(&self, order: &CanonicalOrder, ctx: &AttemptContext) -> Result<CanonicalOrder, StoreError>;

    /// Generates the invoice for a materialized order. An order has at most one invoice; a second request is
    /// rejected with [`StoreError::Duplicate`].
    async fn generate_invoice(&self, raw: &SaleOrder, order: &CanonicalOrder) -> Result<Invoice, StoreError>;
}
