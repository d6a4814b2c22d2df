use serde_json::Value;

use crate::{
    db_types::{AuditOutcome, CorrelationId},
    traits::StoreError,
};

#[allow(async_fn_in_trait)]
pub trait AuditLog {
    /// Opens a new audit entry in the `Queued` state and returns its id.
    ///
    /// The id is fresh for every attempt. `request_id` is the caller's own reference for the request. It is kept on
    /// the entry for lookups, and several attempts may share it.
    async fn record_attempt(
        &self,
        method: &str,
        payload: &Value,
        request_id: Option<String>,
    ) -> Result<CorrelationId, StoreError>;

    /// Closes the audit entry for the attempt. If `outcome.rollback` is set, every record written under the
    /// correlation id is removed.
    ///
    /// If no entry exists for the correlation id, one is created.
    async fn record_outcome(&self, correlation_id: &CorrelationId, outcome: AuditOutcome) -> Result<(), StoreError>;
}
