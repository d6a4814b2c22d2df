use chrono::{DateTime, Utc};

use crate::traits::StoreError;

#[allow(async_fn_in_trait)]
pub trait SyncCheckpoints {
    async fn last_synced(&self, key: &str) -> Result<Option<DateTime<Utc>>, StoreError>;

    async fn advance_checkpoint(&self, key: &str, at: DateTime<Utc>) -> Result<(), StoreError>;
}
