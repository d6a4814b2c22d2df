use thiserror::Error;

use crate::traits::{StoreError, UpstreamError};

/// Failures inside a single materialization attempt. These never cross the materializer boundary; they are audited
/// and reported as [`crate::MaterializeOutcome::Failed`].
#[derive(Debug, Clone, Error)]
pub enum MaterializeError {
    #[error("{0}")]
    Store(#[from] StoreError),
    #[error("Channel {0} is not configured")]
    UnknownChannel(String),
    #[error("Invalid order payload. {0}")]
    InvalidPayload(String),
}

#[derive(Debug, Clone, Error)]
pub enum SyncError {
    #[error("Could not fetch new orders. {0}")]
    Upstream(#[from] UpstreamError),
    #[error("Could not access the sync checkpoint. {0}")]
    Checkpoint(#[from] StoreError),
}
