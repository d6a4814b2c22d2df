use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db_types::{CanonicalOrder, OrderCode};

//--------------------------------------   MaterializeOutcome   --------------------------------------------------------
#[derive(Debug, Clone, PartialEq)]
pub enum MaterializeOutcome {
    /// A new order was persisted (and cancelled, if it is cancelled upstream).
    Created(CanonicalOrder),
    /// An order with the same external code already exists. Nothing was changed.
    AlreadyExists(CanonicalOrder),
    /// The attempt failed and was rolled back. The reason is also recorded in the audit log.
    Failed(String),
}

impl MaterializeOutcome {
    /// The order record, if one exists after the attempt.
    pub fn order(&self) -> Option<&CanonicalOrder> {
        match self {
            MaterializeOutcome::Created(o) | MaterializeOutcome::AlreadyExists(o) => Some(o),
            MaterializeOutcome::Failed(_) => None,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, MaterializeOutcome::Created(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, MaterializeOutcome::Failed(_))
    }
}

//--------------------------------------     SyncRunStatus      --------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncRunStatus {
    /// The integration is disabled in the settings.
    Disabled,
    /// The last run was too recent.
    NotDue,
    /// The upstream source returned no result.
    NothingFetched,
    /// Orders were fetched and processed. Individual orders may still have failed.
    Completed,
}

impl Display for SyncRunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncRunStatus::Disabled => write!(f, "Disabled"),
            SyncRunStatus::NotDue => write!(f, "NotDue"),
            SyncRunStatus::NothingFetched => write!(f, "NothingFetched"),
            SyncRunStatus::Completed => write!(f, "Completed"),
        }
    }
}

//--------------------------------------       SyncReport       --------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncReport {
    pub status: SyncRunStatus,
    pub created: Vec<OrderCode>,
    pub existing: Vec<OrderCode>,
    pub failed: Vec<(OrderCode, String)>,
    /// Orders from channels that are not configured or not enabled
    pub skipped: Vec<OrderCode>,
    pub invoiced: Vec<OrderCode>,
    pub failed_invoices: Vec<(OrderCode, String)>,
}

impl SyncReport {
    pub fn new(status: SyncRunStatus) -> Self {
        Self {
            status,
            created: vec![],
            existing: vec![],
            failed: vec![],
            skipped: vec![],
            invoiced: vec![],
            failed_invoices: vec![],
        }
    }

    pub fn processed(&self) -> usize {
        self.created.len() + self.existing.len() + self.failed.len()
    }
}

impl Display for SyncReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} created, {} existing, {} failed, {} skipped, {} invoiced, {} invoice failures",
            self.status,
            self.created.len(),
            self.existing.len(),
            self.failed.len(),
            self.skipped.len(),
            self.invoiced.len(),
            self.failed_invoices.len()
        )
    }
}

//--------------------------------------       SyncTarget       --------------------------------------------------------
/// The jobs that can be triggered manually.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncTarget {
    Items,
    Orders,
    Inventory,
}

#[derive(Debug, Clone, Error)]
#[error("Unknown method: {0}")]
pub struct UnknownSyncTarget(pub String);

impl FromStr for SyncTarget {
    type Err = UnknownSyncTarget;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Items" => Ok(SyncTarget::Items),
            "Orders" => Ok(SyncTarget::Orders),
            "Inventory" => Ok(SyncTarget::Inventory),
            _ => Err(UnknownSyncTarget(s.to_string())),
        }
    }
}

impl Display for SyncTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncTarget::Items => write!(f, "Items"),
            SyncTarget::Orders => write!(f, "Orders"),
            SyncTarget::Inventory => write!(f, "Inventory"),
        }
    }
}
