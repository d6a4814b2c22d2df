//! The sync worker.
//!
//! All sync work runs on a single worker task that consumes a [`JobQueue`]. Scheduled order syncs, manual triggers
//! and pushed order payloads therefore never run concurrently, which keeps the checkpoint read-then-advance in the
//! sync driver race free.
use std::{fmt::Display, time::Duration};

use karban_sync_engine::{
    traits::{AuditLog, CatalogSync, IdentityStore, OrderStore, SyncCheckpoints, UpstreamOrderSource},
    MaterializeOutcome,
    SqliteDatabase,
    SyncDriver,
    SyncTarget,
};
use log::*;
use tokio::{sync::mpsc, task::JoinHandle};
use unicommerce_tools::SaleOrder;

use crate::{errors::ServerError, integrations::unicommerce::UnicommerceOrderSource};

pub const JOB_QUEUE_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
pub enum SyncJob {
    /// The periodic order sync. It only fetches when the configured sync frequency has elapsed.
    Scheduled,
    /// A manually triggered sync that ignores the sync frequency.
    Forced(SyncTarget),
    /// An order pushed by the upstream system, with the caller's request id if it sent one.
    Materialize { order: Box<SaleOrder>, request_id: Option<String> },
}

impl Display for SyncJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncJob::Scheduled => write!(f, "scheduled order sync"),
            SyncJob::Forced(target) => write!(f, "forced {target} sync"),
            SyncJob::Materialize { order, .. } => write!(f, "materialize order {}", order.code),
        }
    }
}

/// The sending half of the worker's job queue. Cloning it is cheap.
#[derive(Debug, Clone)]
pub struct JobQueue {
    sender: mpsc::Sender<SyncJob>,
}

impl JobQueue {
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<SyncJob>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender }, receiver)
    }

    pub async fn enqueue(&self, job: SyncJob) -> Result<(), ServerError> {
        debug!("🕰️ Queueing {job}");
        self.sender.send(job).await.map_err(|e| ServerError::QueueUnavailable(e.to_string()))
    }
}

/// Starts the sync worker. Do not await the returned JoinHandle, as it runs until every [`JobQueue`] handle has been
/// dropped.
pub fn start_sync_worker(
    driver: SyncDriver<SqliteDatabase, UnicommerceOrderSource>,
    mut jobs: mpsc::Receiver<SyncJob>,
    poll_interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut timer = tokio::time::interval(poll_interval);
        info!("🕰️ Sync worker started. Scheduled syncs every {} s", poll_interval.as_secs());
        loop {
            let job = tokio::select! {
                _ = timer.tick() => SyncJob::Scheduled,
                job = jobs.recv() => match job {
                    Some(job) => job,
                    None => {
                        info!("🕰️ The job queue has closed. Sync worker stopping.");
                        break;
                    },
                },
            };
            run_job(&driver, job).await;
        }
    })
}

/// Runs a single job to completion. Failures are logged and never stop the worker.
pub async fn run_job<B, S>(driver: &SyncDriver<B, S>, job: SyncJob)
where
    B: IdentityStore + CatalogSync + OrderStore + AuditLog + SyncCheckpoints,
    S: UpstreamOrderSource,
{
    trace!("🕰️ Running {job}");
    match job {
        SyncJob::Scheduled => run_order_sync(driver, false).await,
        SyncJob::Forced(SyncTarget::Orders) => run_order_sync(driver, true).await,
        SyncJob::Forced(target) => {
            error!("🕰️ {target} sync is not supported by this service. The job has been dropped.");
        },
        SyncJob::Materialize { order, request_id } => {
            match driver.materializer().materialize(&order, request_id).await {
                MaterializeOutcome::Created(o) => info!("🕰️ Pushed order {} materialized as {}", order.code, o.name),
                MaterializeOutcome::AlreadyExists(o) => {
                    info!("🕰️ Pushed order {} already exists as {}", order.code, o.name)
                },
                MaterializeOutcome::Failed(reason) => error!("🕰️ Pushed order {} failed. {reason}", order.code),
            }
        },
    }
}

async fn run_order_sync<B, S>(driver: &SyncDriver<B, S>, force: bool)
where
    B: IdentityStore + CatalogSync + OrderStore + AuditLog + SyncCheckpoints,
    S: UpstreamOrderSource,
{
    match driver.sync_new_orders(force).await {
        Ok(report) => {
            info!("🕰️ Order sync finished. {report}");
            for (code, reason) in &report.failed {
                warn!("🕰️ Order {code} failed. {reason}");
            }
            for (code, reason) in &report.failed_invoices {
                warn!("🕰️ Invoice for order {code} failed. {reason}");
            }
        },
        Err(e) => error!("🕰️ Error running the order sync job: {e}"),
    }
}
