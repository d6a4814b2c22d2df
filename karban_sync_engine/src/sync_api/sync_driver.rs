use std::{fmt::Debug, sync::Arc};

use chrono::{DateTime, Utc};
use log::*;
use unicommerce_tools::{SaleOrder, SaleOrderStatus};

use crate::{
    db_types::OrderCode,
    settings::IntegrationSettings,
    sync_api::{
        errors::SyncError,
        frequency_gate::FrequencyGate,
        order_materializer::OrderMaterializer,
        sync_objects::{MaterializeOutcome, SyncReport, SyncRunStatus},
    },
    traits::{AuditLog, CatalogSync, IdentityStore, OrderStore, SyncCheckpoints, UpstreamOrderSource},
};

/// The checkpoint key for the order sync.
pub const LAST_ORDER_SYNC: &str = "last_order_sync";

/// `SyncDriver` pulls new orders from the upstream source and materializes them one at a time.
pub struct SyncDriver<B, S> {
    materializer: OrderMaterializer<B>,
    source: S,
    settings: Arc<IntegrationSettings>,
}

impl<B, S> Debug for SyncDriver<B, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SyncDriver")
    }
}

impl<B, S> SyncDriver<B, S> {
    pub fn new(materializer: OrderMaterializer<B>, source: S, settings: Arc<IntegrationSettings>) -> Self {
        Self { materializer, source, settings }
    }

    pub fn materializer(&self) -> &OrderMaterializer<B> {
        &self.materializer
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<B, S> SyncDriver<B, S>
where
    B: IdentityStore + CatalogSync + OrderStore + AuditLog + SyncCheckpoints,
    S: UpstreamOrderSource,
{
    /// Syncs the orders that changed upstream since the last run.
    ///
    /// Unless `force` is set, the run only goes ahead if the configured sync frequency has elapsed since the last
    /// run. Each fetch window reaches one lookback period behind the previous checkpoint, so orders that failed or
    /// were skipped in an earlier run are delivered again. The checkpoint is advanced to the start of the run once the
    /// fetch has succeeded. Forced runs leave the checkpoint alone.
    ///
    /// Failures of individual orders or invoices are reported in the [`SyncReport`] and do not stop the run.
    pub async fn sync_new_orders(&self, force: bool) -> Result<SyncReport, SyncError> {
        if !self.settings.enabled {
            debug!("🔄️⏱️ The Unicommerce integration is disabled. Not syncing orders.");
            return Ok(SyncReport::new(SyncRunStatus::Disabled));
        }
        let now = Utc::now();
        let db = self.materializer.db();
        let previous = db.last_synced(LAST_ORDER_SYNC).await?;
        if !force {
            let gate = FrequencyGate::new(self.settings.order_sync_frequency());
            if !gate.is_due(previous, now) {
                trace!("🔄️⏱️ Order sync is not due yet. Last run was at {previous:?}");
                return Ok(SyncReport::new(SyncRunStatus::NotDue));
            }
        }
        let since = self.window_start(previous, now);
        let status = self.settings.only_sync_completed_orders.then_some(SaleOrderStatus::Complete);
        info!("🔄️⏱️ Fetching orders updated since {since} (status filter: {status:?}, forced: {force})");
        let fetched = self.source.fetch_new_orders(since, status).await?;
        if !force {
            db.advance_checkpoint(LAST_ORDER_SYNC, now).await?;
        }
        let Some(orders) = fetched else {
            info!("🔄️⏱️ The upstream source returned no orders");
            return Ok(SyncReport::new(SyncRunStatus::NothingFetched));
        };
        let mut report = SyncReport::new(SyncRunStatus::Completed);
        for order in &orders {
            self.process_order(order, &mut report).await;
        }
        info!("🔄️⏱️ Order sync complete. {report}");
        Ok(report)
    }

    /// One lookback period before the previous checkpoint, or before `now` on the first run.
    fn window_start(&self, previous: Option<DateTime<Utc>>, now: DateTime<Utc>) -> DateTime<Utc> {
        let anchor = previous.map(|p| p.min(now)).unwrap_or(now);
        anchor.checked_sub_signed(self.settings.order_lookback()).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    async fn process_order(&self, order: &SaleOrder, report: &mut SyncReport) {
        let code = OrderCode::from(order.code.as_str());
        if !self.settings.is_channel_enabled(&order.channel) {
            debug!("🔄️⏱️ Skipping order {code}. Channel {} is not configured or not enabled.", order.channel);
            report.skipped.push(code);
            return;
        }
        let outcome = self.materializer.materialize(order, None).await;
        let record = match outcome {
            MaterializeOutcome::Created(o) => {
                report.created.push(code.clone());
                Some(o)
            },
            MaterializeOutcome::AlreadyExists(o) => {
                report.existing.push(code.clone());
                Some(o)
            },
            MaterializeOutcome::Failed(reason) => {
                report.failed.push((code.clone(), reason));
                None
            },
        };
        if !self.settings.only_sync_completed_orders || order.status != SaleOrderStatus::Complete {
            return;
        }
        let Some(record) = record else {
            return;
        };
        match self.materializer.db().generate_invoice(order, &record).await {
            Ok(invoice) => {
                info!("🔄️🧾️ Invoice #{} generated for order {code}", invoice.id);
                report.invoiced.push(code);
            },
            Err(e) => {
                warn!("🔄️🧾️ Could not generate an invoice for order {code}. {e}");
                report.failed_invoices.push((code, e.to_string()));
            },
        }
    }
}

#[cfg(test)]
mod test {
    use std::sync::Mutex;

    use chrono::Duration;

    use mockall::Sequence;

    use super::*;
    use crate::{
        db_types::{CorrelationId, DocStatus},
        settings::MAX_SETTING_DAYS,
        sync_api::test_mocks::{
            customer_from,
            existing_order,
            invoice_for,
            order_with,
            sample_settings,
            stored_order,
            MockBackend,
            MockSource,
        },
        traits::{StoreError, UpstreamError},
    };

    fn driver(db: MockBackend, source: MockSource, settings: IntegrationSettings) -> SyncDriver<MockBackend, MockSource> {
        let settings = Arc::new(settings);
        SyncDriver::new(OrderMaterializer::new(db, settings.clone()), source, settings)
    }

    /// A backend whose checkpoint store keeps its value in memory.
    fn checkpointed_backend() -> (MockBackend, Arc<Mutex<Option<DateTime<Utc>>>>) {
        let checkpoint = Arc::new(Mutex::new(None));
        let mut db = MockBackend::new();
        let read = checkpoint.clone();
        db.expect_last_synced()
            .withf(|key| key == LAST_ORDER_SYNC)
            .returning(move |_| Ok(*read.lock().unwrap()));
        let write = checkpoint.clone();
        db.expect_advance_checkpoint().returning(move |_, at| {
            *write.lock().unwrap() = Some(at);
            Ok(())
        });
        (db, checkpoint)
    }

    /// Expectations for successfully materializing any new order.
    fn expect_materialization(db: &mut MockBackend) {
        db.expect_find_order_by_external_code().returning(|_| Ok(None));
        db.expect_record_attempt().returning(|_, _, _| Ok(CorrelationId::from("audit-1")));
        db.expect_sync_line_items().returning(|_, _| Ok(()));
        db.expect_find_customer().returning(|_| Ok(None));
        db.expect_persist_customer().returning(|c, _| Ok(customer_from(5, c.markers)));
        db.expect_persist_address().returning(|_, _, _| Ok(1));
        db.expect_persist_and_submit().returning(|o, ctx| Ok(stored_order(o, 1, DocStatus::Submitted, Some(ctx))));
        db.expect_record_outcome().returning(|_, _| Ok(()));
    }

    #[tokio::test]
    async fn disabled_integration_does_nothing() {
        let _ = env_logger::try_init();
        let mut db = MockBackend::new();
        db.expect_last_synced().never();
        let mut source = MockSource::new();
        source.expect_fetch_new_orders().never();
        let mut settings = sample_settings();
        settings.enabled = false;
        let report = driver(db, source, settings).sync_new_orders(true).await.unwrap();
        assert_eq!(report.status, SyncRunStatus::Disabled);
    }

    #[tokio::test]
    async fn second_unforced_run_is_not_due() {
        let _ = env_logger::try_init();
        let (db, checkpoint) = checkpointed_backend();
        let mut source = MockSource::new();
        source.expect_fetch_new_orders().times(1).returning(|_, _| Ok(Some(vec![])));
        let d = driver(db, source, sample_settings());
        let first = d.sync_new_orders(false).await.unwrap();
        assert_eq!(first.status, SyncRunStatus::Completed);
        assert!(checkpoint.lock().unwrap().is_some());
        let second = d.sync_new_orders(false).await.unwrap();
        assert_eq!(second.status, SyncRunStatus::NotDue);
    }

    #[tokio::test]
    async fn forced_runs_always_fetch() {
        let _ = env_logger::try_init();
        let mut db = MockBackend::new();
        db.expect_last_synced().returning(|_| Ok(Some(Utc::now())));
        db.expect_advance_checkpoint().never();
        let mut source = MockSource::new();
        source.expect_fetch_new_orders().times(2).returning(|_, _| Ok(Some(vec![])));
        let d = driver(db, source, sample_settings());
        assert_eq!(d.sync_new_orders(true).await.unwrap().status, SyncRunStatus::Completed);
        assert_eq!(d.sync_new_orders(true).await.unwrap().status, SyncRunStatus::Completed);
    }

    #[tokio::test]
    async fn first_run_uses_lookback_window() {
        let _ = env_logger::try_init();
        let (db, _) = checkpointed_backend();
        let mut source = MockSource::new();
        source
            .expect_fetch_new_orders()
            .withf(|since, status| {
                let age = Utc::now() - *since;
                status.is_none() && age >= Duration::hours(24) && age < Duration::hours(25)
            })
            .times(1)
            .returning(|_, _| Ok(None));
        let report = driver(db, source, sample_settings()).sync_new_orders(false).await.unwrap();
        assert_eq!(report.status, SyncRunStatus::NothingFetched);
    }

    #[tokio::test]
    async fn later_runs_overlap_the_previous_window() {
        let _ = env_logger::try_init();
        let last = Utc::now() - Duration::hours(3);
        let mut db = MockBackend::new();
        db.expect_last_synced().returning(move |_| Ok(Some(last)));
        db.expect_advance_checkpoint().withf(move |_, at| *at > last).times(1).returning(|_, _| Ok(()));
        let mut source = MockSource::new();
        source
            .expect_fetch_new_orders()
            .withf(move |since, _| *since == last - Duration::hours(24))
            .times(1)
            .returning(|_, _| Ok(Some(vec![])));
        driver(db, source, sample_settings()).sync_new_orders(false).await.unwrap();
    }

    #[tokio::test]
    async fn unconfigured_channels_are_skipped() {
        let _ = env_logger::try_init();
        let (mut db, _) = checkpointed_backend();
        expect_materialization(&mut db);
        let mut source = MockSource::new();
        source.expect_fetch_new_orders().returning(|_, _| {
            let mut disabled = order_with("SO-2", "PROCESSING");
            disabled.channel = "MYNTRA".into();
            let mut unknown = order_with("SO-3", "PROCESSING");
            unknown.channel = "SNAPDEAL".into();
            Ok(Some(vec![order_with("SO-1", "PROCESSING"), disabled, unknown]))
        });
        let report = driver(db, source, sample_settings()).sync_new_orders(false).await.unwrap();
        assert_eq!(report.created, vec![OrderCode::from("SO-1")]);
        assert_eq!(report.skipped, vec![OrderCode::from("SO-2"), OrderCode::from("SO-3")]);
    }

    #[tokio::test]
    async fn completed_orders_are_invoiced_once() {
        let _ = env_logger::try_init();
        let (mut db, _) = checkpointed_backend();
        expect_materialization(&mut db);
        db.expect_generate_invoice()
            .withf(|raw, order| raw.code == "SO-1" && order.order_code.as_str() == "SO-1")
            .times(1)
            .returning(|_, order| Ok(invoice_for(order)));
        let mut source = MockSource::new();
        source
            .expect_fetch_new_orders()
            .withf(|_, status| *status == Some(SaleOrderStatus::Complete))
            .returning(|_, _| Ok(Some(vec![order_with("SO-1", "COMPLETE"), order_with("SO-2", "PROCESSING")])));
        let mut settings = sample_settings();
        settings.only_sync_completed_orders = true;
        let report = driver(db, source, settings).sync_new_orders(false).await.unwrap();
        assert_eq!(report.created.len(), 2);
        assert_eq!(report.invoiced, vec![OrderCode::from("SO-1")]);
    }

    #[tokio::test]
    async fn no_invoices_without_completed_only_policy() {
        let _ = env_logger::try_init();
        let (mut db, _) = checkpointed_backend();
        expect_materialization(&mut db);
        db.expect_generate_invoice().never();
        let mut source = MockSource::new();
        source.expect_fetch_new_orders().returning(|_, _| Ok(Some(vec![order_with("SO-1", "COMPLETE")])));
        let report = driver(db, source, sample_settings()).sync_new_orders(false).await.unwrap();
        assert_eq!(report.created.len(), 1);
        assert!(report.invoiced.is_empty());
    }

    #[tokio::test]
    async fn failures_do_not_stop_the_run() {
        let _ = env_logger::try_init();
        let (mut db, _) = checkpointed_backend();
        db.expect_find_order_by_external_code().returning(|code| match code.as_str() {
            "SO-1" => Err(StoreError::DatabaseError("database is locked".into())),
            other => Ok(Some(existing_order(other))),
        });
        db.expect_generate_invoice()
            .times(1)
            .returning(|_, _| Err(StoreError::Duplicate("SO-2 is already invoiced".into())));
        let mut source = MockSource::new();
        source
            .expect_fetch_new_orders()
            .returning(|_, _| Ok(Some(vec![order_with("SO-1", "COMPLETE"), order_with("SO-2", "COMPLETE")])));
        let mut settings = sample_settings();
        settings.only_sync_completed_orders = true;
        let report = driver(db, source, settings).sync_new_orders(false).await.unwrap();
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.existing, vec![OrderCode::from("SO-2")]);
        assert_eq!(report.failed_invoices.len(), 1);
    }

    #[tokio::test]
    async fn failed_fetches_leave_the_checkpoint_alone() {
        let _ = env_logger::try_init();
        let (db, checkpoint) = checkpointed_backend();
        let mut source = MockSource::new();
        let mut seq = Sequence::new();
        source
            .expect_fetch_new_orders()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Err(UpstreamError::Unavailable("503".into())));
        source.expect_fetch_new_orders().times(1).in_sequence(&mut seq).returning(|_, _| Ok(Some(vec![])));
        let d = driver(db, source, sample_settings());
        let err = d.sync_new_orders(false).await.unwrap_err();
        assert!(matches!(err, SyncError::Upstream(_)));
        assert!(checkpoint.lock().unwrap().is_none());
        // The next scheduled run is still due and fetches the same window
        let report = d.sync_new_orders(false).await.unwrap();
        assert_eq!(report.status, SyncRunStatus::Completed);
        assert!(checkpoint.lock().unwrap().is_some());
    }

    #[test]
    fn window_start_survives_huge_lookbacks() {
        let mut settings = sample_settings();
        settings.order_lookback_minutes = i64::MAX;
        let d = driver(MockBackend::new(), MockSource::new(), settings);
        let now = Utc::now();
        let expected = now - Duration::days(MAX_SETTING_DAYS);
        assert_eq!(d.window_start(None, now), expected);
        assert_eq!(d.window_start(Some(now + Duration::hours(1)), now), expected);
    }
}
