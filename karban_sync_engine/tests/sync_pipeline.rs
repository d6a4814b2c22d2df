mod support;

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use karban_sync_engine::{
    db_types::{AuditStatus, DocStatus, GstCategory, OrderCode},
    traits::{OrderStore, SyncCheckpoints, UpstreamError, UpstreamOrderSource},
    MaterializeOutcome,
    OrderMaterializer,
    SqliteDatabase,
    SyncDriver,
    SyncRunStatus,
};
use unicommerce_tools::{SaleOrder, SaleOrderStatus};

use support::{count_rows, new_test_db, order, payload, settings};

fn materializer(db: SqliteDatabase) -> OrderMaterializer<SqliteDatabase> {
    OrderMaterializer::new(db, Arc::new(settings()))
}

#[tokio::test]
async fn materializing_twice_creates_one_order() {
    let db = new_test_db().await;
    let materializer = materializer(db.clone());
    let order = order("SO-100", "PROCESSING", "null");

    let first = materializer.materialize(&order, None).await;
    let MaterializeOutcome::Created(record) = first else { panic!("Expected a new order, got {first:?}") };
    assert_eq!(record.doc_status, DocStatus::Submitted);
    assert_eq!(record.name, format!("AMZ-SO-{:05}", record.id));
    assert_eq!(record.company.as_deref(), Some("Karban Retail"));
    assert_eq!(record.company_address.as_deref(), Some("Karban Retail-Billing"));
    assert_eq!(record.dispatch_address.as_deref(), Some("WH01-Shipping"));
    assert_eq!(record.taxes.len(), 2);
    assert!(record.taxes.iter().all(|t| t.account_head.is_some()));
    let correlation_id = record.correlation_id.clone().expect("Order has no correlation id");
    let entry = db.fetch_audit_entry(&correlation_id).await.unwrap().unwrap();
    assert_eq!(entry.status, AuditStatus::Success);
    assert_eq!(entry.request_data["code"], "SO-100");

    let second = materializer.materialize(&order, None).await;
    assert_eq!(second, MaterializeOutcome::AlreadyExists(record.clone()));
    let orders = db.fetch_orders_for_customer(record.customer_id).await.unwrap();
    assert_eq!(orders.len(), 1);
}

#[tokio::test]
async fn cancelled_orders_end_cancelled() {
    let db = new_test_db().await;
    let materializer = materializer(db.clone());
    let order = order("SO-101", "CANCELLED", "null");
    let outcome = materializer.materialize(&order, None).await;
    assert!(outcome.is_created());
    let stored = db.find_order_by_external_code(&OrderCode::from("SO-101")).await.unwrap().unwrap();
    assert_eq!(stored.doc_status, DocStatus::Cancelled);
    assert!(stored.cancelled_at.is_some());
    assert_eq!(stored.items.len(), 1);
}

#[tokio::test]
async fn failed_attempts_are_rolled_back() {
    let db = new_test_db().await;
    let materializer = materializer(db.clone());
    let mut raw = payload("SO-102", "PROCESSING", "29ABCDE1234F1Z5");
    // No tax accounts are configured for this channel, so submission is rejected.
    raw["channel"] = "FLIPKART".into();
    let order = SaleOrder::from_payload(raw).unwrap();

    let outcome = materializer.materialize(&order, Some("req-102".into())).await;
    let MaterializeOutcome::Failed(reason) = outcome else { panic!("Expected a failure, got {outcome:?}") };
    assert!(reason.contains("Account Head"), "{reason}");

    let entries = db.fetch_audit_entries_for_request("req-102").await.unwrap();
    assert_eq!(entries.len(), 1);
    let entry = &entries[0];
    assert_ne!(entry.id.as_str(), "req-102");
    assert_eq!(entry.status, AuditStatus::Error);
    assert!(entry.rollback_requested);
    for table in ["customers", "addresses", "items", "orders"] {
        assert_eq!(count_rows(&db, table, entry.id.as_str()).await, 0, "{table} rows were left behind");
    }
    assert!(db.find_order_by_external_code(&OrderCode::from("SO-102")).await.unwrap().is_none());
    assert!(!db.item_exists("SKU-RED").await.unwrap());
}

#[tokio::test]
async fn a_failed_attempt_does_not_undo_an_earlier_one_with_the_same_request_id() {
    let db = new_test_db().await;
    let materializer = materializer(db.clone());
    let first = materializer.materialize(&order("SO-500", "PROCESSING", "null"), Some("req-1".into())).await;
    let first = first.order().cloned().expect("SO-500 was not created");

    let mut raw = payload("SO-501", "PROCESSING", "null");
    raw["channel"] = "FLIPKART".into();
    let second = materializer.materialize(&SaleOrder::from_payload(raw).unwrap(), Some("req-1".into())).await;
    assert!(second.is_failed());

    let stored = db.find_order_by_external_code(&OrderCode::from("SO-500")).await.unwrap();
    assert_eq!(stored.as_ref(), Some(&first));
    assert!(db.fetch_customer(first.customer_id).await.unwrap().is_some());
    assert!(db.item_exists("SKU-RED").await.unwrap());

    let entries = db.fetch_audit_entries_for_request("req-1").await.unwrap();
    let statuses = entries.iter().map(|e| (e.status, e.rollback_requested)).collect::<Vec<_>>();
    assert_eq!(statuses, vec![(AuditStatus::Success, false), (AuditStatus::Error, true)]);
    assert_eq!(Some(&entries[0].id), first.correlation_id.as_ref());

    // A later push of the same order finds the original record
    let again = materializer.materialize(&order("SO-500", "PROCESSING", "null"), Some("req-1".into())).await;
    assert_eq!(again, MaterializeOutcome::AlreadyExists(first));
}

#[tokio::test]
async fn customers_are_shared_between_orders() {
    let db = new_test_db().await;
    let materializer = materializer(db.clone());

    let first = materializer.materialize(&order("SO-103", "PROCESSING", "29ABCDE1234F1Z5"), None).await;
    let first = first.order().cloned().expect("First order was not created");
    let customer = db.fetch_customer(first.customer_id).await.unwrap().unwrap();
    assert_eq!(customer.customer_name, "Meera Iyer");
    assert_eq!(customer.customer_group, "Retail");
    assert_eq!(customer.territory, "India");
    assert_eq!(customer.tax_identity.gstin, "29ABCDE1234F1Z5");
    assert_eq!(customer.tax_identity.category, GstCategory::RegisteredRegular);

    // Same address with a different upstream id and no GSTIN this time
    let second = materializer.materialize(&order("SO-104", "PROCESSING", "null"), None).await;
    let second = second.order().cloned().expect("Second order was not created");
    assert_eq!(second.customer_id, first.customer_id);
    let customer = db.fetch_customer(first.customer_id).await.unwrap().unwrap();
    assert_eq!(customer.tax_identity.gstin, "");
    assert_eq!(customer.tax_identity.category, GstCategory::Unregistered);

    assert_eq!(db.fetch_orders_for_customer(first.customer_id).await.unwrap().len(), 2);
    assert_eq!(db.count_addresses_for_customer(first.customer_id).await.unwrap(), 4);
}

/// Serves a fixed list of orders and remembers what it was asked for.
#[derive(Default)]
struct FixedSource {
    orders: Vec<SaleOrder>,
    requests: Mutex<Vec<(DateTime<Utc>, Option<SaleOrderStatus>)>>,
}

impl UpstreamOrderSource for FixedSource {
    async fn fetch_new_orders(
        &self,
        since: DateTime<Utc>,
        status: Option<SaleOrderStatus>,
    ) -> Result<Option<Vec<SaleOrder>>, UpstreamError> {
        self.requests.lock().unwrap().push((since, status));
        Ok(Some(self.orders.clone()))
    }
}

#[tokio::test]
async fn driver_syncs_and_invoices_completed_orders() {
    let db = new_test_db().await;
    let settings = Arc::new(settings());
    let mut other_channel = payload("SO-202", "COMPLETE", "null");
    other_channel["channel"] = "MYNTRA".into();
    let source = FixedSource {
        orders: vec![order("SO-200", "COMPLETE", "null"), SaleOrder::from_payload(other_channel).unwrap()],
        ..Default::default()
    };
    let driver = SyncDriver::new(OrderMaterializer::new(db.clone(), settings.clone()), source, settings);

    let report = driver.sync_new_orders(false).await.unwrap();
    assert_eq!(report.status, SyncRunStatus::Completed);
    assert_eq!(report.created, vec![OrderCode::from("SO-200")]);
    assert_eq!(report.skipped, vec![OrderCode::from("SO-202")]);
    assert_eq!(report.invoiced, vec![OrderCode::from("SO-200")]);
    let checkpoint = db.last_synced("last_order_sync").await.unwrap();
    assert!(checkpoint.is_some());

    // Not due again for another hour
    let report = driver.sync_new_orders(false).await.unwrap();
    assert_eq!(report.status, SyncRunStatus::NotDue);

    let report = driver.sync_new_orders(true).await.unwrap();
    assert_eq!(report.status, SyncRunStatus::Completed);
    assert_eq!(report.existing, vec![OrderCode::from("SO-200")]);
    assert!(report.invoiced.is_empty());
    assert_eq!(report.failed_invoices.len(), 1);
    assert_eq!(db.last_synced("last_order_sync").await.unwrap(), checkpoint);

    let record = db.find_order_by_external_code(&OrderCode::from("SO-200")).await.unwrap().unwrap();
    assert!(db.fetch_invoice_for_order(record.id).await.unwrap().is_some());
    assert!(db.find_order_by_external_code(&OrderCode::from("SO-202")).await.unwrap().is_none());
}
