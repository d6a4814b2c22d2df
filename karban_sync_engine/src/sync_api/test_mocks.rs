use chrono::{DateTime, NaiveDate, Utc};
use mockall::mock;
use serde_json::{json, Value};
use unicommerce_tools::{SaleOrder, SaleOrderStatus};

use crate::{
    db_types::*,
    settings::IntegrationSettings,
    traits::{AuditLog, CatalogSync, IdentityStore, OrderStore, StoreError, SyncCheckpoints, UpstreamError, UpstreamOrderSource},
};

mock! {
    pub Backend {}
    impl IdentityStore for Backend {
        async fn find_customer(&self, markers: &IdentityMarkers) -> Result<Option<Customer>, StoreError>;
        async fn persist_customer(&self, customer: NewCustomer, ctx: &AttemptContext) -> Result<Customer, StoreError>;
        async fn update_tax_identity(&self, customer_id: i64, identity: &TaxIdentity, ctx: &AttemptContext) -> Result<Customer, StoreError>;
        async fn persist_address(&self, address: CanonicalAddress, customer_id: i64, ctx: &AttemptContext) -> Result<i64, StoreError>;
    }
    impl CatalogSync for Backend {
        async fn sync_line_items(&self, order: &SaleOrder, ctx: &AttemptContext) -> Result<(), StoreError>;
    }
    impl OrderStore for Backend {
        async fn find_order_by_external_code(&self, code: &OrderCode) -> Result<Option<CanonicalOrder>, StoreError>;
        async fn persist_and_submit(&self, order: NewOrder, ctx: &AttemptContext) -> Result<CanonicalOrder, StoreError>;
        async fn cancel(&self, order: &CanonicalOrder, ctx: &AttemptContext) -> Result<CanonicalOrder, StoreError>;
        async fn generate_invoice(&self, raw: &SaleOrder, order: &CanonicalOrder) -> Result<Invoice, StoreError>;
    }
    impl AuditLog for Backend {
        async fn record_attempt(&self, method: &str, payload: &Value, request_id: Option<String>) -> Result<CorrelationId, StoreError>;
        async fn record_outcome(&self, correlation_id: &CorrelationId, outcome: AuditOutcome) -> Result<(), StoreError>;
    }
    impl SyncCheckpoints for Backend {
        async fn last_synced(&self, key: &str) -> Result<Option<DateTime<Utc>>, StoreError>;
        async fn advance_checkpoint(&self, key: &str, at: DateTime<Utc>) -> Result<(), StoreError>;
    }
}

mock! {
    pub Source {}
    impl UpstreamOrderSource for Source {
        async fn fetch_new_orders(&self, since: DateTime<Utc>, status: Option<SaleOrderStatus>) -> Result<Option<Vec<SaleOrder>>, UpstreamError>;
    }
}

pub const SETTINGS: &str = r#"
    default_customer_group = "Retail"
    root_territory = "India"
    sales_order_series = "SO-"

    [channels.AMAZON_IN]
    warehouse = "Stores - KB"
    company = "Karban Retail"
    customer_group = "Marketplace"
    sales_order_series = "AMZ-SO-"
    tax_accounts = { igst_account = "IGST - KB", cgst_account = "CGST - KB", sgst_account = "SGST - KB" }

    [channels.MYNTRA]
    enabled = false

    [facilities.WH01]
    company_address = "Karban Retail-Billing"
    dispatch_address = "WH01-Shipping"

    [facilities.WH02]
    warehouse = "Chennai - KB"
"#;

pub fn sample_settings() -> IntegrationSettings {
    IntegrationSettings::from_toml_str(SETTINGS).expect("Invalid test settings")
}

pub fn sample_payload(code: &str, status: &str) -> Value {
    json!({
        "code": code,
        "displayOrderCode": format!("D-{code}"),
        "status": status,
        "channel": "AMAZON_IN",
        "cod": true,
        "customerCode": "CUST-9",
        "customerGSTIN": "null",
        "currencyCode": "INR",
        "displayOrderDateTime": 1_710_545_400_000_i64,
        "fulfillmentTat": 1_710_891_000_000_i64,
        "saleOrderItems": [
            {
                "code": "SOI-1",
                "itemSku": "SKU-RED",
                "itemName": "Red shirt",
                "sellingPrice": 500.0,
                "facilityCode": "WH01",
                "integratedGstPercentage": 5.0,
                "statusCode": "FULFILLABLE"
            },
            {
                "code": "SOI-2",
                "itemSku": "SKU-BLUE",
                "itemName": "Blue shirt",
                "sellingPrice": 700.0,
                "facilityCode": "WH02",
                "integratedGstPercentage": 12.0,
                "statusCode": "CANCELLED"
            }
        ],
        "addresses": [{
            "id": "8812",
            "name": "Asha Rao",
            "addressLine1": "12 MG Road",
            "city": "Bengaluru",
            "district": "Bangalore Urban",
            "state": "KA",
            "country": "IN",
            "pincode": "560001",
            "phone": "9999999999",
            "email": "asha@example.com"
        }]
    })
}

pub fn sample_order() -> SaleOrder {
    SaleOrder::from_payload(sample_payload("SO-1001", "PROCESSING")).expect("Invalid test order")
}

pub fn order_with(code: &str, status: &str) -> SaleOrder {
    SaleOrder::from_payload(sample_payload(code, status)).expect("Invalid test order")
}

pub fn customer_from(id: i64, markers: IdentityMarkers) -> Customer {
    Customer {
        id,
        customer_name: "Asha Rao".into(),
        customer_group: "Marketplace".into(),
        territory: "India".into(),
        customer_type: "Individual".into(),
        markers,
        tax_identity: TaxIdentity::unregistered(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// The record a store would return after persisting `order`.
pub fn stored_order(order: NewOrder, id: i64, doc_status: DocStatus, ctx: Option<&AttemptContext>) -> CanonicalOrder {
    let now = Utc::now();
    CanonicalOrder {
        id,
        name: format!("{}{id:05}", order.naming_series.clone().unwrap_or_default()),
        order_code: order.order_code,
        order_status: order.order_status,
        customer_id: order.customer_id,
        channel: order.channel,
        naming_series: order.naming_series,
        facility_code: order.facility_code,
        is_cod: order.is_cod,
        transaction_date: order.transaction_date,
        delivery_date: order.delivery_date,
        items: order.items,
        company: order.company,
        taxes: order.taxes,
        company_address: order.company_address,
        dispatch_address: order.dispatch_address,
        currency: order.currency,
        raw_data: order.raw_data,
        doc_status,
        correlation_id: ctx.map(|c| c.correlation_id.clone()),
        submitted_at: Some(now),
        cancelled_at: (doc_status == DocStatus::Cancelled).then_some(now),
        created_at: now,
        updated_at: now,
    }
}

pub fn invoice_for(order: &CanonicalOrder) -> Invoice {
    Invoice {
        id: 1,
        order_id: order.id,
        order_code: order.order_code.clone(),
        customer_id: order.customer_id,
        net_total: order.net_total(),
        total_taxes: order.total_taxes(),
        grand_total: order.grand_total(),
        created_at: Utc::now(),
    }
}

/// A submitted order that already exists in the store.
pub fn existing_order(code: &str) -> CanonicalOrder {
    let raw = order_with(code, "COMPLETE");
    let order = NewOrder {
        order_code: OrderCode::from(code),
        order_status: "COMPLETE".into(),
        customer_id: 5,
        channel: raw.channel.clone(),
        naming_series: Some("AMZ-SO-".into()),
        facility_code: Some("WH01".into()),
        is_cod: raw.cod,
        transaction_date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
        delivery_date: None,
        items: vec![OrderLineItem {
            item_code: "SKU-RED".into(),
            item_name: Some("Red shirt".into()),
            rate: 500.0,
            qty: 1,
            warehouse: Some("Stores - KB".into()),
            upstream_item_code: "SOI-1".into(),
        }],
        company: Some("Karban Retail".into()),
        taxes: vec![],
        company_address: None,
        dispatch_address: None,
        currency: Some("INR".into()),
        raw_data: raw.to_payload(),
    };
    stored_order(order, 2, DocStatus::Submitted, None)
}
