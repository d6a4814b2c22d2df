use karban_sync_engine::{
    test_utils::prepare_env::{prepare_test_env, random_db_path},
    IntegrationSettings,
    SqliteDatabase,
};
use serde_json::{json, Value};
use unicommerce_tools::SaleOrder;

pub const SETTINGS: &str = r#"
    default_customer_group = "Retail"
    root_territory = "India"
    only_sync_completed_orders = true

    [channels.AMAZON_IN]
    warehouse = "Stores - KB"
    company = "Karban Retail"
    sales_order_series = "AMZ-SO-"
    tax_accounts = { igst_account = "IGST - KB", cgst_account = "CGST - KB", sgst_account = "SGST - KB" }

    [channels.FLIPKART]
    warehouse = "Stores - KB"
    company = "Karban Retail"

    [facilities.WH01]
    company_address = "Karban Retail-Billing"
    dispatch_address = "WH01-Shipping"
"#;

pub async fn new_test_db() -> SqliteDatabase {
    prepare_test_env(&random_db_path()).await
}

pub fn settings() -> IntegrationSettings {
    IntegrationSettings::from_toml_str(SETTINGS).expect("Invalid test settings")
}

pub fn payload(code: &str, status: &str, gstin: &str) -> Value {
    json!({
        "code": code,
        "status": status,
        "channel": "AMAZON_IN",
        "cod": false,
        "customerCode": "CUST-42",
        "customerGSTIN": gstin,
        "currencyCode": "INR",
        "displayOrderDateTime": 1_710_545_400_000_i64,
        "fulfillmentTat": 1_710_891_000_000_i64,
        "saleOrderItems": [
            {
                "code": format!("{code}-1"),
                "itemSku": "SKU-RED",
                "itemName": "Red shirt",
                "sellingPrice": 1000.0,
                "facilityCode": "WH01",
                "centralGstPercentage": 9.0,
                "stateGstPercentage": 9.0
            }
        ],
        "addresses": [
            {
                "id": format!("addr-{code}"),
                "name": "Meera Iyer",
                "addressLine1": "4 Residency Road",
                "city": "Bengaluru",
                "state": "KA",
                "country": "IN",
                "pincode": "560025"
            },
            {
                "id": format!("ship-{code}"),
                "name": "Meera Iyer",
                "addressLine1": "88 Beach Road",
                "city": "Chennai",
                "state": "TN",
                "country": "IN",
                "pincode": "600001"
            }
        ]
    })
}

pub fn order(code: &str, status: &str, gstin: &str) -> SaleOrder {
    SaleOrder::from_payload(payload(code, status, gstin)).expect("Invalid test order")
}

pub async fn count_rows(db: &SqliteDatabase, table: &str, correlation_id: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table} WHERE correlation_id = $1"))
        .bind(correlation_id)
        .fetch_one(db.pool())
        .await
        .expect("Error counting rows")
}
