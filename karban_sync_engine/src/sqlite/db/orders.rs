use chrono::{DateTime, NaiveDate, Utc};
use log::{debug, trace};
use serde_json::Value;
use sqlx::{types::Json, FromRow, SqliteConnection};

use crate::{
    db_types::{AttemptContext, CanonicalOrder, CorrelationId, DocStatus, NewOrder, OrderCode, OrderLineItem, TaxLine},
    traits::StoreError,
};

/// The prefix for order names when the order has no naming series.
pub const DEFAULT_NAMING_SERIES: &str = "SAL-ORD-";

#[derive(FromRow)]
struct OrderRow {
    id: i64,
    name: Option<String>,
    order_code: OrderCode,
    order_status: String,
    customer_id: i64,
    channel: String,
    naming_series: Option<String>,
    facility_code: Option<String>,
    is_cod: bool,
    transaction_date: NaiveDate,
    delivery_date: Option<NaiveDate>,
    items: Json<Vec<OrderLineItem>>,
    taxes: Json<Vec<TaxLine>>,
    company: Option<String>,
    company_address: Option<String>,
    dispatch_address: Option<String>,
    currency: Option<String>,
    raw_data: Json<Value>,
    doc_status: DocStatus,
    correlation_id: Option<CorrelationId>,
    submitted_at: Option<DateTime<Utc>>,
    cancelled_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<OrderRow> for CanonicalOrder {
    fn from(row: OrderRow) -> Self {
        Self {
            id: row.id,
            name: row.name.unwrap_or_default(),
            order_code: row.order_code,
            order_status: row.order_status,
            customer_id: row.customer_id,
            channel: row.channel,
            naming_series: row.naming_series,
            facility_code: row.facility_code,
            is_cod: row.is_cod,
            transaction_date: row.transaction_date,
            delivery_date: row.delivery_date,
            items: row.items.0,
            company: row.company,
            taxes: row.taxes.0,
            company_address: row.company_address,
            dispatch_address: row.dispatch_address,
            currency: row.currency,
            raw_data: row.raw_data.0,
            doc_status: row.doc_status,
            correlation_id: row.correlation_id,
            submitted_at: row.submitted_at,
            cancelled_at: row.cancelled_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// The record name for an order: its naming series followed by the zero-padded row id.
pub fn record_name(naming_series: Option<&str>, id: i64) -> String {
    format!("{}{id:05}", naming_series.unwrap_or(DEFAULT_NAMING_SERIES))
}

/// Checks the order the way submission does. Every tax line needs a ledger account.
pub fn validate_for_submission(order: &NewOrder) -> Result<(), StoreError> {
    if order.items.is_empty() {
        return Err(StoreError::Rejected(format!("Order {} has no items", order.order_code)));
    }
    for (i, tax) in order.taxes.iter().enumerate() {
        if tax.account_head.is_none() {
            return Err(StoreError::Rejected(format!(
                "Taxes row #{}: Account Head is required for {} on order {}",
                i + 1,
                tax.tax_head,
                order.order_code
            )));
        }
    }
    Ok(())
}

pub async fn fetch_order_by_code(
    code: &OrderCode,
    conn: &mut SqliteConnection,
) -> Result<Option<CanonicalOrder>, StoreError> {
    let row: Option<OrderRow> =
        sqlx::query_as("SELECT * FROM orders WHERE order_code = $1").bind(code.as_str()).fetch_optional(conn).await?;
    Ok(row.map(CanonicalOrder::from))
}

pub async fn fetch_orders_for_customer(
    customer_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<CanonicalOrder>, StoreError> {
    let rows: Vec<OrderRow> = sqlx::query_as("SELECT * FROM orders WHERE customer_id = $1 ORDER BY id")
        .bind(customer_id)
        .fetch_all(conn)
        .await?;
    Ok(rows.into_iter().map(CanonicalOrder::from).collect())
}

/// Inserts a new order in the `Materialized` state. This is not atomic. Embed the call in a transaction and pass
/// `&mut *tx` as the connection if it must be.
///
/// The order code is unique, so inserting an existing order fails with [`StoreError::Duplicate`].
pub async fn insert_order(
    order: NewOrder,
    ctx: &AttemptContext,
    conn: &mut SqliteConnection,
) -> Result<CanonicalOrder, StoreError> {
    let code = order.order_code.clone();
    let row: OrderRow = sqlx::query_as(
        r#"
            INSERT INTO orders (
                order_code,
                order_status,
                customer_id,
                channel,
                naming_series,
                facility_code,
                is_cod,
                transaction_date,
                delivery_date,
                items,
                taxes,
                company,
                company_address,
                dispatch_address,
                currency,
                raw_data,
                correlation_id,
                created_by,
                modified_by
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            RETURNING *;
        "#,
    )
    .bind(order.order_code)
    .bind(order.order_status)
    .bind(order.customer_id)
    .bind(order.channel)
    .bind(order.naming_series)
    .bind(order.facility_code)
    .bind(order.is_cod)
    .bind(order.transaction_date)
    .bind(order.delivery_date)
    .bind(Json(order.items))
    .bind(Json(order.taxes))
    .bind(order.company)
    .bind(order.company_address)
    .bind(order.dispatch_address)
    .bind(order.currency)
    .bind(Json(order.raw_data))
    .bind(ctx.correlation_id.as_str())
    .bind(ctx.actor.as_str())
    .bind(ctx.actor.as_str())
    .fetch_one(conn)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(err) if err.is_unique_violation() => {
            StoreError::Duplicate(format!("Order {code} already exists"))
        },
        _ => StoreError::from(e),
    })?;
    debug!("📝️ Order {code} inserted with id {}", row.id);
    Ok(row.into())
}

/// Names the order and moves it from `Materialized` to `Submitted`.
pub async fn submit_order(
    order_id: i64,
    name: &str,
    ctx: &AttemptContext,
    conn: &mut SqliteConnection,
) -> Result<CanonicalOrder, StoreError> {
    let row: Option<OrderRow> = sqlx::query_as(
        r#"
            UPDATE orders SET
                name = $1,
                doc_status = 'Submitted',
                submitted_at = CURRENT_TIMESTAMP,
                modified_by = $2,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $3 AND doc_status = 'Materialized'
            RETURNING *;
        "#,
    )
    .bind(name)
    .bind(ctx.actor.as_str())
    .bind(order_id)
    .fetch_optional(conn)
    .await?;
    trace!("📝️ Order #{order_id} submitted as {name}");
    row.map(CanonicalOrder::from)
        .ok_or_else(|| StoreError::Rejected(format!("Order #{order_id} is not awaiting submission")))
}

/// Moves a submitted order to `Cancelled`. Orders in any other state are rejected.
pub async fn cancel_order(
    order_id: i64,
    ctx: &AttemptContext,
    conn: &mut SqliteConnection,
) -> Result<CanonicalOrder, StoreError> {
    let row: Option<OrderRow> = sqlx::query_as(
        r#"
            UPDATE orders SET
                doc_status = 'Cancelled',
                cancelled_at = CURRENT_TIMESTAMP,
                modified_by = $1,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $2 AND doc_status = 'Submitted'
            RETURNING *;
        "#,
    )
    .bind(ctx.actor.as_str())
    .bind(order_id)
    .fetch_optional(conn)
    .await?;
    row.map(CanonicalOrder::from).ok_or_else(|| StoreError::Rejected(format!("Order #{order_id} is not submitted")))
}

pub async fn delete_for_correlation_id(correlation_id: &str, conn: &mut SqliteConnection) -> Result<u64, StoreError> {
    let result = sqlx::query("DELETE FROM orders WHERE correlation_id = $1").bind(correlation_id).execute(conn).await?;
    Ok(result.rows_affected())
}
