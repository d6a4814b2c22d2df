use chrono::{DateTime, Utc};
use log::debug;
use serde_json::Value;
use sqlx::{types::Json, FromRow, SqliteConnection};

use crate::{
    db_types::{CanonicalOrder, DocStatus, Invoice, OrderCode},
    traits::StoreError,
};

#[derive(FromRow)]
struct InvoiceRow {
    id: i64,
    order_id: i64,
    order_code: OrderCode,
    customer_id: i64,
    net_total: f64,
    total_taxes: f64,
    grand_total: f64,
    created_at: DateTime<Utc>,
}

impl From<InvoiceRow> for Invoice {
    fn from(row: InvoiceRow) -> Self {
        Self {
            id: row.id,
            order_id: row.order_id,
            order_code: row.order_code,
            customer_id: row.customer_id,
            net_total: row.net_total,
            total_taxes: row.total_taxes,
            grand_total: row.grand_total,
            created_at: row.created_at,
        }
    }
}

pub async fn fetch_invoice_for_order(order_id: i64, conn: &mut SqliteConnection) -> Result<Option<Invoice>, StoreError> {
    let row: Option<InvoiceRow> = sqlx::query_as("SELECT * FROM invoices WHERE order_id = $1")
        .bind(order_id)
        .fetch_optional(conn)
        .await?;
    Ok(row.map(Invoice::from))
}

/// Inserts the invoice for a submitted order. The totals are computed from the order's items and tax lines.
pub async fn insert_invoice(
    order: &CanonicalOrder,
    raw: Value,
    conn: &mut SqliteConnection,
) -> Result<Invoice, StoreError> {
    if order.doc_status != DocStatus::Submitted {
        return Err(StoreError::Rejected(format!(
            "Order {} is {} and cannot be invoiced",
            order.order_code, order.doc_status
        )));
    }
    let row: InvoiceRow = sqlx::query_as(
        r#"
            INSERT INTO invoices (order_id, order_code, customer_id, net_total, total_taxes, grand_total, raw_data)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, order_id, order_code, customer_id, net_total, total_taxes, grand_total, created_at;
        "#,
    )
    .bind(order.id)
    .bind(order.order_code.as_str())
    .bind(order.customer_id)
    .bind(order.net_total())
    .bind(order.total_taxes())
    .bind(order.grand_total())
    .bind(Json(raw))
    .fetch_one(conn)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(err) if err.is_unique_violation() => {
            StoreError::Duplicate(format!("Order {} already has an invoice", order.order_code))
        },
        _ => StoreError::from(e),
    })?;
    debug!("🧾️ Invoice #{} inserted for order {}", row.id, order.order_code);
    Ok(row.into())
}
