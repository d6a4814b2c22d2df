use log::trace;
use sqlx::SqliteConnection;
use unicommerce_tools::SaleOrder;

use crate::{db_types::AttemptContext, traits::StoreError};

/// Adds every item on the order to the catalog. Items that already exist are left as they are. Returns the number of
/// new items.
pub async fn insert_missing_items(
    order: &SaleOrder,
    ctx: &AttemptContext,
    conn: &mut SqliteConnection,
) -> Result<u64, StoreError> {
    let mut inserted = 0;
    for item in &order.sale_order_items {
        let result = sqlx::query(
            r#"
                INSERT INTO items (item_code, item_name, correlation_id, created_by) VALUES ($1, $2, $3, $4)
                ON CONFLICT (item_code) DO NOTHING;
            "#,
        )
        .bind(&item.item_sku)
        .bind(&item.item_name)
        .bind(ctx.correlation_id.as_str())
        .bind(ctx.actor.as_str())
        .execute(&mut *conn)
        .await?;
        inserted += result.rows_affected();
    }
    trace!("🗃️ {inserted} new catalog items added for order {}", order.code);
    Ok(inserted)
}

pub async fn item_exists(item_code: &str, conn: &mut SqliteConnection) -> Result<bool, StoreError> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM items WHERE item_code = $1").bind(item_code).fetch_one(conn).await?;
    Ok(count > 0)
}

pub async fn delete_for_correlation_id(correlation_id: &str, conn: &mut SqliteConnection) -> Result<u64, StoreError> {
    let result = sqlx::query("DELETE FROM items WHERE correlation_id = $1").bind(correlation_id).execute(conn).await?;
    Ok(result.rows_affected())
}
