use chrono::{DateTime, Utc};
use log::trace;
use sqlx::{FromRow, SqliteConnection};

use crate::{
    db_types::{AttemptContext, CanonicalAddress, Customer, GstCategory, IdentityMarkers, NewCustomer, TaxIdentity},
    traits::StoreError,
};

#[derive(FromRow)]
struct CustomerRow {
    id: i64,
    customer_name: String,
    customer_group: String,
    territory: String,
    customer_type: String,
    address_json: String,
    customer_code: Option<String>,
    gstin: String,
    gst_category: GstCategory,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Self {
            id: row.id,
            customer_name: row.customer_name,
            customer_group: row.customer_group,
            territory: row.territory,
            customer_type: row.customer_type,
            markers: IdentityMarkers { address_json: row.address_json, customer_code: row.customer_code },
            tax_identity: TaxIdentity { gstin: row.gstin, category: row.gst_category },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Returns the oldest customer whose identity markers match. `customer_code` is compared with `IS`, so a missing
/// customer code only matches customers without one.
pub async fn fetch_by_markers(
    markers: &IdentityMarkers,
    conn: &mut SqliteConnection,
) -> Result<Option<Customer>, StoreError> {
    let row: Option<CustomerRow> = sqlx::query_as(
        "SELECT * FROM customers WHERE address_json = $1 AND customer_code IS $2 ORDER BY id LIMIT 1",
    )
    .bind(&markers.address_json)
    .bind(&markers.customer_code)
    .fetch_optional(conn)
    .await?;
    Ok(row.map(Customer::from))
}

pub async fn fetch_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<Customer>, StoreError> {
    let row: Option<CustomerRow> =
        sqlx::query_as("SELECT * FROM customers WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(row.map(Customer::from))
}

pub async fn insert_customer(
    customer: NewCustomer,
    ctx: &AttemptContext,
    conn: &mut SqliteConnection,
) -> Result<Customer, StoreError> {
    let row: CustomerRow = sqlx::query_as(
        r#"
            INSERT INTO customers (
                customer_name,
                customer_group,
                territory,
                customer_type,
                address_json,
                customer_code,
                gstin,
                gst_category,
                correlation_id,
                created_by,
                modified_by
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *;
        "#,
    )
    .bind(customer.customer_name)
    .bind(customer.customer_group)
    .bind(customer.territory)
    .bind(customer.customer_type)
    .bind(customer.markers.address_json)
    .bind(customer.markers.customer_code)
    .bind(customer.tax_identity.gstin)
    .bind(customer.tax_identity.category)
    .bind(ctx.correlation_id.as_str())
    .bind(ctx.actor.as_str())
    .bind(ctx.actor.as_str())
    .fetch_one(conn)
    .await?;
    trace!("🗃️ Customer #{} inserted", row.id);
    Ok(row.into())
}

pub async fn update_tax_identity(
    customer_id: i64,
    identity: &TaxIdentity,
    ctx: &AttemptContext,
    conn: &mut SqliteConnection,
) -> Result<Customer, StoreError> {
    let row: Option<CustomerRow> = sqlx::query_as(
        r#"
            UPDATE customers SET gstin = $1, gst_category = $2, modified_by = $3, updated_at = CURRENT_TIMESTAMP
            WHERE id = $4
            RETURNING *;
        "#,
    )
    .bind(&identity.gstin)
    .bind(identity.category)
    .bind(ctx.actor.as_str())
    .bind(customer_id)
    .fetch_optional(conn)
    .await?;
    row.map(Customer::from).ok_or_else(|| StoreError::NotFound(format!("Customer #{customer_id}")))
}

pub async fn insert_address(
    address: CanonicalAddress,
    customer_id: i64,
    ctx: &AttemptContext,
    conn: &mut SqliteConnection,
) -> Result<i64, StoreError> {
    let id: i64 = sqlx::query_scalar(
        r#"
            INSERT INTO addresses (
                customer_id,
                address_type,
                address_line1,
                address_line2,
                city,
                county,
                state,
                country,
                pincode,
                email_id,
                phone,
                is_primary_address,
                is_shipping_address,
                gstin,
                gst_category,
                correlation_id,
                created_by
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING id;
        "#,
    )
    .bind(customer_id)
    .bind(address.role.address_type())
    .bind(address.address_line1)
    .bind(address.address_line2)
    .bind(address.city)
    .bind(address.county)
    .bind(address.state)
    .bind(address.country)
    .bind(address.pincode)
    .bind(address.email)
    .bind(address.phone)
    .bind(address.role.is_primary())
    .bind(address.role.is_shipping())
    .bind(address.tax_identity.gstin)
    .bind(address.tax_identity.category)
    .bind(ctx.correlation_id.as_str())
    .bind(ctx.actor.as_str())
    .fetch_one(conn)
    .await?;
    trace!("🗃️ Address #{id} inserted for customer #{customer_id}");
    Ok(id)
}

pub async fn count_addresses_for_customer(customer_id: i64, conn: &mut SqliteConnection) -> Result<i64, StoreError> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM addresses WHERE customer_id = $1")
        .bind(customer_id)
        .fetch_one(conn)
        .await?;
    Ok(count)
}

pub async fn delete_for_correlation_id(correlation_id: &str, conn: &mut SqliteConnection) -> Result<u64, StoreError> {
    let addresses =
        sqlx::query("DELETE FROM addresses WHERE correlation_id = $1").bind(correlation_id).execute(&mut *conn).await?;
    let customers =
        sqlx::query("DELETE FROM customers WHERE correlation_id = $1").bind(correlation_id).execute(&mut *conn).await?;
    Ok(addresses.rows_affected() + customers.rows_affected())
}
