use chrono::{DateTime, Utc};
use log::trace;
use serde_json::Value;
use sqlx::{types::Json, FromRow, SqliteConnection};

use crate::{
    db_types::{AuditEntry, AuditOutcome, AuditStatus, CorrelationId},
    traits::StoreError,
};

#[derive(FromRow)]
struct AuditRow {
    id: CorrelationId,
    method: String,
    request_data: Json<Value>,
    request_id: Option<String>,
    status: AuditStatus,
    message: Option<String>,
    rollback_requested: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AuditRow> for AuditEntry {
    fn from(row: AuditRow) -> Self {
        Self {
            id: row.id,
            method: row.method,
            request_data: row.request_data.0,
            request_id: row.request_id,
            status: row.status,
            message: row.message,
            rollback_requested: row.rollback_requested,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// A new random correlation id.
pub fn new_correlation_id() -> CorrelationId {
    CorrelationId::from(format!("ucl-{:016x}", rand::random::<u64>()))
}

pub async fn insert_entry(
    id: &CorrelationId,
    method: &str,
    payload: &Value,
    request_id: Option<&str>,
    conn: &mut SqliteConnection,
) -> Result<(), StoreError> {
    sqlx::query("INSERT INTO audit_log (id, method, request_data, request_id) VALUES ($1, $2, $3, $4)")
        .bind(id.as_str())
        .bind(method)
        .bind(Json(payload))
        .bind(request_id)
        .execute(conn)
        .await?;
    trace!("🗃️ Audit entry {id} opened for {method}");
    Ok(())
}

/// Records the outcome on the entry, creating the entry if it does not exist yet.
pub async fn upsert_outcome(
    id: &CorrelationId,
    outcome: &AuditOutcome,
    conn: &mut SqliteConnection,
) -> Result<(), StoreError> {
    sqlx::query(
        r#"
            INSERT INTO audit_log (id, method, status, message, rollback_requested) VALUES ($1, '', $2, $3, $4)
            ON CONFLICT (id) DO UPDATE SET
                status = excluded.status,
                message = excluded.message,
                rollback_requested = excluded.rollback_requested,
                updated_at = CURRENT_TIMESTAMP;
        "#,
    )
    .bind(id.as_str())
    .bind(outcome.status)
    .bind(outcome.error.as_deref())
    .bind(outcome.rollback)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn fetch_entry(id: &CorrelationId, conn: &mut SqliteConnection) -> Result<Option<AuditEntry>, StoreError> {
    let row: Option<AuditRow> =
        sqlx::query_as("SELECT * FROM audit_log WHERE id = $1").bind(id.as_str()).fetch_optional(conn).await?;
    Ok(row.map(AuditEntry::from))
}

/// All the attempts made for a caller-supplied request id, oldest first.
pub async fn fetch_entries_for_request(
    request_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Vec<AuditEntry>, StoreError> {
    let rows: Vec<AuditRow> = sqlx::query_as("SELECT * FROM audit_log WHERE request_id = $1 ORDER BY created_at, rowid")
        .bind(request_id)
        .fetch_all(conn)
        .await?;
    Ok(rows.into_iter().map(AuditEntry::from).collect())
}
