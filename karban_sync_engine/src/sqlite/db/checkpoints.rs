use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;

use crate::traits::StoreError;

pub async fn fetch_checkpoint(key: &str, conn: &mut SqliteConnection) -> Result<Option<DateTime<Utc>>, StoreError> {
    let at = sqlx::query_scalar("SELECT last_synced_at FROM sync_checkpoints WHERE key = $1")
        .bind(key)
        .fetch_optional(conn)
        .await?;
    Ok(at)
}

pub async fn upsert_checkpoint(key: &str, at: DateTime<Utc>, conn: &mut SqliteConnection) -> Result<(), StoreError> {
    sqlx::query(
        r#"
            INSERT INTO sync_checkpoints (key, last_synced_at) VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE SET last_synced_at = excluded.last_synced_at;
        "#,
    )
    .bind(key)
    .bind(at)
    .execute(conn)
    .await?;
    Ok(())
}
