use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("The record was rejected. {0}")]
    Rejected(String),
    #[error("Duplicate record. {0}")]
    Duplicate(String),
    #[error("Record not found. {0}")]
    NotFound(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => StoreError::NotFound(e.to_string()),
            sqlx::Error::Database(ref db) if db.is_unique_violation() => StoreError::Duplicate(db.message().to_string()),
            sqlx::Error::Database(ref db) if db.is_check_violation() || db.is_foreign_key_violation() => {
                StoreError::Rejected(db.message().to_string())
            },
            _ => StoreError::DatabaseError(e.to_string()),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::DatabaseError(format!("Could not (de)serialize a JSON column. {e}"))
    }
}
