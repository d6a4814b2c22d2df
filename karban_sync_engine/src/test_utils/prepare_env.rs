use log::*;
use sqlx::{migrate::MigrateDatabase, Sqlite};

use crate::SqliteDatabase;

/// Loads `.env.test`, starts logging, and returns a freshly created and migrated database at `url`.
///
/// Any database already at `url` is dropped first.
pub async fn prepare_test_env(url: &str) -> SqliteDatabase {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    reset_database(url).await;
    let db = SqliteDatabase::new_with_url(url, 5).await.expect("Error connecting to the test database");
    db.run_migrations().await.expect("Error running DB migrations");
    debug!("🗃️ Test database {url} is ready");
    db
}

/// A fresh database in the system temp directory, so that tests never share state.
pub fn random_db_path() -> String {
    let path = std::env::temp_dir().join(format!("karban_test_{}.db", rand::random::<u64>()));
    format!("sqlite://{}", path.display())
}

async fn reset_database(url: &str) {
    if Sqlite::database_exists(url).await.unwrap_or(false) {
        Sqlite::drop_database(url).await.expect("Error dropping the old test database");
        trace!("🗃️ Dropped old test database {url}");
    }
    Sqlite::create_database(url).await.expect("Error creating the test database");
}
