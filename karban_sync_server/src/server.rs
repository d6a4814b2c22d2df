use std::{sync::Arc, time::Duration};

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use karban_common::Secret;
use karban_sync_engine::{IntegrationSettings, OrderMaterializer, SqliteDatabase, SyncDriver};
use log::*;
use unicommerce_tools::UnicommerceApi;

use crate::{
    config::ServerConfig,
    errors::ServerError,
    integrations::unicommerce::UnicommerceOrderSource,
    middleware::AclMiddlewareFactory,
    routes::{force_sync, health, push_order},
    sync_worker::{start_sync_worker, JobQueue, JOB_QUEUE_CAPACITY},
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.run_migrations().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let settings = IntegrationSettings::from_file(&config.settings_file)
        .map_err(|e| ServerError::ConfigurationError(e.to_string()))?;
    info!(
        "🪛️ Integration settings loaded from {}. {} channels configured.",
        config.settings_file.display(),
        settings.channels.len()
    );
    let settings = Arc::new(settings);
    let api = UnicommerceApi::new(config.unicommerce.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let source = UnicommerceOrderSource::new(api);
    let driver = SyncDriver::new(OrderMaterializer::new(db, settings.clone()), source, settings);
    let (queue, jobs) = JobQueue::new(JOB_QUEUE_CAPACITY);
    let _worker = start_sync_worker(driver, jobs, config.sync_poll_interval);
    let srv = create_server_instance(config, queue)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(config: ServerConfig, queue: JobQueue) -> Result<Server, ServerError> {
    let api_key = config.admin_api_key.clone();
    let srv = HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("kss::access_log"))
            .configure(configure_routes(queue.clone(), api_key.clone()))
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// Registers every route. The `/api` scope is guarded by the admin API key.
pub fn configure_routes(queue: JobQueue, api_key: Secret<String>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        let api_scope = web::scope("/api")
            .wrap(AclMiddlewareFactory::new(api_key))
            .service(force_sync)
            .service(push_order);
        cfg.app_data(web::Data::new(queue)).service(health).service(api_scope);
    }
}
