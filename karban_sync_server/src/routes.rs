//! Request handler definitions
//!
//! Handlers never do sync work themselves. They validate the request, put a job on the [`JobQueue`] and return
//! `202 Accepted`, so a slow Unicommerce tenant never holds up an HTTP worker.
use std::str::FromStr;

use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};
use karban_common::helpers::non_blank;
use karban_sync_engine::SyncTarget;
use log::*;
use serde_json::Value;
use unicommerce_tools::SaleOrder;

use crate::{
    data_objects::JsonResponse,
    errors::ServerError,
    sync_worker::{JobQueue, SyncJob},
};

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------  Force sync  --------------------------------------------------
#[post("/force_sync/{target}")]
pub async fn force_sync(path: web::Path<String>, queue: web::Data<JobQueue>) -> Result<HttpResponse, ServerError> {
    let target = path.into_inner();
    debug!("💻️ Received force sync request for {target}");
    let target = SyncTarget::from_str(&target).map_err(|e| ServerError::UnknownSyncTarget(e.to_string()))?;
    queue.enqueue(SyncJob::Forced(target)).await?;
    Ok(HttpResponse::Accepted().json(JsonResponse::success(format!("{target} sync has been queued"))))
}

//----------------------------------------------  Push order  --------------------------------------------------
/// Accepts a raw Unicommerce sale order.
///
/// The payload is parsed before it is queued, so malformed orders are rejected with a 400 and never reach the audit
/// log. If the caller sends an `X-Request-Id` header, it is recorded on the audit entry of the materialization
/// attempt.
#[post("/orders")]
pub async fn push_order(
    req: HttpRequest,
    body: web::Json<Value>,
    queue: web::Data<JobQueue>,
) -> Result<HttpResponse, ServerError> {
    let order = SaleOrder::from_payload(body.into_inner()).map_err(|e| {
        debug!("💻️ Rejecting pushed order. {e}");
        ServerError::InvalidRequestBody(e.to_string())
    })?;
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| non_blank(Some(v)))
        .map(String::from);
    info!("💻️ Received order {} from channel {}", order.code, order.channel);
    let message = format!("Order {} has been queued", order.code);
    queue.enqueue(SyncJob::Materialize { order: Box::new(order), request_id }).await?;
    Ok(HttpResponse::Accepted().json(JsonResponse::success(message)))
}
