use actix_web::{body::MessageBody, http::StatusCode, test, test::TestRequest, App};
use karban_common::Secret;
use log::debug;
use tokio::sync::mpsc;

use crate::{
    middleware::API_KEY_HEADER,
    server::configure_routes,
    sync_worker::{JobQueue, SyncJob},
};

pub const TEST_API_KEY: &str = "kss-test-key";

/// Sends the request to a fresh app and returns the response, along with the receiving end of the job queue so the
/// test can inspect what was queued.
pub async fn send_request(req: TestRequest) -> (StatusCode, String, mpsc::Receiver<SyncJob>) {
    let _ = env_logger::try_init();
    let (queue, jobs) = JobQueue::new(8);
    let app = App::new().configure(configure_routes(queue, Secret::new(TEST_API_KEY.to_string())));
    let service = test::init_service(app).await;
    debug!("Making request");
    let res = match test::try_call_service(&service, req.to_request()).await {
        Ok(res) => res,
        Err(e) => {
            let res = e.error_response();
            let status = res.status();
            let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap_or_default()).into_owned();
            return (status, body, jobs);
        },
    };
    let status = res.status();
    let body = String::from_utf8_lossy(&test::read_body(res).await).into_owned();
    (status, body, jobs)
}

pub fn authorized(req: TestRequest) -> TestRequest {
    req.insert_header((API_KEY_HEADER, TEST_API_KEY))
}
