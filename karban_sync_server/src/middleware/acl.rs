//! Access control middleware for the Karban sync server.
//! This middleware can be placed on any route or scope.
//!
//! It checks the incoming request for an `X-Api-Key` header that matches the configured admin key. Requests without
//! the header get a 401 Unauthorized response and requests with the wrong key get a 403 Forbidden response.

use std::{future::Future, pin::Pin, rc::Rc};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::{ErrorForbidden, ErrorUnauthorized},
    Error,
};
use futures::future::{ok, Ready};
use karban_common::Secret;
use log::*;

pub const API_KEY_HEADER: &str = "X-Api-Key";

pub struct AclMiddlewareFactory {
    api_key: Secret<String>,
}

impl AclMiddlewareFactory {
    pub fn new(api_key: Secret<String>) -> Self {
        AclMiddlewareFactory { api_key }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AclMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AclMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AclMiddlewareService { api_key: self.api_key.clone(), service: Rc::new(service) })
    }
}

pub struct AclMiddlewareService<S> {
    api_key: Secret<String>,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AclMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let api_key = self.api_key.clone();
        Box::pin(async move {
            let Some(candidate) = req.headers().get(API_KEY_HEADER) else {
                debug!("🔐️ Request to {} has no API key", req.path());
                return Err(ErrorUnauthorized("An API key is required"));
            };
            if api_key.reveal().is_empty() {
                warn!("🔐️ No admin API key is configured. Refusing request to {}", req.path());
                return Err(ErrorForbidden("Insufficient permissions"));
            }
            if api_key.matches(candidate.as_bytes()) {
                service.call(req).await
            } else {
                warn!("🔐️ Request to {} presented an invalid API key", req.path());
                Err(ErrorForbidden("Insufficient permissions"))
            }
        })
    }
}
