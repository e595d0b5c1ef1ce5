use std::rc::Rc;

use futures::{
    future::{ok, ready, LocalBoxFuture, Ready},
    FutureExt,
};

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
};

use crate::api::errors::{AuthError, TodoApiError};

pub const API_KEY_HEADER: &str = "x-api-key";

/// Rejects every request whose `x-api-key` header differs from the configured key
pub struct ApiKeyAuth {
    api_key: Rc<str>,
}

impl ApiKeyAuth {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: Rc::from(api_key),
        }
    }
}

pub struct ApiKeyMiddleware<S> {
    service: S,
    api_key: Rc<str>,
}

/// Implement `Transform` for Convert `ApiKeyAuth` struct to `ApiKeyMiddleware`
impl<S, B> Transform<S, ServiceRequest> for ApiKeyAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;

    type Error = actix_web::Error;

    type InitError = ();

    type Transform = ApiKeyMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(ApiKeyMiddleware {
            service,
            api_key: self.api_key.clone(),
        })
    }
}

impl<S> ApiKeyMiddleware<S> {
    fn check(&self, req: &ServiceRequest) -> Result<(), AuthError> {
        let provided = req
            .headers()
            .get(API_KEY_HEADER)
            .ok_or(AuthError::NoApiKey)?;

        if provided.as_bytes() == self.api_key.as_bytes() {
            Ok(())
        } else {
            Err(AuthError::InvalidApiKey)
        }
    }
}

impl<S, B> Service<ServiceRequest> for ApiKeyMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;

    type Error = actix_web::Error;

    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    actix_web::dev::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match self.check(&req) {
            Ok(()) => Box::pin(
                self.service
                    .call(req)
                    .map(|res| res.map(|res| res.map_into_left_body())),
            ),
            Err(err) => {
                log::warn!("Rejected {} {}: {}", req.method(), req.path(), err);

                let error = TodoApiError::AuthError(err);

                Box::pin(ready(Ok(
                    req.into_response(error.to_response().map_into_right_body())
                )))
            }
        }
    }
}
