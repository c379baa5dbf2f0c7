//! Webhook signature middleware.
//!
//! The payment gateway signs every webhook delivery with HMAC-SHA256 over `timestamp + body`, keyed with the
//! API secret, and sends the base64 digest in the `x-webhook-signature` header alongside an
//! `x-webhook-timestamp` header. Wrap the webhook route with this middleware to reject forgeries before the
//! handler ever sees them.

use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_http::h1;
use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorBadRequest,
    web,
    Error,
};
use futures::future::LocalBoxFuture;
use log::{trace, warn};
use ts_common::Secret;

use crate::helpers::verify_webhook_signature;

pub const SIGNATURE_HEADER: &str = "x-webhook-signature";
pub const TIMESTAMP_HEADER: &str = "x-webhook-timestamp";

pub struct WebhookAuthFactory {
    key: Secret<String>,
    // If false, then the middleware will not check the signature and always allow the call
    enabled: bool,
}

impl WebhookAuthFactory {
    pub fn new(key: Secret<String>, enabled: bool) -> Self {
        WebhookAuthFactory { key, enabled }
    }
}

impl<S, B> Transform<S, ServiceRequest> for WebhookAuthFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = WebhookAuthService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(WebhookAuthService { key: self.key.clone(), enabled: self.enabled, service: Rc::new(service) }))
    }
}

pub struct WebhookAuthService<S> {
    key: Secret<String>,
    enabled: bool,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for WebhookAuthService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;
    type Response = ServiceResponse<B>;

    forward_ready!(service);

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let secret = self.key.reveal().clone();
        let enabled = self.enabled;
        Box::pin(async move {
            trace!("🔐️ Checking webhook signature for request");
            if !enabled {
                trace!("🔐️ Webhook signature checks are disabled. Allowing request.");
                return service.call(req).await;
            }
            let data = req.extract::<web::Bytes>().await.map_err(|e| {
                warn!("🔐️ Failed to extract request data: {:?}", e);
                ErrorBadRequest("Failed to extract request data.")
            })?;
            let timestamp = req
                .headers()
                .get(TIMESTAMP_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
                .ok_or_else(|| {
                    warn!("🔐️ No webhook timestamp found in request. Denying access.");
                    ErrorBadRequest("Invalid signature.")
                })?;
            let signature =
                req.headers().get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok()).map(str::to_string).ok_or_else(
                    || {
                        warn!("🔐️ No webhook signature found in request. Denying access.");
                        ErrorBadRequest("Invalid signature.")
                    },
                )?;
            if verify_webhook_signature(&secret, &timestamp, data.as_ref(), &signature) {
                trace!("🔐️ Webhook signature check for request ✅️");
                req.set_payload(bytes_to_payload(data));
                service.call(req).await
            } else {
                warn!("🔐️ Invalid webhook signature found in request. Denying access.");
                Err(ErrorBadRequest("Invalid signature."))
            }
        })
    }
}

fn bytes_to_payload(buf: web::Bytes) -> Payload {
    let (_, mut pl) = h1::Payload::create(true);
    pl.unread_data(buf);
    Payload::from(pl)
}
