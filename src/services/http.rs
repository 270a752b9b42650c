use crate::config::ServerConfig;
use crate::observability::prom;

use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderName, HeaderValue},
    Error,
};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use std::{
    rc::Rc,
    task::{Context, Poll},
    time::Instant,
};

/// Request counter, inflight gauge and latency histogram around every route.
pub struct RequestMetrics {
    cfg: ServerConfig,
}

impl RequestMetrics {
    pub fn new() -> Self {
        Self {
            cfg: ServerConfig::default(),
        }
    }

    pub fn with_config(cfg: ServerConfig) -> Self {
        Self { cfg }
    }
}

impl Default for RequestMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequestMetrics
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RequestMetricsMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        prom::init_prometheus();
        ready(Ok(RequestMetricsMiddleware {
            service: Rc::new(service),
            cfg: self.cfg.clone(),
        }))
    }
}

pub struct RequestMetricsMiddleware<S> {
    pub(crate) service: Rc<S>,
    pub(crate) cfg: ServerConfig,
}

impl<S, B> Service<ServiceRequest> for RequestMetricsMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let svc = self.service.clone();
        let cfg = self.cfg.clone();

        // capture before the request moves into the inner service
        let method = req.method().as_str().to_string();
        let path = req.path().to_string();
        prom::inc_inflight();
        let req_start = Instant::now();

        Box::pin(async move {
            let out = svc.call(req).await;
            prom::dec_inflight();
            let mut res = out?;

            let elapsed = req_start.elapsed();
            let status = res.status().as_u16();
            prom::observe_request(&method, status, elapsed.as_secs_f64());

            if cfg.log_requests {
                tracing::debug!(
                    target: "rowhook::http",
                    method = %method,
                    path = %path,
                    status,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "request served"
                );
            }

            if cfg.add_response_headers {
                if let Ok(hv) = HeaderValue::from_str(&elapsed.as_millis().to_string()) {
                    res.headers_mut()
                        .insert(HeaderName::from_static("x-rowhook-elapsed-ms"), hv);
                }
            }

            Ok(res)
        })
    }
}
