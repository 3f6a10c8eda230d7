use std::time::Instant;

use actix_web::dev::ServiceRequest;
use tracing::{error, info, warn};

use super::chain::{Middleware, MiddlewareFuture, Next};

/// One log event per request, levelled by response status.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessLogger;

impl Middleware for AccessLogger {
    fn handle(&self, req: ServiceRequest, next: Next) -> MiddlewareFuture {
        let start = Instant::now();
        let method = req.method().to_string();
        let path = req.path().to_string();

        let fut = next.run(req);

        Box::pin(async move {
            let result = fut.await;

            let status = match &result {
                Ok(res) => res.status(),
                Err(err) => err.as_response_error().status_code(),
            };

            let duration_us = start.elapsed().as_micros() as u64;
            let status_code = status.as_u16();

            if status.is_server_error() {
                error!(http.method=%method, url.path=%path, http.status_code=%status_code, duration_us=%duration_us, message="request_completed");
            } else if status.is_client_error() {
                warn!(http.method=%method, url.path=%path, http.status_code=%status_code, duration_us=%duration_us, message="request_completed");
            } else {
                info!(http.method=%method, url.path=%path, http.status_code=%status_code, duration_us=%duration_us, message="request_completed");
            }

            result
        })
    }
}
