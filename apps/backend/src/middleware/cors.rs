//! Origin policy.
//!
//! Allow-list mode admits origins that start with a configured prefix and
//! echoes the origin back; anything else gets a 403 before any handler runs.
//! Allow-all mode answers every origin with `*`. `OPTIONS` requests are
//! answered here with headers only.

use std::future::ready;

use actix_web::dev::ServiceRequest;
use actix_web::http::header::{self, HeaderMap, HeaderValue};
use actix_web::http::Method;
use actix_web::HttpResponse;
use tracing::warn;

use super::chain::{Middleware, MiddlewareFuture, Next};
use crate::config::CorsMode;
use crate::error::ErrorBody;

pub const ALLOW_METHODS: &str = "GET, POST, PUT, PATCH, DELETE, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type, Authorization";
pub const FORBIDDEN_MESSAGE: &str = "Cross Origin Forbidden";

#[derive(Debug, Clone)]
pub struct CorsPolicy {
    mode: CorsMode,
}

impl CorsPolicy {
    pub fn new(mode: CorsMode) -> Self {
        Self { mode }
    }

    pub fn allow_list<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(CorsMode::AllowList(
            prefixes.into_iter().map(Into::into).collect(),
        ))
    }

    pub fn allow_all() -> Self {
        Self::new(CorsMode::AllowAll)
    }

    /// Value for `Access-Control-Allow-Origin`, or `None` when the origin is refused.
    fn allow_origin(&self, origin: &str) -> Option<HeaderValue> {
        match &self.mode {
            CorsMode::AllowAll => Some(HeaderValue::from_static("*")),
            CorsMode::AllowList(prefixes) => {
                if origin.is_empty() || !prefixes.iter().any(|p| origin.starts_with(p.as_str())) {
                    return None;
                }
                HeaderValue::from_str(origin).ok()
            }
        }
    }

    fn apply(&self, headers: &mut HeaderMap, allow_origin: HeaderValue) {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, allow_origin);
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        );
        if matches!(self.mode, CorsMode::AllowList(_)) {
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
                HeaderValue::from_static("true"),
            );
            headers.append(header::VARY, HeaderValue::from_static("Origin"));
        }
    }
}

impl Middleware for CorsPolicy {
    fn handle(&self, req: ServiceRequest, next: Next) -> MiddlewareFuture {
        let origin = req
            .headers()
            .get(header::ORIGIN)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        let Some(allow_origin) = self.allow_origin(origin) else {
            warn!(origin = %origin, url.path = %req.path(), "cross origin request rejected");
            let res = HttpResponse::Forbidden().json(ErrorBody {
                error: FORBIDDEN_MESSAGE,
            });
            return Box::pin(ready(Ok(req.into_response(res))));
        };

        if req.method() == Method::OPTIONS {
            let mut res = req.into_response(HttpResponse::Ok().finish());
            self.apply(res.headers_mut(), allow_origin);
            return Box::pin(ready(Ok(res)));
        }

        let policy = self.clone();
        let fut = next.run(req);
        Box::pin(async move {
            // Handler and extractor errors arrive here as responses, so they get headers too
            let mut res = fut.await?;
            policy.apply(res.headers_mut(), allow_origin);
            Ok(res)
        })
    }
}
