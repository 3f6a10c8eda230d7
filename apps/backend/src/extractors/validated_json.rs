use std::ops::{Deref, DerefMut};

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest};
use bytes::BytesMut;
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use serde_json::Error as JsonError;
use tracing::{debug, warn};

use crate::error::AppError;

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// JSON body extractor with strict decoding rules.
///
/// A present `Content-Type` must be `application/json`; the body must hold
/// exactly one JSON value no larger than [`MAX_BODY_BYTES`]. Unknown fields
/// are rejected by the target type's `deny_unknown_fields`. Every failure is
/// a 400 (415 for the media type) with a message safe to show the client.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T> ValidatedJson<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> DerefMut for ValidatedJson<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

fn check_content_type(req: &HttpRequest) -> Result<(), AppError> {
    let Some(value) = req.headers().get(header::CONTENT_TYPE) else {
        return Ok(());
    };
    let value = value.to_str().unwrap_or_default();
    let essence = value.split(';').next().unwrap_or_default().trim();
    if essence.eq_ignore_ascii_case("application/json") {
        Ok(())
    } else {
        Err(AppError::unsupported_media_type(
            "Content-Type header is not application/json",
        ))
    }
}

impl<T> FromRequest for ValidatedJson<T>
where
    T: DeserializeOwned + 'static,
{
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let content_type = check_content_type(req);
        let mut payload = payload.take();

        Box::pin(async move {
            content_type?;

            let mut body = BytesMut::new();
            while let Some(chunk) = payload.next().await {
                let chunk = chunk.map_err(|e| {
                    warn!(error = %e, "Failed to read request body chunk");
                    AppError::bad_request("Failed to read request body")
                })?;
                if body.len() + chunk.len() > MAX_BODY_BYTES {
                    return Err(AppError::bad_request(format!(
                        "Request body must not be larger than {MAX_BODY_BYTES} bytes"
                    )));
                }
                body.extend_from_slice(&chunk);
            }

            parse_single(&body).map(ValidatedJson)
        })
    }
}

/// Decode exactly one JSON value from `body`.
pub fn parse_single<T: DeserializeOwned>(body: &[u8]) -> Result<T, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(AppError::bad_request("Request body must not be empty"));
    }

    let mut de = serde_json::Deserializer::from_slice(body);
    let value = T::deserialize(&mut de).map_err(|e| {
        debug!(error = %e, body_size = body.len(), "JSON parsing failed");
        AppError::bad_request(classify_json_error(&e))
    })?;
    de.end()
        .map_err(|_| AppError::bad_request("Request body must only contain a single JSON object"))?;

    Ok(value)
}

/// Client-facing message for a decode failure.
fn classify_json_error(error: &JsonError) -> String {
    match error.classify() {
        serde_json::error::Category::Syntax => {
            format!(
                "Request body contains badly-formed JSON (at line {} column {})",
                error.line(),
                error.column()
            )
        }
        serde_json::error::Category::Eof => "Request body contains badly-formed JSON".to_string(),
        serde_json::error::Category::Data => {
            let msg = error.to_string();
            match unknown_field(&msg) {
                Some(field) => format!("Request body contains unknown field \"{field}\""),
                None => "Request body contains an invalid value for one or more fields".to_string(),
            }
        }
        serde_json::error::Category::Io => "Failed to read request body".to_string(),
    }
}

fn unknown_field(msg: &str) -> Option<&str> {
    let rest = msg.strip_prefix("unknown field `")?;
    rest.split('`').next()
}
