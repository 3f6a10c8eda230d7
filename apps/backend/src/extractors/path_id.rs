use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::error::AppError;

pub const INVALID_ID: &str = "Invalid Id received";

/// Integer `{id}` segment of the matched route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathId(pub i64);

impl FromRequest for PathId {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let id = req
            .match_info()
            .get("id")
            .and_then(|raw| raw.parse::<i64>().ok())
            .map(PathId)
            .ok_or_else(|| AppError::bad_request(INVALID_ID));
        ready(id)
    }
}
