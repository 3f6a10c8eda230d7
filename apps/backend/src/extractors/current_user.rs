use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::entities::users;
use crate::error::AppError;
use crate::middleware::authenticate::AuthenticatedUser;

/// The user resolved by the `Authenticator` for this request.
///
/// Only available under the `/api` scope; anywhere else extraction fails with 401.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub users::Model);

impl CurrentUser {
    pub fn id(&self) -> i64 {
        self.0.id
    }
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user = req
            .extensions()
            .get::<AuthenticatedUser>()
            .map(|AuthenticatedUser(user)| CurrentUser(user.clone()))
            .ok_or_else(|| AppError::unauthorized("Authentication required"));
        ready(user)
    }
}
