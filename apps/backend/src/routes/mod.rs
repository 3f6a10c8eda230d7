use std::sync::Arc;

use actix_web::web;
use serde::Serialize;

use crate::config::CorsMode;
use crate::error::AppError;
use crate::middleware::{compose, AccessLogger, Authenticator, CorsPolicy, Stack};

pub mod auth;
pub mod blogs;
pub mod friends;
pub mod health;
pub mod tags;
pub mod users;

/// `{"message": ..}` body shared by endpoints with nothing else to return.
#[derive(Debug, Serialize)]
pub struct Message {
    pub message: &'static str,
}

impl Message {
    pub fn new(message: &'static str) -> Self {
        Self { message }
    }
}

/// Chain applied to every request: access log outermost, then origin policy.
pub fn global_middleware(cors: CorsMode) -> Stack {
    compose(vec![
        Arc::new(AccessLogger),
        Arc::new(CorsPolicy::new(cors)),
    ])
}

/// Register every route. `/api` is wrapped in the authenticator; `/auth`
/// and `/health` are public.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::bad_request(err.to_string()).into()),
    );

    cfg.configure(health::configure_routes);

    cfg.service(web::scope("/auth").configure(auth::configure_routes));

    cfg.service(
        web::scope("/api")
            .wrap(compose(vec![Arc::new(Authenticator)]))
            .configure(users::configure_routes)
            .configure(friends::configure_routes)
            .configure(blogs::configure_routes)
            .configure(tags::configure_routes),
    );
}
