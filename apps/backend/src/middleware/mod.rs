pub mod access_log;
pub mod authenticate;
pub mod chain;
pub mod cors;

pub use access_log::AccessLogger;
pub use authenticate::{AuthenticatedUser, Authenticator};
pub use chain::{compose, Middleware, MiddlewareFuture, Next, Stack};
pub use cors::CorsPolicy;
