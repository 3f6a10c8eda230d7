pub mod auth;
pub mod blogs;
pub mod tags;
pub mod users;
