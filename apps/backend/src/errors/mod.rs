//! Error handling for the blog backend.

pub mod domain;

pub use domain::DomainError;
