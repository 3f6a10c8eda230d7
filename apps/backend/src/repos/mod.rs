//! Repository functions (generic over `ConnectionTrait`) returning `DomainError`.

pub mod blogs;
pub mod tags;
pub mod users;
