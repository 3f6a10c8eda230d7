//! SeaORM adapters. Functions here return `sea_orm::DbErr`; the repos layer
//! converts to `DomainError`.

pub mod blogs_sea;
pub mod tags_sea;
pub mod users_sea;
