//! User repository functions for the domain layer (generic over ConnectionTrait).

use std::collections::HashMap;

use sea_orm::ConnectionTrait;
use serde::Serialize;

use crate::adapters::users_sea as users_adapter;
use crate::entities::{blogs, users};
use crate::errors::domain::{DomainError, NotFoundKind};

pub use users_adapter::{UserCreate, UserUpdate};

/// A user together with the blogs they own and their friends.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserDetail {
    #[serde(flatten)]
    pub user: users::Model,
    pub blogs: Vec<blogs::Model>,
    pub friends: Vec<users::Model>,
}

pub fn user_not_found(user_id: i64) -> DomainError {
    DomainError::not_found(NotFoundKind::User, format!("User {user_id} not found"))
}

pub async fn find_user_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Option<users::Model>, DomainError> {
    Ok(users_adapter::find_user_by_id(conn, user_id).await?)
}

pub async fn require_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<users::Model, DomainError> {
    find_user_by_id(conn, user_id)
        .await?
        .ok_or_else(|| user_not_found(user_id))
}

pub async fn find_user_by_name<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    name: &str,
) -> Result<Option<users::Model>, DomainError> {
    Ok(users_adapter::find_user_by_name(conn, name).await?)
}

pub async fn list_users_detailed<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<UserDetail>, DomainError> {
    let users = users_adapter::list_users(conn).await?;
    let ids: Vec<i64> = users.iter().map(|u| u.id).collect();
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut blogs_by_owner: HashMap<i64, Vec<blogs::Model>> = HashMap::new();
    for blog in users_adapter::blogs_for_users(conn, &ids).await? {
        if let Some(owner) = blog.user_id {
            blogs_by_owner.entry(owner).or_default().push(blog);
        }
    }

    let mut friends_by_user: HashMap<i64, Vec<users::Model>> = HashMap::new();
    for (user_id, friend) in users_adapter::friends_for_users(conn, &ids).await? {
        friends_by_user.entry(user_id).or_default().push(friend);
    }

    Ok(users
        .into_iter()
        .map(|user| UserDetail {
            blogs: blogs_by_owner.remove(&user.id).unwrap_or_default(),
            friends: friends_by_user.remove(&user.id).unwrap_or_default(),
            user,
        })
        .collect())
}

pub async fn find_user_detailed<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<UserDetail, DomainError> {
    let user = require_user(conn, user_id).await?;
    let blogs = users_adapter::blogs_for_users(conn, &[user.id]).await?;
    let friends = users_adapter::friends_of(conn, &user).await?;
    Ok(UserDetail {
        user,
        blogs,
        friends,
    })
}

pub async fn create_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: UserCreate,
) -> Result<users::Model, DomainError> {
    Ok(users_adapter::create_user(conn, dto).await?)
}

pub async fn update_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    dto: UserUpdate,
) -> Result<users::Model, DomainError> {
    users_adapter::update_user(conn, user_id, dto)
        .await?
        .ok_or_else(|| user_not_found(user_id))
}

pub async fn delete_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<(), DomainError> {
    match users_adapter::delete_user(conn, user_id).await? {
        0 => Err(user_not_found(user_id)),
        _ => Ok(()),
    }
}

/// Make two users friends of each other. Both must exist and differ.
pub async fn add_friend<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    friend_id: i64,
) -> Result<bool, DomainError> {
    if user_id == friend_id {
        return Err(DomainError::validation("cannot befriend yourself"));
    }
    require_user(conn, friend_id).await?;
    Ok(users_adapter::add_friend(conn, user_id, friend_id).await?)
}

pub async fn remove_friend<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    friend_id: i64,
) -> Result<(), DomainError> {
    require_user(conn, friend_id).await?;
    users_adapter::remove_friend(conn, user_id, friend_id).await?;
    Ok(())
}
