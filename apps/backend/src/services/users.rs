use sea_orm::ConnectionTrait;

use crate::entities::users;
use crate::error::AppError;
use crate::repos::users::{self as users_repo, UserUpdate};
use crate::validation::Violations;

pub async fn update_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    dto: UserUpdate,
) -> Result<users::Model, AppError> {
    let mut v = Violations::new();
    if let Some(name) = &dto.name {
        v.user_name(name);
    }
    if let Some(age) = dto.age {
        v.age(age);
    }
    v.into_result()?;

    Ok(users_repo::update_user(conn, user_id, dto).await?)
}
