use sea_orm::ConnectionTrait;

use crate::entities::tags;
use crate::error::AppError;
use crate::repos::tags::{self as tags_repo, TagUpdate};
use crate::validation::Violations;

pub async fn update_tag<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    tag_id: i64,
    dto: TagUpdate,
) -> Result<tags::Model, AppError> {
    let mut v = Violations::new();
    if let Some(name) = &dto.name {
        v.tag_name(name);
    }
    if let Some(tag_type) = &dto.tag_type {
        v.tag_type(tag_type);
    }
    v.into_result()?;

    Ok(tags_repo::update_tag(conn, tag_id, dto).await?)
}
