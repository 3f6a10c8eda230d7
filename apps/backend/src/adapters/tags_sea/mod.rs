//! SeaORM adapter for tags.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, NotSet,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::entities::{tag_blogs, tags, TagCategory};

#[derive(Debug, Clone)]
pub struct TagCreate {
    pub name: String,
    pub tag_type: String,
    pub category: Option<TagCategory>,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct TagUpdate {
    pub name: Option<String>,
    pub tag_type: Option<String>,
    pub category: Option<TagCategory>,
}

pub async fn find_tag<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    tag_id: i64,
) -> Result<Option<tags::Model>, sea_orm::DbErr> {
    tags::Entity::find_by_id(tag_id).one(conn).await
}

pub async fn find_tags_by_name<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    names: &[String],
) -> Result<Vec<tags::Model>, sea_orm::DbErr> {
    if names.is_empty() {
        return Ok(Vec::new());
    }
    tags::Entity::find()
        .filter(tags::Column::Name.is_in(names.iter().cloned()))
        .all(conn)
        .await
}

pub async fn list_tags<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<tags::Model>, sea_orm::DbErr> {
    tags::Entity::find()
        .order_by_asc(tags::Column::Id)
        .all(conn)
        .await
}

/// `(tag_id, number of linked blogs)` for every tag with at least one blog.
pub async fn blog_counts<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<(i64, i64)>, sea_orm::DbErr> {
    tag_blogs::Entity::find()
        .select_only()
        .column(tag_blogs::Column::TagId)
        .column_as(Expr::col(tag_blogs::Column::BlogId).count(), "blogs_count")
        .group_by(tag_blogs::Column::TagId)
        .into_tuple()
        .all(conn)
        .await
}

pub async fn create_tag<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: TagCreate,
) -> Result<tags::Model, sea_orm::DbErr> {
    let tag_active = tags::ActiveModel {
        id: NotSet,
        name: Set(dto.name),
        tag_type: Set(dto.tag_type),
        category: Set(dto.category),
    };

    tag_active.insert(conn).await
}

/// Apply a partial update. Returns `None` when the tag does not exist.
pub async fn update_tag<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    tag_id: i64,
    dto: TagUpdate,
) -> Result<Option<tags::Model>, sea_orm::DbErr> {
    let Some(tag) = find_tag(conn, tag_id).await? else {
        return Ok(None);
    };

    let mut active = tag.clone().into_active_model();
    let mut changed = false;
    if let Some(name) = dto.name {
        active.name = Set(name);
        changed = true;
    }
    if let Some(tag_type) = dto.tag_type {
        active.tag_type = Set(tag_type);
        changed = true;
    }
    if let Some(category) = dto.category {
        active.category = Set(Some(category));
        changed = true;
    }
    if !changed {
        return Ok(Some(tag));
    }
    active.update(conn).await.map(Some)
}
