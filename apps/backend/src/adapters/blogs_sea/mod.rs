//! SeaORM adapter for blogs and their tag links.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, JoinType,
    NotSet, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};

use crate::entities::{blogs, tag_blogs, tags, users, TagCategory};

pub mod dto;

pub use dto::{BlogCreate, BlogUpdate};

pub async fn find_blog<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    blog_id: i64,
) -> Result<Option<blogs::Model>, sea_orm::DbErr> {
    blogs::Entity::find_by_id(blog_id).one(conn).await
}

/// All blogs, or only those carrying at least one tag of `category`.
pub async fn list_blogs<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    category: Option<TagCategory>,
) -> Result<Vec<blogs::Model>, sea_orm::DbErr> {
    let mut query = blogs::Entity::find().order_by_asc(blogs::Column::Id);

    if let Some(category) = category {
        let blog_ids: Vec<i64> = tag_blogs::Entity::find()
            .select_only()
            .column(tag_blogs::Column::BlogId)
            .join(JoinType::InnerJoin, tag_blogs::Relation::Tag.def())
            .filter(tags::Column::Category.eq(category))
            .distinct()
            .into_tuple()
            .all(conn)
            .await?;
        if blog_ids.is_empty() {
            return Ok(Vec::new());
        }
        query = query.filter(blogs::Column::Id.is_in(blog_ids));
    }

    query.all(conn).await
}

/// `(blog_id, tag)` pairs for every blog in `blog_ids`.
pub async fn tags_for_blogs<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    blog_ids: &[i64],
) -> Result<Vec<(i64, tags::Model)>, sea_orm::DbErr> {
    let rows = tag_blogs::Entity::find()
        .filter(tag_blogs::Column::BlogId.is_in(blog_ids.iter().copied()))
        .order_by_asc(tag_blogs::Column::TagId)
        .find_also_related(tags::Entity)
        .all(conn)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(link, tag)| tag.map(|t| (link.blog_id, t)))
        .collect())
}

pub async fn owners_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_ids: &[i64],
) -> Result<Vec<users::Model>, sea_orm::DbErr> {
    if user_ids.is_empty() {
        return Ok(Vec::new());
    }
    users::Entity::find()
        .filter(users::Column::Id.is_in(user_ids.iter().copied()))
        .all(conn)
        .await
}

pub async fn create_blog<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: BlogCreate,
) -> Result<blogs::Model, sea_orm::DbErr> {
    let blog_active = blogs::ActiveModel {
        id: NotSet,
        title: Set(dto.title),
        description: Set(dto.description),
        episode: Set(dto.episode),
        created_at: Set(time::OffsetDateTime::now_utc()),
        user_id: Set(dto.user_id),
    };

    blog_active.insert(conn).await
}

/// Apply a partial update. Returns `None` when the blog does not exist.
pub async fn update_blog<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    blog_id: i64,
    dto: BlogUpdate,
) -> Result<Option<blogs::Model>, sea_orm::DbErr> {
    let Some(blog) = find_blog(conn, blog_id).await? else {
        return Ok(None);
    };
    if dto.is_empty() {
        return Ok(Some(blog));
    }

    let mut active = blog.into_active_model();
    if let Some(title) = dto.title {
        active.title = Set(title);
    }
    if let Some(description) = dto.description {
        active.description = Set(description);
    }
    if let Some(episode) = dto.episode {
        active.episode = Set(Some(episode));
    }
    if let Some(user_id) = dto.user_id {
        active.user_id = Set(user_id);
    }
    active.update(conn).await.map(Some)
}

pub async fn delete_blog<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    blog_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let res = blogs::Entity::delete_by_id(blog_id).exec(conn).await?;
    Ok(res.rows_affected)
}

/// Replace the blog's tag links with exactly `tag_ids`.
pub async fn replace_blog_tags<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    blog_id: i64,
    tag_ids: &[i64],
) -> Result<(), sea_orm::DbErr> {
    tag_blogs::Entity::delete_many()
        .filter(tag_blogs::Column::BlogId.eq(blog_id))
        .exec(conn)
        .await?;

    if tag_ids.is_empty() {
        return Ok(());
    }

    let links = tag_ids.iter().map(|&tag_id| tag_blogs::ActiveModel {
        tag_id: Set(tag_id),
        blog_id: Set(blog_id),
    });
    tag_blogs::Entity::insert_many(links)
        .exec_without_returning(conn)
        .await?;
    Ok(())
}
