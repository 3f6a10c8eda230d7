//! Blog repository functions.

use std::collections::HashMap;

use sea_orm::ConnectionTrait;
use serde::Serialize;

use crate::adapters::blogs_sea as blogs_adapter;
use crate::entities::{blogs, tags, users, TagCategory};
use crate::errors::domain::{DomainError, NotFoundKind};

pub use blogs_adapter::{BlogCreate, BlogUpdate};

/// A blog with its owner (if any) and tags.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlogDetail {
    #[serde(flatten)]
    pub blog: blogs::Model,
    pub owner: Option<users::Model>,
    pub tags: Vec<tags::Model>,
}

pub fn blog_not_found(blog_id: i64) -> DomainError {
    DomainError::not_found(NotFoundKind::Blog, format!("Blog {blog_id} not found"))
}

async fn with_details<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    blogs: Vec<blogs::Model>,
) -> Result<Vec<BlogDetail>, DomainError> {
    if blogs.is_empty() {
        return Ok(Vec::new());
    }

    let blog_ids: Vec<i64> = blogs.iter().map(|b| b.id).collect();
    let mut owner_ids: Vec<i64> = blogs.iter().filter_map(|b| b.user_id).collect();
    owner_ids.sort_unstable();
    owner_ids.dedup();

    let owners: HashMap<i64, users::Model> = blogs_adapter::owners_by_id(conn, &owner_ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    let mut tags_by_blog: HashMap<i64, Vec<tags::Model>> = HashMap::new();
    for (blog_id, tag) in blogs_adapter::tags_for_blogs(conn, &blog_ids).await? {
        tags_by_blog.entry(blog_id).or_default().push(tag);
    }

    Ok(blogs
        .into_iter()
        .map(|blog| BlogDetail {
            owner: blog.user_id.and_then(|id| owners.get(&id).cloned()),
            tags: tags_by_blog.remove(&blog.id).unwrap_or_default(),
            blog,
        })
        .collect())
}

pub async fn list_blogs_detailed<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    category: Option<TagCategory>,
) -> Result<Vec<BlogDetail>, DomainError> {
    let blogs = blogs_adapter::list_blogs(conn, category).await?;
    with_details(conn, blogs).await
}

pub async fn find_blog_detailed<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    blog_id: i64,
) -> Result<BlogDetail, DomainError> {
    let blog = blogs_adapter::find_blog(conn, blog_id)
        .await?
        .ok_or_else(|| blog_not_found(blog_id))?;
    with_details(conn, vec![blog])
        .await?
        .pop()
        .ok_or_else(|| blog_not_found(blog_id))
}

pub async fn create_blog<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: BlogCreate,
    tag_ids: &[i64],
) -> Result<blogs::Model, DomainError> {
    let blog = blogs_adapter::create_blog(conn, dto).await?;
    blogs_adapter::replace_blog_tags(conn, blog.id, tag_ids).await?;
    Ok(blog)
}

/// Partial update; `tag_ids = Some(..)` replaces the whole tag set.
pub async fn update_blog<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    blog_id: i64,
    dto: BlogUpdate,
    tag_ids: Option<&[i64]>,
) -> Result<blogs::Model, DomainError> {
    let blog = blogs_adapter::update_blog(conn, blog_id, dto)
        .await?
        .ok_or_else(|| blog_not_found(blog_id))?;
    if let Some(tag_ids) = tag_ids {
        blogs_adapter::replace_blog_tags(conn, blog.id, tag_ids).await?;
    }
    Ok(blog)
}

pub async fn delete_blog<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    blog_id: i64,
) -> Result<(), DomainError> {
    match blogs_adapter::delete_blog(conn, blog_id).await? {
        0 => Err(blog_not_found(blog_id)),
        _ => Ok(()),
    }
}
