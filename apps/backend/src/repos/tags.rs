//! Tag repository functions.

use std::collections::HashMap;

use sea_orm::ConnectionTrait;
use serde::Serialize;

use crate::adapters::tags_sea as tags_adapter;
use crate::entities::tags;
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::validation::DEFAULT_TAG_TYPE;

pub use tags_adapter::{TagCreate, TagUpdate};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagWithCount {
    #[serde(flatten)]
    pub tag: tags::Model,
    pub blogs_count: i64,
}

pub fn tag_not_found(tag_id: i64) -> DomainError {
    DomainError::not_found(NotFoundKind::Tag, format!("Tag {tag_id} not found"))
}

pub async fn list_tags_with_counts<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<TagWithCount>, DomainError> {
    let tags = tags_adapter::list_tags(conn).await?;
    let counts: HashMap<i64, i64> = tags_adapter::blog_counts(conn).await?.into_iter().collect();

    Ok(tags
        .into_iter()
        .map(|tag| TagWithCount {
            blogs_count: counts.get(&tag.id).copied().unwrap_or(0),
            tag,
        })
        .collect())
}

pub async fn find_tag_with_count<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    tag_id: i64,
) -> Result<TagWithCount, DomainError> {
    let tag = tags_adapter::find_tag(conn, tag_id)
        .await?
        .ok_or_else(|| tag_not_found(tag_id))?;
    let blogs_count = tags_adapter::blog_counts(conn)
        .await?
        .into_iter()
        .find_map(|(id, count)| (id == tag_id).then_some(count))
        .unwrap_or(0);
    Ok(TagWithCount { tag, blogs_count })
}

pub async fn update_tag<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    tag_id: i64,
    dto: TagUpdate,
) -> Result<tags::Model, DomainError> {
    tags_adapter::update_tag(conn, tag_id, dto)
        .await?
        .ok_or_else(|| tag_not_found(tag_id))
}

/// Resolve tag names to ids, creating missing tags with the default type.
///
/// Duplicate names collapse to one id; the returned ids follow first appearance.
pub async fn resolve_tag_names<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    names: &[String],
) -> Result<Vec<i64>, DomainError> {
    let mut unique: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        if !unique.contains(name) {
            unique.push(name.clone());
        }
    }

    let existing = tags_adapter::find_tags_by_name(conn, &unique).await?;
    let mut ids = Vec::with_capacity(unique.len());
    for name in unique {
        let id = match existing.iter().find(|t| t.name == name) {
            Some(tag) => tag.id,
            None => {
                let created = tags_adapter::create_tag(
                    conn,
                    TagCreate {
                        name,
                        tag_type: DEFAULT_TAG_TYPE.to_string(),
                        category: None,
                    },
                )
                .await?;
                created.id
            }
        };
        ids.push(id);
    }
    Ok(ids)
}
