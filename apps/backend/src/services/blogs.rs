//! Blog writes. Tag resolution and the blog row change in one transaction.

use sea_orm::DatabaseConnection;
use tracing::info;

use crate::db::txn::with_txn;
use crate::entities::blogs;
use crate::error::AppError;
use crate::repos::blogs::{self as blogs_repo, BlogCreate, BlogUpdate};
use crate::repos::tags as tags_repo;
use crate::validation::Violations;

fn check_tag_names(v: &mut Violations, names: &[String]) {
    for name in names {
        v.tag_name(name);
    }
}

/// Create a blog owned by `owner_id`, creating any tags that do not exist yet.
pub async fn create_blog(
    db: &DatabaseConnection,
    owner_id: i64,
    title: String,
    description: String,
    episode: Option<i32>,
    tag_names: Vec<String>,
) -> Result<blogs::Model, AppError> {
    let mut v = Violations::new();
    v.blog_title(&title).blog_description(&description);
    if let Some(episode) = episode {
        v.episode(episode);
    }
    check_tag_names(&mut v, &tag_names);
    v.into_result()?;

    let dto = BlogCreate {
        title,
        description,
        episode,
        user_id: Some(owner_id),
    };

    let blog = with_txn(db, |txn| async move {
        let out = async {
            let tag_ids = tags_repo::resolve_tag_names(&txn, &tag_names).await?;
            blogs_repo::create_blog(&txn, dto, &tag_ids).await
        }
        .await;
        (txn, out)
    })
    .await?;

    info!(blog_id = blog.id, owner_id, "blog created");
    Ok(blog)
}

/// Partial update. `tag_names = Some(..)` replaces the blog's tags.
pub async fn update_blog(
    db: &DatabaseConnection,
    blog_id: i64,
    dto: BlogUpdate,
    tag_names: Option<Vec<String>>,
) -> Result<blogs::Model, AppError> {
    let mut v = Violations::new();
    if let Some(title) = &dto.title {
        v.blog_title(title);
    }
    if let Some(description) = &dto.description {
        v.blog_description(description);
    }
    if let Some(episode) = dto.episode {
        v.episode(episode);
    }
    if let Some(names) = &tag_names {
        check_tag_names(&mut v, names);
    }
    v.into_result()?;

    let blog = with_txn(db, |txn| async move {
        let out = async {
            let tag_ids = match &tag_names {
                Some(names) => Some(tags_repo::resolve_tag_names(&txn, names).await?),
                None => None,
            };
            blogs_repo::update_blog(&txn, blog_id, dto, tag_ids.as_deref()).await
        }
        .await;
        (txn, out)
    })
    .await?;

    Ok(blog)
}
