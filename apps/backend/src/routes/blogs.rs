use actix_web::{web, HttpResponse};
use sea_orm::ActiveEnum;
use serde::Deserialize;

use super::Message;
use crate::entities::TagCategory;
use crate::error::AppError;
use crate::extractors::{CurrentUser, PathId, ValidatedJson};
use crate::repos::blogs::{self as blogs_repo, BlogUpdate};
use crate::services::blogs as blogs_service;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct BlogListQuery {
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlogCreateRequest {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub episode: Option<i32>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlogPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub episode: Option<i32>,
    /// Absent keeps the owner; `null` detaches the blog.
    #[serde(default, with = "serde_with::rust::double_option")]
    pub user_id: Option<Option<i64>>,
    pub tags: Option<Vec<String>>,
}

fn parse_category(raw: Option<&str>) -> Result<Option<TagCategory>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(raw) => TagCategory::try_from_value(&raw.to_string())
            .map(Some)
            .map_err(|_| AppError::bad_request(format!("Unknown category '{raw}'"))),
    }
}

async fn list_blogs(
    query: web::Query<BlogListQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let category = parse_category(query.category.as_deref())?;
    let db = app_state.require_db()?;
    let blogs = blogs_repo::list_blogs_detailed(db, category).await?;
    Ok(HttpResponse::Ok().json(blogs))
}

async fn get_blog(
    PathId(blog_id): PathId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    let blog = blogs_repo::find_blog_detailed(db, blog_id).await?;
    Ok(HttpResponse::Ok().json(blog))
}

async fn create_blog(
    current: CurrentUser,
    body: ValidatedJson<BlogCreateRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    let BlogCreateRequest {
        title,
        description,
        episode,
        tags,
    } = body.into_inner();

    let blog =
        blogs_service::create_blog(db, current.id(), title, description, episode, tags).await?;
    let detail = blogs_repo::find_blog_detailed(db, blog.id).await?;
    Ok(HttpResponse::Created().json(detail))
}

async fn update_blog(
    PathId(blog_id): PathId,
    body: ValidatedJson<BlogPatch>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    let BlogPatch {
        title,
        description,
        episode,
        user_id,
        tags,
    } = body.into_inner();
    let dto = BlogUpdate {
        title,
        description,
        episode,
        user_id,
    };

    blogs_service::update_blog(db, blog_id, dto, tags).await?;
    let detail = blogs_repo::find_blog_detailed(db, blog_id).await?;
    Ok(HttpResponse::Ok().json(detail))
}

async fn delete_blog(
    PathId(blog_id): PathId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    blogs_repo::delete_blog(db, blog_id).await?;
    Ok(HttpResponse::Ok().json(Message::new("Blog deleted")))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/blog/")
            .route(web::get().to(list_blogs))
            .route(web::post().to(create_blog)),
    )
    .service(
        web::resource("/blog/{id}")
            .route(web::get().to(get_blog))
            .route(web::patch().to(update_blog))
            .route(web::delete().to(delete_blog)),
    );
}
