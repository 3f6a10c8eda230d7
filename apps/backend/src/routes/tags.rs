use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::entities::TagCategory;
use crate::error::AppError;
use crate::extractors::{PathId, ValidatedJson};
use crate::repos::tags::{self as tags_repo, TagUpdate};
use crate::services::tags as tags_service;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TagPatch {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub tag_type: Option<String>,
    pub category: Option<TagCategory>,
}

async fn list_tags(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    let tags = tags_repo::list_tags_with_counts(db).await?;
    Ok(HttpResponse::Ok().json(tags))
}

async fn get_tag(
    PathId(tag_id): PathId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    let tag = tags_repo::find_tag_with_count(db, tag_id).await?;
    Ok(HttpResponse::Ok().json(tag))
}

async fn update_tag(
    PathId(tag_id): PathId,
    body: ValidatedJson<TagPatch>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    let TagPatch {
        name,
        tag_type,
        category,
    } = body.into_inner();
    let tag = tags_service::update_tag(
        db,
        tag_id,
        TagUpdate {
            name,
            tag_type,
            category,
        },
    )
    .await?;
    Ok(HttpResponse::Ok().json(tag))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/tag/", web::get().to(list_tags)).service(
        web::resource("/tag/{id}")
            .route(web::get().to(get_tag))
            .route(web::patch().to(update_tag)),
    );
}
