use actix_web::{web, HttpResponse};
use serde::Deserialize;

use super::Message;
use crate::error::AppError;
use crate::extractors::{PathId, ValidatedJson};
use crate::repos::users::{self as users_repo, UserUpdate};
use crate::services::users as users_service;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserPatch {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub is_active: Option<bool>,
}

impl From<UserPatch> for UserUpdate {
    fn from(p: UserPatch) -> Self {
        UserUpdate {
            name: p.name,
            age: p.age,
            is_active: p.is_active,
        }
    }
}

async fn list_users(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    let users = users_repo::list_users_detailed(db).await?;
    Ok(HttpResponse::Ok().json(users))
}

async fn get_user(
    PathId(user_id): PathId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    let user = users_repo::find_user_detailed(db, user_id).await?;
    Ok(HttpResponse::Ok().json(user))
}

async fn update_user(
    PathId(user_id): PathId,
    body: ValidatedJson<UserPatch>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    let user = users_service::update_user(db, user_id, body.into_inner().into()).await?;
    Ok(HttpResponse::Ok().json(user))
}

async fn delete_user(
    PathId(user_id): PathId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    users_repo::delete_user(db, user_id).await?;
    Ok(HttpResponse::Ok().json(Message::new("User deleted")))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/user/", web::get().to(list_users)).service(
        web::resource("/user/{id}")
            .route(web::get().to(get_user))
            .route(web::patch().to(update_user))
            .route(web::delete().to(delete_user)),
    );
}
