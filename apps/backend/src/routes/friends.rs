use actix_web::{web, HttpResponse};
use serde::Deserialize;
use tracing::info;

use super::Message;
use crate::error::AppError;
use crate::extractors::{CurrentUser, ValidatedJson};
use crate::repos::users as users_repo;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FriendRequest {
    pub friend_id: i64,
}

async fn add_friend(
    current: CurrentUser,
    body: ValidatedJson<FriendRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    let created = users_repo::add_friend(db, current.id(), body.friend_id).await?;
    info!(user_id = current.id(), friend_id = body.friend_id, created, "friend added");
    Ok(HttpResponse::Ok().json(Message::new("Friend added")))
}

async fn remove_friend(
    current: CurrentUser,
    body: ValidatedJson<FriendRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    users_repo::remove_friend(db, current.id(), body.friend_id).await?;
    Ok(HttpResponse::Ok().json(Message::new("Friend removed")))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/friend/")
            .route(web::post().to(add_friend))
            .route(web::delete().to(remove_friend)),
    );
}
