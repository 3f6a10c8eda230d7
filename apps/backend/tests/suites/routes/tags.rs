use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::{assert_error, assert_validation_errors};
use serde_json::{json, Value};

use crate::common::status_and_body;
use crate::support::{build_test_state, create_test_app, Session};

async fn seed_tags(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    me: &Session,
    names: &[&str],
) {
    let req = me.post_json(
        "/api/blog/",
        json!({"title": "Seed", "description": "tag carrier", "tags": names}),
    );
    assert_eq!(test::call_service(app, req).await.status(), StatusCode::CREATED);
}

#[actix_web::test]
async fn patch_renames_and_categorises() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let me = Session::new(&state, "tagger").await;
    let app = create_test_app(state).build().await?;
    seed_tags(&app, &me, &["golang"]).await;

    let tags: Vec<Value> = test::read_body_json(test::call_service(&app, me.get("/api/tag/")).await).await;
    let uri = format!("/api/tag/{}", tags[0]["id"]);

    let req = me.patch_json(
        &uri,
        json!({"name": "rust lang", "type": "Language", "category": "Trending"}),
    );
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let tag: Value = test::read_body_json(resp).await;
    assert_eq!(tag["name"], "rust lang");
    assert_eq!(tag["type"], "Language");
    assert_eq!(tag["category"], "Trending");

    let resp = test::call_service(&app, me.get(&uri)).await;
    let tag: Value = test::read_body_json(resp).await;
    assert_eq!(tag["name"], "rust lang");
    assert_eq!(tag["blogs_count"], 1);
    Ok(())
}

#[actix_web::test]
async fn patch_validates_and_detects_duplicates() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let me = Session::new(&state, "strict").await;
    let app = create_test_app(state).build().await?;
    seed_tags(&app, &me, &["alpha", "beta"]).await;

    let tags: Vec<Value> = test::read_body_json(test::call_service(&app, me.get("/api/tag/")).await).await;
    let alpha_uri = format!("/api/tag/{}", tags[0]["id"]);

    let req = me.patch_json(&alpha_uri, json!({"name": "bad!", "type": "WayTooLongType"}));
    let (status, body) = status_and_body(test::call_service(&app, req).await).await;
    assert_eq!(assert_validation_errors(status, &body).len(), 2);

    let req = me.patch_json(&alpha_uri, json!({"name": "beta"}));
    let (status, body) = status_and_body(test::call_service(&app, req).await).await;
    assert_error(status, &body, StatusCode::CONFLICT, "Tag name already exists");

    let req = me.patch_json(&alpha_uri, json!({"category": "Lukewarm"}));
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[actix_web::test]
async fn unknown_tag_is_not_found() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let me = Session::new(&state, "finder").await;
    let app = create_test_app(state).build().await?;

    let (status, body) = status_and_body(test::call_service(&app, me.get("/api/tag/5")).await).await;
    assert_error(status, &body, StatusCode::NOT_FOUND, "Tag 5 not found");

    let req = me.patch_json("/api/tag/5", json!({"name": "ghost"}));
    let (status, body) = status_and_body(test::call_service(&app, req).await).await;
    assert_error(status, &body, StatusCode::NOT_FOUND, "Tag 5 not found");
    Ok(())
}
