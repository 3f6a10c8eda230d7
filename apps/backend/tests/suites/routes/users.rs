use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::{assert_error, assert_validation_errors};
use serde_json::{json, Value};

use crate::common::status_and_body;
use crate::support::{build_test_state, create_test_app, Session};

#[actix_web::test]
async fn list_includes_blogs_and_friends() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let alice = Session::new(&state, "alice").await;
    let bob = Session::new(&state, "bob").await;
    let app = create_test_app(state).build().await?;

    let resp = test::call_service(
        &app,
        alice.post_json("/api/friend/", json!({"friend_id": bob.user.id})),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(
        &app,
        alice.post_json(
            "/api/blog/",
            json!({"title": "First post", "description": "hello there"}),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = test::call_service(&app, alice.get("/api/user/")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let users: Vec<Value> = test::read_body_json(resp).await;
    assert_eq!(users.len(), 2);

    let first = &users[0];
    assert_eq!(first["id"], alice.user.id);
    assert_eq!(first["blogs"].as_array().unwrap().len(), 1);
    assert_eq!(first["blogs"][0]["title"], "First post");
    assert_eq!(first["friends"][0]["id"], bob.user.id);
    assert!(first.get("password_hash").is_none());

    let second = &users[1];
    assert_eq!(second["blogs"], json!([]));
    assert_eq!(second["friends"], json!([]));
    Ok(())
}

#[actix_web::test]
async fn get_missing_user_is_not_found() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let me = Session::new(&state, "me").await;
    let app = create_test_app(state).build().await?;

    let (status, body) = status_and_body(test::call_service(&app, me.get("/api/user/424242")).await).await;
    assert_error(status, &body, StatusCode::NOT_FOUND, "User 424242 not found");
    Ok(())
}

#[actix_web::test]
async fn non_numeric_id_is_bad_request() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let me = Session::new(&state, "me").await;
    let app = create_test_app(state).build().await?;

    let (status, body) = status_and_body(test::call_service(&app, me.get("/api/user/abc")).await).await;
    assert_error(status, &body, StatusCode::BAD_REQUEST, "Invalid Id received");
    Ok(())
}

#[actix_web::test]
async fn patch_updates_only_given_fields() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let me = Session::new(&state, "patchme").await;
    let app = create_test_app(state).build().await?;
    let uri = format!("/api/user/{}", me.user.id);

    let resp = test::call_service(&app, me.patch_json(&uri, json!({"age": 41}))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["age"], 41);
    assert_eq!(body["name"], me.user.name);
    assert_eq!(body["is_active"], true);

    let resp = test::call_service(&app, me.patch_json(&uri, json!({"is_active": false}))).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["age"], 41);
    assert_eq!(body["is_active"], false);
    Ok(())
}

#[actix_web::test]
async fn patch_validates_fields() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let me = Session::new(&state, "strict").await;
    let app = create_test_app(state).build().await?;
    let uri = format!("/api/user/{}", me.user.id);

    let req = me.patch_json(&uri, json!({"name": "no", "age": 0}));
    let (status, body) = status_and_body(test::call_service(&app, req).await).await;
    assert_eq!(assert_validation_errors(status, &body).len(), 2);
    Ok(())
}

#[actix_web::test]
async fn patch_rejects_taken_name() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let me = Session::new(&state, "first").await;
    let other = Session::new(&state, "second").await;
    let app = create_test_app(state).build().await?;

    let req = me.patch_json(
        &format!("/api/user/{}", me.user.id),
        json!({"name": other.user.name}),
    );
    let (status, body) = status_and_body(test::call_service(&app, req).await).await;
    assert_error(status, &body, StatusCode::CONFLICT, "User name already taken");
    Ok(())
}

#[actix_web::test]
async fn delete_removes_user_and_detaches_blogs() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let admin = Session::new(&state, "admin").await;
    let doomed = Session::new(&state, "doomed").await;
    let app = create_test_app(state).build().await?;

    let resp = test::call_service(
        &app,
        doomed.post_json(
            "/api/blog/",
            json!({"title": "Orphan", "description": "soon ownerless"}),
        ),
    )
    .await;
    let blog: Value = test::read_body_json(resp).await;

    let uri = format!("/api/user/{}", doomed.user.id);
    let resp = test::call_service(&app, admin.delete(&uri)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "User deleted");

    let resp = test::call_service(&app, admin.get(&uri)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = test::call_service(&app, admin.get(&format!("/api/blog/{}", blog["id"]))).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["user_id"], Value::Null);
    assert_eq!(body["owner"], Value::Null);

    // The deleted user's token no longer resolves
    let (status, body) = status_and_body(test::call_service(&app, doomed.get("/api/user/")).await).await;
    assert_error(status, &body, StatusCode::UNAUTHORIZED, "User not found");
    Ok(())
}
