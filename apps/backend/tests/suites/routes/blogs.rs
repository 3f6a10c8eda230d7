use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::{assert_error, assert_validation_errors};
use serde_json::{json, Value};

use crate::common::status_and_body;
use crate::support::{build_test_state, create_test_app, Session};

fn tag_names(blog: &Value) -> Vec<String> {
    blog["tags"]
        .as_array()
        .expect("tags should be an array")
        .iter()
        .map(|t| t["name"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[actix_web::test]
async fn create_assigns_owner_and_resolves_tags() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let me = Session::new(&state, "writer").await;
    let app = create_test_app(state).build().await?;

    let req = me.post_json(
        "/api/blog/",
        json!({
            "title": "Rust notes",
            "description": "ownership, again",
            "episode": 3,
            "tags": ["rust", "notes", "rust"]
        }),
    );
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let blog: Value = test::read_body_json(resp).await;

    assert_eq!(blog["title"], "Rust notes");
    assert_eq!(blog["episode"], 3);
    assert_eq!(blog["user_id"], me.user.id);
    assert_eq!(blog["owner"]["id"], me.user.id);
    assert_eq!(tag_names(&blog), vec!["rust", "notes"]);
    assert_eq!(blog["tags"][0]["type"], "Common");

    // A second blog reuses the existing tag rows
    let req = me.post_json(
        "/api/blog/",
        json!({"title": "More rust", "description": "lifetimes", "tags": ["rust"]}),
    );
    let resp = test::call_service(&app, req).await;
    let second: Value = test::read_body_json(resp).await;
    assert_eq!(second["tags"][0]["id"], blog["tags"][0]["id"]);

    let resp = test::call_service(&app, me.get("/api/tag/")).await;
    let tags: Vec<Value> = test::read_body_json(resp).await;
    assert_eq!(tags.len(), 2);
    let rust = tags.iter().find(|t| t["name"] == "rust").unwrap();
    assert_eq!(rust["blogs_count"], 2);
    Ok(())
}

#[actix_web::test]
async fn invalid_blog_is_rejected_atomically() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let me = Session::new(&state, "sloppy").await;
    let app = create_test_app(state).build().await?;

    let req = me.post_json(
        "/api/blog/",
        json!({"title": "x", "description": "y", "episode": 0, "tags": ["c++"]}),
    );
    let (status, body) = status_and_body(test::call_service(&app, req).await).await;
    assert_eq!(assert_validation_errors(status, &body).len(), 4);

    let resp = test::call_service(&app, me.get("/api/blog/")).await;
    let blogs: Vec<Value> = test::read_body_json(resp).await;
    assert!(blogs.is_empty());
    let resp = test::call_service(&app, me.get("/api/tag/")).await;
    let tags: Vec<Value> = test::read_body_json(resp).await;
    assert!(tags.is_empty());
    Ok(())
}

#[actix_web::test]
async fn list_filters_by_tag_category() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let me = Session::new(&state, "curator").await;
    let app = create_test_app(state).build().await?;

    for (title, tag) in [("Hot take", "spicy"), ("Calm take", "mild")] {
        let req = me.post_json(
            "/api/blog/",
            json!({"title": title, "description": "opinions", "tags": [tag]}),
        );
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    }

    let resp = test::call_service(&app, me.get("/api/tag/")).await;
    let tags: Vec<Value> = test::read_body_json(resp).await;
    let spicy = tags.iter().find(|t| t["name"] == "spicy").unwrap();
    let req = me.patch_json(
        &format!("/api/tag/{}", spicy["id"]),
        json!({"category": "Hot"}),
    );
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let resp = test::call_service(&app, me.get("/api/blog/?category=Hot")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let blogs: Vec<Value> = test::read_body_json(resp).await;
    assert_eq!(blogs.len(), 1);
    assert_eq!(blogs[0]["title"], "Hot take");

    let resp = test::call_service(&app, me.get("/api/blog/?category=Newest")).await;
    let blogs: Vec<Value> = test::read_body_json(resp).await;
    assert!(blogs.is_empty());

    let resp = test::call_service(&app, me.get("/api/blog/")).await;
    let blogs: Vec<Value> = test::read_body_json(resp).await;
    assert_eq!(blogs.len(), 2);

    let (status, body) =
        status_and_body(test::call_service(&app, me.get("/api/blog/?category=Lukewarm")).await).await;
    assert_error(status, &body, StatusCode::BAD_REQUEST, "Unknown category 'Lukewarm'");
    Ok(())
}

#[actix_web::test]
async fn patch_replaces_tags_and_owner() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let me = Session::new(&state, "editor").await;
    let heir = Session::new(&state, "heir").await;
    let app = create_test_app(state).build().await?;

    let req = me.post_json(
        "/api/blog/",
        json!({"title": "Draft", "description": "work in progress", "tags": ["draft"]}),
    );
    let blog: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let uri = format!("/api/blog/{}", blog["id"]);

    let req = me.patch_json(
        &uri,
        json!({"title": "Final", "tags": ["done", "published"], "user_id": heir.user.id}),
    );
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = test::read_body_json(resp).await;
    assert_eq!(updated["title"], "Final");
    assert_eq!(updated["description"], "work in progress");
    assert_eq!(updated["owner"]["id"], heir.user.id);
    assert_eq!(tag_names(&updated), vec!["done", "published"]);

    // Omitting tags keeps them; null owner detaches
    let req = me.patch_json(&uri, json!({"user_id": null}));
    let updated: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(updated["user_id"], Value::Null);
    assert_eq!(tag_names(&updated), vec!["done", "published"]);
    Ok(())
}

#[actix_web::test]
async fn patch_to_unknown_owner_is_invalid() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let me = Session::new(&state, "owner").await;
    let app = create_test_app(state).build().await?;

    let req = me.post_json("/api/blog/", json!({"title": "Mine", "description": "keep out"}));
    let blog: Value = test::read_body_json(test::call_service(&app, req).await).await;

    let req = me.patch_json(&format!("/api/blog/{}", blog["id"]), json!({"user_id": 31337}));
    let (status, body) = status_and_body(test::call_service(&app, req).await).await;
    assert_eq!(
        assert_validation_errors(status, &body),
        vec!["Referenced record does not exist"]
    );
    Ok(())
}

#[actix_web::test]
async fn missing_blog_paths_are_not_found() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let me = Session::new(&state, "seeker").await;
    let app = create_test_app(state).build().await?;

    let (status, body) = status_and_body(test::call_service(&app, me.get("/api/blog/77")).await).await;
    assert_error(status, &body, StatusCode::NOT_FOUND, "Blog 77 not found");

    let req = me.patch_json("/api/blog/77", json!({"title": "Ghost"}));
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let resp = test::call_service(&app, me.delete("/api/blog/77")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[actix_web::test]
async fn delete_blog_unlinks_tags() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let me = Session::new(&state, "cleaner").await;
    let app = create_test_app(state).build().await?;

    let req = me.post_json(
        "/api/blog/",
        json!({"title": "Temporary", "description": "short lived", "tags": ["tmp"]}),
    );
    let blog: Value = test::read_body_json(test::call_service(&app, req).await).await;

    let resp = test::call_service(&app, me.delete(&format!("/api/blog/{}", blog["id"]))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Blog deleted");

    let resp = test::call_service(&app, me.get("/api/tag/")).await;
    let tags: Vec<Value> = test::read_body_json(resp).await;
    assert_eq!(tags[0]["name"], "tmp");
    assert_eq!(tags[0]["blogs_count"], 0);
    Ok(())
}
