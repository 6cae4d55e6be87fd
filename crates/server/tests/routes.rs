use std::path::PathBuf;

use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, Request, StatusCode};
use axum::Router;
use configs::AppConfig;
use serde_json::{json, Value};
use tower::ServiceExt as _;
use uuid::Uuid;

struct TestApp {
    router: Router,
    data_file: PathBuf,
}

impl TestApp {
    async fn with_users(users: Value) -> anyhow::Result<Self> {
        let data_file = std::env::temp_dir().join(format!("routes_{}.json", Uuid::new_v4()));
        tokio::fs::write(&data_file, serde_json::to_vec_pretty(&users)?).await?;
        let mut cfg = AppConfig::default();
        cfg.storage.data_file = data_file.clone();
        let router = server::build_app(&cfg).await?;
        Ok(Self { router, data_file })
    }

    async fn send(
        &self,
        method: &str,
        uri: &str,
        content_type: Option<&str>,
        body: impl Into<Body>,
    ) -> anyhow::Result<(StatusCode, String, Vec<u8>)> {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(ct) = content_type {
            req = req.header(CONTENT_TYPE, ct);
        }
        let resp = self.router.clone().oneshot(req.body(body.into())?).await?;
        let status = resp.status();
        let ct = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
        Ok((status, ct, bytes.to_vec()))
    }

    async fn get_json(&self, uri: &str) -> anyhow::Result<(StatusCode, Value)> {
        let (status, ct, body) = self.send("GET", uri, None, Body::empty()).await?;
        assert_eq!(ct, "application/json", "GET {uri} should answer JSON");
        Ok((status, serde_json::from_slice(&body)?))
    }

    async fn send_json(&self, method: &str, uri: &str, body: Value) -> anyhow::Result<(StatusCode, Value)> {
        let (status, _, bytes) =
            self.send(method, uri, Some("application/json"), serde_json::to_vec(&body)?).await?;
        Ok((status, serde_json::from_slice(&bytes)?))
    }

    async fn stored(&self) -> anyhow::Result<Value> {
        Ok(serde_json::from_slice(&tokio::fs::read(&self.data_file).await?)?)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.data_file);
    }
}

fn two_users() -> Value {
    json!([
        {"id": "1", "name": "A", "age": 20},
        {"id": "2", "name": "B", "age": 30}
    ])
}

#[tokio::test]
async fn home_page_is_html() -> anyhow::Result<()> {
    let app = TestApp::with_users(json!([])).await?;
    let (status, ct, body) = app.send("GET", "/", None, Body::empty()).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(ct.starts_with("text/html"));
    assert!(String::from_utf8(body)?.contains("User Registry"));
    Ok(())
}

#[tokio::test]
async fn users_without_query_renders_form_view() -> anyhow::Result<()> {
    let app = TestApp::with_users(two_users()).await?;
    let (status, ct, body) = app.send("GET", "/users", None, Body::empty()).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(ct.starts_with("text/html"));
    assert!(String::from_utf8(body)?.contains("<form"));
    Ok(())
}

#[tokio::test]
async fn users_with_query_returns_filtered_listing() -> anyhow::Result<()> {
    let app = TestApp::with_users(two_users()).await?;
    let (status, body) = app.get_json("/users?minAge=25").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"id": "2", "name": "B", "age": 30}]));

    let (_, body) = app.get_json("/users?name=A&maxAge=20").await?;
    assert_eq!(body, json!([{"id": "1", "name": "A", "age": 20}]));

    // any parameter switches to listing mode, even one that filters nothing
    let (_, body) = app.get_json("/users?verbose=1").await?;
    assert_eq!(body.as_array().map(Vec::len), Some(2));
    Ok(())
}

#[tokio::test]
async fn non_integer_age_bound_is_bad_request() -> anyhow::Result<()> {
    let app = TestApp::with_users(two_users()).await?;
    let (status, body) = app.get_json("/users?minAge=old").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"message": "minAge must be an integer"}));
    Ok(())
}

#[tokio::test]
async fn data_route_takes_precedence_over_page_route() -> anyhow::Result<()> {
    let app = TestApp::with_users(json!([{"id": "5", "name": "Eve", "age": 41}])).await?;
    let (status, body) = app.get_json("/users/data/5").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": "5", "name": "Eve", "age": 41}));

    let (status, ct, page) = app.send("GET", "/users/5", None, Body::empty()).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(ct.starts_with("text/html"));
    assert!(String::from_utf8(page)?.contains("Eve"));
    Ok(())
}

#[tokio::test]
async fn unknown_user_is_not_found_on_both_get_routes() -> anyhow::Result<()> {
    let app = TestApp::with_users(two_users()).await?;
    let (status, body) = app.get_json("/users/data/99").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"message": "User not found"}));

    let (status, body) = app.get_json("/users/99").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"message": "User not found"}));
    Ok(())
}

#[tokio::test]
async fn create_json_then_fetch() -> anyhow::Result<()> {
    let app = TestApp::with_users(two_users()).await?;
    let (status, created) = app.send_json("POST", "/users", json!({"name": "  Cy ", "age": 9})).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created, json!({"id": "3", "name": "Cy", "age": 9}));

    let (status, fetched) = app.get_json("/users/data/3").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
    assert_eq!(app.stored().await?.as_array().map(Vec::len), Some(3));
    Ok(())
}

#[tokio::test]
async fn create_from_form_body() -> anyhow::Result<()> {
    let app = TestApp::with_users(json!([])).await?;
    let (status, _, body) = app
        .send("POST", "/users", Some("application/x-www-form-urlencoded"), "name=Ann&age=30")
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    let created: Value = serde_json::from_slice(&body)?;
    assert_eq!(created, json!({"id": "1", "name": "Ann", "age": 30}));
    Ok(())
}

#[tokio::test]
async fn create_rejections_leave_collection_unchanged() -> anyhow::Result<()> {
    let app = TestApp::with_users(two_users()).await?;

    let (status, _, body) = app.send("POST", "/users", Some("text/plain"), "name=A&age=1").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(serde_json::from_slice::<Value>(&body)?, json!({"message": "Unsupported Content-Type"}));

    for bad in [json!({"age": 1}), json!({"name": "", "age": 1}), json!({"name": "X", "age": -4})] {
        let (status, body) = app.send_json("POST", "/users", bad).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap_or_default().starts_with("Invalid user data"));
    }

    let (status, _, _) = app.send("POST", "/users", Some("application/json"), "{nope").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(app.stored().await?, two_users());
    Ok(())
}

#[tokio::test]
async fn patch_merges_and_put_replaces() -> anyhow::Result<()> {
    let app = TestApp::with_users(json!([{"id": "3", "name": "Ann", "age": 30}])).await?;

    let (status, body) = app.send_json("PATCH", "/users/3", json!({"age": 31})).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": "3", "name": "Ann", "age": 31}));

    let (status, _) = app.send_json("PUT", "/users/3", json!({"age": 32})).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app.send_json("PUT", "/users/3", json!({"id": "8", "name": "Bo", "age": 5})).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": "3", "name": "Bo", "age": 5}));
    assert_eq!(app.stored().await?, json!([{"id": "3", "name": "Bo", "age": 5}]));

    let (status, body) = app.send_json("PATCH", "/users/4", json!({"age": 1})).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"message": "User not found"}));
    Ok(())
}

#[tokio::test]
async fn delete_twice_is_not_found_the_second_time() -> anyhow::Result<()> {
    let app = TestApp::with_users(two_users()).await?;
    let (status, _, body) = app.send("DELETE", "/users/1", None, Body::empty()).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        serde_json::from_slice::<Value>(&body)?,
        json!({"message": "User with ID 1 deleted successfully"})
    );
    assert_eq!(app.stored().await?, json!([{"id": "2", "name": "B", "age": 30}]));

    let (status, _, _) = app.send("DELETE", "/users/1", None, Body::empty()).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn unmatched_routes_and_methods_are_not_found() -> anyhow::Result<()> {
    let app = TestApp::with_users(two_users()).await?;
    for (method, uri) in [("GET", "/nope"), ("POST", "/users/1"), ("DELETE", "/users"), ("PUT", "/")] {
        let (status, ct, body) = app.send(method, uri, None, Body::empty()).await?;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
        assert_eq!(ct, "application/json");
        assert_eq!(serde_json::from_slice::<Value>(&body)?, json!({"message": "Route not found"}));
    }
    Ok(())
}

#[tokio::test]
async fn undecodable_path_segment_is_json_bad_request() -> anyhow::Result<()> {
    let app = TestApp::with_users(two_users()).await?;
    for (method, uri) in [("GET", "/users/data/%FF"), ("GET", "/users/%FF"), ("DELETE", "/users/%FF")] {
        let (status, ct, body) = app.send(method, uri, None, Body::empty()).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{method} {uri}");
        assert_eq!(ct, "application/json");
        let body: Value = serde_json::from_slice(&body)?;
        assert!(body["message"].as_str().is_some_and(|m| m.contains("UTF-8")), "{body}");
    }
    assert_eq!(app.stored().await?, two_users());
    Ok(())
}

#[tokio::test]
async fn oversized_body_is_json_payload_too_large() -> anyhow::Result<()> {
    let app = TestApp::with_users(two_users()).await?;
    let huge = vec![b' '; 3 * 1024 * 1024];
    for (method, uri) in [("POST", "/users"), ("PUT", "/users/1"), ("PATCH", "/users/1")] {
        let (status, ct, body) = app.send(method, uri, Some("application/json"), huge.clone()).await?;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE, "{method} {uri}");
        assert_eq!(ct, "application/json");
        let body: Value = serde_json::from_slice(&body)?;
        assert!(body["message"].is_string(), "{body}");
    }
    assert_eq!(app.stored().await?, two_users());
    Ok(())
}

#[tokio::test]
async fn empty_filter_values_are_still_predicates() -> anyhow::Result<()> {
    let app = TestApp::with_users(two_users()).await?;
    let (status, body) = app.get_json("/users?name=").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (_, body) = app.get_json("/users?minAge=").await?;
    assert_eq!(body, two_users());

    let (_, body) = app.get_json("/users?maxAge=").await?;
    assert_eq!(body, json!([]));
    Ok(())
}

#[tokio::test]
async fn storage_failure_is_internal_error_without_detail() -> anyhow::Result<()> {
    let app = TestApp::with_users(two_users()).await?;
    tokio::fs::write(&app.data_file, b"{corrupted").await?;

    let (status, body) = app.get_json("/users/data/1").await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"message": "Internal Server Error"}));

    let (status, body) = app.send_json("POST", "/users", json!({"name": "A", "age": 1})).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"message": "Internal Server Error"}));
    Ok(())
}

#[tokio::test]
async fn startup_refuses_malformed_document() -> anyhow::Result<()> {
    let data_file = std::env::temp_dir().join(format!("routes_bad_{}.json", Uuid::new_v4()));
    tokio::fs::write(&data_file, b"not json").await?;
    let mut cfg = AppConfig::default();
    cfg.storage.data_file = data_file.clone();
    assert!(server::build_app(&cfg).await.is_err());
    let _ = tokio::fs::remove_file(&data_file).await;
    Ok(())
}
