//! HTTP-level tests for the store and rating routes.

use std::sync::Arc;

use auth::application::{AdminSeed, SeedAdminUseCase};
use auth::{AuthConfig, MemoryAuthRepository, auth_router, with_session};
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use catalog::{MemoryCatalogRepository, catalog_router};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

const UA: &str = "catalog-tests/1.0";

struct TestApp {
    router: Router,
}

impl TestApp {
    async fn new() -> Self {
        let users = Arc::new(MemoryAuthRepository::new());
        let catalog = Arc::new(MemoryCatalogRepository::new());
        let config = Arc::new(AuthConfig::development());

        SeedAdminUseCase::new(users.clone(), config.clone())
            .execute(AdminSeed::default())
            .await
            .unwrap();

        let api = Router::new().nest(
            "/api",
            auth_router(users.clone(), config.clone())
                .merge(catalog_router(users.clone(), catalog)),
        );
        let router = with_session(api, users, config);
        Self { router }
    }

    async fn send(
        &self,
        method: &str,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Option<String>, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::USER_AGENT, UA);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .map(|v| v.to_str().unwrap().split(';').next().unwrap().to_string());
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, set_cookie, json)
    }

    async fn admin(&self) -> String {
        let (status, cookie, _) = self
            .send(
                "POST",
                "/api/login",
                None,
                Some(json!({ "email": "admin@store-ratings.com", "password": "Admin@123" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        cookie.unwrap()
    }

    /// Register a user and return (id, cookie)
    async fn user(&self, email: &str) -> (i64, String) {
        let (status, cookie, body) = self
            .send(
                "POST",
                "/api/register",
                None,
                Some(json!({
                    "name": "Rating User",
                    "email": email,
                    "address": "42 Station Road",
                    "password": "Abcd123!",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        (body["id"].as_i64().unwrap(), cookie.unwrap())
    }

    async fn create_store(&self, admin: &str, email: &str, owner_id: Option<i64>) -> i64 {
        let (status, _, body) = self
            .send(
                "POST",
                "/api/admin/stores",
                Some(admin),
                Some(json!({
                    "name": "Corner Shop",
                    "email": email,
                    "address": "1 High Street",
                    "ownerId": owner_id,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_i64().unwrap()
    }

    async fn rate(&self, cookie: &str, store_id: i64, rating: i64) -> (StatusCode, Value) {
        let (status, _, body) = self
            .send(
                "POST",
                "/api/ratings",
                Some(cookie),
                Some(json!({ "storeId": store_id, "rating": rating })),
            )
            .await;
        (status, body)
    }
}

// ============================================================================
// Stores
// ============================================================================

#[tokio::test]
async fn admin_creates_and_lists_stores() {
    let app = TestApp::new().await;
    let admin = app.admin().await;

    let id = app.create_store(&admin, "Shop@Example.com", None).await;
    assert_eq!(id, 1);

    let (status, _, body) = app.send("GET", "/api/stores", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["email"], "shop@example.com");
    assert!(body[0]["ownerId"].is_null());

    let (status, _, body) = app.send("GET", "/api/stores/1", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Corner Shop");

    let (status, _, _) = app.send("GET", "/api/stores/99", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, _) = app.send("GET", "/api/stores/abc", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_store_email_conflicts() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    app.create_store(&admin, "shop@example.com", None).await;

    let (status, _, _) = app
        .send(
            "POST",
            "/api/admin/stores",
            Some(&admin),
            Some(json!({
                "name": "Other Shop",
                "email": "SHOP@example.com",
                "address": "2 High Street",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn store_validation_reports_all_fields() {
    let app = TestApp::new().await;
    let admin = app.admin().await;

    let (status, _, body) = app
        .send(
            "POST",
            "/api/admin/stores",
            Some(&admin),
            Some(json!({ "name": "ab", "email": "nope", "address": "x" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"].as_array().unwrap().len(), 3);

    let (status, _, body) = app
        .send(
            "POST",
            "/api/admin/stores",
            Some(&admin),
            Some(json!({
                "name": "Corner Shop",
                "email": "shop@example.com",
                "address": "1 High Street",
                "ownerId": 404,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "ownerId");
}

#[tokio::test]
async fn malformed_store_body_is_problem_details() {
    let app = TestApp::new().await;
    let admin = app.admin().await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/admin/stores")
        .header(header::USER_AGENT, UA)
        .header(header::COOKIE, &admin)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], 400);
    assert!(
        body["detail"]
            .as_str()
            .unwrap()
            .starts_with("Invalid request body"),
        "{body}"
    );
}

#[tokio::test]
async fn admin_routes_require_admin_role() {
    let app = TestApp::new().await;
    let (_, user) = app.user("user@example.com").await;

    let (status, _, _) = app.send("GET", "/api/admin/stats", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _, body) = app.send("GET", "/api/admin/stats", Some(&user), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["detail"], "Admin access required");

    let (status, _, _) = app
        .send("DELETE", "/api/admin/stores/1", Some(&user), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn stats_count_every_record() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let (_, user) = app.user("user@example.com").await;
    let store = app.create_store(&admin, "shop@example.com", None).await;
    app.rate(&user, store, 4).await;

    let (status, _, body) = app.send("GET", "/api/admin/stats", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "users": 2, "stores": 1, "ratings": 1 }));
}

// ============================================================================
// Ratings
// ============================================================================

#[tokio::test]
async fn rating_scores_outside_range_are_rejected() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let (_, user) = app.user("user@example.com").await;
    let store = app.create_store(&admin, "shop@example.com", None).await;

    for bad in [0, 6] {
        let (status, body) = app.rate(&user, store, bad).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "Rating must be between 1 and 5");
    }

    let (status, _, body) = app.send("GET", "/api/admin/stats", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ratings"], 0);
}

#[tokio::test]
async fn rating_author_is_the_caller() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let (user_id, user) = app.user("user@example.com").await;
    let store = app.create_store(&admin, "shop@example.com", None).await;

    let (status, _, body) = app
        .send(
            "POST",
            "/api/ratings",
            Some(&user),
            Some(json!({ "storeId": store, "rating": 5, "userId": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["userId"], user_id);
    assert_eq!(body["storeId"], store);
    assert_eq!(body["rating"], 5);

    let (status, _, mine) = app.send("GET", "/api/ratings", Some(&user), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine.as_array().unwrap().len(), 1);

    let (_, _, admins) = app.send("GET", "/api/ratings", Some(&admin), None).await;
    assert_eq!(admins, json!([]));
}

#[tokio::test]
async fn anonymous_rating_rules() {
    let app = TestApp::new().await;

    let (status, _, body) = app.send("GET", "/api/ratings", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, _, _) = app
        .send(
            "POST",
            "/api/ratings",
            None,
            Some(json!({ "storeId": 1, "rating": 3 })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn rating_unknown_store_is_not_found() {
    let app = TestApp::new().await;
    let (_, user) = app.user("user@example.com").await;

    let (status, _) = app.rate(&user, 12, 3).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, body) = app.send("GET", "/api/stores/12/ratings", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn only_the_author_updates_a_rating() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let (_, author) = app.user("author@example.com").await;
    let (_, other) = app.user("other@example.com").await;
    let store = app.create_store(&admin, "shop@example.com", None).await;
    let (_, rating) = app.rate(&author, store, 2).await;
    let uri = format!("/api/ratings/{}", rating["id"]);

    let (status, _, _) = app
        .send("PATCH", &uri, Some(&other), Some(json!({ "rating": 5 })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _, body) = app
        .send("PATCH", &uri, Some(&author), Some(json!({ "rating": 7 })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Rating must be between 1 and 5");

    let (status, _, body) = app
        .send("PATCH", &uri, Some(&author), Some(json!({ "rating": 5 })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rating"], 5);

    let (status, _, _) = app
        .send(
            "PATCH",
            "/api/ratings/999",
            Some(&author),
            Some(json!({ "rating": 5 })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Deletion cascade and id allocation
// ============================================================================

#[tokio::test]
async fn deleting_a_store_removes_exactly_its_ratings() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let (_, user) = app.user("user@example.com").await;
    let kept = app.create_store(&admin, "kept@example.com", None).await;
    let doomed = app.create_store(&admin, "gone@example.com", None).await;

    app.rate(&user, kept, 5).await;
    app.rate(&user, doomed, 1).await;
    app.rate(&user, doomed, 2).await;

    let (status, _, _) = app
        .send("DELETE", &format!("/api/admin/stores/{doomed}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, _, kept_ratings) = app
        .send("GET", &format!("/api/stores/{kept}/ratings"), None, None)
        .await;
    assert_eq!(kept_ratings.as_array().unwrap().len(), 1);

    let (_, _, mine) = app.send("GET", "/api/ratings", Some(&user), None).await;
    assert_eq!(mine.as_array().unwrap().len(), 1);
    assert_eq!(mine[0]["storeId"], kept);

    let (status, _, _) = app
        .send("DELETE", &format!("/api/admin/stores/{doomed}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn ids_are_not_reused_after_deletion() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let first = app.create_store(&admin, "one@example.com", None).await;

    let (status, _, _) = app
        .send("DELETE", &format!("/api/admin/stores/{first}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let second = app.create_store(&admin, "two@example.com", None).await;
    assert!(second > first);
}

// ============================================================================
// Store owners
// ============================================================================

#[tokio::test]
async fn store_owner_sees_owned_stores() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let (owner_id, owner) = app.user("owner@example.com").await;

    let (status, _, _) = app.send("GET", "/api/owner/stores", Some(&owner), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _, _) = app
        .send(
            "PATCH",
            &format!("/api/admin/users/{owner_id}/role"),
            Some(&admin),
            Some(json!({ "role": "store_owner" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let owned = app.create_store(&admin, "owned@example.com", Some(owner_id)).await;
    app.create_store(&admin, "other@example.com", None).await;

    // Role change applies to the existing session
    let (status, _, body) = app.send("GET", "/api/owner/stores", Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);
    let stores = body.as_array().unwrap();
    assert_eq!(stores.len(), 1);
    assert_eq!(stores[0]["id"], owned);
    assert_eq!(stores[0]["ownerId"], owner_id);
}
