//! HTTP-level tests for the auth routes, driven through the session middleware.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use auth::application::{AdminSeed, SeedAdminUseCase, spawn_session_reaper};
use auth::domain::repository::UserRepository;
use auth::{AuthConfig, MemoryAuthRepository, auth_router, with_session};
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use platform::password::KdfParams;
use serde_json::{Value, json};
use tower::ServiceExt;

/// Collects formatted log lines for the current thread
#[derive(Clone, Default)]
struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl LogCapture {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

const UA: &str = "auth-tests/1.0";

struct TestApp {
    router: Router,
    repo: Arc<MemoryAuthRepository>,
    config: Arc<AuthConfig>,
}

impl TestApp {
    fn new() -> Self {
        Self::with_config(AuthConfig::development())
    }

    fn with_config(config: AuthConfig) -> Self {
        let repo = Arc::new(MemoryAuthRepository::new());
        let config = Arc::new(config);
        let api = Router::new().nest("/api", auth_router(repo.clone(), config.clone()));
        let router = with_session(api, repo.clone(), config.clone());
        Self {
            router,
            repo,
            config,
        }
    }

    async fn send(
        &self,
        method: &str,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Option<String>, Value) {
        self.send_as(UA, method, uri, cookie, body).await
    }

    async fn send_as(
        &self,
        user_agent: &str,
        method: &str,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Option<String>, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::USER_AGENT, user_agent);
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

    async fn register(&self, email: &str, password: &str) -> (StatusCode, Option<String>, Value) {
        self.send(
            "POST",
            "/api/register",
            None,
            Some(json!({
                "name": "Test User",
                "email": email,
                "address": "12 Market Street",
                "password": password,
            })),
        )
        .await
    }

    async fn login(&self, email: &str, password: &str) -> (StatusCode, Option<String>, Value) {
        self.send(
            "POST",
            "/api/login",
            None,
            Some(json!({ "email": email, "password": password })),
        )
        .await
    }

    async fn seed_admin(&self) -> String {
        SeedAdminUseCase::new(self.repo.clone(), self.config.clone())
            .execute(AdminSeed::default())
            .await
            .unwrap();
        let (status, cookie, _) = self.login("admin@store-ratings.com", "Admin@123").await;
        assert_eq!(status, StatusCode::OK);
        cookie.unwrap()
    }
}

// ============================================================================
// Registration and login
// ============================================================================

#[tokio::test]
async fn register_creates_user_and_session() {
    let app = TestApp::new();

    let (status, cookie, body) = app.register("New.User@Example.com", "Abcd123!").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "new.user@example.com");
    assert_eq!(body["role"], "user");
    assert_eq!(body["id"], 1);
    assert!(body.get("password").is_none());

    let (status, _, me) = app.send("GET", "/api/user", cookie.as_deref(), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "new.user@example.com");
}

#[tokio::test]
async fn register_ignores_requested_role() {
    let app = TestApp::new();
    let (status, _, body) = app
        .send(
            "POST",
            "/api/register",
            None,
            Some(json!({
                "name": "Sneaky User",
                "email": "sneaky@example.com",
                "address": "12 Market Street",
                "password": "Abcd123!",
                "role": "admin",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["role"], "user");
}

#[tokio::test]
async fn register_duplicate_email_conflicts() {
    let app = TestApp::new();
    app.register("dup@example.com", "Abcd123!").await;

    let (status, cookie, body) = app.register("DUP@example.COM", "Abcd123!").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(cookie.is_none());
    assert_eq!(body["detail"], "Email already registered");
}

#[tokio::test]
async fn register_reports_every_invalid_field() {
    let app = TestApp::new();
    let (status, _, body) = app
        .send(
            "POST",
            "/api/register",
            None,
            Some(json!({
                "name": "Al",
                "email": "not-an-email",
                "address": "x",
                "password": "weak",
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["name", "email", "address", "password"]);
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let app = TestApp::new();
    let request = Request::builder()
        .method("POST")
        .uri("/api/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_rejects_wrong_password_and_unknown_email() {
    let app = TestApp::new();
    app.register("user@example.com", "Abcd123!").await;

    let (status, cookie, _) = app.login("user@example.com", "Abcd123?").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(cookie.is_none());

    let (status, _, _) = app.login("nobody@example.com", "Abcd123!").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, cookie, body) = app.login("USER@example.com", "Abcd123!").await;
    assert_eq!(status, StatusCode::OK);
    assert!(cookie.is_some());
    assert_eq!(body["email"], "user@example.com");
}

#[tokio::test]
async fn unknown_email_costs_a_password_derivation() {
    let app = TestApp::with_config(AuthConfig {
        kdf: KdfParams {
            memory_kib: 19 * 1024,
            iterations: 4,
            parallelism: 1,
        },
        ..AuthConfig::development()
    });
    app.register("timed@example.com", "Abcd123!").await;

    let started = Instant::now();
    let (status, _, wrong_password) = app.login("timed@example.com", "Abcd123?").await;
    let known = started.elapsed();
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let started = Instant::now();
    let (status, _, unknown_email) = app.login("absent@example.com", "Abcd123?").await;
    let unknown = started.elapsed();
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert_eq!(wrong_password, unknown_email);
    assert!(unknown * 4 >= known, "unknown={unknown:?} known={known:?}");
}

#[tokio::test]
async fn login_with_missing_fields_is_bad_request() {
    let app = TestApp::new();
    let (status, _, body) = app.send("POST", "/api/login", None, Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"].as_array().unwrap().len(), 2);
}

// ============================================================================
// Sessions
// ============================================================================

#[tokio::test]
async fn anonymous_user_endpoint_is_unauthorized() {
    let app = TestApp::new();
    let (status, _, body) = app.send("GET", "/api/user", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Authentication required");
}

#[tokio::test]
async fn logout_invalidates_session() {
    let app = TestApp::new();
    let (_, cookie, _) = app.register("bye@example.com", "Abcd123!").await;
    let cookie = cookie.unwrap();

    let (status, cleared, _) = app.send("POST", "/api/logout", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(cleared.unwrap().ends_with('='));

    let (status, _, _) = app.send("GET", "/api/user", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.repo.session_count().await, 0);
}

#[tokio::test]
async fn logout_without_session_still_succeeds() {
    let app = TestApp::new();
    let (status, cleared, _) = app.send("POST", "/api/logout", None, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(cleared.is_some());
}

#[tokio::test]
async fn tampered_cookie_is_anonymous() {
    let app = TestApp::new();
    let (_, cookie, _) = app.register("tamper@example.com", "Abcd123!").await;
    let tampered = format!("{}x", cookie.unwrap());

    let (status, _, _) = app.send("GET", "/api/user", Some(&tampered), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn session_is_bound_to_user_agent() {
    let app = TestApp::new();
    let (_, cookie, _) = app.register("bound@example.com", "Abcd123!").await;
    let cookie = cookie.unwrap();

    let (status, _, _) = app
        .send_as("other-browser", "GET", "/api/user", Some(&cookie), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, refreshed, _) = app.send("GET", "/api/user", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(refreshed.as_deref(), Some(cookie.as_str()));
}

#[tokio::test]
async fn expired_session_is_rejected_and_removed() {
    let app = TestApp::with_config(AuthConfig {
        session_idle_ttl: Duration::from_millis(1),
        ..AuthConfig::development()
    });
    let (_, cookie, _) = app.register("late@example.com", "Abcd123!").await;
    tokio::time::sleep(Duration::from_millis(20)).await;

    let (status, _, _) = app.send("GET", "/api/user", cookie.as_deref(), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.repo.session_count().await, 0);
}

#[tokio::test]
async fn reaper_removes_expired_sessions() {
    let app = TestApp::with_config(AuthConfig {
        session_idle_ttl: Duration::from_millis(1),
        ..AuthConfig::development()
    });
    app.register("a@example.com", "Abcd123!").await;
    app.register("b@example.com", "Abcd123!").await;
    assert_eq!(app.repo.session_count().await, 2);

    let reaper = spawn_session_reaper(app.repo.clone(), Duration::from_millis(10));
    tokio::time::sleep(Duration::from_millis(60)).await;
    reaper.abort();

    assert_eq!(app.repo.session_count().await, 0);
}

// ============================================================================
// Password change
// ============================================================================

#[tokio::test]
async fn password_change_scenario() {
    let app = TestApp::new();
    let (_, cookie, _) = app.register("pw@example.com", "Abcd123!").await;
    let cookie = cookie.unwrap();
    let before = app
        .repo
        .find_user(kernel::id::UserId::from_raw(1))
        .await
        .unwrap()
        .unwrap()
        .password
        .as_encoded()
        .to_string();

    // Wrong current password: rejected, credential untouched
    let (status, _, body) = app
        .send(
            "POST",
            "/api/user/password",
            Some(&cookie),
            Some(json!({ "currentPassword": "Wrong123!", "newPassword": "Efgh456@" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Current password is incorrect");
    let after = app
        .repo
        .find_user(kernel::id::UserId::from_raw(1))
        .await
        .unwrap()
        .unwrap()
        .password
        .as_encoded()
        .to_string();
    assert_eq!(before, after);

    // Correct current password
    let (status, _, _) = app
        .send(
            "POST",
            "/api/user/password",
            Some(&cookie),
            Some(json!({ "currentPassword": "Abcd123!", "newPassword": "Efgh456@" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, _) = app.login("pw@example.com", "Efgh456@").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _, _) = app.login("pw@example.com", "Abcd123!").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn password_change_enforces_policy() {
    let app = TestApp::new();
    let (_, cookie, _) = app.register("policy@example.com", "Abcd123!").await;

    let (status, _, body) = app
        .send(
            "POST",
            "/api/user/password",
            cookie.as_deref(),
            Some(json!({ "currentPassword": "Abcd123!", "newPassword": "nospecial1A" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "newPassword");
}

#[tokio::test]
async fn password_change_revokes_other_sessions() {
    let app = TestApp::new();
    let (_, first, _) = app.register("multi@example.com", "Abcd123!").await;
    let (_, second, _) = app.login("multi@example.com", "Abcd123!").await;
    let (first, second) = (first.unwrap(), second.unwrap());

    let (status, _, _) = app
        .send(
            "POST",
            "/api/user/password",
            Some(&first),
            Some(json!({ "currentPassword": "Abcd123!", "newPassword": "Efgh456@" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, _) = app.send("GET", "/api/user", Some(&first), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _, _) = app.send("GET", "/api/user", Some(&second), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Administration
// ============================================================================

#[tokio::test]
async fn seeding_admin_is_idempotent() {
    let app = TestApp::new();
    let seed = SeedAdminUseCase::new(app.repo.clone(), app.config.clone());

    let first = seed.execute(AdminSeed::default()).await.unwrap();
    assert!(first.is_some());
    let second = seed.execute(AdminSeed::default()).await.unwrap();
    assert!(second.is_none());
    assert_eq!(app.repo.count_users().await.unwrap(), 1);
}

#[tokio::test]
async fn admin_routes_require_admin_role() {
    let app = TestApp::new();
    let (_, user_cookie, _) = app.register("plain@example.com", "Abcd123!").await;

    let (status, _, _) = app.send("GET", "/api/admin/users", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _, body) = app
        .send("GET", "/api/admin/users", user_cookie.as_deref(), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["detail"], "Admin access required");

    let admin = app.seed_admin().await;
    let (status, _, users) = app.send("GET", "/api/admin/users", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    let emails: Vec<&str> = users
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["email"].as_str().unwrap())
        .collect();
    assert_eq!(emails, vec!["plain@example.com", "admin@store-ratings.com"]);
}

#[tokio::test]
async fn role_update_rejects_unknown_roles() {
    let app = TestApp::new();
    app.register("target@example.com", "Abcd123!").await;
    let admin = app.seed_admin().await;

    for bad in ["superuser", "ADMIN", "", "store-owner"] {
        let (status, _, body) = app
            .send(
                "PATCH",
                "/api/admin/users/1/role",
                Some(&admin),
                Some(json!({ "role": bad })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{bad:?}");
        assert_eq!(body["detail"], "Invalid role");
    }

    let user = app
        .repo
        .find_user(kernel::id::UserId::from_raw(1))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.user_role.code(), "user");
}

#[tokio::test]
async fn role_update_applies_to_existing_sessions() {
    let app = TestApp::new();
    let (_, user_cookie, _) = app.register("promote@example.com", "Abcd123!").await;
    let admin = app.seed_admin().await;

    let (status, _, body) = app
        .send(
            "PATCH",
            "/api/admin/users/1/role",
            Some(&admin),
            Some(json!({ "role": "admin" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "admin");

    let (status, _, _) = app
        .send("GET", "/api/admin/users", user_cookie.as_deref(), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn role_update_unknown_user_and_bad_id() {
    let app = TestApp::new();
    let admin = app.seed_admin().await;

    let (status, _, _) = app
        .send(
            "PATCH",
            "/api/admin/users/42/role",
            Some(&admin),
            Some(json!({ "role": "user" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, body) = app
        .send(
            "PATCH",
            "/api/admin/users/abc/role",
            Some(&admin),
            Some(json!({ "role": "user" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Invalid identifier");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_role_and_password_changes_both_persist() {
    let app = Arc::new(TestApp::new());
    let (_, user_cookie, _) = app.register("both@example.com", "Abcd123!").await;
    let user_cookie = user_cookie.unwrap();
    let admin = app.seed_admin().await;

    for round in 0..8 {
        let (current, next) = if round % 2 == 0 {
            ("Abcd123!", "Efgh456@")
        } else {
            ("Efgh456@", "Abcd123!")
        };
        let role = if round % 2 == 0 { "store_owner" } else { "user" };

        let password_change = {
            let app = app.clone();
            let cookie = user_cookie.clone();
            tokio::spawn(async move {
                app.send(
                    "POST",
                    "/api/user/password",
                    Some(&cookie),
                    Some(json!({ "currentPassword": current, "newPassword": next })),
                )
                .await
                .0
            })
        };
        let role_change = {
            let app = app.clone();
            let admin = admin.clone();
            tokio::spawn(async move {
                app.send(
                    "PATCH",
                    "/api/admin/users/1/role",
                    Some(&admin),
                    Some(json!({ "role": role })),
                )
                .await
                .0
            })
        };

        assert_eq!(password_change.await.unwrap(), StatusCode::OK);
        assert_eq!(role_change.await.unwrap(), StatusCode::OK);

        let user = app
            .repo
            .find_user(kernel::id::UserId::from_raw(1))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.user_role.code(), role, "round {round}");
        let (status, _, _) = app.login("both@example.com", next).await;
        assert_eq!(status, StatusCode::OK, "round {round}");
    }
}

#[tokio::test]
async fn account_logs_omit_email_addresses() {
    let capture = LogCapture::default();
    let writer = capture.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let app = TestApp::new();
    let (status, _, _) = app.register("quiet@example.com", "Abcd123!").await;
    assert_eq!(status, StatusCode::CREATED);
    app.seed_admin().await;

    let logs = capture.contents();
    assert!(logs.contains("User signed up"), "{logs}");
    assert_eq!(logs.matches("Admin account seeded").count(), 1, "{logs}");
    assert!(!logs.contains("quiet@example.com"), "{logs}");
    assert!(!logs.contains("admin@store-ratings.com"), "{logs}");
}
