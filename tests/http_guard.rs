use axum::{
    body::{to_bytes, Body},
    http::{
        header::{COOKIE, LOCATION},
        Request, StatusCode,
    },
    middleware,
    response::Response,
    routing::get,
    Extension, Router,
};
use base64ct::{Base64UrlUnpadded, Encoding};
use gatehouse::{
    gatehouse::router,
    guard::{
        entry::unix_now, enforce, CurrentUser, GuardConfig, Identity, RedirectIfAuthed,
        RequireRole, RequireUser, StaffOnly,
    },
};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

fn access_cookie(payload: &serde_json::Value) -> String {
    format!(
        "access_token=e30.{}.c2ln",
        Base64UrlUnpadded::encode_string(payload.to_string().as_bytes())
    )
}

fn student() -> String {
    access_cookie(&json!({ "sub": "s-1", "role": "STUDENT", "exp": unix_now() + 3600 }))
}

fn reviewer() -> String {
    access_cookie(&json!({ "sub": "r-1", "role": "REVIEWER", "exp": unix_now() + 3600 }))
}

fn expired() -> String {
    access_cookie(&json!({ "sub": "s-1", "role": "STUDENT", "exp": unix_now() - 60 }))
}

fn location(response: &Response) -> Option<&str> {
    response.headers().get(LOCATION)?.to_str().ok()
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn send(app: Router, path: &str, cookie: Option<&str>) -> Response {
    let mut request = Request::builder().uri(path);
    if let Some(cookie) = cookie {
        request = request.header(COOKIE, cookie);
    }
    app.oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn check(forwarded: &str, cookie: Option<&str>) -> Response {
    let app = router(Arc::new(GuardConfig::new()));
    let mut request = Request::builder()
        .uri("/v1/guard/check")
        .header("x-forwarded-uri", forwarded);
    if let Some(cookie) = cookie {
        request = request.header(COOKIE, cookie);
    }
    app.oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

#[tokio::test]
async fn health_reports_package() {
    let app = router(Arc::new(GuardConfig::new()));
    let response = send(app, "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-app"));
    assert!(response.headers().contains_key("x-request-id"));
    let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["name"], env!("CARGO_PKG_NAME"));
}

#[tokio::test]
async fn check_public_path_passes() {
    let response = check("/legal", None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn check_protected_path_without_token_redirects_to_login() {
    let response = check("/student/blocks", None).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), Some("/login"));
}

#[tokio::test]
async fn check_expired_token_redirects_to_login() {
    let response = check("/student/dashboard", Some(&expired())).await;
    assert_eq!(location(&response), Some("/login"));
}

#[tokio::test]
async fn check_student_on_admin_is_forbidden() {
    let response = check("/admin/review-queue?tab=open", Some(&student())).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), Some("/403"));
}

#[tokio::test]
async fn check_reviewer_on_admin_passes_without_identity_headers() {
    let response = check("/admin/issues", Some(&reviewer())).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(response.headers().get(LOCATION).is_none());
}

#[tokio::test]
async fn check_login_bounces_signed_in_callers() {
    let response = check("/login", Some(&student())).await;
    assert_eq!(location(&response), Some("/student/dashboard"));

    let response = check("/signup", Some(&reviewer())).await;
    assert_eq!(location(&response), Some("/admin"));

    let response = check("/login", None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn check_without_forwarded_path_is_bad_request() {
    let app = router(Arc::new(GuardConfig::new()));
    let response = send(app, "/v1/guard/check", Some(&student())).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn check_decides_on_the_normalized_path() {
    for spelling in [
        "/%61dmin",
        "//admin",
        "/admin/",
        "/student/../admin",
        "/student/%2e%2e/admin/issues",
        "/student%2F..%2Fadmin",
    ] {
        let response = check(spelling, Some(&student())).await;
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT, "{spelling}");
        assert_eq!(location(&response), Some("/403"), "{spelling}");
    }

    let response = check("/%61dmin", Some(&reviewer())).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn check_undecodable_path_is_bad_request() {
    let response = check("/admin%ff", Some(&reviewer())).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn openapi_lists_check_route() {
    let app = router(Arc::new(GuardConfig::new()));
    let response = send(app, "/openapi.json", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let doc: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert!(doc["paths"]["/v1/guard/check"].is_object());
}

fn guarded_app() -> Router {
    let config = Arc::new(GuardConfig::new());
    Router::new()
        .route(
            "/student/dashboard",
            get(|Extension(identity): Extension<Identity>| async move {
                identity.subject().unwrap_or_default().to_string()
            }),
        )
        .route("/admin", get(|| async { "admin" }))
        .route("/login", get(|| async { "login form" }))
        .route("/contact", get(|| async { "contact" }))
        .layer(middleware::from_fn_with_state(config, enforce))
}

#[tokio::test]
async fn middleware_passes_identity_to_handlers() {
    let response = send(guarded_app(), "/student/dashboard", Some(&student())).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "s-1");
}

#[tokio::test]
async fn middleware_redirects_by_rule() {
    let response = send(guarded_app(), "/student/dashboard", None).await;
    assert_eq!(location(&response), Some("/login"));

    let response = send(guarded_app(), "/admin", Some(&student())).await;
    assert_eq!(location(&response), Some("/403"));

    let response = send(guarded_app(), "/login", Some(&reviewer())).await;
    assert_eq!(location(&response), Some("/admin"));

    let response = send(guarded_app(), "/contact", Some(&expired())).await;
    assert_eq!(response.status(), StatusCode::OK);
}

fn custom_targets_app() -> Router {
    let config = Arc::new(
        GuardConfig::new()
            .with_login_path("/sign-in".to_string())
            .with_forbidden_path("/admin/denied".to_string()),
    );
    Router::new()
        .route("/student/dashboard", get(|| async { "dashboard" }))
        .route("/admin", get(|| async { "admin" }))
        .route("/admin/denied", get(|| async { "denied" }))
        .route("/sign-in", get(|| async { "sign-in form" }))
        .layer(middleware::from_fn_with_state(config, enforce))
}

#[tokio::test]
async fn middleware_serves_custom_login_and_forbidden_pages() {
    let response = send(custom_targets_app(), "/sign-in", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "sign-in form");

    let response = send(custom_targets_app(), "/student/dashboard", None).await;
    assert_eq!(location(&response), Some("/sign-in"));

    let response = send(custom_targets_app(), "/admin", Some(&student())).await;
    assert_eq!(location(&response), Some("/admin/denied"));

    let response = send(custom_targets_app(), "/admin/denied", Some(&student())).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "denied");

    let response = send(custom_targets_app(), "/sign-in", Some(&student())).await;
    assert_eq!(location(&response), Some("/student/dashboard"));
}

fn extractor_app() -> Router {
    Router::new()
        .route(
            "/me",
            get(|RequireUser(identity): RequireUser| async move {
                identity.subject().unwrap_or_default().to_string()
            }),
        )
        .route(
            "/review",
            get(
                |RequireRole(identity, _): RequireRole<StaffOnly>| async move {
                    identity.role().map(|role| role.to_string()).unwrap_or_default()
                },
            ),
        )
        .route("/login", get(|_: RedirectIfAuthed| async { "login form" }))
        .route(
            "/whoami",
            get(|CurrentUser(user): CurrentUser| async move {
                user.and_then(|identity| identity.subject().map(ToString::to_string))
                    .unwrap_or_else(|| "anonymous".to_string())
            }),
        )
        .layer(Extension(Arc::new(GuardConfig::new())))
}

#[tokio::test]
async fn extractors_guard_handlers() {
    let response = send(extractor_app(), "/me", Some(&student())).await;
    assert_eq!(body_text(response).await, "s-1");

    let response = send(extractor_app(), "/me", Some(&expired())).await;
    assert_eq!(location(&response), Some("/login"));

    let response = send(extractor_app(), "/review", Some(&reviewer())).await;
    assert_eq!(body_text(response).await, "REVIEWER");

    let response = send(extractor_app(), "/review", Some(&student())).await;
    assert_eq!(location(&response), Some("/403"));

    let response = send(extractor_app(), "/login", Some(&student())).await;
    assert_eq!(location(&response), Some("/student/dashboard"));

    let response = send(extractor_app(), "/login", None).await;
    assert_eq!(body_text(response).await, "login form");

    let response = send(extractor_app(), "/whoami", None).await;
    assert_eq!(body_text(response).await, "anonymous");
}

#[tokio::test]
async fn extractors_without_config_fail_closed() {
    let app = Router::new().route("/me", get(|_: RequireUser| async { "me" }));
    let response = send(app, "/me", Some(&student())).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
