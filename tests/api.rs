//! Routing and auth behavior through the assembled router.

use axum::Router;
use axum::body::Body;
use breezebuy_server::db::DbService;
use breezebuy_server::db::models::UserRegister;
use breezebuy_server::db::models::user::{ROLE_CSR, ROLE_CUSTOMER, STATUS_DEACTIVATED};
use breezebuy_server::db::repository::UserRepository;
use breezebuy_server::{Config, ServerState, api};
use http::{Request, StatusCode};
use tower::ServiceExt;

async fn setup() -> (Router, ServerState) {
    let db = DbService::memory().await.unwrap();
    let state = ServerState::with_db(Config::from_env(), db);
    (api::create_router(state.clone()), state)
}

async fn register(state: &ServerState, username: &str) -> String {
    let users = UserRepository::new(state.get_db());
    let user = users
        .create(UserRegister {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password: "password123".to_string(),
        })
        .await
        .unwrap();
    user.id.unwrap().to_string()
}

fn token_for(state: &ServerState, id: &str, username: &str, roles: &[&str]) -> String {
    let roles: Vec<String> = roles.iter().map(|r| r.to_string()).collect();
    state
        .jwt_service
        .generate_token(id, username, &roles)
        .unwrap()
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn health_is_open_and_api_routes_are_guarded() {
    let (router, _state) = setup().await;

    let res = router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = router
        .oneshot(
            Request::builder()
                .uri("/api/products")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn deactivated_accounts_cannot_log_in() {
    let (router, state) = setup().await;
    let id = register(&state, "dora").await;

    let users = UserRepository::new(state.get_db());
    users.set_status(&id, STATUS_DEACTIVATED).await.unwrap();

    let res = router
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            r#"{"username":"dora","password":"password123"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn status_toggles_allowed_for_csr_and_self_but_not_customers() {
    let (router, state) = setup().await;
    let customer_id = register(&state, "carol").await;
    let staff_id = register(&state, "sam").await;
    let users = UserRepository::new(state.get_db());
    users.assign_role(&staff_id, ROLE_CSR).await.unwrap();

    let customer_token = token_for(&state, &customer_id, "carol", &[ROLE_CUSTOMER]);
    let staff_token = token_for(&state, &staff_id, "sam", &[ROLE_CUSTOMER, ROLE_CSR]);

    // CSR staff may flip another account's status
    let res = router
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/users/{customer_id}/status"),
            Some(&staff_token),
            r#"{"status":"deactivated"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let account = users.find_by_id(&customer_id).await.unwrap().unwrap();
    assert!(!account.is_active());

    // A plain customer may not
    let res = router
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/users/{staff_id}/status"),
            Some(&customer_token),
            r#"{"status":"deactivated"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Self-service: the account owner may toggle their own status
    let res = router
        .oneshot(json_request(
            "PUT",
            "/api/auth/me/status",
            Some(&customer_token),
            r#"{"status":"active"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let account = users.find_by_id(&customer_id).await.unwrap().unwrap();
    assert!(account.is_active());
}
