mod common;

use common::{InMemoryRepo, admin_record, member_record};
use react_hub_api::{
    AppState, create_router,
    models::{Post, TokenResponse, User},
    payments::MockPaymentService,
    repository::RepositoryState,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::net::TcpListener;
use uuid::Uuid;

pub struct TestApp {
    pub address: String,
}

/// Boots the full router on an ephemeral port over the in-memory fixtures.
async fn spawn_app(repo: InMemoryRepo) -> TestApp {
    let state = AppState {
        repo: Arc::new(repo) as RepositoryState,
        payments: Arc::new(MockPaymentService::new()),
        config: react_hub_api::AppConfig::default(),
    };
    let router = create_router(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestApp { address }
}

async fn fetch_token(app: &TestApp, client: &reqwest::Client, email: &str) -> String {
    let response = client
        .post(format!("{}/jwt", app.address))
        .json(&json!({ "email": email }))
        .send()
        .await
        .expect("req fail");
    assert!(response.status().is_success());
    response.json::<TokenResponse>().await.unwrap().token
}

#[tokio::test]
async fn test_service_status() {
    let app = spawn_app(InMemoryRepo::new()).await;
    let client = reqwest::Client::new();

    let response = client
        .get(&app.address)
        .send()
        .await
        .expect("req fail");
    assert!(response.status().is_success());

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "React Hub is running");
}

#[tokio::test]
async fn test_responses_carry_a_request_id() {
    let app = spawn_app(InMemoryRepo::new()).await;
    let client = reqwest::Client::new();

    let response = client.get(&app.address).send().await.expect("req fail");
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_guarded_route_without_token_is_401() {
    let app = spawn_app(InMemoryRepo::new()).await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/statistics", app.address))
        .send()
        .await
        .expect("req fail");
    assert_eq!(response.status(), 401);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Unauthorized");
}

#[tokio::test]
async fn test_guarded_route_with_bad_token_is_403() {
    let app = spawn_app(InMemoryRepo::new()).await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/statistics", app.address))
        .bearer_auth("definitely.not.valid")
        .send()
        .await
        .expect("req fail");
    assert_eq!(response.status(), 403);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Forbidden");
}

#[tokio::test]
async fn test_self_scope_mismatch_is_401_unauthorized_request() {
    let repo = InMemoryRepo::with_users(vec![member_record("alice@hub.com")]);
    let app = spawn_app(repo).await;
    let client = reqwest::Client::new();
    let token = fetch_token(&app, &client, "mallory@hub.com").await;

    let response = client
        .get(format!("{}/user/alice@hub.com", app.address))
        .bearer_auth(token)
        .send()
        .await
        .expect("req fail");
    assert_eq!(response.status(), 401);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Unauthorized Request");
}

#[tokio::test]
async fn test_admin_route_rejects_plain_member() {
    let repo = InMemoryRepo::with_users(vec![member_record("bob@hub.com")]);
    let app = spawn_app(repo).await;
    let client = reqwest::Client::new();
    let token = fetch_token(&app, &client, "bob@hub.com").await;

    let response = client
        .post(format!("{}/tags", app.address))
        .bearer_auth(token)
        .json(&json!({ "name": "react" }))
        .send()
        .await
        .expect("req fail");
    assert_eq!(response.status(), 403);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Forbidden Access");
}

#[tokio::test]
async fn test_admin_can_create_and_everyone_can_list_tags() {
    let repo = InMemoryRepo::with_users(vec![admin_record("root@hub.com")]);
    let app = spawn_app(repo).await;
    let client = reqwest::Client::new();
    let token = fetch_token(&app, &client, "root@hub.com").await;

    let created = client
        .post(format!("{}/tags", app.address))
        .bearer_auth(token)
        .json(&json!({ "name": "react" }))
        .send()
        .await
        .expect("req fail");
    assert!(created.status().is_success());

    // Listing is public.
    let listed: Value = client
        .get(format!("{}/tags", app.address))
        .send()
        .await
        .expect("req fail")
        .json()
        .await
        .unwrap();
    assert_eq!(listed[0]["name"], "react");
}

#[tokio::test]
async fn test_registration_login_and_profile_flow() {
    let app = spawn_app(InMemoryRepo::new()).await;
    let client = reqwest::Client::new();

    let created = client
        .post(format!("{}/users", app.address))
        .json(&json!({ "email": "alice@hub.com", "name": "Alice" }))
        .send()
        .await
        .expect("req fail");
    assert!(created.status().is_success());

    // Duplicate registration conflicts instead of inserting again.
    let duplicate = client
        .post(format!("{}/users", app.address))
        .json(&json!({ "email": "alice@hub.com", "name": "Alice" }))
        .send()
        .await
        .expect("req fail");
    assert_eq!(duplicate.status(), 409);

    let token = fetch_token(&app, &client, "alice@hub.com").await;
    let profile: User = client
        .get(format!("{}/user/alice@hub.com", app.address))
        .bearer_auth(token)
        .send()
        .await
        .expect("req fail")
        .json()
        .await
        .unwrap();
    assert_eq!(profile.email, "alice@hub.com");
    assert_eq!(profile.name.as_deref(), Some("Alice"));
}

#[tokio::test]
async fn test_post_listing_treats_malformed_page_as_page_zero() {
    let posts: Vec<Post> = (0..8)
        .map(|_| Post {
            id: Uuid::new_v4(),
            email: "a@hub.com".to_string(),
            ..Post::default()
        })
        .collect();
    let app = spawn_app(InMemoryRepo::with_posts(posts)).await;
    let client = reqwest::Client::new();

    let first_page: Vec<Post> = client
        .get(format!("{}/posts", app.address))
        .send()
        .await
        .expect("req fail")
        .json()
        .await
        .unwrap();
    assert_eq!(first_page.len(), 5);

    // A garbage page parameter must serve page 0, not an empty result.
    let garbage_page: Vec<Post> = client
        .get(format!("{}/posts?page=abc", app.address))
        .send()
        .await
        .expect("req fail")
        .json()
        .await
        .unwrap();
    assert_eq!(garbage_page.len(), 5);

    let count: Value = client
        .get(format!("{}/posts-count", app.address))
        .send()
        .await
        .expect("req fail")
        .json()
        .await
        .unwrap();
    assert_eq!(count["postsCount"], 8);
}

#[tokio::test]
async fn test_payment_intent_requires_auth_and_returns_secret() {
    let app = spawn_app(InMemoryRepo::new()).await;
    let client = reqwest::Client::new();

    let unauthenticated = client
        .get(format!("{}/create-payment-intent", app.address))
        .send()
        .await
        .expect("req fail");
    assert_eq!(unauthenticated.status(), 401);

    let token = fetch_token(&app, &client, "alice@hub.com").await;
    let body: Value = client
        .get(format!("{}/create-payment-intent", app.address))
        .bearer_auth(token)
        .send()
        .await
        .expect("req fail")
        .json()
        .await
        .unwrap();
    assert_eq!(body["clientSecret"], "pi_mock_secret_500_usd");
}
