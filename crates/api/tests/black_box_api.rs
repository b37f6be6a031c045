use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use filmapi_api::app::{build_app, AppServices};
use filmapi_auth::{Hs256JwtCodec, Identity, JwtClaims, Role};
use filmapi_core::{Movie, MovieFields, MovieId, UserId};
use filmapi_infra::{RecordStore, StoreError, StoreResult};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::{json, Value};

const JWT_SECRET: &str = "test-secret";

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, in-memory stores, ephemeral port.
        Self::spawn_with(in_memory_services()).await
    }

    async fn spawn_with(services: AppServices) -> Self {
        let app = build_app(services);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            client: reqwest::Client::new(),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn in_memory_services() -> AppServices {
    AppServices::in_memory(Hs256JwtCodec::new(JWT_SECRET.as_bytes(), ChronoDuration::minutes(10)))
}

fn identity(role: &'static str) -> Identity {
    Identity {
        id: UserId::from_i64(1),
        username: "tester".into(),
        role: Role::new(role),
    }
}

fn mint_jwt_with(secret: &str, role: &'static str, issued_at: chrono::DateTime<Utc>, ttl: ChronoDuration) -> String {
    let claims = JwtClaims::new(identity(role), issued_at, ttl);
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("failed to encode jwt")
}

fn mint_jwt(role: &'static str) -> String {
    mint_jwt_with(JWT_SECRET, role, Utc::now(), ChronoDuration::minutes(10))
}

async fn create_movie(srv: &TestServer, token: &str, body: Value) -> Value {
    let res = srv
        .client
        .post(srv.url("/movies"))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    res.json().await.unwrap()
}

async fn error_of(res: reqwest::Response) -> String {
    let body: Value = res.json().await.unwrap();
    body["error"].as_str().expect("error body has an `error` string").to_string()
}

#[tokio::test]
async fn status_reports_service_name() {
    let srv = TestServer::spawn().await;

    let res = srv.client.get(srv.url("/status")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "ok": true, "service": "film-api" }));
}

#[tokio::test]
async fn unmatched_routes_get_json_404() {
    let srv = TestServer::spawn().await;

    let res = srv.client.get(srv.url("/nope")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_of(res).await, "route not found");
}

#[tokio::test]
async fn movie_lifecycle_create_get_delete() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt("admin");

    let created = create_movie(
        &srv,
        &token,
        json!({ "title": "Parasite", "director": "Bong Joon-ho", "year": 2019 }),
    )
    .await;
    assert_eq!(created["title"], "Parasite");
    assert_eq!(created["director"], "Bong Joon-ho");
    assert_eq!(created["year"], 2019);
    let id = created["id"].as_i64().expect("numeric id");

    let res = srv.client.get(srv.url(&format!("/movies/{id}"))).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let fetched: Value = res.json().await.unwrap();
    assert_eq!(fetched, created);

    let res = srv
        .client
        .delete(srv.url(&format!("/movies/{id}")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert!(res.bytes().await.unwrap().is_empty());

    let res = srv.client.get(srv.url(&format!("/movies/{id}"))).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Deleting again is a plain 404, not a crash.
    let res = srv
        .client
        .delete(srv.url(&format!("/movies/{id}")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_returns_every_movie_with_unique_ids() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt("user");

    let mut ids = std::collections::HashSet::new();
    for (title, year) in [("Mother", 2009), ("Okja", 2017), ("The Host", 2006)] {
        let created = create_movie(&srv, &token, json!({ "title": title, "director": "Bong Joon-ho", "year": year })).await;
        assert!(ids.insert(created["id"].as_i64().unwrap()));
    }

    let res = srv.client.get(srv.url("/movies")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let list: Vec<Value> = res.json().await.unwrap();
    assert_eq!(list.len(), 3);
}

#[tokio::test]
async fn replace_requires_every_field_and_is_idempotent() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt("user");
    let created = create_movie(
        &srv,
        &token,
        json!({ "title": "Inception", "director": "Christopher Nolan", "year": 2010 }),
    )
    .await;
    let path = format!("/movies/{}", created["id"]);

    // Partial update is rejected.
    let res = srv
        .client
        .put(srv.url(&path))
        .bearer_auth(&token)
        .json(&json!({ "title": "Tenet" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_of(res).await, "director, year are required");

    let replacement = json!({ "title": "Tenet", "director": "Christopher Nolan", "year": 2020 });
    for _ in 0..2 {
        let res = srv
            .client
            .put(srv.url(&path))
            .bearer_auth(&token)
            .json(&replacement)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    let fetched: Value = srv.client.get(srv.url(&path)).send().await.unwrap().json().await.unwrap();
    assert_eq!(fetched["id"], created["id"]);
    assert_eq!(fetched["title"], "Tenet");
    assert_eq!(fetched["year"], 2020);
    assert_eq!(fetched["created_at"], created["created_at"]);

    let res = srv
        .client
        .put(srv.url("/movies/999"))
        .bearer_auth(&token)
        .json(&replacement)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_input_is_400() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt("admin");

    let res = srv
        .client
        .post(srv.url("/movies"))
        .bearer_auth(&token)
        .json(&json!({ "title": "", "director": "Jane Campion", "year": 2021 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_of(res).await, "title is required");

    let res = srv
        .client
        .post(srv.url("/movies"))
        .bearer_auth(&token)
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = srv
        .client
        .post(srv.url("/movies"))
        .bearer_auth(&token)
        .json(&json!({ "title": "Heat", "director": "Michael Mann", "year": "nineteen ninety-five" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    for path in ["/movies/abc", "/movies/0", "/directors/64b1f0c2a9e4d1"] {
        let res = srv.client.get(srv.url(path)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "GET {path}");
        assert_eq!(error_of(res).await, "invalid id format");
    }

    let res = srv
        .client
        .delete(srv.url("/movies/abc"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn write_routes_require_a_valid_token() {
    let srv = TestServer::spawn().await;
    let body = json!({ "title": "Aftersun", "director": "Charlotte Wells", "year": 2022 });

    // Missing header.
    let res = srv.client.post(srv.url("/movies")).json(&body).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Signed with someone else's secret.
    let forged = mint_jwt_with("not-the-secret", "admin", Utc::now(), ChronoDuration::minutes(10));
    let res = srv.client.post(srv.url("/movies")).bearer_auth(forged).json(&body).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Expired.
    let expired = mint_jwt_with(JWT_SECRET, "admin", Utc::now() - ChronoDuration::hours(2), ChronoDuration::hours(1));
    let res = srv.client.post(srv.url("/movies")).bearer_auth(expired).json(&body).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Payload swapped under the original signature.
    let user_token = mint_jwt("user");
    let admin_token = mint_jwt_with(JWT_SECRET, "admin", Utc::now(), ChronoDuration::minutes(20));
    let user_parts: Vec<&str> = user_token.split('.').collect();
    let admin_parts: Vec<&str> = admin_token.split('.').collect();
    let tampered = format!("{}.{}.{}", user_parts[0], admin_parts[1], user_parts[2]);
    let res = srv.client.post(srv.url("/movies")).bearer_auth(tampered).json(&body).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Reads stay public; nothing was created.
    let list: Vec<Value> = srv.client.get(srv.url("/movies")).send().await.unwrap().json().await.unwrap();
    assert!(list.is_empty());
}

#[tokio::test]
async fn delete_requires_a_token() {
    let srv = TestServer::spawn().await;
    let user = mint_jwt("user");

    let res = srv
        .client
        .post(srv.url("/directors"))
        .bearer_auth(&user)
        .json(&json!({ "name": "Kelly Reichardt", "birthYear": 1964 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await.unwrap();
    let path = format!("/directors/{}", created["id"]);

    let res = srv.client.delete(srv.url(&path)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = srv.client.delete(srv.url(&path)).bearer_auth(&user).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn unknown_methods_on_known_paths_get_json_404() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt("user");

    let res = srv.client.post(srv.url("/status")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_of(res).await, "route not found");

    // No token needed to learn a method is unrouted.
    let res = srv.client.delete(srv.url("/movies")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_of(res).await, "route not found");

    let res = srv.client.delete(srv.url("/movies")).bearer_auth(&token).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = srv
        .client
        .patch(srv.url("/movies/1"))
        .bearer_auth(&token)
        .json(&json!({ "title": "Heat" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_of(res).await, "route not found");

    let res = srv.client.get(srv.url("/auth/register")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = srv.client.post(srv.url("/auth/me")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn directors_mirror_movies() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt("admin");

    let res = srv
        .client
        .post(srv.url("/directors"))
        .bearer_auth(&token)
        .json(&json!({ "name": "Christopher Nolan", "birthYear": 1970 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await.unwrap();
    assert_eq!(created["birthYear"], 1970);
    let path = format!("/directors/{}", created["id"]);

    let res = srv
        .client
        .post(srv.url("/directors"))
        .bearer_auth(&token)
        .json(&json!({ "name": "Bong Joon-ho" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_of(res).await, "birthYear is required");

    let res = srv
        .client
        .put(srv.url(&path))
        .bearer_auth(&token)
        .json(&json!({ "name": "Christopher Edward Nolan", "birthYear": 1970 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let fetched: Value = srv.client.get(srv.url(&path)).send().await.unwrap().json().await.unwrap();
    assert_eq!(fetched["name"], "Christopher Edward Nolan");

    let list: Vec<Value> = srv.client.get(srv.url("/directors")).send().await.unwrap().json().await.unwrap();
    assert_eq!(list.len(), 1);

    let res = srv.client.get(srv.url("/directors/42")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_of(res).await, "director not found");
}

#[tokio::test]
async fn registration_validates_and_enforces_unique_usernames() {
    let srv = TestServer::spawn().await;

    let res = srv
        .client
        .post(srv.url("/auth/register"))
        .json(&json!({ "username": "Hana", "password": "12345" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = srv
        .client
        .post(srv.url("/auth/register"))
        .json(&json!({ "username": "Hana" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // The short-password attempt stored nothing, so this is the first record.
    let res = srv
        .client
        .post(srv.url("/auth/register"))
        .json(&json!({ "username": "Hana", "password": "123456" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["username"], "hana");
    assert!(body["id"].is_number());
    assert!(body.get("password").is_none() && body.get("password_hash").is_none());

    let res = srv
        .client
        .post(srv.url("/auth/register"))
        .json(&json!({ "username": "HANA", "password": "different-pass" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    // Exactly one record: the original password still works.
    let res = srv
        .client
        .post(srv.url("/auth/login"))
        .json(&json!({ "username": "hana", "password": "123456" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn login_issues_token_that_reaches_handlers() {
    let srv = TestServer::spawn().await;

    let res = srv
        .client
        .post(srv.url("/auth/register"))
        .json(&json!({ "username": "Ivan", "password": "correct horse" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = srv
        .client
        .post(srv.url("/auth/login"))
        .json(&json!({ "username": "ivan", "password": "wrong horse" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = srv
        .client
        .post(srv.url("/auth/login"))
        .json(&json!({ "username": "nobody", "password": "whatever" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = srv
        .client
        .post(srv.url("/auth/login"))
        .json(&json!({ "username": "IVAN", "password": "correct horse" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["token_type"], "Bearer");
    let token = body["token"].as_str().unwrap().to_string();

    let res = srv.client.get(srv.url("/auth/me")).bearer_auth(&token).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let me: Value = res.json().await.unwrap();
    assert_eq!(me["username"], "ivan");
    assert_eq!(me["role"], "user");

    let res = srv.client.get(srv.url("/auth/me")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // A registered account can run the whole movie lifecycle.
    let created = create_movie(&srv, &token, json!({ "title": "Stalker", "director": "Andrei Tarkovsky", "year": 1979 })).await;
    let path = format!("/movies/{}", created["id"]);
    let res = srv.client.delete(srv.url(&path)).bearer_auth(&token).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = srv.client.get(srv.url(&path)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

/// A movie store that fails the way a broken database would.
struct BrokenMovieStore;

#[async_trait]
impl RecordStore<Movie> for BrokenMovieStore {
    async fn list(&self) -> StoreResult<Vec<Movie>> {
        Err(StoreError::Internal(
            "relation \"movies\" does not exist: SELECT secret_column FROM movies".into(),
        ))
    }

    async fn get(&self, _id: MovieId) -> StoreResult<Movie> {
        panic!("connection pool state corrupted at 10.0.0.7:5432");
    }

    async fn create(&self, _fields: MovieFields) -> StoreResult<Movie> {
        Err(StoreError::Internal("password authentication failed for user \"films\"".into()))
    }

    async fn replace(&self, _id: MovieId, _fields: MovieFields) -> StoreResult<Movie> {
        Err(StoreError::NotFound("movie"))
    }

    async fn delete(&self, _id: MovieId) -> StoreResult<()> {
        Err(StoreError::NotFound("movie"))
    }
}

#[tokio::test]
async fn internal_failures_reach_the_client_as_a_generic_500() {
    let services = AppServices {
        movies: Arc::new(BrokenMovieStore),
        ..in_memory_services()
    };
    let srv = TestServer::spawn_with(services).await;
    let generic = json!({ "error": "internal server error", "code": "internal_error" });

    // Store error.
    let res = srv.client.get(srv.url("/movies")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, generic);

    // Handler panic.
    let res = srv.client.get(srv.url("/movies/1")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, generic);

    let res = srv
        .client
        .post(srv.url("/movies"))
        .bearer_auth(mint_jwt("user"))
        .json(&json!({ "title": "Solaris", "director": "Andrei Tarkovsky", "year": 1972 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, generic);

    // The server survives the panic.
    let res = srv.client.get(srv.url("/status")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}
