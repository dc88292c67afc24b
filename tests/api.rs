use chirpy::api;
use chirpy::infra_memory::ManualClock;
use chirpy::server::Server;
use chrono::{Duration, TimeZone, Utc};
use serde_json::{Value, json};
use std::convert::Infallible;
use std::sync::Arc;
use warp::Filter;
use warp::http::StatusCode;

const SECRET: &str = "integration-secret";

fn routes(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = Infallible> + Clone + 'static {
    api::v1::routes(server).recover(api::v1::recover_error)
}

fn setup(is_dev: bool) -> (Arc<Server>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap(),
    ));
    let server = Arc::new(Server::in_memory(SECRET, clock.clone(), is_dev, "public"));
    (server, clock)
}

fn body_json(body: &[u8]) -> Value {
    serde_json::from_slice(body).expect("response body should be json")
}

async fn signup(server: &Arc<Server>, email: &str, password: &str) -> Value {
    let response = warp::test::request()
        .method("POST")
        .path("/api/users")
        .json(&json!({ "email": email, "password": password }))
        .reply(&routes(server.clone()))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response.body())["data"].clone()
}

async fn login(server: &Arc<Server>, email: &str, password: &str) -> (StatusCode, Value) {
    let response = warp::test::request()
        .method("POST")
        .path("/api/login")
        .json(&json!({ "email": email, "password": password }))
        .reply(&routes(server.clone()))
        .await;
    (response.status(), body_json(response.body()))
}

async fn post_with_bearer(server: &Arc<Server>, path: &str, token: &str) -> (StatusCode, Value) {
    let response = warp::test::request()
        .method("POST")
        .path(path)
        .header("authorization", format!("Bearer {}", token))
        .reply(&routes(server.clone()))
        .await;
    let body = if response.body().is_empty() {
        Value::Null
    } else {
        body_json(response.body())
    };
    (response.status(), body)
}

async fn create_chirp(server: &Arc<Server>, token: &str, body: &str) -> (StatusCode, Value) {
    let response = warp::test::request()
        .method("POST")
        .path("/api/chirps")
        .header("authorization", format!("Bearer {}", token))
        .json(&json!({ "body": body }))
        .reply(&routes(server.clone()))
        .await;
    (response.status(), body_json(response.body()))
}

async fn delete_chirp(server: &Arc<Server>, chirp_id: &str, token: Option<&str>) -> StatusCode {
    let mut request = warp::test::request()
        .method("DELETE")
        .path(&format!("/api/chirps/{}", chirp_id));
    if let Some(token) = token {
        request = request.header("authorization", format!("Bearer {}", token));
    }
    request.reply(&routes(server.clone())).await.status()
}

fn tokens(login_body: &Value) -> (String, String) {
    let data = &login_body["data"];
    (
        data["token"].as_str().expect("access token").to_string(),
        data["refresh_token"].as_str().expect("refresh token").to_string(),
    )
}

#[tokio::test]
async fn healthz_answers_ok() {
    let (server, _) = setup(false);
    let response = warp::test::request()
        .path("/api/healthz")
        .reply(&routes(server))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.body().as_ref(), b"OK");
}

#[tokio::test]
async fn session_lifecycle_over_http() {
    let (server, _) = setup(false);
    let user = signup(&server, "saul@bettercall.com", "123456").await;
    assert!(user.get("password_hash").is_none());

    let (status, body) = login(&server, "saul@bettercall.com", "123456").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "saul@bettercall.com");
    assert_eq!(body["data"]["id"], user["id"]);
    let (access, refresh) = tokens(&body);
    assert_eq!(refresh.len(), 64);

    let (status, _) = create_chirp(&server, &access, "I'm the one who knocks!").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = post_with_bearer(&server, "/api/refresh", &refresh).await;
    assert_eq!(status, StatusCode::OK);
    let new_access = body["data"]["token"].as_str().expect("token").to_string();
    assert_ne!(new_access, access);

    let (status, _) = create_chirp(&server, &new_access, "still here").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = post_with_bearer(&server, "/api/revoke", &refresh).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = post_with_bearer(&server, "/api/refresh", &refresh).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    // a second revoke is a no-op
    let (status, _) = post_with_bearer(&server, "/api/revoke", &refresh).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let (server, _) = setup(false);
    signup(&server, "walt@breakingbad.com", "123456").await;

    let (wrong_password, wrong_body) = login(&server, "walt@breakingbad.com", "654321").await;
    let (unknown_email, unknown_body) = login(&server, "jesse@breakingbad.com", "123456").await;

    assert_eq!(wrong_password, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
}

#[tokio::test]
async fn refresh_requires_a_known_bearer_token() {
    let (server, _) = setup(false);

    let response = warp::test::request()
        .method("POST")
        .path("/api/refresh")
        .reply(&routes(server.clone()))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let (status, _) = post_with_bearer(&server, "/api/refresh", "deadbeef").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = post_with_bearer(&server, "/api/revoke", "deadbeef").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn access_tokens_expire_but_refresh_tokens_outlive_them() {
    let (server, clock) = setup(false);
    signup(&server, "skyler@breakingbad.com", "123456").await;
    let (_, body) = login(&server, "skyler@breakingbad.com", "123456").await;
    let (access, refresh) = tokens(&body);

    clock.advance(Duration::seconds(3600));
    let (status, _) = create_chirp(&server, &access, "too late").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = post_with_bearer(&server, "/api/refresh", &refresh).await;
    assert_eq!(status, StatusCode::OK);
    let fresh = body["data"]["token"].as_str().expect("token").to_string();
    let (status, _) = create_chirp(&server, &fresh, "back again").await;
    assert_eq!(status, StatusCode::CREATED);

    clock.advance(Duration::days(60));
    let (status, _) = post_with_bearer(&server, "/api/refresh", &refresh).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn chirps_require_a_valid_access_token() {
    let (server, _) = setup(false);

    let response = warp::test::request()
        .method("POST")
        .path("/api/chirps")
        .json(&json!({ "body": "hello" }))
        .reply(&routes(server.clone()))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let (status, _) = create_chirp(&server, "not-a-jwt", "hello").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let response = warp::test::request()
        .method("POST")
        .path("/api/chirps")
        .header("authorization", "Token abc")
        .json(&json!({ "body": "hello" }))
        .reply(&routes(server))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn chirp_bodies_are_validated_and_censored() {
    let (server, _) = setup(false);
    signup(&server, "hank@dea.gov", "123456").await;
    let (_, body) = login(&server, "hank@dea.gov", "123456").await;
    let (access, _) = tokens(&body);

    let (status, body) = create_chirp(&server, &access, &"a".repeat(141)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "ChirpTooLong");

    let (status, body) = create_chirp(&server, &access, "What a Kerfuffle this is").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["body"], "What a **** this is");
}

#[tokio::test]
async fn only_the_author_can_delete_a_chirp() {
    let (server, _) = setup(false);
    signup(&server, "author@chirpy.dev", "123456").await;
    signup(&server, "other@chirpy.dev", "123456").await;
    let (_, body) = login(&server, "author@chirpy.dev", "123456").await;
    let (author_token, _) = tokens(&body);
    let (_, body) = login(&server, "other@chirpy.dev", "123456").await;
    let (other_token, _) = tokens(&body);

    let (_, chirp) = create_chirp(&server, &author_token, "mine").await;
    let chirp_id = chirp["data"]["id"].as_str().expect("chirp id").to_string();

    assert_eq!(
        delete_chirp(&server, &chirp_id, None).await,
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        delete_chirp(&server, &chirp_id, Some(other_token.as_str())).await,
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        delete_chirp(&server, &chirp_id, Some(author_token.as_str())).await,
        StatusCode::NO_CONTENT
    );

    let response = warp::test::request()
        .path(&format!("/api/chirps/{}", chirp_id))
        .reply(&routes(server.clone()))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    assert_eq!(
        delete_chirp(&server, &chirp_id, Some(author_token.as_str())).await,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn delete_checks_the_token_before_the_chirp() {
    let (server, _) = setup(false);
    let unknown = uuid::Uuid::new_v4().to_string();

    assert_eq!(
        delete_chirp(&server, &unknown, None).await,
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        delete_chirp(&server, &unknown, Some("garbage")).await,
        StatusCode::UNAUTHORIZED
    );

    signup(&server, "jane@margolis.com", "123456").await;
    let (_, body) = login(&server, "jane@margolis.com", "123456").await;
    let (access, _) = tokens(&body);
    assert_eq!(
        delete_chirp(&server, &unknown, Some(access.as_str())).await,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn chirps_from_deleted_users_are_rejected() {
    let (server, _) = setup(true);
    signup(&server, "krazy8@breakingbad.com", "123456").await;
    let (_, body) = login(&server, "krazy8@breakingbad.com", "123456").await;
    let (access, _) = tokens(&body);

    let response = warp::test::request()
        .method("POST")
        .path("/admin/reset")
        .reply(&routes(server.clone()))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let (status, _) = create_chirp(&server, &access, "still around?").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let response = warp::test::request()
        .path("/api/chirps")
        .reply(&routes(server))
        .await;
    assert_eq!(body_json(response.body())["data"], json!([]));
}

#[tokio::test]
async fn emails_are_matched_verbatim_at_login() {
    let (server, _) = setup(false);
    signup(&server, " padded@chirpy.dev", "123456").await;

    let (status, body) = login(&server, " padded@chirpy.dev", "123456").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], " padded@chirpy.dev");
}

#[tokio::test]
async fn lists_chirps_by_author_and_order() {
    let (server, clock) = setup(false);
    let alice = signup(&server, "alice@chirpy.dev", "123456").await;
    signup(&server, "bob@chirpy.dev", "123456").await;
    let (_, body) = login(&server, "alice@chirpy.dev", "123456").await;
    let (alice_token, _) = tokens(&body);
    let (_, body) = login(&server, "bob@chirpy.dev", "123456").await;
    let (bob_token, _) = tokens(&body);

    create_chirp(&server, &alice_token, "first").await;
    clock.advance(Duration::seconds(1));
    create_chirp(&server, &bob_token, "second").await;
    clock.advance(Duration::seconds(1));
    create_chirp(&server, &alice_token, "third").await;

    let response = warp::test::request()
        .path("/api/chirps")
        .reply(&routes(server.clone()))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let bodies: Vec<Value> = body_json(response.body())["data"]
        .as_array()
        .expect("chirp list")
        .iter()
        .map(|c| c["body"].clone())
        .collect();
    assert_eq!(bodies, vec!["first", "second", "third"]);

    let alice_id = alice["id"].as_str().expect("user id");
    let response = warp::test::request()
        .path(&format!("/api/chirps?author_id={}&sort=desc", alice_id))
        .reply(&routes(server.clone()))
        .await;
    let bodies: Vec<Value> = body_json(response.body())["data"]
        .as_array()
        .expect("chirp list")
        .iter()
        .map(|c| c["body"].clone())
        .collect();
    assert_eq!(bodies, vec!["third", "first"]);

    let response = warp::test::request()
        .path("/api/chirps?sort=sideways")
        .reply(&routes(server))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn users_update_their_own_credentials() {
    let (server, _) = setup(false);
    signup(&server, "gus@pollos.com", "123456").await;
    let (_, body) = login(&server, "gus@pollos.com", "123456").await;
    let (access, _) = tokens(&body);

    let response = warp::test::request()
        .method("PUT")
        .path("/api/users")
        .header("authorization", format!("Bearer {}", access))
        .json(&json!({ "email": "gustavo@pollos.com", "password": "hermanos" }))
        .reply(&routes(server.clone()))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response.body())["data"]["email"], "gustavo@pollos.com");

    let (status, _) = login(&server, "gus@pollos.com", "123456").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = login(&server, "gustavo@pollos.com", "hermanos").await;
    assert_eq!(status, StatusCode::OK);

    let response = warp::test::request()
        .method("PUT")
        .path("/api/users")
        .json(&json!({ "email": "x@y.z", "password": "pw" }))
        .reply(&routes(server))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let (server, _) = setup(false);
    signup(&server, "mike@ehrmantraut.com", "123456").await;

    let response = warp::test::request()
        .method("POST")
        .path("/api/users")
        .json(&json!({ "email": "mike@ehrmantraut.com", "password": "other" }))
        .reply(&routes(server))
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn polka_webhook_upgrades_users() {
    let (server, _) = setup(false);
    let user = signup(&server, "todd@vamonos.com", "123456").await;
    assert_eq!(user["is_chirpy_red"], false);

    let webhook = |event: &str, user_id: &str| {
        warp::test::request()
            .method("POST")
            .path("/api/polka/webhooks")
            .json(&json!({ "event": event, "data": { "user_id": user_id } }))
    };

    let user_id = user["id"].as_str().expect("user id");
    let response = webhook("user.payment_failed", user_id)
        .reply(&routes(server.clone()))
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = webhook("user.upgraded", user_id)
        .reply(&routes(server.clone()))
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let (_, body) = login(&server, "todd@vamonos.com", "123456").await;
    assert_eq!(body["data"]["is_chirpy_red"], true);

    let response = webhook("user.upgraded", "0b6c4a2e-3f0e-4a8e-9a53-6f8f3a2b1c00")
        .reply(&routes(server))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_reset_is_dev_only() {
    let (server, _) = setup(false);
    let response = warp::test::request()
        .method("POST")
        .path("/admin/reset")
        .reply(&routes(server))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let (server, _) = setup(true);
    signup(&server, "lydia@madrigal.com", "123456").await;
    let response = warp::test::request()
        .method("POST")
        .path("/admin/reset")
        .reply(&routes(server.clone()))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let (status, _) = login(&server, "lydia@madrigal.com", "123456").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn metrics_count_app_hits() {
    let (server, _) = setup(true);
    for _ in 0..3 {
        let response = warp::test::request()
            .path("/app/")
            .reply(&routes(server.clone()))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = warp::test::request()
        .path("/admin/metrics")
        .reply(&routes(server.clone()))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = String::from_utf8_lossy(response.body()).to_string();
    assert!(page.contains("Chirpy has been visited 3 times!"));

    warp::test::request()
        .method("POST")
        .path("/admin/reset")
        .reply(&routes(server.clone()))
        .await;
    assert_eq!(server.hit_counter.count(), 0);
}
