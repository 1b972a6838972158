#[macro_use]
mod common;

use actix_web::{http::header, http::StatusCode, test};
use common::{cleanup_user, cleanup_username, migrated_pool, register_and_login, send, Services};
use pretty_assertions::assert_eq;
use serde_json::json;

#[actix_rt::test]
#[ignore = "requires DATABASE_URL pointing at a Postgres instance"]
async fn test_register_login_and_me_flow() {
    let pool = migrated_pool().await;
    let email = "flow_user@example.com";
    let password = "Password123!";
    cleanup_user(&pool, email).await;

    let app = init_app!(Services::new(pool.clone()));

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({ "username": "flow_user", "email": email, "password": password }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["user"]["username"], "flow_user");
    assert!(body["user"].get("password").is_none());

    // The stored value is a hash, never the plaintext.
    let stored: (String,) = sqlx::query_as("SELECT password FROM users WHERE email = $1")
        .bind(email)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_ne!(stored.0, password);
    assert!(stored.0.starts_with("$2b$10$"));

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert!(body["user"].get("password").is_none());
    let token = body["token"].as_str().unwrap().to_string();
    let user_id = body["user"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["user"]["id"], user_id.as_str());
    assert_eq!(body["user"]["email"], email);
    assert!(body["user"].get("password").is_none());

    cleanup_user(&pool, email).await;
}

#[actix_rt::test]
#[ignore = "requires DATABASE_URL pointing at a Postgres instance"]
async fn test_duplicate_registration_conflicts() {
    let pool = migrated_pool().await;
    cleanup_user(&pool, "dup_user@example.com").await;
    cleanup_username(&pool, "dup_user").await;
    cleanup_username(&pool, "dup_other").await;

    let app = init_app!(Services::new(pool.clone()));

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({
            "username": "dup_user",
            "email": "dup_user@example.com",
            "password": "Password123!"
        }))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);

    // Same email, new username.
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({
            "username": "dup_other",
            "email": "dup_user@example.com",
            "password": "Password123!"
        }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body, json!({ "error": "Email already exists", "field": "email" }));

    // Same username, new email.
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({
            "username": "dup_user",
            "email": "dup_other@example.com",
            "password": "Password123!"
        }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body, json!({ "error": "Username already exists", "field": "username" }));

    // Both collide. Postgres stops at the first violated constraint, so either field may be named.
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({
            "username": "dup_user",
            "email": "dup_user@example.com",
            "password": "Password123!"
        }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let field = body["field"].as_str().unwrap();
    assert!(field == "email" || field == "username", "{}", body);
    assert!(body["error"].as_str().unwrap().ends_with("already exists"));

    // Invalid and conflicting at once: validation is reported.
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({
            "username": "dup_user",
            "email": "dup_user@example.com",
            "password": "short"
        }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"]["password"].is_string());

    cleanup_user(&pool, "dup_user@example.com").await;
}

#[actix_rt::test]
#[ignore = "requires DATABASE_URL pointing at a Postgres instance"]
async fn test_login_failures_are_indistinguishable() {
    let pool = migrated_pool().await;
    let email = "login_user@example.com";
    cleanup_user(&pool, email).await;

    let app = init_app!(Services::new(pool.clone()));
    register_and_login(&app, "login_user", email, "Password123!").await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "email": email, "password": "WrongPassword1" }))
        .to_request();
    let wrong_password = send(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "email": "nobody_here@example.com", "password": "Password123!" }))
        .to_request();
    let unknown_email = send(&app, req).await;

    assert_eq!(wrong_password.0, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.1, json!({ "error": "Invalid credentials" }));
    assert_eq!(wrong_password, unknown_email);

    cleanup_user(&pool, email).await;
}

#[actix_rt::test]
#[ignore = "requires DATABASE_URL pointing at a Postgres instance"]
async fn test_me_for_deleted_user_is_not_found() {
    let pool = migrated_pool().await;
    let email = "ghost_user@example.com";
    cleanup_user(&pool, email).await;

    let app = init_app!(Services::new(pool.clone()));
    let (_, token) = register_and_login(&app, "ghost_user", email, "Password123!").await;
    cleanup_user(&pool, email).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "User not found" }));
}
