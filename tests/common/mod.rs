#![allow(dead_code)]

use actix_web::{test, web};
use dotenv::dotenv;
use serde_json::{json, Value};
use sqlx::PgPool;
use taskdesk::auth::TokenService;
use taskdesk::routes::health::StartTime;
use taskdesk::services::{AuthService, CategoryService, TaskService};

pub const TEST_SECRET: &str = "integration_test_secret";

pub fn tokens() -> TokenService {
    TokenService::new(Some(TEST_SECRET.into()), Some("1h".into()))
}

/// Connects to `DATABASE_URL` and applies migrations.
pub async fn migrated_pool() -> PgPool {
    dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");
    let pool = PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to test DB");
    taskdesk::db::run_migrations(&pool)
        .await
        .expect("Failed to migrate test DB");
    pool
}

pub struct Services {
    pub auth: web::Data<AuthService>,
    pub categories: web::Data<CategoryService>,
    pub tasks: web::Data<TaskService>,
    pub started: web::Data<StartTime>,
}

impl Services {
    pub fn new(pool: PgPool) -> Self {
        Self {
            auth: web::Data::new(AuthService::new(pool.clone(), tokens())),
            categories: web::Data::new(CategoryService::new(pool.clone())),
            tasks: web::Data::new(TaskService::new(pool)),
            started: web::Data::new(StartTime::now()),
        }
    }
}

/// Builds the full application the way the binary does.
macro_rules! init_app {
    ($services:expr) => {{
        let services = &$services;
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(services.auth.clone())
                .app_data(services.categories.clone())
                .app_data(services.tasks.clone())
                .app_data(services.started.clone())
                .wrap(actix_web::middleware::Logger::default())
                .service(actix_web::web::scope("/api/v1").configure(taskdesk::routes::config)),
        )
        .await
    }};
}

pub async fn cleanup_user(pool: &PgPool, email: &str) {
    let _ = sqlx::query("DELETE FROM users WHERE email = $1")
        .bind(email)
        .execute(pool)
        .await;
}

pub async fn cleanup_username(pool: &PgPool, username: &str) {
    let _ = sqlx::query("DELETE FROM users WHERE username = $1")
        .bind(username)
        .execute(pool)
        .await;
}

/// Sends a request and returns its status and JSON body (or `Null`).
pub async fn send<S, B>(app: &S, req: actix_http::Request) -> (actix_web::http::StatusCode, Value)
where
    S: actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse<B>,
        Error = actix_web::Error,
    >,
    B: actix_web::body::MessageBody,
{
    match test::try_call_service(app, req).await {
        Ok(resp) => {
            let status = resp.status();
            let body = test::read_body(resp).await;
            (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
        }
        Err(err) => {
            let resp = err.error_response();
            let status = resp.status();
            let body = actix_web::body::to_bytes(resp.into_body())
                .await
                .unwrap_or_default();
            (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
        }
    }
}

/// Registers then logs in, returning `(user_id, token)`.
pub async fn register_and_login<S, B>(
    app: &S,
    username: &str,
    email: &str,
    password: &str,
) -> (String, String)
where
    S: actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse<B>,
        Error = actix_web::Error,
    >,
    B: actix_web::body::MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({ "username": username, "email": email, "password": password }))
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(status, actix_web::http::StatusCode::CREATED, "register: {}", body);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(status, actix_web::http::StatusCode::OK, "login: {}", body);

    (
        body["user"]["id"].as_str().expect("user id").to_string(),
        body["token"].as_str().expect("token").to_string(),
    )
}
