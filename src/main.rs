use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};
use std::io;

use taskdesk::{
    auth::TokenService,
    config::Config,
    db::{self, DatabaseConfig},
    routes::{self, health::StartTime},
    services::{AuthService, CategoryService, TaskService},
};

fn startup_error(context: &str, err: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::Other, format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| startup_error("Invalid configuration", e))?;

    if config.jwt_secret.is_none() {
        log::warn!("JWT_SECRET is not set; token operations will fail");
    }
    if config.jwt_expires_in.is_none() {
        log::warn!("JWT_EXPIRES_IN is not set; login will fail");
    }

    let pool = db::connect(&DatabaseConfig::from_config(&config))
        .await
        .map_err(|e| startup_error("Failed to connect to database", e))?;
    db::run_migrations(&pool)
        .await
        .map_err(|e| startup_error("Failed to run migrations", e))?;

    let auth_service = web::Data::new(AuthService::new(
        pool.clone(),
        TokenService::from_config(&config),
    ));
    let category_service = web::Data::new(CategoryService::new(pool.clone()));
    let task_service = web::Data::new(TaskService::new(pool.clone()));
    let started = web::Data::new(StartTime::now());
    let cors_origin = config.cors_origin.clone();

    log::info!("Starting taskdesk server at {}", config.server_url());

    let server = HttpServer::new(move || {
        App::new()
            .app_data(auth_service.clone())
            .app_data(category_service.clone())
            .app_data(task_service.clone())
            .app_data(started.clone())
            .wrap(
                Cors::default()
                    .allowed_origin(&cors_origin)
                    .supports_credentials()
                    .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
                    .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION]),
            )
            .wrap(Logger::default())
            .service(web::scope("/api/v1").configure(routes::config))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await;

    log::info!("Server stopped, closing database pool");
    pool.close().await;

    server
}
