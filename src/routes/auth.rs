use crate::{
    auth::{AuthMiddleware, AuthenticatedUser},
    error::AppError,
    models::{InputSchema, LoginInput, RegisterInput},
    services::AuthService,
};
use actix_web::{get, post, web, HttpResponse, Responder};
use serde_json::json;

/// Register a new user
///
/// Validates the payload before touching the database, so an invalid payload
/// that would also collide with an existing account is reported as 400.
///
/// ## Responses:
/// - `201 Created`: `{user}` without the password.
/// - `400 Bad Request`: malformed JSON or failed validation.
/// - `409 Conflict`: username or email already taken.
#[post("/register")]
pub async fn register(
    auth: web::Data<AuthService>,
    payload: web::Json<RegisterInput>,
) -> Result<impl Responder, AppError> {
    payload.validate_schema()?;

    let user = auth.register(payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(json!({ "user": user })))
}

/// Login user
///
/// ## Responses:
/// - `200 OK`: `{user, token}`.
/// - `400 Bad Request`: malformed JSON or failed validation.
/// - `401 Unauthorized`: `{error: "Invalid credentials"}` for an unknown email or a wrong password alike.
#[post("/login")]
pub async fn login(
    auth: web::Data<AuthService>,
    payload: web::Json<LoginInput>,
) -> Result<impl Responder, AppError> {
    payload.validate_schema()?;

    let (user, token) = auth.login(payload.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({ "user": user, "token": token })))
}

/// Current user, resolved from the bearer token.
#[get("/me", wrap = "AuthMiddleware")]
pub async fn me(
    auth: web::Data<AuthService>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let user = auth.get_me(user.id).await?;
    Ok(HttpResponse::Ok().json(json!({ "user": user })))
}
