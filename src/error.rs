//!
//! # Error Classification
//!
//! This module defines `AppError`, the closed set of failures that services and
//! handlers can produce, and the single mapping from those failures to HTTP
//! responses.
//!
//! Services never build responses. They return an `AppError` variant and
//! Actix Web turns it into a response through the `ResponseError` impl, which
//! delegates to the pure `AppError::status_and_body` function.
//!
//! Storage failures are classified once, in `From<sqlx::Error>`:
//! missing rows become `NotFound`, unique-constraint violations become
//! `Conflict` carrying the colliding columns, any other error reported by the
//! database becomes `Database`, and transport or pool failures become `Internal`.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use validator::ValidationErrors;

/// SQLSTATE reported by PostgreSQL for a unique-constraint violation.
const UNIQUE_VIOLATION: &str = "23505";

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// A request payload failed schema validation (HTTP 400).
    ///
    /// `field_order` lists the schema's fields as declared; the first failing one
    /// becomes the headline. Fields missing from it are ranked lexically after it.
    Validation {
        errors: ValidationErrors,
        field_order: &'static [&'static str],
    },
    /// A request could not be parsed at all, e.g. malformed JSON or a non-UUID path id (HTTP 400).
    BadRequest(String),
    /// Login failed. Unknown email and wrong password are deliberately indistinguishable (HTTP 401).
    InvalidCredentials,
    /// No bearer token was supplied on a protected route (HTTP 401).
    TokenMissing,
    /// The bearer token is malformed, expired, or signed with another key (HTTP 403).
    TokenInvalid,
    /// A protected handler ran without an authenticated identity attached (HTTP 401).
    UserIdMissing,
    /// The requested row does not exist (HTTP 404).
    NotFound(String),
    /// A write collided with a unique constraint on the listed columns (HTTP 409).
    Conflict(Vec<String>),
    /// Any other error reported by the database itself (HTTP 400).
    Database(String),
    /// Everything else (HTTP 500).
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Validation { errors, .. } => write!(f, "Validation Error: {}", errors),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::InvalidCredentials => write!(f, "Invalid credentials"),
            AppError::TokenMissing => write!(f, "Access token required"),
            AppError::TokenInvalid => write!(f, "Invalid or expired token"),
            AppError::UserIdMissing => write!(f, "User ID not found in request"),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Conflict(fields) => write!(f, "Conflict on: {}", fields.join(", ")),
            AppError::Database(msg) => write!(f, "Database Error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// Maps an error to the status code and JSON body sent to the client.
    pub fn status_and_body(&self) -> (StatusCode, Value) {
        match self {
            AppError::Validation {
                errors,
                field_order,
            } => (
                StatusCode::BAD_REQUEST,
                validation_body(errors, field_order),
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "Invalid credentials" }),
            ),
            AppError::TokenMissing => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "Access token required" }),
            ),
            AppError::TokenInvalid => (
                StatusCode::FORBIDDEN,
                json!({ "error": "Invalid or expired token" }),
            ),
            AppError::UserIdMissing => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "User ID not found in request" }),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            AppError::Conflict(fields) => (StatusCode::CONFLICT, conflict_body(fields)),
            AppError::Database(msg) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "Database error",
                    "message": msg.lines().next().filter(|l| !l.is_empty()).unwrap_or("An error occurred"),
                }),
            ),
            AppError::Internal(msg) => {
                let msg = if msg.is_empty() {
                    "Internal server error"
                } else {
                    msg.as_str()
                };
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": msg }))
            }
        }
    }
}

/// Builds `{error: "<field>: <message>", details: {field: message}}`.
fn validation_body(errors: &ValidationErrors, field_order: &[&str]) -> Value {
    let mut failing: Vec<(&str, String)> = errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, field_errors)| {
            field_errors.first().map(|first| {
                let message = first
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value ({})", first.code));
                (field, message)
            })
        })
        .collect();
    failing.sort_by_key(|(field, _)| {
        let rank = field_order
            .iter()
            .position(|declared| *declared == *field)
            .unwrap_or(field_order.len());
        (rank, *field)
    });

    let headline = failing
        .first()
        .map(|(field, message)| format!("{}: {}", to_camel_case(field), message))
        .unwrap_or_else(|| "Validation error".to_string());

    let details: BTreeMap<String, String> = failing
        .into_iter()
        .map(|(field, message)| (to_camel_case(field), message))
        .collect();

    let details: Map<String, Value> = details
        .into_iter()
        .map(|(field, message)| (field, Value::String(message)))
        .collect();

    json!({ "error": headline, "details": details })
}

fn conflict_body(fields: &[String]) -> Value {
    let has = |name: &str| fields.iter().any(|f| f == name);
    let message = match (has("email"), has("username")) {
        (true, true) => "Email and username already exist",
        (true, false) => "Email already exists",
        (false, true) => "Username already exists",
        (false, false) => "This value already exists",
    };
    json!({
        "error": message,
        "field": fields.first().map(String::as_str).unwrap_or("unknown"),
    })
}

/// Field names in payloads are camelCase; validator reports Rust field names.
fn to_camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Extracts the colliding columns of a unique violation.
///
/// PostgreSQL reports them in the detail line as `Key (email, username)=(...) already exists.`.
/// When no detail is available the constraint name is matched against the known unique columns.
pub fn conflict_columns(detail: Option<&str>, constraint: Option<&str>) -> Vec<String> {
    if let Some(columns) = detail
        .and_then(|d| d.strip_prefix("Key ("))
        .and_then(|rest| rest.split_once(")="))
        .map(|(columns, _)| columns)
    {
        let parsed: Vec<String> = columns
            .split(',')
            .map(|c| c.trim().trim_matches('"').to_string())
            .filter(|c| !c.is_empty())
            .collect();
        if !parsed.is_empty() {
            return parsed;
        }
    }

    match constraint {
        Some(name) => ["email", "username"]
            .iter()
            .filter(|column| name.contains(*column))
            .map(|column| column.to_string())
            .collect(),
        None => Vec::new(),
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status_and_body().0
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Internal(msg) => log::error!("internal error: {}", msg),
            AppError::Database(msg) => log::warn!("database error: {}", msg),
            _ => log::debug!("request failed: {}", self),
        }
        let (status, body) = self.status_and_body();
        HttpResponse::build(status).json(body)
    }
}

/// Classifies storage failures. Order matters: a unique violation is also a
/// database error and must be recognised first.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            sqlx::Error::Database(db_err) => {
                if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
                    let detail = db_err
                        .try_downcast_ref::<sqlx::postgres::PgDatabaseError>()
                        .and_then(|pg| pg.detail());
                    AppError::Conflict(conflict_columns(detail, db_err.constraint()))
                } else {
                    AppError::Database(db_err.message().to_string())
                }
            }
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl AppError {
    pub fn validation(errors: ValidationErrors, field_order: &'static [&'static str]) -> AppError {
        AppError::Validation {
            errors,
            field_order,
        }
    }
}

/// Without a declared order the headline falls back to the lexically first field.
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> AppError {
        AppError::validation(errors, &[])
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::Internal(format!("Password hashing failed: {}", error))
    }
}

impl From<actix_web::error::BlockingError> for AppError {
    fn from(error: actix_web::error::BlockingError) -> AppError {
        AppError::Internal(error.to_string())
    }
}
