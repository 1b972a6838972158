use crate::{config::Config, error::AppError};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents the claims encoded within a JWT (JSON Web Token).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject of the token: the user's id.
    pub sub: Uuid,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: usize,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
}

/// Issues and verifies HS256 bearer tokens.
///
/// Secret and lifetime come from process configuration. Either may be absent at
/// startup; the first token operation then fails with an internal error.
#[derive(Debug, Clone)]
pub struct TokenService {
    secret: Option<String>,
    expires_in: Option<String>,
}

impl TokenService {
    pub fn new(secret: Option<String>, expires_in: Option<String>) -> Self {
        Self { secret, expires_in }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.jwt_secret.clone(), config.jwt_expires_in.clone())
    }

    fn secret(&self) -> Result<&str, AppError> {
        self.secret
            .as_deref()
            .ok_or_else(|| AppError::Internal("JWT_SECRET is not set".into()))
    }

    /// Generates a signed token whose subject is `user_id`.
    ///
    /// Returns `AppError::Internal` if the secret or lifetime is not configured or
    /// the lifetime cannot be parsed.
    pub fn generate_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let secret = self.secret()?;
        let raw_expiry = self
            .expires_in
            .as_deref()
            .ok_or_else(|| AppError::Internal("JWT_EXPIRES_IN is not set".into()))?;
        let lifetime = parse_expires_in(raw_expiry).ok_or_else(|| {
            AppError::Internal(format!("JWT_EXPIRES_IN is invalid: {:?}", raw_expiry))
        })?;

        let now = chrono::Utc::now();
        let expiration = now
            .checked_add_signed(lifetime)
            .ok_or_else(|| AppError::Internal("JWT_EXPIRES_IN is out of range".into()))?;

        let claims = Claims {
            sub: user_id,
            iat: now.timestamp() as usize,
            exp: expiration.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Verifies a token and returns its claims.
    ///
    /// Any verification failure (malformed, expired, bad signature) is reported as
    /// `AppError::TokenInvalid`.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AppError> {
        let secret = self.secret()?;
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| {
            log::debug!("token rejected: {}", e);
            AppError::TokenInvalid
        })
    }
}

/// Parses a token lifetime: bare seconds (`3600`) or a number with one of the
/// units `s`, `m`, `h`, `d`, `w` (`15m`, `1h`, `7d`).
pub fn parse_expires_in(raw: &str) -> Option<chrono::Duration> {
    let raw = raw.trim();
    let split = raw
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(raw.len());
    let (number, unit) = raw.split_at(split);
    let value: i64 = number.parse().ok()?;
    let multiplier = match unit.trim() {
        "" | "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        "d" => 60 * 60 * 24,
        "w" => 60 * 60 * 24 * 7,
        _ => return None,
    };
    if value == 0 {
        return None;
    }
    value
        .checked_mul(multiplier)
        .map(chrono::Duration::seconds)
}
