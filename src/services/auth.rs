use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::{hash_password, verify_password, TokenService};
use crate::error::AppError;
use crate::models::{LoginInput, RegisterInput, User, UserWithPassword};

const USER_COLUMNS: &str = "id, username, email, created_at, updated_at";

/// Registration, login and identity lookup.
pub struct AuthService {
    pool: PgPool,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(pool: PgPool, tokens: TokenService) -> Self {
        Self { pool, tokens }
    }

    /// Stores a new user with a bcrypt-hashed password.
    ///
    /// A duplicate username or email surfaces as `AppError::Conflict` from the
    /// table's unique constraints.
    pub async fn register(&self, input: RegisterInput) -> Result<User, AppError> {
        let password_hash = hash_password(input.password).await?;

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (id, username, email, password) VALUES ($1, $2, $3, $4) \
             RETURNING {}",
            USER_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&input.username)
        .bind(&input.email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;

        log::info!("registered user {}", user.id);
        Ok(user)
    }

    /// Checks credentials and issues a bearer token.
    ///
    /// Unknown email and wrong password both yield `AppError::InvalidCredentials`.
    pub async fn login(&self, input: LoginInput) -> Result<(User, String), AppError> {
        let record = sqlx::query_as::<_, UserWithPassword>(&format!(
            "SELECT {}, password FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(&input.email)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            log::debug!("login rejected: unknown email");
            AppError::InvalidCredentials
        })?;

        let UserWithPassword { user, password } = record;
        if !verify_password(input.password, password).await? {
            log::debug!("login rejected: password mismatch for user {}", user.id);
            return Err(AppError::InvalidCredentials);
        }

        let token = self.tokens.generate_token(user.id)?;
        Ok((user, token))
    }

    pub async fn get_me(&self, user_id: Uuid) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))
    }

    /// Resolves a bearer token to the user id it was issued for.
    pub fn verify_token(&self, token: &str) -> Result<Uuid, AppError> {
        self.tokens.verify_token(token).map(|claims| claims.sub)
    }
}
