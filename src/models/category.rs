use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::InputSchema;

/// A category owned by exactly one user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryInput {
    #[serde(default)]
    #[validate(length(min = 3, max = 20, message = "Name must be between 3 and 20 characters"))]
    pub name: String,
}

/// Partial update; an absent `name` leaves the stored one untouched.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateCategoryInput {
    #[validate(length(min = 3, max = 20, message = "Name must be between 3 and 20 characters"))]
    pub name: Option<String>,
}

impl InputSchema for CreateCategoryInput {
    const FIELDS: &'static [&'static str] = &["name"];
}

impl InputSchema for UpdateCategoryInput {
    const FIELDS: &'static [&'static str] = &["name"];
}
