use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use std::borrow::Cow;
use validator::{Validate, ValidationError};

use super::InputSchema;
use crate::error::AppError;

/// Progress of a task.
/// Corresponds to the `task_status` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    NotStarted,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "not_started" => Some(TaskStatus::NotStarted),
            "in_progress" => Some(TaskStatus::InProgress),
            "completed" => Some(TaskStatus::Completed),
            _ => None,
        }
    }
}

/// Importance of a task.
/// Corresponds to the `task_level` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_level", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskLevel {
    Low,
    Medium,
    High,
}

impl TaskLevel {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "low" => Some(TaskLevel::Low),
            "medium" => Some(TaskLevel::Medium),
            "high" => Some(TaskLevel::High),
            _ => None,
        }
    }
}

/// Represents a task entity as stored in the database and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier for the task (UUID v4).
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub level: TaskLevel,
    /// Identifier of the user who owns the task.
    pub user_id: Uuid,
    /// Category the task is filed under, if any.
    pub category_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

fn validate_status(value: &str) -> Result<(), ValidationError> {
    match TaskStatus::from_name(value) {
        Some(_) => Ok(()),
        None => Err(invalid(
            "status",
            "Status must be one of not_started, in_progress, completed",
        )),
    }
}

fn validate_level(value: &str) -> Result<(), ValidationError> {
    match TaskLevel::from_name(value) {
        Some(_) => Ok(()),
        None => Err(invalid("level", "Level must be one of low, medium, high")),
    }
}

fn validate_category_id(value: &str) -> Result<(), ValidationError> {
    Uuid::parse_str(value)
        .map(|_| ())
        .map_err(|_| invalid("uuid", "Category ID must be a valid UUID"))
}

/// Payload for `POST /tasks`.
///
/// Enum and id fields arrive as raw strings and are checked by the field rules,
/// so a bad value is reported per field. `into_new_task` yields the typed form.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskInput {
    #[serde(default)]
    #[validate(length(min = 3, max = 20, message = "Title must be between 3 and 20 characters"))]
    pub title: String,

    #[serde(default)]
    #[validate(length(min = 3, max = 20, message = "Description must be between 3 and 20 characters"))]
    pub description: String,

    #[validate(required(message = "Status is required"), custom = "validate_status")]
    pub status: Option<String>,

    #[validate(required(message = "Level is required"), custom = "validate_level")]
    pub level: Option<String>,

    #[validate(required(message = "Category ID is required"), custom = "validate_category_id")]
    pub category_id: Option<String>,
}

impl InputSchema for CreateTaskInput {
    const FIELDS: &'static [&'static str] =
        &["title", "description", "status", "level", "category_id"];
}

/// Payload for `PUT /tasks/{id}`. Every field but `categoryId` may be omitted.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskInput {
    #[validate(length(min = 3, max = 20, message = "Title must be between 3 and 20 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 3, max = 20, message = "Description must be between 3 and 20 characters"))]
    pub description: Option<String>,

    #[validate(custom = "validate_status")]
    pub status: Option<String>,

    #[validate(custom = "validate_level")]
    pub level: Option<String>,

    #[validate(required(message = "Category ID is required"), custom = "validate_category_id")]
    pub category_id: Option<String>,
}

impl InputSchema for UpdateTaskInput {
    const FIELDS: &'static [&'static str] =
        &["title", "description", "status", "level", "category_id"];
}

/// A validated task ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub level: TaskLevel,
    pub category_id: Uuid,
}

/// A validated partial update. `None` keeps the stored value.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub level: Option<TaskLevel>,
    pub category_id: Uuid,
}

fn parse_field<T>(
    value: Option<String>,
    field: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T, AppError> {
    value
        .as_deref()
        .and_then(parse)
        .ok_or_else(|| AppError::BadRequest(format!("Invalid {}", field)))
}

impl CreateTaskInput {
    /// Validates the payload and converts it into typed fields.
    pub fn into_new_task(self) -> Result<NewTask, AppError> {
        self.validate_schema()?;
        Ok(NewTask {
            status: parse_field(self.status, "status", TaskStatus::from_name)?,
            level: parse_field(self.level, "level", TaskLevel::from_name)?,
            category_id: parse_field(self.category_id, "categoryId", |s| {
                Uuid::parse_str(s).ok()
            })?,
            title: self.title,
            description: self.description,
        })
    }
}

impl UpdateTaskInput {
    /// Validates the payload and converts it into typed fields.
    pub fn into_changes(self) -> Result<TaskChanges, AppError> {
        self.validate_schema()?;
        let status = match self.status {
            Some(raw) => Some(parse_field(Some(raw), "status", TaskStatus::from_name)?),
            None => None,
        };
        let level = match self.level {
            Some(raw) => Some(parse_field(Some(raw), "level", TaskLevel::from_name)?),
            None => None,
        };
        Ok(TaskChanges {
            title: self.title,
            description: self.description,
            status,
            level,
            category_id: parse_field(self.category_id, "categoryId", |s| {
                Uuid::parse_str(s).ok()
            })?,
        })
    }
}
