pub mod category;
pub mod task;
pub mod user;

pub use category::{Category, CreateCategoryInput, UpdateCategoryInput};
pub use task::{
    CreateTaskInput, NewTask, Task, TaskChanges, TaskLevel, TaskStatus, UpdateTaskInput,
};
pub use user::{LoginInput, RegisterInput, User, UserWithPassword};

use validator::Validate;

use crate::error::AppError;

/// A request payload with validation rules and a declared field order.
pub trait InputSchema: Validate {
    /// Field names as declared; the first failing one heads the error message.
    const FIELDS: &'static [&'static str];

    fn validate_schema(&self) -> Result<(), AppError> {
        self.validate()
            .map_err(|errors| AppError::validation(errors, Self::FIELDS))
    }
}
