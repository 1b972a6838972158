use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{CreateTaskInput, UpdateTaskInput},
    services::TaskService,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use uuid::Uuid;

/// Retrieves the tasks owned by the authenticated user, oldest first.
///
/// ## Responses:
/// - `200 OK`: JSON array of `Task` objects.
/// - `401 Unauthorized` / `403 Forbidden`: missing or invalid bearer token.
#[get("")]
pub async fn get_tasks(
    tasks: web::Data<TaskService>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let list = tasks.get_all(user.id).await?;
    Ok(HttpResponse::Ok().json(list))
}

/// Creates a new task for the authenticated user.
///
/// ## Request Body:
/// - `title`: 3 to 20 characters.
/// - `description`: 3 to 20 characters.
/// - `status`: `not_started`, `in_progress` or `completed`.
/// - `level`: `low`, `medium` or `high`.
/// - `categoryId`: UUID of an existing category.
///
/// ## Responses:
/// - `201 Created`: `{message, task}`.
/// - `400 Bad Request`: malformed body, failed validation, or unknown category.
#[post("")]
pub async fn create_task(
    tasks: web::Data<TaskService>,
    user: AuthenticatedUser,
    payload: web::Json<CreateTaskInput>,
) -> Result<impl Responder, AppError> {
    let new_task = payload.into_inner().into_new_task()?;
    let task = tasks.create(user.id, new_task).await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Task created successfully",
        "task": task,
    })))
}

/// Retrieves a task by its id. Ownership is not checked.
///
/// ## Responses:
/// - `200 OK`: the `Task`.
/// - `404 Not Found`: no task with that id.
#[get("/{id}")]
pub async fn get_task(
    tasks: web::Data<TaskService>,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let task = tasks.get_by_id(task_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Updates a task. Omitted fields are kept, `categoryId` is mandatory.
/// Ownership is not checked.
///
/// ## Responses:
/// - `200 OK`: `{message, task}`.
/// - `400 Bad Request`: failed validation or missing `categoryId`.
/// - `404 Not Found`: no task with that id.
#[put("/{id}")]
pub async fn update_task(
    tasks: web::Data<TaskService>,
    task_id: web::Path<Uuid>,
    payload: web::Json<UpdateTaskInput>,
) -> Result<impl Responder, AppError> {
    let changes = payload.into_inner().into_changes()?;
    let task = tasks.update(task_id.into_inner(), changes).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Task updated successfully",
        "task": task,
    })))
}

/// Deletes a task by its id. Ownership is not checked.
#[delete("/{id}")]
pub async fn delete_task(
    tasks: web::Data<TaskService>,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    tasks.delete(task_id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
