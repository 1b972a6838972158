use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{CreateCategoryInput, InputSchema, UpdateCategoryInput},
    services::CategoryService,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use uuid::Uuid;

/// Lists the caller's categories, oldest first.
#[get("")]
pub async fn get_categories(
    categories: web::Data<CategoryService>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let list = categories.get_all(user.id).await?;
    Ok(HttpResponse::Ok().json(list))
}

/// Creates a category owned by the caller.
///
/// ## Responses:
/// - `201 Created`: `{message, category}`.
/// - `400 Bad Request`: name shorter than 3 or longer than 20 characters.
#[post("")]
pub async fn create_category(
    categories: web::Data<CategoryService>,
    user: AuthenticatedUser,
    payload: web::Json<CreateCategoryInput>,
) -> Result<impl Responder, AppError> {
    payload.validate_schema()?;

    let category = categories.create(user.id, payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Category created successfully",
        "category": category,
    })))
}

/// Fetches a category by id. Ownership is not checked.
#[get("/{id}")]
pub async fn get_category(
    categories: web::Data<CategoryService>,
    id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let category = categories.get_by_id(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(category))
}

/// Renames a category. Ownership is not checked.
#[put("/{id}")]
pub async fn update_category(
    categories: web::Data<CategoryService>,
    id: web::Path<Uuid>,
    payload: web::Json<UpdateCategoryInput>,
) -> Result<impl Responder, AppError> {
    payload.validate_schema()?;

    let category = categories
        .update(id.into_inner(), payload.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Category updated successfully",
        "category": category,
    })))
}

/// Deletes a category. Tasks filed under it keep existing without a category.
#[delete("/{id}")]
pub async fn delete_category(
    categories: web::Data<CategoryService>,
    id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    categories.delete(id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
