use crate::error::AppError;
use actix_web::web;

/// bcrypt work factor used for every stored password.
pub const HASH_COST: u32 = 10;

/// Hashes a password on the blocking thread pool so request workers are not stalled.
pub async fn hash_password(password: String) -> Result<String, AppError> {
    let hashed = web::block(move || bcrypt::hash(password, HASH_COST)).await??;
    Ok(hashed)
}

pub async fn verify_password(password: String, hashed_password: String) -> Result<bool, AppError> {
    let matches = web::block(move || bcrypt::verify(password, &hashed_password)).await??;
    Ok(matches)
}
