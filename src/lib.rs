#![doc = "The `taskdesk` library crate."]
#![doc = ""]
#![doc = "Domain models, validation schemas, authentication, services, routing"]
#![doc = "and error classification for the taskdesk REST backend. The binary"]
#![doc = "(`main.rs`) wires these together into an Actix Web server."]

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

pub use crate::error::AppError;
