//! Domain services. Each holds a handle to the shared connection pool and
//! issues one SQL statement per operation.

pub mod auth;
pub mod category;
pub mod task;

pub use auth::AuthService;
pub use category::CategoryService;
pub use task::TaskService;
