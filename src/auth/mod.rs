//! Authentication building blocks: password hashing, bearer tokens, the
//! request gate and the typed identity it attaches to requests.

pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

pub use extractors::AuthenticatedUser;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenService};
