//! Authentication and authorization
//!
//! JWT issuance and validation, the auth middleware, and the
//! [`CurrentUser`] extractor for handlers.

pub mod extractor;
pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_admin, require_auth, require_role};
