//! Authentication & authorization
//!
//! - [`JwtService`]: token issue/validation
//! - [`CurrentUser`]: authenticated user context
//! - [`require_auth`], [`require_permission`], [`require_admin`]: middleware
//! - [`password`]: argon2 hashing

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod permissions;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_admin, require_auth, require_permission};
