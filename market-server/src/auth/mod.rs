//! Authentication and authorization
//!
//! - [`JwtService`] - token issuance and verification
//! - [`CurrentUser`] - identity snapshot rebuilt from claims
//! - [`permissions`] - the role → operation policy table and guard
//! - [`require_auth`] / [`require_operation`] - middleware

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod permissions;

pub use extractor::MaybeUser;
pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
pub use middleware::{require_auth, require_operation};
pub use permissions::{CurrentUser, Operation, authorize, require_role};
