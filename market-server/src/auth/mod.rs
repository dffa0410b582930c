//! Authentication
//!
//! - [`JwtService`] - bearer token validation
//! - [`CurrentUser`] - authenticated caller, extracted per request

pub mod extractor;
pub mod jwt;

pub use extractor::authenticate;
pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
