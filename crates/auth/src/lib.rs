//! `filmapi-auth`: the credential boundary (signed bearer tokens, password
//! hashing and the role check).
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod authorize;
pub mod claims;
pub mod jwt;
pub mod password;
pub mod principal;
pub mod roles;

pub use authorize::{require_role, AuthzError};
pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use jwt::{Hs256JwtCodec, JwtIssuer, JwtValidator, TokenError};
pub use password::{hash_password, verify_password, PasswordError, MIN_PASSWORD_LEN};
pub use principal::Identity;
pub use roles::Role;
