//! Role check stub.
//!
//! There is no policy engine: a route either requires a specific role or it
//! does not.

use thiserror::Error;

use crate::{Identity, Role};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: requires role '{0}'")]
    MissingRole(String),
}

/// Allow the request only if the identity holds exactly `required`.
pub fn require_role(identity: &Identity, required: &Role) -> Result<(), AuthzError> {
    if identity.role == *required {
        Ok(())
    } else {
        Err(AuthzError::MissingRole(required.as_str().to_string()))
    }
}
