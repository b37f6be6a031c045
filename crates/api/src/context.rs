use filmapi_auth::Identity;

/// Principal context for a request (authenticated identity + role).
///
/// Inserted into request extensions by the auth middleware; only present on
/// routes behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    identity: Identity,
}

impl PrincipalContext {
    pub fn new(identity: Identity) -> Self {
        Self { identity }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }
}
