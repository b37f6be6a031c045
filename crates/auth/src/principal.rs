use serde::{Deserialize, Serialize};

use filmapi_core::{User, UserId};

use crate::Role;

/// Identity of an authenticated user, embedded in the token's `user` claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,
    pub username: String,
    pub role: Role,
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.as_str().to_string(),
            role: Role::new(user.role.clone()),
        }
    }
}
