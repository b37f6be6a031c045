use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use filmapi_core::{DirectorFields, DomainResult, MovieFields, UserId, Username};

// -------------------------
// Request DTOs
// -------------------------

/// Body of `POST /movies` and `PUT /movies/:id`.
///
/// Fields are optional here so that absence is reported as a validation
/// error naming the field rather than a generic decode failure.
#[derive(Debug, Default, Deserialize)]
pub struct MovieRequest {
    pub title: Option<String>,
    pub director: Option<String>,
    pub year: Option<i32>,
}

impl MovieRequest {
    pub fn into_fields(self) -> DomainResult<MovieFields> {
        MovieFields::new(self.title, self.director, self.year)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DirectorRequest {
    pub name: Option<String>,
    #[serde(rename = "birthYear")]
    pub birth_year: Option<i32>,
}

impl DirectorRequest {
    pub fn into_fields(self) -> DomainResult<DirectorFields> {
        DirectorFields::new(self.name, self.birth_year)
    }
}

/// Body of `/auth/register` and `/auth/login`.
#[derive(Default, Deserialize)]
pub struct CredentialsRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl CredentialsRequest {
    /// Both fields present and non-empty, with the username normalized.
    pub fn into_parts(self) -> Option<(Username, String)> {
        let username = Username::parse(self.username.as_deref()?).ok()?;
        let password = self.password.filter(|p| !p.is_empty())?;
        Some((username, password))
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct RegisteredUser {
    pub id: UserId,
    pub username: Username,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_at: Option<DateTime<Utc>>,
}
