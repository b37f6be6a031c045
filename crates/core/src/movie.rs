//! Movie record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, Record};
use crate::error::DomainResult;
use crate::id::MovieId;
use crate::validate::{collect_missing, has_text, required_int, required_text};
use crate::value_object::ValueObject;

/// Validated movie fields (create and full replace).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieFields {
    pub title: String,
    /// Free-form director name, not a reference to a director record.
    pub director: String,
    pub year: i32,
}

impl ValueObject for MovieFields {}

impl MovieFields {
    /// Validate raw client input. Every field is required.
    pub fn new(title: Option<String>, director: Option<String>, year: Option<i32>) -> DomainResult<Self> {
        collect_missing(&[
            ("title", has_text(&title)),
            ("director", has_text(&director)),
            ("year", year.is_some()),
        ])?;

        Ok(Self {
            title: required_text("title", title)?,
            director: required_text("director", director)?,
            year: required_int("year", year)?,
        })
    }
}

/// A stored movie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub director: String,
    pub year: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Movie {
    type Id = MovieId;

    fn id(&self) -> MovieId {
        self.id
    }
}

impl Record for Movie {
    type Fields = MovieFields;

    const KIND: &'static str = "movie";

    fn from_parts(id: MovieId, fields: MovieFields, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: fields.title,
            director: fields.director,
            year: fields.year,
            created_at,
            updated_at,
        }
    }

    fn fields(&self) -> MovieFields {
        MovieFields {
            title: self.title.clone(),
            director: self.director.clone(),
            year: self.year,
        }
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn id_from_i64(raw: i64) -> MovieId {
        MovieId::from_i64(raw)
    }
}
