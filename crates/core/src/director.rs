//! Director record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, Record};
use crate::error::DomainResult;
use crate::id::DirectorId;
use crate::validate::{collect_missing, has_text, required_int, required_text};
use crate::value_object::ValueObject;

/// Validated director fields (create and full replace).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectorFields {
    pub name: String,
    #[serde(rename = "birthYear")]
    pub birth_year: i32,
}

impl ValueObject for DirectorFields {}

impl DirectorFields {
    pub fn new(name: Option<String>, birth_year: Option<i32>) -> DomainResult<Self> {
        collect_missing(&[("name", has_text(&name)), ("birthYear", birth_year.is_some())])?;

        Ok(Self {
            name: required_text("name", name)?,
            birth_year: required_int("birthYear", birth_year)?,
        })
    }
}

/// A stored director.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Director {
    pub id: DirectorId,
    pub name: String,
    #[serde(rename = "birthYear")]
    pub birth_year: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Director {
    type Id = DirectorId;

    fn id(&self) -> DirectorId {
        self.id
    }
}

impl Record for Director {
    type Fields = DirectorFields;

    const KIND: &'static str = "director";

    fn from_parts(
        id: DirectorId,
        fields: DirectorFields,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: fields.name,
            birth_year: fields.birth_year,
            created_at,
            updated_at,
        }
    }

    fn fields(&self) -> DirectorFields {
        DirectorFields {
            name: self.name.clone(),
            birth_year: self.birth_year,
        }
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn id_from_i64(raw: i64) -> DirectorId {
        DirectorId::from_i64(raw)
    }
}
