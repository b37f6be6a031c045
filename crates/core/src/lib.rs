//! `filmapi-core`: record types and input validation.
//!
//! This crate contains **pure domain** primitives (no HTTP or storage concerns).

pub mod director;
pub mod entity;
pub mod error;
pub mod id;
pub mod movie;
pub mod user;
pub mod validate;
pub mod value_object;

pub use director::{Director, DirectorFields};
pub use entity::{Entity, Record};
pub use error::{DomainError, DomainResult};
pub use id::{DirectorId, MovieId, UserId};
pub use movie::{Movie, MovieFields};
pub use user::{NewUser, User, Username, DEFAULT_ROLE};
pub use value_object::ValueObject;
