//! Entity traits: identity + continuity across replacements.

use chrono::{DateTime, Utc};

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + Ord + core::hash::Hash + core::fmt::Debug + Send + Sync + 'static;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}

/// A flat CRUD record: an identity plus a replaceable set of fields.
///
/// Stores assemble records from their parts; the identifier and
/// `created_at` never change after creation.
pub trait Record: Entity + Clone + Send + Sync + 'static {
    /// The client-supplied fields, replaced as a whole on update.
    type Fields: Clone + Send + Sync + 'static;

    /// Human-readable record kind used in error messages (e.g. "movie").
    const KIND: &'static str;

    fn from_parts(
        id: Self::Id,
        fields: Self::Fields,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self;

    fn fields(&self) -> Self::Fields;

    fn created_at(&self) -> DateTime<Utc>;

    /// Build the identifier from a raw store sequence value.
    fn id_from_i64(raw: i64) -> Self::Id;
}
