//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Field sets submitted by clients (`MovieFields`, `DirectorFields`) and
/// normalized usernames are value objects: immutable and compared by value.
/// Only the store gives them an identity.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
