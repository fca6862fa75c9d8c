//! Entity model: column types, schemas, property validation and records.
//!
//! # Responsibility
//! - Describe entity types through explicit descriptors instead of reflection.
//! - Track per-field mutations so only changed columns are persisted.
//!
//! # Invariants
//! - Every entity schema starts with `id` and ends with `modified`, `created`.
//! - Only `Entity::set` marks columns altered.

pub mod entity;
pub mod factory;
pub mod property;
pub mod record;
pub mod registry;
pub mod schema;
pub mod value;
