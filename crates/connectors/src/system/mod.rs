//! Built-in metadata for the internal `directus_*` collections.
//!
//! These rows never live in the metadata tables themselves, so every store
//! read is merged with them before use.

mod fields;
mod relations;

pub use fields::{SYSTEM_FIELDS, SystemField, system_field_names};
pub use relations::{SYSTEM_RELATIONS, system_relations};
