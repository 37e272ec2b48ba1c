//! Builds authorization-filtered ASTs from declarative item queries.
//!
//! [`build_ast`] resolves dot-path selectors into nested relation nodes,
//! expands `*` / `*.*` against schema and permission field sets, and drops
//! anything the requester may not read while the tree is being built.

pub mod ast;
pub mod builder;
pub mod catalog;
pub mod classifier;
pub mod error;
pub mod permissions;
pub mod selector;
mod wildcard;

pub use ast::{AnyNode, Ast, Child, FieldNode, RelationNode};
pub use builder::{BuildOptions, build_ast};
pub use error::AstError;
