pub mod relation;
pub mod schema;
