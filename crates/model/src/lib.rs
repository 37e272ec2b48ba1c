pub mod access;
pub mod core;
pub mod query;
