pub mod accountability;
pub mod permission;
