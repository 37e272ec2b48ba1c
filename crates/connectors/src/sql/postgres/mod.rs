mod store;
mod utils;

pub use store::PgMetadataStore;
