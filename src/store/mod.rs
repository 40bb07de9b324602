//! In-memory state owned by the application.

pub mod catalog;
pub mod users;

pub use catalog::{Catalog, CatalogItem};
pub use users::UserStore;
