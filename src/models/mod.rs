//! Request and response models.
//!
//! - [`item`]: items submitted in request bodies
//! - [`user`]: stored user records
//! - [`model_name`]: the closed set of model names

pub mod item;
pub mod model_name;
pub mod user;

pub use item::Item;
pub use model_name::ModelName;
pub use user::User;
