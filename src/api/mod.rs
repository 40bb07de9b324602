//! HTTP API module: sample routes, user routes and documentation.

pub mod docs;
pub mod handlers;
pub mod params;
pub mod routes;

pub use docs::ApiDoc;
pub use handlers::AppState;
pub use routes::create_router;
