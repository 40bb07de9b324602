//! OpenAPI document and Swagger UI.

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers;

/// OpenAPI description of every route.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "sample_api",
        description = "Typed routing, parameter binding and request validation samples"
    ),
    paths(
        handlers::health,
        handlers::root,
        handlers::read_item,
        handlers::get_model,
        handlers::read_file,
        handlers::read_catalog,
        handlers::read_user_item,
        handlers::create_item,
        handlers::update_item,
        handlers::get_user,
        handlers::create_user,
    ),
    tags(
        (name = "samples", description = "Parameter and body binding samples"),
        (name = "users", description = "Token-protected user records"),
        (name = "ops", description = "Operational endpoints")
    )
)]
pub struct ApiDoc;

/// Path of the generated OpenAPI document.
pub const OPENAPI_PATH: &str = "/openapi.json";

/// Path of the Swagger UI.
pub const DOCS_PATH: &str = "/docs";

/// Router serving the OpenAPI document and Swagger UI.
pub fn docs_router() -> Router {
    Router::new().merge(SwaggerUi::new(DOCS_PATH).url(OPENAPI_PATH, ApiDoc::openapi()))
}
