//! HTTP API handlers.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use utoipa::ToSchema;

use super::params::{
    FilePath, ItemPath, ModelPath, Paging, SearchQuery, UserItemPath, UserItemQuery, UserPath,
};
use crate::config::DEFAULT_TOKEN;
use crate::error::{ApiError, ErrorBody, ValidationErrorBody};
use crate::metrics;
use crate::models::{Item, ModelName, User};
use crate::store::{Catalog, CatalogItem, UserStore};
use crate::validation::{
    AllValid, TokenHeader, ValidJson, ValidPath, ValidQuery, ValidationError,
};

/// Routes registered with a trailing slash. The bare path redirects here.
pub const SLASHED_ROUTES: [&str; 3] = ["/querys/", "/sample_items/", "/users/"];

/// Description attached to user items unless `short` is set.
pub const LONG_DESCRIPTION: &str = "This is an amazing item that has a long description";

/// Application state shared with handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Token expected in the `token` header.
    pub token: Arc<str>,
    /// Registered users.
    pub users: Arc<UserStore>,
    /// Items served by the paging endpoint.
    pub catalog: Arc<Catalog>,
}

impl AppState {
    /// Create state with the seeded users and sample catalog.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Arc::from(token.into()),
            users: Arc::new(UserStore::seeded()),
            catalog: Arc::new(Catalog::sample()),
        }
    }

    /// Check a supplied token against the configured one.
    pub fn verify_token(&self, supplied: &str) -> Result<(), ApiError> {
        if supplied == &*self.token {
            Ok(())
        } else {
            metrics::inc_token_failures();
            warn!("token verification failed");
            Err(ApiError::TokenVerificationFailed)
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN)
    }
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Status: "ok".
    #[schema(value_type = String)]
    pub status: &'static str,
}

/// Greeting response.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(value_type = String)]
    pub message: &'static str,
}

/// Echo of an integer item id.
#[derive(Debug, Serialize, ToSchema)]
pub struct ItemIdResponse {
    pub item_id: i64,
}

/// Model name with its canned message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ModelResponse {
    pub model_name: ModelName,
    #[schema(value_type = String)]
    pub message: &'static str,
}

/// Echo of a file path.
#[derive(Debug, Serialize, ToSchema)]
pub struct FilePathResponse {
    pub file_path: String,
}

/// A user's item.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserItemResponse {
    pub item_id: String,
    pub owner_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub description: Option<&'static str>,
}

/// Submitted item with its taxed price.
#[derive(Debug, Serialize, ToSchema)]
pub struct PricedItem {
    #[serde(flatten)]
    pub item: Item,
    /// Present only when a non-zero tax was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_with_tax: Option<f64>,
}

/// Submitted item tagged with its path id.
#[derive(Debug, Serialize, ToSchema)]
pub struct UpdatedItem {
    pub item_id: i64,
    #[serde(flatten)]
    pub item: Item,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
}

/// Health check handler - always returns 200.
#[utoipa::path(
    get,
    path = "/health",
    tag = "ops",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Fixed greeting.
#[utoipa::path(
    get,
    path = "/",
    tag = "samples",
    responses((status = 200, description = "Greeting", body = MessageResponse))
)]
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Hello World",
    })
}

/// Echo an integer path parameter.
#[utoipa::path(
    get,
    path = "/items/{item_id}",
    tag = "samples",
    params(("item_id" = i64, Path, description = "Item id")),
    responses(
        (status = 200, description = "The parsed id", body = ItemIdResponse),
        (status = 422, description = "Not an integer", body = ValidationErrorBody)
    )
)]
pub async fn read_item(ValidPath(path): ValidPath<ItemPath>) -> Json<ItemIdResponse> {
    Json(ItemIdResponse {
        item_id: path.item_id,
    })
}

/// Message for a known model.
#[utoipa::path(
    get,
    path = "/models/{model_name}",
    tag = "samples",
    params(("model_name" = ModelName, Path, description = "Model architecture")),
    responses(
        (status = 200, description = "Model message", body = ModelResponse),
        (status = 422, description = "Unknown model", body = ValidationErrorBody)
    )
)]
pub async fn get_model(ValidPath(path): ValidPath<ModelPath>) -> Json<ModelResponse> {
    let model_name = path.model_name;
    Json(ModelResponse {
        model_name,
        message: model_name.message(),
    })
}

/// Echo a multi-segment path.
#[utoipa::path(
    get,
    path = "/files/{file_path}",
    tag = "samples",
    params(("file_path" = String, Path, description = "File path, may contain '/'")),
    responses((status = 200, description = "The path", body = FilePathResponse))
)]
pub async fn read_file(ValidPath(path): ValidPath<FilePath>) -> Json<FilePathResponse> {
    Json(FilePathResponse {
        file_path: path.file_path,
    })
}

/// `/files/` itself: the path is empty.
pub async fn read_file_root() -> Json<FilePathResponse> {
    Json(FilePathResponse {
        file_path: String::new(),
    })
}

/// Page through the sample catalog.
#[utoipa::path(
    get,
    path = "/querys/",
    tag = "samples",
    params(
        ("skip" = Option<i64>, Query, description = "Start index (default 0)"),
        ("limit" = Option<i64>, Query, description = "Window size (default 10)")
    ),
    responses(
        (status = 200, description = "Catalog window", body = [CatalogItem]),
        (status = 422, description = "Not an integer", body = ValidationErrorBody)
    )
)]
#[instrument(skip(state))]
pub async fn read_catalog(
    State(state): State<AppState>,
    ValidQuery(paging): ValidQuery<Paging>,
) -> Json<Vec<CatalogItem>> {
    let page = state.catalog.page(paging.skip, paging.limit).to_vec();
    debug!(returned = page.len(), "catalog page");
    Json(page)
}

/// An item owned by a user.
#[utoipa::path(
    get,
    path = "/users/{user_id}/items/{item_id}",
    tag = "samples",
    params(
        ("user_id" = i64, Path, description = "Owner id"),
        ("item_id" = String, Path, description = "Item id"),
        ("q" = Option<String>, Query, description = "Search text"),
        ("short" = Option<bool>, Query, description = "Omit the long description (default false)")
    ),
    responses(
        (status = 200, description = "The item", body = UserItemResponse),
        (status = 422, description = "Invalid parameters", body = ValidationErrorBody)
    )
)]
pub async fn read_user_item(
    path: Result<ValidPath<UserItemPath>, ValidationError>,
    query: Result<ValidQuery<UserItemQuery>, ValidationError>,
) -> Result<Json<UserItemResponse>, ApiError> {
    let (ValidPath(path), ValidQuery(query)) = (path, query).all_valid()?;

    Ok(Json(UserItemResponse {
        item_id: path.item_id,
        owner_id: path.user_id,
        q: query.q,
        description: (!query.short).then_some(LONG_DESCRIPTION),
    }))
}

/// Accept an item and compute its taxed price.
#[utoipa::path(
    post,
    path = "/sample_items/",
    tag = "samples",
    request_body = Item,
    responses(
        (status = 200, description = "The item", body = PricedItem),
        (status = 422, description = "Malformed item", body = ValidationErrorBody)
    )
)]
pub async fn create_item(ValidJson(item): ValidJson<Item>) -> Json<PricedItem> {
    let price_with_tax = item.price_with_tax();
    Json(PricedItem {
        item,
        price_with_tax,
    })
}

/// Accept an item for a path id.
#[utoipa::path(
    put,
    path = "/dummy_items/{item_id}",
    tag = "samples",
    params(
        ("item_id" = i64, Path, description = "Item id"),
        ("q" = Option<String>, Query, description = "Search text")
    ),
    request_body = Item,
    responses(
        (status = 200, description = "The item", body = UpdatedItem),
        (status = 422, description = "Invalid input", body = ValidationErrorBody)
    )
)]
pub async fn update_item(
    path: Result<ValidPath<ItemPath>, ValidationError>,
    query: Result<ValidQuery<SearchQuery>, ValidationError>,
    body: Result<ValidJson<Item>, ValidationError>,
) -> Result<Json<UpdatedItem>, ApiError> {
    let (ValidPath(path), ValidQuery(query), ValidJson(item)) = (path, query, body).all_valid()?;

    Ok(Json(UpdatedItem {
        item_id: path.item_id,
        item,
        q: query.q,
    }))
}

/// Fetch a stored user.
///
/// The token is checked before the lookup.
#[utoipa::path(
    get,
    path = "/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = String, Path, description = "User id"),
        ("token" = String, Header, description = "Shared access token")
    ),
    responses(
        (status = 200, description = "The user", body = User),
        (status = 400, description = "token_verification_failed", body = ErrorBody),
        (status = 404, description = "user_not_found", body = ErrorBody),
        (status = 422, description = "Missing token", body = ValidationErrorBody)
    )
)]
#[instrument(skip_all)]
pub async fn get_user(
    State(state): State<AppState>,
    path: Result<ValidPath<UserPath>, ValidationError>,
    token: Result<TokenHeader, ValidationError>,
) -> Result<Json<User>, ApiError> {
    let (ValidPath(path), TokenHeader(token)) = (path, token).all_valid()?;
    state.verify_token(&token)?;

    match state.users.get(&path.user_id) {
        Some(user) => Ok(Json(user)),
        None => {
            debug!("user not found");
            Err(ApiError::UserNotFound)
        }
    }
}

/// Register a new user.
///
/// The token is checked before the duplicate-id check.
#[utoipa::path(
    post,
    path = "/users/",
    tag = "users",
    params(("token" = String, Header, description = "Shared access token")),
    request_body = User,
    responses(
        (status = 200, description = "The created user", body = User),
        (status = 400, description = "token_verification_failed or user_id_duplicated", body = ErrorBody),
        (status = 422, description = "Malformed user", body = ValidationErrorBody)
    )
)]
#[instrument(skip_all)]
pub async fn create_user(
    State(state): State<AppState>,
    token: Result<TokenHeader, ValidationError>,
    body: Result<ValidJson<User>, ValidationError>,
) -> Result<Json<User>, ApiError> {
    let (TokenHeader(token), ValidJson(user)) = (token, body).all_valid()?;
    state.verify_token(&token)?;

    let created = state.users.create(user).map_err(|err| {
        warn!(%err, "user creation rejected");
        ApiError::from(err)
    })?;

    metrics::inc_users_created();
    info!(user_id = %created.id, "user created");
    Ok(Json(created))
}

/// Fallback for unmatched paths.
///
/// A slashed route requested without its slash is redirected with 307, which
/// keeps the method and body.
pub async fn not_found(uri: Uri) -> Response {
    let slashed = format!("{}/", uri.path());
    if SLASHED_ROUTES.contains(&slashed.as_str()) {
        let target = match uri.query() {
            Some(query) => format!("{slashed}?{query}"),
            None => slashed,
        };
        debug!(%target, "redirecting to slashed route");
        return Redirect::temporary(&target).into_response();
    }

    ApiError::RouteNotFound.into_response()
}

/// Give the router's bare 405 the JSON error body, keeping `Allow`.
pub async fn method_not_allowed(response: Response) -> Response {
    if response.status() != StatusCode::METHOD_NOT_ALLOWED {
        return response;
    }

    let mut replaced = ApiError::MethodNotAllowed.into_response();
    if let Some(allow) = response.headers().get(header::ALLOW) {
        replaced.headers_mut().insert(header::ALLOW, allow.clone());
    }
    replaced
}
