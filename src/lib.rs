//! Sample JSON API demonstrating typed routing, parameter binding and
//! request validation.
//!
//! Every route binds its path, query, header and body inputs to typed
//! structs before the handler runs. Inputs that cannot be decoded produce a
//! `422` response naming the failing field:
//!
//! ```text
//! GET /items/abc
//! 422 {"detail":[{"type":"int_parsing","loc":["path","item_id"],
//!        "msg":"Input should be a valid integer, unable to parse string as an integer",
//!        "input":"abc"}]}
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`validation`]: Serde-driven input decoding and axum extractors
//! - [`models`]: Items, users and model names
//! - [`store`]: User store and item catalog
//! - [`api`]: HTTP routes, handlers and OpenAPI document
//! - [`metrics`]: Prometheus request metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod store;
pub mod utils;
pub mod validation;

pub use config::Config;
pub use error::{ApiError, Result, ServiceError};
