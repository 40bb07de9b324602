//! Typed path and query parameters for each route.

use serde::Deserialize;

use crate::models::ModelName;
use crate::validation::de;

/// `{item_id}` as an integer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ItemPath {
    #[serde(deserialize_with = "de::int")]
    pub item_id: i64,
}

/// `{model_name}` restricted to known models.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelPath {
    pub model_name: ModelName,
}

/// `{file_path}`, which may span several segments.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FilePath {
    pub file_path: String,
}

/// `?skip&limit` paging window.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Paging {
    #[serde(default = "Paging::default_skip", deserialize_with = "de::int")]
    pub skip: i64,
    #[serde(default = "Paging::default_limit", deserialize_with = "de::int")]
    pub limit: i64,
}

impl Paging {
    pub const DEFAULT_SKIP: i64 = 0;
    pub const DEFAULT_LIMIT: i64 = 10;

    fn default_skip() -> i64 {
        Self::DEFAULT_SKIP
    }

    fn default_limit() -> i64 {
        Self::DEFAULT_LIMIT
    }
}

/// `{user_id}` as an integer owner and `{item_id}` as text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserItemPath {
    #[serde(deserialize_with = "de::int")]
    pub user_id: i64,
    pub item_id: String,
}

/// `?q&short` for a user's item.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserItemQuery {
    #[serde(default, deserialize_with = "de::non_empty")]
    pub q: Option<String>,
    /// When false the long description is included.
    #[serde(default, deserialize_with = "de::lenient_bool")]
    pub short: bool,
}

/// `?q` search text. Empty text behaves as if it were not given.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchQuery {
    #[serde(default, deserialize_with = "de::non_empty")]
    pub q: Option<String>,
}

/// `{user_id}` as text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserPath {
    pub user_id: String,
}
