//! Request validation layer.
//!
//! Raw path, query, header and body inputs are decoded into typed request
//! structs with serde before any handler runs. A failure is reported as a
//! [`ValidationError`] carrying one [`FieldError`] per offending input.
//!
//! - [`de`]: `deserialize_with` helpers for lenient text inputs
//! - [`extract`]: axum extractors wiring serde decoding into handlers

pub mod de;
pub mod extract;

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use serde_path_to_error::Segment;
use thiserror::Error;
use utoipa::ToSchema;

pub use extract::{TokenHeader, ValidJson, ValidPath, ValidQuery};

/// Where in the request an input was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// URL path segment.
    Path,
    /// URL query string.
    Query,
    /// Request header.
    Header,
    /// JSON request body.
    Body,
}

impl Location {
    /// Name used as the first `loc` element.
    pub fn as_str(self) -> &'static str {
        match self {
            Location::Path => "path",
            Location::Query => "query",
            Location::Header => "header",
            Location::Body => "body",
        }
    }

    /// `loc` naming the location itself.
    pub fn root(self) -> Vec<LocItem> {
        vec![LocItem::from(self.as_str())]
    }

    /// `loc` for a named field at this location.
    pub fn loc(self, field: &str) -> Vec<LocItem> {
        vec![LocItem::from(self.as_str()), LocItem::from(field)]
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One element of a `loc`: a field name or a position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LocItem {
    Key(String),
    Index(usize),
}

impl From<&str> for LocItem {
    fn from(key: &str) -> Self {
        LocItem::Key(key.to_string())
    }
}

impl PartialEq<&str> for LocItem {
    fn eq(&self, other: &&str) -> bool {
        matches!(self, LocItem::Key(key) if key == other)
    }
}

impl PartialEq<usize> for LocItem {
    fn eq(&self, other: &usize) -> bool {
        matches!(self, LocItem::Index(index) if index == other)
    }
}

/// Build a serde error message carrying an error type, e.g. `[int_parsing] ...`.
///
/// [`FieldError::from_serde`] reads the type back out.
pub fn tagged(kind: &str, msg: &str) -> String {
    format!("[{kind}] {msg}")
}

fn untag(message: &str) -> Option<(&str, &str)> {
    let (kind, msg) = message.strip_prefix('[')?.split_once("] ")?;
    kind.chars()
        .all(|c| c.is_ascii_lowercase() || c == '_')
        .then_some((kind, msg))
}

/// Error type and message for an `invalid type: X, expected Y` failure.
fn type_mismatch(expected: &str) -> Option<(&'static str, &'static str)> {
    let mapped = match expected {
        "f64" | "f32" => ("float_type", "Input should be a valid number"),
        "i64" | "i32" | "u64" => ("int_type", "Input should be a valid integer"),
        "a string" => ("string_type", "Input should be a valid string"),
        "a boolean" => ("bool_type", "Input should be a valid boolean"),
        other if other.starts_with("struct ") || other.starts_with("a map") => (
            "model_attributes_type",
            "Input should be a valid dictionary or object to extract fields from",
        ),
        _ => return None,
    };
    Some(mapped)
}

/// A single failing input.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FieldError {
    /// Machine-readable error type (e.g. `int_parsing`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Location of the input, e.g. `["path", "item_id"]` or `["body", 7]`.
    #[schema(value_type = Vec<Object>)]
    pub loc: Vec<LocItem>,
    /// Human-readable message.
    pub msg: String,
    /// The offending input value.
    #[schema(value_type = Object)]
    pub input: Value,
}

impl FieldError {
    /// Create a field error.
    pub fn new(kind: &str, loc: Vec<LocItem>, msg: impl Into<String>, input: Value) -> Self {
        Self {
            kind: kind.to_string(),
            loc,
            msg: msg.into(),
            input,
        }
    }

    /// A required input was not supplied.
    pub fn missing(location: Location, field: &str) -> Self {
        Self::new("missing", location.loc(field), "Field required", Value::Null)
    }

    /// Translate a serde failure at `path` into a field error.
    ///
    /// `input` resolves the raw value found under the field's `loc` (without
    /// the location prefix).
    pub fn from_serde<'a>(
        location: Location,
        path: impl IntoIterator<Item = &'a Segment>,
        message: &str,
        input: impl FnOnce(&[LocItem]) -> Value,
    ) -> Self {
        let mut loc = location.root();
        loc.extend(path.into_iter().filter_map(|segment| match segment {
            Segment::Seq { index } => Some(LocItem::Index(*index)),
            Segment::Map { key } => Some(LocItem::Key(key.clone())),
            Segment::Enum { variant } => Some(LocItem::Key(variant.clone())),
            Segment::Unknown => None,
        }));

        if let Some(field) = message
            .strip_prefix("missing field `")
            .and_then(|rest| rest.strip_suffix('`'))
        {
            loc.push(LocItem::from(field));
            return Self::new("missing", loc, "Field required", Value::Null);
        }

        let input = input(&loc[1..]);
        if let Some((kind, msg)) = untag(message) {
            return Self::new(kind, loc, msg, input);
        }

        let mismatch = message
            .strip_prefix("invalid type: ")
            .and_then(|rest| rest.rsplit_once(", expected "))
            .and_then(|(_, expected)| type_mismatch(expected));
        match mismatch {
            Some((kind, msg)) => Self::new(kind, loc, msg, input),
            None => Self::new("value_error", loc, message, input),
        }
    }
}

/// One or more inputs failed to validate.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{} validation error(s) for request", .errors.len())]
pub struct ValidationError {
    errors: Vec<FieldError>,
}

impl ValidationError {
    /// Wrap a list of field errors.
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }

    /// Wrap a single field error.
    pub fn single(error: FieldError) -> Self {
        Self {
            errors: vec![error],
        }
    }

    /// Combine the failures of several inputs, keeping their order.
    pub fn merge(failures: impl IntoIterator<Item = Option<ValidationError>>) -> Self {
        Self {
            errors: failures
                .into_iter()
                .flatten()
                .flat_map(ValidationError::into_errors)
                .collect(),
        }
    }

    /// The individual field errors.
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Consume into the field errors.
    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }
}

/// Several independently extracted inputs that must all be valid.
///
/// Handlers with more than one validated input take each extractor as a
/// `Result` and join them here, so a bad header and a bad body are reported
/// in the same response.
pub trait AllValid {
    type Output;

    /// Every value, or the failures of all inputs that did not validate.
    fn all_valid(self) -> Result<Self::Output, ValidationError>;
}

impl<A, B> AllValid for (Result<A, ValidationError>, Result<B, ValidationError>) {
    type Output = (A, B);

    fn all_valid(self) -> Result<Self::Output, ValidationError> {
        match self {
            (Ok(a), Ok(b)) => Ok((a, b)),
            (a, b) => Err(ValidationError::merge([a.err(), b.err()])),
        }
    }
}

impl<A, B, C> AllValid
    for (
        Result<A, ValidationError>,
        Result<B, ValidationError>,
        Result<C, ValidationError>,
    )
{
    type Output = (A, B, C);

    fn all_valid(self) -> Result<Self::Output, ValidationError> {
        match self {
            (Ok(a), Ok(b), Ok(c)) => Ok((a, b, c)),
            (a, b, c) => Err(ValidationError::merge([a.err(), b.err(), c.err()])),
        }
    }
}
