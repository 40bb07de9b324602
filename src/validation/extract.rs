//! Axum extractors that run validation before the handler.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, RawPathParams, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use super::{FieldError, LocItem, Location, ValidationError};

/// Name of the header carrying the shared token.
pub const TOKEN_HEADER: &str = "token";

fn rejected(location: Location, kind: &str, msg: String) -> ValidationError {
    ValidationError::single(FieldError::new(kind, location.root(), msg, Value::Null))
}

fn logged(location: Location, err: ValidationError) -> ValidationError {
    debug!(%location, errors = err.errors().len(), "request validation failed");
    err
}

/// Decode `application/x-www-form-urlencoded` text into `T`.
pub fn parse_text<T: DeserializeOwned>(
    location: Location,
    encoded: &str,
) -> Result<T, ValidationError> {
    let pairs = form_urlencoded::parse(encoded.as_bytes());
    serde_path_to_error::deserialize(serde_urlencoded::Deserializer::new(pairs)).map_err(|err| {
        let message = err.inner().to_string();
        ValidationError::single(FieldError::from_serde(
            location,
            err.path().iter(),
            &message,
            |loc| match loc.first() {
                Some(LocItem::Key(key)) => form_urlencoded::parse(encoded.as_bytes())
                    .find(|(name, _)| name == key.as_str())
                    .map(|(_, value)| Value::String(value.into_owned()))
                    .unwrap_or(Value::Null),
                _ => Value::Null,
            },
        ))
    })
}

/// Path parameters decoded into `T`.
#[derive(Debug, Clone)]
pub struct ValidPath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ValidPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ValidationError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let params = RawPathParams::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                logged(
                    Location::Path,
                    rejected(Location::Path, "path_parsing", rejection.body_text()),
                )
            })?;

        let encoded = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(params.iter())
            .finish();

        parse_text(Location::Path, &encoded)
            .map(ValidPath)
            .map_err(|err| logged(Location::Path, err))
    }
}

/// Query parameters decoded into `T`.
#[derive(Debug, Clone)]
pub struct ValidQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ValidationError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = parts.uri.query().unwrap_or_default();

        parse_text(Location::Query, query)
            .map(ValidQuery)
            .map_err(|err| logged(Location::Query, err))
    }
}

/// JSON request body decoded into `T`.
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ValidationError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            logged(
                Location::Body,
                rejected(Location::Body, "body_read", rejection.body_text()),
            )
        })?;

        parse_body(&bytes)
            .map(ValidJson)
            .map_err(|err| logged(Location::Body, err))
    }
}

/// Character offset of a 1-based `line`/`column` position in `bytes`.
fn char_offset(bytes: &[u8], line: usize, column: usize) -> usize {
    let text = String::from_utf8_lossy(bytes);
    let preceding: usize = text
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(|l| l.chars().count())
        .sum();
    preceding + column.saturating_sub(1)
}

fn lookup<'v>(value: &'v Value, loc: &[LocItem]) -> Option<&'v Value> {
    loc.iter().try_fold(value, |current, item| match item {
        LocItem::Key(key) => current.get(key.as_str()),
        LocItem::Index(index) => current.get(*index),
    })
}

/// Decode a JSON object body into `T`.
pub fn parse_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ValidationError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(ValidationError::single(FieldError::new(
            "missing",
            Location::Body.root(),
            "Field required",
            Value::Null,
        )));
    }

    let value: Value = serde_json::from_slice(bytes).map_err(|e| {
        let mut loc = Location::Body.root();
        loc.push(LocItem::Index(char_offset(bytes, e.line(), e.column())));
        ValidationError::single(FieldError::new(
            "json_invalid",
            loc,
            "JSON decode error",
            Value::Object(Map::new()),
        ))
    })?;

    if !value.is_object() {
        return Err(ValidationError::single(FieldError::new(
            "model_attributes_type",
            Location::Body.root(),
            "Input should be a valid dictionary or object to extract fields from",
            value,
        )));
    }

    serde_path_to_error::deserialize(&value).map_err(|err| {
        let message = err.inner().to_string();
        ValidationError::single(FieldError::from_serde(
            Location::Body,
            err.path().iter(),
            &message,
            |loc| lookup(&value, loc).cloned().unwrap_or(Value::Null),
        ))
    })
}

/// The raw `token` header value.
#[derive(Debug, Clone)]
pub struct TokenHeader(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for TokenHeader
where
    S: Send + Sync,
{
    type Rejection = ValidationError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts.headers.get(TOKEN_HEADER).ok_or_else(|| {
            logged(
                Location::Header,
                ValidationError::single(FieldError::missing(Location::Header, TOKEN_HEADER)),
            )
        })?;

        let token = value.to_str().map_err(|_| {
            logged(
                Location::Header,
                ValidationError::single(FieldError::new(
                    "string_type",
                    Location::Header.loc(TOKEN_HEADER),
                    "Input should be a valid string",
                    Value::Null,
                )),
            )
        })?;

        Ok(TokenHeader(token.to_string()))
    }
}
