//! `deserialize_with` helpers for text inputs (path, query).
//!
//! Text values arrive as strings; these parse them leniently and report
//! failures with a tagged message so the 422 body names the expected type.

use serde::{de::Error, Deserialize, Deserializer};

use super::tagged;

pub const INT_PARSING: &str = "Input should be a valid integer, unable to parse string as an integer";
pub const BOOL_PARSING: &str = "Input should be a valid boolean, unable to interpret input";

const TRUTHY: [&str; 6] = ["true", "1", "yes", "on", "t", "y"];
const FALSY: [&str; 6] = ["false", "0", "no", "off", "f", "n"];

/// An `i64` written as text, surrounding whitespace ignored.
pub fn int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    raw.trim()
        .parse()
        .map_err(|_| D::Error::custom(tagged("int_parsing", INT_PARSING)))
}

/// A boolean written as `true/false`, `1/0`, `yes/no`, `on/off`, `t/f` or `y/n`.
pub fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let raw = raw.trim().to_ascii_lowercase();
    if TRUTHY.contains(&raw.as_str()) {
        Ok(true)
    } else if FALSY.contains(&raw.as_str()) {
        Ok(false)
    } else {
        Err(D::Error::custom(tagged("bool_parsing", BOOL_PARSING)))
    }
}

/// Optional text where an empty value counts as absent.
pub fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.is_empty()))
}
