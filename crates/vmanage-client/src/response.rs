use serde_json::{Map, Value};

use crate::error::{Error, ErrorKind, Result};
use crate::transport::RawResponse;

// The member wrapping the payload of most controller responses.
const DATA: &str = "data";

/// Extracts the payload of a response.
///
/// Returns the `data` member of an object body when present, otherwise the
/// whole body.
#[must_use]
pub fn parse_data(response: RawResponse) -> Value {
    match response.json {
        Value::Object(mut fields) if fields.contains_key(DATA) => {
            fields.remove(DATA).unwrap_or(Value::Null)
        }
        json => json,
    }
}

/// Extracts the payload of a response as a list of records.
///
/// A `null` payload is an empty list.
///
/// # Errors
///
/// An error is returned when the payload is neither a list nor `null`, or
/// when one of its elements is not an object.
pub fn parse_list<R>(response: RawResponse) -> Result<Vec<R>>
where
    R: From<Map<String, Value>>,
{
    match parse_data(response) {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(fields) => Ok(R::from(fields)),
                other => Err(Error::new(
                    ErrorKind::MalformedResponse,
                    format!("Expected a JSON object as list element, found `{other}`"),
                )),
            })
            .collect(),
        other => Err(Error::new(
            ErrorKind::MalformedResponse,
            format!("Expected a JSON list, found `{other}`"),
        )),
    }
}

/// Returns the HTTP status code of a response.
#[must_use]
#[inline]
pub const fn parse_status(response: &RawResponse) -> u16 {
    response.status
}

// Values a controller uses to signal that nothing was found.
pub(crate) fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(value) => !value,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(value) => value.is_empty(),
        Value::Array(values) => values.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}
