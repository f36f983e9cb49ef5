use std::fmt;

use bytes::Bytes;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{GraphQlClientError, Variables};

/// The JSON body of a GraphQL response.
///
/// `data` and `errors` are independent: a server may return both when only
/// part of the operation failed. Unknown top-level members are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// The operation result, absent when the server sent none or `null`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    /// Errors reported by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<GraphQlError>>,

    /// Server-specific metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Variables>,
}

impl Response {
    /// Parses a response body.
    ///
    /// # Errors
    ///
    /// Returns [`GraphQlClientError::DecodeError`] with the raw body when it is
    /// not a GraphQL response.
    pub fn from_slice(body: &[u8]) -> Result<Self, GraphQlClientError> {
        decode_json(body)
    }

    /// The errors reported by the server, empty when there are none.
    pub fn errors(&self) -> &[GraphQlError] {
        self.errors.as_deref().unwrap_or_default()
    }

    /// Returns `true` when the server reported at least one error.
    pub fn has_errors(&self) -> bool {
        !self.errors().is_empty()
    }
}

/// One entry of the `errors` list of a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_more::Display)]
#[display("{message}")]
pub struct GraphQlError {
    /// Description of the error.
    pub message: String,

    /// Positions in the query document the error relates to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<Location>>,

    /// Path of the response field that failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<PathSegment>>,

    /// Server-specific details, such as an error code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Variables>,
}

impl GraphQlError {
    /// Creates an error with only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: None,
            path: None,
            extensions: None,
        }
    }
}

/// A line and column in the query document, both starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Line number.
    pub line: u32,
    /// Column number.
    pub column: u32,
}

/// One step of a [`GraphQlError`] path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// A field name or alias.
    Key(String),
    /// A list index.
    Index(u64),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Parses `body` as JSON, reporting failures with their location and the raw body.
pub(crate) fn decode_json<T>(body: &[u8]) -> Result<T, GraphQlClientError>
where
    T: DeserializeOwned,
{
    let failure = |path: String, error: serde_json::Error| GraphQlClientError::DecodeError {
        path,
        error,
        body: Bytes::copy_from_slice(body),
    };

    let mut deserializer = serde_json::Deserializer::from_slice(body);
    let value = serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|error| failure(error.path().to_string(), error.into_inner()))?;
    deserializer
        .end()
        .map_err(|error| failure(String::from("."), error))?;

    Ok(value)
}
