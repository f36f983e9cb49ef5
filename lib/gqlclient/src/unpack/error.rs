use serde_json::Value;

use super::UnpackPath;
use super::kind_of;

/// Errors raised while copying a response `data` value into a destination.
///
/// These are local decoding failures. They are reported separately from the
/// GraphQL `errors` returned by the server.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Error, derive_more::Display)]
pub enum UnpackError {
    /// The response holds a key the destination does not declare.
    ///
    /// Usually a sign that the query selects fields the destination type
    /// was not updated for.
    #[display("Unknown field '{key}' at '{path}'")]
    UnknownField {
        /// Location of the offending key, including the key itself.
        path: String,
        /// The key without a matching field.
        key: String,
    },

    /// The response value has a shape the destination field cannot hold.
    #[display("Type mismatch at '{path}': expected {expected}, got {actual}")]
    TypeMismatch {
        /// Location of the value inside `data`.
        path: String,
        /// What the destination field accepts.
        expected: &'static str,
        /// What the response provided.
        actual: &'static str,
    },
}

impl UnpackError {
    pub(crate) fn unknown_field(path: &UnpackPath, key: &str) -> Self {
        Self::UnknownField {
            path: path.child(key),
            key: key.to_string(),
        }
    }

    pub(crate) fn type_mismatch(path: &UnpackPath, expected: &'static str, actual: &Value) -> Self {
        Self::TypeMismatch {
            path: path.to_string(),
            expected,
            actual: kind_of(actual),
        }
    }

    pub(crate) fn out_of_range(path: &UnpackPath, expected: &'static str) -> Self {
        Self::TypeMismatch {
            path: path.to_string(),
            expected,
            actual: "number out of range",
        }
    }

    /// Location inside `data` where unpacking stopped.
    pub fn path(&self) -> &str {
        match self {
            Self::UnknownField { path, .. } | Self::TypeMismatch { path, .. } => path,
        }
    }
}
