use serde::{Deserialize, Deserializer, Serialize};

use super::response::decode_json;
use super::{GraphQlClientError, Variables};

/// The JSON body of a GraphQL request.
///
/// Empty variables and an absent operation name are left out of the
/// encoded body rather than sent as `{}` or `null`.
///
/// ```rust
/// use gqlclient::OperationRequest;
///
/// let request = OperationRequest::new("{ viewer { login } }").with_operation_name("Viewer");
/// let body = request.encode()?;
///
/// assert_eq!(
///     String::from_utf8_lossy(&body),
///     r#"{"query":"{ viewer { login } }","operationName":"Viewer"}"#
/// );
/// # Ok::<(), gqlclient::GraphQlClientError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationRequest {
    query: String,
    #[serde(
        default,
        skip_serializing_if = "Variables::is_empty",
        deserialize_with = "null_as_empty"
    )]
    variables: Variables,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    operation_name: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Variables, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Variables>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl OperationRequest {
    /// Creates a request for the `query` document.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    /// Replaces the variables.
    #[must_use]
    pub fn with_variables(mut self, variables: Variables) -> Self {
        self.variables = variables;
        self
    }

    /// Selects the operation to run when the document holds several.
    #[must_use]
    pub fn with_operation_name(mut self, operation_name: impl Into<String>) -> Self {
        self.operation_name = Some(operation_name.into());
        self
    }

    /// The query document.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The variables, possibly empty.
    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    /// The operation name, if any.
    pub fn operation_name(&self) -> Option<&str> {
        self.operation_name.as_deref()
    }

    /// Serializes the request body.
    ///
    /// # Errors
    ///
    /// Returns [`GraphQlClientError::EncodeError`] if serialization fails.
    pub fn encode(&self) -> Result<Vec<u8>, GraphQlClientError> {
        let body = serde_json::to_vec(self)?;
        Ok(body)
    }

    /// Parses a request body.
    ///
    /// # Errors
    ///
    /// Returns [`GraphQlClientError::DecodeError`] if `body` is not a request.
    pub fn decode(body: &[u8]) -> Result<Self, GraphQlClientError> {
        decode_json(body)
    }
}
