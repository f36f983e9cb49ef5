use bytes::Bytes;
use http::StatusCode;

use super::AuthenticationError;
use crate::unpack::UnpackError;

/// Errors that can occur when using the [`GraphQlClient`](super::GraphQlClient).
///
/// GraphQL `errors` reported by the server are not part of this enum: they are
/// data, returned in the [`Response`](super::Response).
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum GraphQlClientError {
    /// The endpoint is not a valid URL.
    #[display("Invalid endpoint: {_0}")]
    InvalidEndpoint(url::ParseError),

    /// The client was built without an endpoint.
    #[display("Missing endpoint: call `with_endpoint` before `build`")]
    #[from(skip)]
    MissingEndpoint,

    /// The variables do not serialize to a JSON object.
    ///
    /// Detected before anything is sent.
    #[display("Invalid variables: expected an object, got {actual}")]
    #[from(skip)]
    InvalidVariablesShape {
        /// The JSON kind the variables serialized to.
        actual: &'static str,
    },

    /// The request could not be serialized.
    #[display("Failed to encode request: {_0}")]
    EncodeError(serde_json::Error),

    /// The HTTP exchange failed: DNS, connection, deadline, body read.
    ///
    /// Use [`GraphQlClientError::is_timeout`] to detect expired deadlines.
    #[display("Transport error: {_0}")]
    TransportError(reqwest::Error),

    /// The server answered with a non-success status.
    #[display("Unexpected status code {status}: {}", String::from_utf8_lossy(body))]
    #[from(skip)]
    HttpStatusError {
        /// The HTTP status received.
        status: StatusCode,
        /// The verbatim response body.
        body: Bytes,
    },

    /// The response body is not a valid GraphQL response.
    #[display("Failed to decode response at '{path}': {error}\n{}", String::from_utf8_lossy(body))]
    #[from(skip)]
    DecodeError {
        /// Location of the failure inside the JSON document.
        path: String,
        /// The underlying JSON error.
        error: serde_json::Error,
        /// The raw response body.
        body: Bytes,
    },

    /// A configured header name is invalid.
    InvalidHeaderName(http::header::InvalidHeaderName),

    /// A configured header value is invalid.
    InvalidHeaderValue(http::header::InvalidHeaderValue),

    /// The authentication cannot be turned into a header.
    Authentication(AuthenticationError),

    /// The response `data` does not fit the destination.
    Unpack(UnpackError),
}

impl GraphQlClientError {
    /// Returns `true` when the request was abandoned because its deadline expired.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::TransportError(error) if error.is_timeout())
    }

    /// The HTTP status, for [`GraphQlClientError::HttpStatusError`].
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::HttpStatusError { status, .. } => Some(*status),
            _ => None,
        }
    }
}
