use super::{GraphQlClientError, GraphQlError, Response};
use crate::unpack::UnpackError;

/// How a [`GraphQlClient::send`](super::GraphQlClient::send) call went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    /// No server error, destination fully populated.
    Complete,
    /// The server reported errors, whatever data it sent was unpacked.
    ServerErrors,
    /// The server reported no error but `data` did not fit the destination.
    UnpackFailed,
    /// The server reported errors and `data` did not fit the destination.
    ServerErrorsAndUnpackFailed,
}

/// The response of a round trip together with the result of unpacking its `data`.
///
/// Server errors and unpack failures are kept apart, so callers can tell
/// "the server reported errors" from "local decoding failed" from both.
///
/// ```rust,no_run
/// use gqlclient::{GraphQlClient, OutcomeKind, record};
/// # use serde_json::json;
///
/// #[derive(Debug, Default)]
/// struct Viewer { login: String }
/// record!(Viewer { login });
///
/// # async fn example() -> Result<(), gqlclient::GraphQlClientError> {
/// let client = GraphQlClient::new("https://api.example.com/graphql")?;
/// let mut viewer = Viewer::default();
/// let outcome = client.send(&mut viewer, "{ login }", &json!({})).await?;
///
/// match outcome.kind() {
///     OutcomeKind::Complete => {}
///     OutcomeKind::ServerErrors => eprintln!("partial: {:?}", outcome.errors()),
///     OutcomeKind::UnpackFailed | OutcomeKind::ServerErrorsAndUnpackFailed => {
///         eprintln!("schema drift: {:?}", outcome.unpack_error());
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Outcome {
    response: Response,
    unpacked: Result<(), UnpackError>,
}

impl Outcome {
    pub(crate) fn new(response: Response, unpacked: Result<(), UnpackError>) -> Self {
        Self { response, unpacked }
    }

    /// The decoded response.
    pub fn response(&self) -> &Response {
        &self.response
    }

    /// The errors reported by the server.
    pub fn errors(&self) -> &[GraphQlError] {
        self.response.errors()
    }

    /// The unpack failure, if any.
    pub fn unpack_error(&self) -> Option<&UnpackError> {
        self.unpacked.as_ref().err()
    }

    /// Classifies the outcome.
    pub fn kind(&self) -> OutcomeKind {
        match (self.response.has_errors(), self.unpacked.is_err()) {
            (false, false) => OutcomeKind::Complete,
            (true, false) => OutcomeKind::ServerErrors,
            (false, true) => OutcomeKind::UnpackFailed,
            (true, true) => OutcomeKind::ServerErrorsAndUnpackFailed,
        }
    }

    /// Splits into the response and the unpack result.
    pub fn into_parts(self) -> (Response, Result<(), UnpackError>) {
        (self.response, self.unpacked)
    }

    /// Drops the response, keeping the unpack result.
    ///
    /// # Errors
    ///
    /// Returns [`GraphQlClientError::Unpack`] when unpacking failed. Server
    /// errors are not turned into a local error.
    pub fn into_result(self) -> Result<Response, GraphQlClientError> {
        self.unpacked?;
        Ok(self.response)
    }
}
