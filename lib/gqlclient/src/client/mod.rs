use std::time::Duration;

use http::header::HeaderMap;
use serde::Serialize;
use url::Url;

use crate::unpack::Destination;

mod builder;
pub use self::builder::{DEFAULT_TIMEOUT, GraphQlClientBuilder};

mod call;
pub use self::call::GraphQlCall;

mod auth;
pub use self::auth::{Authentication, AuthenticationError, SecureString};

mod variables;
pub use self::variables::{Variables, flatten_variables};

mod request;
pub use self::request::OperationRequest;

mod response;
pub use self::response::{GraphQlError, Location, PathSegment, Response};

mod outcome;
pub use self::outcome::{Outcome, OutcomeKind};

mod error;
pub use self::error::GraphQlClientError;

/// HTTP client sending GraphQL operations to one endpoint.
///
/// The client only holds immutable configuration, cloning it is cheap and it
/// can be used from many tasks at once. Use [`GraphQlClientBuilder`] for
/// anything beyond the endpoint.
///
/// # Example
///
/// ```rust,no_run
/// use gqlclient::{GraphQlClient, record};
/// # use serde_json::json;
///
/// #[derive(Debug, Default)]
/// struct User { id: String, name: String }
/// record!(User { id, name });
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), gqlclient::GraphQlClientError> {
/// let client = GraphQlClient::new("https://api.example.com/graphql")?;
///
/// let mut user = User::default();
/// let outcome = client
///     .send(&mut user, "query GetUser($id: ID!) { user(id: $id) { id name } }", &json!({ "id": "1" }))
///     .await?;
/// let response = outcome.into_result()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct GraphQlClient {
    client: reqwest::Client,
    endpoint: Url,
    timeout: Duration,
    headers: HeaderMap,
    authentication: Option<Authentication>,
}

// Create
impl GraphQlClient {
    /// Starts configuring a client.
    pub fn builder() -> GraphQlClientBuilder {
        GraphQlClientBuilder::default()
    }

    /// Creates a client with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GraphQlClientError::InvalidEndpoint`] when `endpoint` is not a URL.
    pub fn new(endpoint: impl AsRef<str>) -> Result<Self, GraphQlClientError> {
        Self::builder().with_endpoint(endpoint)?.build()
    }
}

// Configuration
impl GraphQlClient {
    /// The URL operations are posted to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// The default per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

// Operations
impl GraphQlClient {
    /// Prepares an operation for the `query` document.
    pub fn operation(&self, query: impl Into<String>) -> GraphQlCall {
        GraphQlCall::build(self, query.into())
    }

    /// Sends `query` with `variables` and unpacks `data` into `destination`.
    ///
    /// `variables` may be a map or any struct serializing to a JSON object.
    ///
    /// # Errors
    ///
    /// Returns an error when the variables are not an object or the round trip
    /// fails. GraphQL errors and unpack failures are reported by the [`Outcome`].
    pub async fn send<D, V>(
        &self,
        destination: &mut D,
        query: impl Into<String>,
        variables: &V,
    ) -> Result<Outcome, GraphQlClientError>
    where
        D: Destination + ?Sized,
        V: Serialize + ?Sized,
    {
        self.operation(query)
            .with_variables(variables)?
            .send(destination)
            .await
    }

    /// Sends `query` with `variables` and returns the decoded response.
    ///
    /// # Errors
    ///
    /// Returns an error when the round trip fails.
    pub async fn send_raw(
        &self,
        query: impl Into<String>,
        variables: Variables,
    ) -> Result<Response, GraphQlClientError> {
        self.operation(query).with_variable_map(variables).await
    }
}
