use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::time::{Duration, Instant};

use bytes::Bytes;
use headers::{ContentType, HeaderMapExt};
use http::Method;
use http::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Body, Request};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use super::response::decode_json;
use super::{
    Authentication, GraphQlClient, GraphQlClientError, OperationRequest, Outcome, Response,
    Variables, flatten_variables,
};
use crate::unpack::{Destination, unpack};

/// A GraphQL operation ready to be sent.
///
/// Created by [`GraphQlClient::operation`]. Awaiting the call sends it and
/// returns the decoded [`Response`]; [`send`](Self::send) also unpacks `data`
/// into a destination.
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use gqlclient::{GraphQlClient, record};
/// # use serde_json::json;
///
/// #[derive(Debug, Default)]
/// struct User { id: String, name: String }
/// record!(User { id, name });
///
/// # async fn example() -> Result<(), gqlclient::GraphQlClientError> {
/// let client = GraphQlClient::new("https://api.example.com/graphql")?;
///
/// // Raw response
/// let response = client
///     .operation("query GetUser($id: ID!) { user(id: $id) { id name } }")
///     .with_variables(&json!({ "id": "1" }))?
///     .with_timeout(Duration::from_secs(2))
///     .await?;
///
/// // Unpacked into a record
/// let mut user = User::default();
/// let outcome = client
///     .operation("query GetUser($id: ID!) { user(id: $id) { id name } }")
///     .with_operation_name("GetUser")
///     .with_variables(&json!({ "id": "1" }))?
///     .send(&mut user)
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct GraphQlCall {
    client: reqwest::Client,
    endpoint: Url,
    headers: HeaderMap,
    authentication: Option<Authentication>,
    timeout: Duration,
    deadline: Option<Instant>,
    request: OperationRequest,
}

impl GraphQlCall {
    pub(in crate::client) fn build(client: &GraphQlClient, query: String) -> Self {
        Self {
            client: client.client.clone(),
            endpoint: client.endpoint.clone(),
            headers: client.headers.clone(),
            authentication: client.authentication.clone(),
            timeout: client.timeout,
            deadline: None,
            request: OperationRequest::new(query),
        }
    }

    /// Sets the variables from any value serializing to a JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`GraphQlClientError::InvalidVariablesShape`] when `variables`
    /// does not serialize to an object, see [`flatten_variables`].
    pub fn with_variables<V>(self, variables: &V) -> Result<Self, GraphQlClientError>
    where
        V: Serialize + ?Sized,
    {
        let variables = flatten_variables(variables)?;
        Ok(self.with_variable_map(variables))
    }

    /// Sets already flattened variables.
    #[must_use]
    pub fn with_variable_map(mut self, variables: Variables) -> Self {
        self.request = self.request.with_variables(variables);
        self
    }

    /// Selects the operation to run when the document holds several.
    #[must_use]
    pub fn with_operation_name(mut self, operation_name: impl Into<String>) -> Self {
        self.request = self.request.with_operation_name(operation_name);
        self
    }

    /// Overrides the client timeout for this call.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Abandons the call once `deadline` is reached.
    ///
    /// The earliest of the deadline and the timeout wins. A deadline already
    /// in the past fails the call with a timeout.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Adds a header to this call only.
    ///
    /// # Errors
    ///
    /// Fails when the name or the value is not a valid header.
    pub fn with_header(
        mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Self, GraphQlClientError> {
        let name = HeaderName::from_bytes(name.as_ref().as_bytes())?;
        let value = HeaderValue::from_str(value.as_ref())?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// The request body that will be sent.
    pub fn request(&self) -> &OperationRequest {
        &self.request
    }

    /// Sends the operation and unpacks `data` into `destination`.
    ///
    /// The destination is populated even when the server reports errors, so
    /// partial results are not lost.
    ///
    /// # Errors
    ///
    /// Returns an error when the round trip fails. Unpack failures are not
    /// errors here, they are reported by the [`Outcome`].
    pub async fn send<D>(self, destination: &mut D) -> Result<Outcome, GraphQlClientError>
    where
        D: Destination + ?Sized,
    {
        let response = self.exchange().await?;
        let unpacked = unpack(response.data.as_ref(), destination);
        Ok(Outcome::new(response, unpacked))
    }

    /// Sends the operation and decodes the whole response body into `R`.
    ///
    /// Lets callers bring their own response envelope, for instance with typed
    /// `data` and `extensions`.
    ///
    /// # Errors
    ///
    /// Returns an error when the round trip fails or the body does not fit `R`.
    pub async fn send_full<R>(self) -> Result<R, GraphQlClientError>
    where
        R: DeserializeOwned,
    {
        let body = self.fetch().await?;
        decode_json(&body)
    }

    async fn exchange(self) -> Result<Response, GraphQlClientError> {
        let body = self.fetch().await?;
        Response::from_slice(&body)
    }

    fn effective_timeout(&self) -> Duration {
        match self.deadline {
            Some(deadline) => deadline
                .saturating_duration_since(Instant::now())
                .min(self.timeout),
            None => self.timeout,
        }
    }

    async fn fetch(self) -> Result<Bytes, GraphQlClientError> {
        let timeout = self.effective_timeout();
        let Self {
            client,
            endpoint,
            headers,
            authentication,
            request: operation,
            ..
        } = self;

        let body = operation.encode()?;
        trace!(length = body.len(), "request body encoded");

        let mut request = Request::new(Method::POST, endpoint);
        *request.timeout_mut() = Some(timeout);

        let req_headers = request.headers_mut();
        req_headers.typed_insert(ContentType::json());
        req_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        req_headers.extend(headers);
        // configured credentials win over a raw header of the same name
        if let Some(authentication) = &authentication {
            let (name, value) = authentication.to_header()?;
            req_headers.insert(name, value);
        }

        *request.body_mut() = Some(Body::from(body));

        debug!(
            url = %request.url(),
            operation_name = ?operation.operation_name(),
            ?timeout,
            "sending..."
        );
        let response = client.execute(request).await?;
        let status = response.status();
        debug!(%status, "...receiving");

        if !status.is_success() {
            let body = response
                .bytes()
                .await
                .unwrap_or_else(|error| {
                    Bytes::from(format!("<unable to read response body: {error}>"))
                });
            return Err(GraphQlClientError::HttpStatusError { status, body });
        }

        let body = response.bytes().await?;
        trace!(length = body.len(), "response body read");
        Ok(body)
    }
}

/// Awaiting a [`GraphQlCall`] sends it and returns the decoded [`Response`].
impl IntoFuture for GraphQlCall {
    type Output = Result<Response, GraphQlClientError>;
    type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.exchange())
    }
}
