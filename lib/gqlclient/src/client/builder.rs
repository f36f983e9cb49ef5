use std::time::Duration;

use http::header::{HeaderMap, HeaderName, HeaderValue};
use url::Url;

use super::{Authentication, GraphQlClient, GraphQlClientError};

/// Default deadline applied to each request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Builder for [`GraphQlClient`].
///
/// # Default Configuration
///
/// - **Endpoint**: none, [`with_endpoint`](Self::with_endpoint) is required
/// - **Transport**: a default `reqwest::Client`
/// - **Timeout**: 30 seconds per request
/// - **Headers**: none
/// - **Authentication**: none
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use gqlclient::GraphQlClient;
///
/// # fn example() -> Result<(), gqlclient::GraphQlClientError> {
/// let client = GraphQlClient::builder()
///     .with_endpoint("https://api.example.com/graphql")?
///     .with_timeout(Duration::from_secs(5))
///     .with_header("x-request-source", "batch")?
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct GraphQlClientBuilder {
    client: reqwest::Client,
    endpoint: Option<Url>,
    timeout: Duration,
    headers: HeaderMap,
    authentication: Option<Authentication>,
}

impl Default for GraphQlClientBuilder {
    fn default() -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: None,
            timeout: DEFAULT_TIMEOUT,
            headers: HeaderMap::new(),
            authentication: None,
        }
    }
}

impl GraphQlClientBuilder {
    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns [`GraphQlClientError::MissingEndpoint`] when no endpoint was set.
    pub fn build(self) -> Result<GraphQlClient, GraphQlClientError> {
        let Self {
            client,
            endpoint,
            timeout,
            headers,
            authentication,
        } = self;

        let endpoint = endpoint.ok_or(GraphQlClientError::MissingEndpoint)?;

        Ok(GraphQlClient {
            client,
            endpoint,
            timeout,
            headers,
            authentication,
        })
    }

    /// Sets the URL operations are posted to.
    ///
    /// # Errors
    ///
    /// Returns [`GraphQlClientError::InvalidEndpoint`] when `endpoint` is not a URL.
    pub fn with_endpoint(mut self, endpoint: impl AsRef<str>) -> Result<Self, GraphQlClientError> {
        self.endpoint = Some(Url::parse(endpoint.as_ref())?);
        Ok(self)
    }

    /// Uses the given `reqwest::Client` for every request.
    ///
    /// Useful to share a connection pool, or to configure TLS and proxies.
    #[must_use]
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Sets the default per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Adds a header sent with every request.
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

    /// Authenticates every request.
    ///
    /// The credentials replace any header of the same name set with
    /// [`with_header`](Self::with_header) or on a single call.
    #[must_use]
    pub fn with_authentication(mut self, authentication: Authentication) -> Self {
        self.authentication = Some(authentication);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_endpoint() {
        let result = GraphQlClientBuilder::default().build();

        assert!(matches!(result, Err(GraphQlClientError::MissingEndpoint)));
    }

    #[test]
    fn test_builder_rejects_invalid_endpoint() {
        let result = GraphQlClientBuilder::default().with_endpoint("not a url");

        assert!(matches!(result, Err(GraphQlClientError::InvalidEndpoint(_))));
    }

    #[test]
    fn test_builder_defaults() {
        let client = GraphQlClientBuilder::default()
            .with_endpoint("http://localhost:4000/graphql")
            .expect("valid endpoint")
            .build()
            .expect("should build client");

        insta::assert_snapshot!(client.endpoint, @"http://localhost:4000/graphql");
        assert_eq!(client.timeout, DEFAULT_TIMEOUT);
        assert!(client.headers.is_empty());
        assert!(client.authentication.is_none());
    }

    #[test]
    fn test_builder_with_timeout_and_headers() {
        let client = GraphQlClientBuilder::default()
            .with_endpoint("https://api.example.com/graphql")
            .expect("valid endpoint")
            .with_timeout(Duration::from_millis(250))
            .with_header("X-Trace", "abc")
            .expect("valid header")
            .build()
            .expect("should build client");

        assert_eq!(client.timeout, Duration::from_millis(250));
        assert_eq!(
            client.headers.get("x-trace").map(HeaderValue::as_bytes),
            Some(b"abc".as_slice())
        );
    }

    #[test]
    fn test_builder_rejects_invalid_header() {
        let result = GraphQlClientBuilder::default().with_header("Invalid Header", "value");
        assert!(matches!(result, Err(GraphQlClientError::InvalidHeaderName(_))));

        let result = GraphQlClientBuilder::default().with_header("x-ok", "bad\nvalue");
        assert!(matches!(result, Err(GraphQlClientError::InvalidHeaderValue(_))));
    }

    #[test]
    fn test_builder_with_authentication() {
        let client = GraphQlClientBuilder::default()
            .with_endpoint("https://api.example.com/graphql")
            .expect("valid endpoint")
            .with_authentication(Authentication::Bearer("token".into()))
            .build()
            .expect("should build client");

        assert!(matches!(
            client.authentication,
            Some(Authentication::Bearer(ref token)) if token.as_str() == "token"
        ));
    }
}
