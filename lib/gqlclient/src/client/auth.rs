use std::fmt;

use base64::Engine;
use http::HeaderValue;
use reqwest::header::{AUTHORIZATION, HeaderName};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Errors raised when turning an [`Authentication`] into a request header.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Error, derive_more::Display)]
pub enum AuthenticationError {
    /// Bearer token contains characters not allowed in a header.
    #[display("Bearer token contains invalid characters: {message}")]
    InvalidBearerToken {
        /// Why the header value was rejected.
        message: String,
    },

    /// Basic authentication username cannot be encoded.
    #[display("Basic auth username is invalid: {message}")]
    InvalidUsername {
        /// Why the username was rejected.
        message: String,
    },

    /// Basic authentication credentials do not form a valid header.
    #[display("Basic auth password contains invalid characters: {message}")]
    InvalidPassword {
        /// Why the header value was rejected.
        message: String,
    },

    /// API key header name is invalid.
    #[display("Invalid API key header name '{header_name}': {message}")]
    InvalidHeaderName {
        /// The rejected header name.
        header_name: String,
        /// Why the header name was rejected.
        message: String,
    },

    /// API key contains characters not allowed in a header.
    #[display("API key contains invalid characters: {message}")]
    InvalidApiKey {
        /// Why the header value was rejected.
        message: String,
    },
}

/// A secret string cleared from memory on drop and masked when printed.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecureString(String);

impl SecureString {
    /// Wraps a secret value.
    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// The secret value. Avoid keeping the reference around.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn masked(&self) -> String {
        let value = &self.0;
        let count = value.chars().count();
        if count <= 8 {
            return "***".to_string();
        }
        let head: String = value.chars().take(4).collect();
        let tail: String = value.chars().skip(count - 4).collect();
        format!("{head}...{tail}")
    }
}

impl fmt::Debug for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SecureString").field(&"[REDACTED]").finish()
    }
}

impl fmt::Display for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}

impl From<String> for SecureString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for SecureString {
    fn from(value: &str) -> Self {
        Self::new(value.to_string())
    }
}

/// Credentials attached to every request sent by a client.
///
/// ```rust
/// use gqlclient::{Authentication, GraphQlClient};
///
/// # fn example() -> Result<(), gqlclient::GraphQlClientError> {
/// let client = GraphQlClient::builder()
///     .with_endpoint("https://api.example.com/graphql")?
///     .with_authentication(Authentication::Bearer("my-token".into()))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub enum Authentication {
    /// `Authorization: Bearer <token>`.
    Bearer(SecureString),

    /// `Authorization: Basic <base64(username:password)>`.
    Basic {
        /// The username, must not contain `:`.
        username: String,
        /// The password.
        password: SecureString,
    },

    /// `<header_name>: <key>`.
    ApiKey {
        /// The header carrying the key.
        header_name: String,
        /// The key.
        key: SecureString,
    },
}

impl Authentication {
    /// Builds the header carrying these credentials.
    ///
    /// # Errors
    ///
    /// Fails when the credentials cannot be represented as an HTTP header.
    pub fn to_header(&self) -> Result<(HeaderName, HeaderValue), AuthenticationError> {
        match self {
            Self::Bearer(token) => {
                let mut value = HeaderValue::from_str(&format!("Bearer {}", token.as_str()))
                    .map_err(|error| AuthenticationError::InvalidBearerToken {
                        message: error.to_string(),
                    })?;
                value.set_sensitive(true);
                Ok((AUTHORIZATION, value))
            }

            Self::Basic { username, password } => {
                if username.contains(':') {
                    return Err(AuthenticationError::InvalidUsername {
                        message: "username cannot contain ':'".to_string(),
                    });
                }
                let credentials = base64::engine::general_purpose::STANDARD
                    .encode(format!("{username}:{}", password.as_str()));
                let mut value = HeaderValue::from_str(&format!("Basic {credentials}")).map_err(
                    |error| AuthenticationError::InvalidPassword {
                        message: error.to_string(),
                    },
                )?;
                value.set_sensitive(true);
                Ok((AUTHORIZATION, value))
            }

            Self::ApiKey { header_name, key } => {
                let name = HeaderName::from_bytes(header_name.as_bytes()).map_err(|error| {
                    AuthenticationError::InvalidHeaderName {
                        header_name: header_name.clone(),
                        message: error.to_string(),
                    }
                })?;
                let mut value = HeaderValue::from_str(key.as_str()).map_err(|error| {
                    AuthenticationError::InvalidApiKey {
                        message: error.to_string(),
                    }
                })?;
                value.set_sensitive(true);
                Ok((name, value))
            }
        }
    }
}

impl fmt::Debug for Authentication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bearer(_) => f.debug_tuple("Bearer").field(&"[REDACTED]").finish(),
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"[REDACTED]")
                .finish(),
            Self::ApiKey { header_name, .. } => f
                .debug_struct("ApiKey")
                .field("header_name", header_name)
                .field("key", &"[REDACTED]")
                .finish(),
        }
    }
}

impl fmt::Display for Authentication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bearer(token) => write!(f, "Bearer {token}"),
            Self::Basic { username, .. } => write!(f, "Basic (username: {username})"),
            Self::ApiKey { header_name, key } => write!(f, "ApiKey ({header_name}: {key})"),
        }
    }
}
