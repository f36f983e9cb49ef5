//! # gqlclient
//!
//! A small GraphQL over HTTP client that decodes results into your own types.
//!
//! - **[`GraphQlClient`]** posts operations to one endpoint,
//! - **[`record!`]** declares how a struct receives response `data`,
//! - **[`Outcome`]** keeps server errors and local decoding failures apart.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gqlclient::{GraphQlClient, OutcomeKind, record};
//! use serde::Serialize;
//!
//! #[derive(Debug, Default)]
//! struct User {
//!     id: String,
//!     name: String,
//! }
//!
//! record!(User { id, name });
//!
//! #[derive(Serialize)]
//! struct UserVariables<'a> {
//!     id: &'a str,
//! }
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GraphQlClient::new("https://api.example.com/graphql")?;
//!
//! let mut user = User::default();
//! let outcome = client
//!     .send(
//!         &mut user,
//!         "query GetUser($id: ID!) { user(id: $id) { id name } }",
//!         &UserVariables { id: "1" },
//!     )
//!     .await?;
//!
//! assert_eq!(outcome.kind(), OutcomeKind::Complete);
//! # Ok(())
//! # }
//! ```
//!
//! ## Strict unpacking
//!
//! Response keys are matched against the declared wire names of a record.
//! Keys the record does not declare are rejected, declared fields missing from
//! the response are reset to their default value. See [`unpack`] for details.
//!
//! ```rust
//! use gqlclient::record;
//! use gqlclient::unpack::{UnpackError, unpack};
//! use serde_json::json;
//!
//! #[derive(Debug, Default)]
//! struct User {
//!     id: String,
//!     name: String,
//! }
//!
//! record!(User { id, name });
//!
//! let mut user = User::default();
//! let result = unpack(Some(&json!({ "id": "1", "name": "bob", "extra": true })), &mut user);
//!
//! assert!(matches!(result, Err(UnpackError::UnknownField { ref key, .. }) if key == "extra"));
//! ```
//!
//! ## Wire format
//!
//! Requests are posted as `application/json` with the members `query`,
//! `variables` and `operationName`. Empty variables and a missing operation
//! name are omitted from the body, never sent as `{}` or `null`.
//!
//! ## Partial results
//!
//! GraphQL servers may answer with both `data` and `errors`. [`GraphQlClient::send`]
//! always unpacks the `data` it received and returns an [`Outcome`] giving access
//! to the [`Response`], its errors, and the unpack result.
//!
//! ## Deadlines
//!
//! Each request is bounded by the client timeout (30 seconds by default), or by
//! [`GraphQlCall::with_timeout`] and [`GraphQlCall::with_deadline`]. An expired
//! deadline fails with a transport error for which
//! [`GraphQlClientError::is_timeout`] returns `true`. Dropping the future
//! abandons the request.

mod client;

pub mod unpack;

pub use serde_json::Value;

pub use self::client::{
    Authentication, AuthenticationError, DEFAULT_TIMEOUT, GraphQlCall, GraphQlClient,
    GraphQlClientBuilder, GraphQlClientError, GraphQlError, Location, OperationRequest, Outcome,
    OutcomeKind, PathSegment, Response, SecureString, Variables, flatten_variables,
};
