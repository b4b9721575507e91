//! A low level GraphQL client.
//!
//! The client takes a GraphQL document you already have, posts it to an endpoint either as JSON
//! or as `multipart/form-data` (when files are attached), and decodes the `data` field of the
//! response into a type of your choosing.
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use gqlclient::{Client, Request};
//! use tokio_util::sync::CancellationToken;
//!
//! // A client is safe to share across requests.
//! let client = Client::new("http://localhost:4000/graphql".parse()?);
//!
//! let mut variables = gqlclient::Variables::new();
//! variables.insert("key".into(), "value".into());
//!
//! let request = Request::new(
//!     r"
//!     query ($key: String!) {
//!         items(id: $key) { field1 field2 }
//!     }
//!     ",
//! )
//! .with_variables(variables);
//!
//! let response = client
//!     .execute::<serde_json::Value>(&CancellationToken::new(), request)
//!     .await?;
//!
//! for cookie in response.head().cookies() {
//!     println!("{cookie}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! When the server reports several GraphQL errors, only the first one is returned.

mod body;
mod client;
mod config;
mod error;
mod executor;
mod request;
mod response;

pub use client::{Client, ClientBuilder, DiagnosticSink};
pub use config::{ClientConfig, ConfigError, TransportMode};
pub use error::Error;
pub use executor::{default_http_client, BoxError, HttpExecutor};
pub use request::{File, Request, Variables};
pub use response::{Discard, ErrorLocation, GraphQlError, Response, ResponseHead};

/// The `tracing` target used for every diagnostic record this crate emits.
pub const GQLCLIENT_TARGET: &str = "gqlclient";
