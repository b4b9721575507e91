use serde::de::DeserializeOwned;
use serde_json::value::RawValue;

use crate::{executor::BoxError, response::ResponseHead, GraphQlError};

/// Why an execution failed.
///
/// Variants raised after the server answered keep the status line and headers of that answer,
/// see [`Error::response`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The cancellation token fired before or while the request was in flight
    #[error("request cancelled")]
    Cancelled,
    /// Files were attached but the client sends JSON
    #[error("cannot send files without multipart mode")]
    FilesRequireMultipart,
    /// The query and variables could not be serialized
    #[error("encode body: {0}")]
    Encode(#[source] serde_json::Error),
    /// Reading an attached file failed
    #[error("preparing file `{name}`: {source}")]
    File {
        name: String,
        #[source]
        source: std::io::Error,
    },
    /// The HTTP request could not be assembled
    #[error("building request: {0}")]
    Build(#[source] reqwest::Error),
    /// The HTTP executor failed, nothing was received
    #[error("sending request: {0}")]
    Transport(#[source] BoxError),
    /// The response body could not be read to the end
    #[error("reading body: {source}")]
    ReadBody {
        #[source]
        source: reqwest::Error,
        response: Box<ResponseHead>,
    },
    /// The body was not a GraphQL response and the status was not 200
    #[error("graphql: server returned a non-200 status code: {}", .response.status.as_u16())]
    Status { response: Box<ResponseHead> },
    /// The body was not a GraphQL response, with a 200 status
    #[error("decoding response: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
        response: Box<ResponseHead>,
    },
    /// The server listed at least one error, this is the first of them
    #[error("{error}")]
    GraphQl {
        error: GraphQlError,
        /// The `data` sent next to the errors, if any
        data: Option<Box<RawValue>>,
        response: Box<ResponseHead>,
    },
}

impl Error {
    /// The response the server sent, when the failure happened after receiving one.
    pub fn response(&self) -> Option<&ResponseHead> {
        match self {
            Error::ReadBody { response, .. }
            | Error::Status { response }
            | Error::Decode { response, .. }
            | Error::GraphQl { response, .. } => Some(&**response),
            Error::Cancelled
            | Error::FilesRequireMultipart
            | Error::Encode(_)
            | Error::File { .. }
            | Error::Build(_)
            | Error::Transport(_) => None,
        }
    }

    pub fn graphql(&self) -> Option<&GraphQlError> {
        match self {
            Error::GraphQl { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Decodes the `data` the server sent along with a GraphQL error.
    ///
    /// `None` for other variants and when the server sent no data or `null`.
    ///
    /// ```no_run
    /// # async fn run(client: gqlclient::Client) {
    /// # let cancel = tokio_util::sync::CancellationToken::new();
    /// # let request = gqlclient::Request::new("{ user { id } posts { id } }");
    /// if let Err(error) = client.execute::<serde_json::Value>(&cancel, request).await {
    ///     let partial = error.partial_data::<serde_json::Value>().transpose();
    ///     println!("{error}: {partial:?}");
    /// }
    /// # }
    /// ```
    pub fn partial_data<T: DeserializeOwned>(&self) -> Option<Result<T, serde_json::Error>> {
        match self {
            Error::GraphQl { data: Some(data), .. } => Some(serde_json::from_str(data.get())),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}
