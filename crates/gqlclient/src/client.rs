use std::{fmt, sync::Arc};

use http::{
    header::{ACCEPT, CONNECTION},
    HeaderValue,
};
use serde::de::DeserializeOwned;
use serde_json::value::RawValue;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::{
    body::{self, JSON_CONTENT_TYPE},
    default_http_client,
    request::RequestParts,
    response::{decode_data, Envelope, FirstError, ResponseHead},
    ClientConfig, Error, HttpExecutor, Request, Response, TransportMode, GQLCLIENT_TARGET,
};

/// Receives every diagnostic line of an execution, on top of the `tracing` debug records.
pub type DiagnosticSink = Arc<dyn Fn(&str) + Send + Sync>;

/// A client for a GraphQL endpoint.
///
/// Holds no state specific to a request: share it, clone it or call it concurrently.
#[derive(Clone)]
pub struct Client {
    endpoint: Url,
    transport: TransportMode,
    close_request_body: bool,
    executor: Arc<dyn HttpExecutor>,
    diagnostics: Option<DiagnosticSink>,
}

impl Client {
    /// A JSON client using the process-wide HTTP client.
    pub fn new(endpoint: Url) -> Self {
        Self::builder(endpoint).build()
    }

    pub fn builder(endpoint: Url) -> ClientBuilder {
        ClientBuilder {
            endpoint,
            config: ClientConfig::default(),
            executor: None,
            diagnostics: None,
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn transport(&self) -> TransportMode {
        self.transport
    }

    pub fn http_executor(&self) -> &Arc<dyn HttpExecutor> {
        &self.executor
    }

    /// Executes the operation and decodes the `data` field of the response as `T`.
    ///
    /// Use [`Discard`](crate::Discard) as `T` to skip decoding the data. If the server lists
    /// several errors, the first one is returned as [`Error::GraphQl`] and the others are
    /// dropped. Data sent next to the errors is available through [`Error::partial_data`].
    ///
    /// The token is checked before anything happens and stays armed while the request is in
    /// flight. Once a response arrives, its body is read and decoded regardless.
    pub async fn execute<T>(&self, cancel: &CancellationToken, request: Request) -> Result<Response<T>, Error>
    where
        T: DeserializeOwned,
    {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let RequestParts {
            query,
            variables,
            files,
            headers,
        } = request.into_parts();

        if !files.is_empty() && self.transport != TransportMode::Multipart {
            return Err(Error::FilesRequireMultipart);
        }

        let mut http_request = match self.transport {
            TransportMode::Json => {
                let json = body::json(&self.endpoint, &query, variables.as_ref())?;

                if self.diagnostics_enabled() {
                    let variables = json.variables.as_deref().map_or("null", RawValue::get);
                    self.logf(format_args!(">> variables: {variables}"));
                    self.logf(format_args!(">> query: {query}"));
                }

                json.request
            }
            TransportMode::Multipart => {
                let multipart = body::multipart(&self.endpoint, &query, variables.as_ref(), files).await?;

                if self.diagnostics_enabled() {
                    self.logf(format_args!(
                        ">> variables: {}",
                        String::from_utf8_lossy(&multipart.variables)
                    ));
                    self.logf(format_args!(">> files: {}", multipart.file_count));
                    self.logf(format_args!(">> query: {query}"));
                }

                multipart.request
            }
        };

        let request_headers = http_request.headers_mut();
        request_headers.insert(ACCEPT, HeaderValue::from_static(JSON_CONTENT_TYPE));

        if self.close_request_body {
            request_headers.insert(CONNECTION, HeaderValue::from_static("close"));
        }

        for (name, value) in &headers {
            request_headers.append(name, value.clone());
        }

        self.logf(format_args!(">> headers: {:?}", http_request.headers()));

        self.send(cancel, http_request).await
    }

    async fn send<T>(&self, cancel: &CancellationToken, request: reqwest::Request) -> Result<Response<T>, Error>
    where
        T: DeserializeOwned,
    {
        let response = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(Error::Cancelled),
            response = self.executor.execute(request) => response.map_err(Error::Transport)?,
        };

        let head = ResponseHead::from_response(&response);

        // Consuming the response releases its body on every path below.
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(source) => {
                return Err(Error::ReadBody {
                    source,
                    response: Box::new(head),
                })
            }
        };

        self.logf(format_args!("<< {}", String::from_utf8_lossy(&bytes)));

        let envelope = match serde_json::from_slice::<Envelope>(&bytes) {
            Ok(envelope) => envelope,
            Err(source) => return Err(decode_failure(head, source)),
        };

        match envelope.into_result() {
            Ok(data) => match decode_data(data.as_deref()) {
                Ok(data) => Ok(Response::new(head, data)),
                Err(source) => Err(decode_failure(head, source)),
            },
            Err(FirstError { error, data }) => Err(Error::GraphQl {
                error,
                data,
                response: Box::new(head),
            }),
        }
    }

    fn diagnostics_enabled(&self) -> bool {
        self.diagnostics.is_some() || tracing::enabled!(target: GQLCLIENT_TARGET, tracing::Level::DEBUG)
    }

    fn logf(&self, args: fmt::Arguments<'_>) {
        if !self.diagnostics_enabled() {
            return;
        }

        let line = args.to_string();
        tracing::debug!(target: GQLCLIENT_TARGET, "{line}");

        if let Some(sink) = &self.diagnostics {
            sink(&line);
        }
    }
}

/// A body that is not a GraphQL response is blamed on the status code when it is not 200.
fn decode_failure(head: ResponseHead, source: serde_json::Error) -> Error {
    let response = Box::new(head);

    if response.status == http::StatusCode::OK {
        Error::Decode { source, response }
    } else {
        Error::Status { response }
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("endpoint", &self.endpoint.as_str())
            .field("transport", &self.transport)
            .field("close_request_body", &self.close_request_body)
            .field("diagnostics", &self.diagnostics.is_some())
            .finish_non_exhaustive()
    }
}

/// Configures a [`Client`]. Every setter changes one setting, later calls win.
pub struct ClientBuilder {
    endpoint: Url,
    config: ClientConfig,
    executor: Option<Arc<dyn HttpExecutor>>,
    diagnostics: Option<DiagnosticSink>,
}

impl ClientBuilder {
    /// Sends requests through a custom executor instead of the process-wide HTTP client.
    #[must_use]
    pub fn http_executor(mut self, executor: impl HttpExecutor + 'static) -> Self {
        self.executor = Some(Arc::new(executor));
        self
    }

    /// Sends requests through the given `reqwest` client.
    #[must_use]
    pub fn http_client(self, client: reqwest::Client) -> Self {
        self.http_executor(client)
    }

    /// Encodes requests as `multipart/form-data`, which allows attaching files.
    #[must_use]
    pub fn multipart_form(mut self) -> Self {
        self.config.transport = TransportMode::Multipart;
        self
    }

    /// Asks for the connection to be closed once the exchange is over.
    #[must_use]
    pub fn close_request_body(mut self) -> Self {
        self.config.close_request_body = true;
        self
    }

    /// Receives the diagnostic lines of every execution.
    ///
    /// ```
    /// let client = gqlclient::Client::builder("http://localhost:4000/graphql".parse().unwrap())
    ///     .diagnostics(|line| eprintln!("{line}"))
    ///     .build();
    /// ```
    #[must_use]
    pub fn diagnostics(mut self, sink: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.diagnostics = Some(Arc::new(sink));
        self
    }

    /// Replaces the transport and connection settings at once.
    #[must_use]
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Client {
        let ClientBuilder {
            endpoint,
            config,
            executor,
            diagnostics,
        } = self;

        Client {
            endpoint,
            transport: config.transport,
            close_request_body: config.close_request_body,
            executor: executor.unwrap_or_else(|| Arc::new(default_http_client())),
            diagnostics,
        }
    }
}
