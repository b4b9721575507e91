use std::sync::OnceLock;

/// The error an [`HttpExecutor`] fails with.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Performs the network exchange for a fully built request.
///
/// Connection pooling, TLS, redirects and timeouts all live behind this trait. The client hands
/// over a request with its body already encoded and reads the returned response to the end.
#[async_trait::async_trait]
pub trait HttpExecutor: Send + Sync {
    async fn execute(&self, request: reqwest::Request) -> Result<reqwest::Response, BoxError>;
}

#[async_trait::async_trait]
impl HttpExecutor for reqwest::Client {
    async fn execute(&self, request: reqwest::Request) -> Result<reqwest::Response, BoxError> {
        reqwest::Client::execute(self, request).await.map_err(Into::into)
    }
}

/// The process-wide client used when none is configured.
///
/// Built on first use. Clones share one connection pool.
pub fn default_http_client() -> reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

    CLIENT.get_or_init(reqwest::Client::new).clone()
}
