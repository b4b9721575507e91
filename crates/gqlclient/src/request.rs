use std::fmt;

use http::{header::IntoHeaderName, HeaderMap, HeaderValue};
use tokio::io::AsyncRead;

/// Operation variables, keyed by name without the leading `$`.
pub type Variables = serde_json::Map<String, serde_json::Value>;

/// A GraphQL operation to send to a server.
pub struct Request {
    query: String,
    variables: Option<Variables>,
    files: Vec<File>,
    headers: HeaderMap,
}

impl Request {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            variables: None,
            files: Vec::new(),
            headers: HeaderMap::new(),
        }
    }

    /// Sets the variables of this request, replacing any previously set.
    ///
    /// ```
    /// let mut variables = gqlclient::Variables::new();
    /// variables.insert("username".into(), "lelebus".into());
    ///
    /// let request = gqlclient::Request::new("query ($username: String!) { user(name: $username) { id } }")
    ///     .with_variables(variables);
    /// ```
    #[must_use]
    pub fn with_variables(mut self, variables: Variables) -> Self {
        self.variables = Some(variables);
        self
    }

    /// Adds a header value, keeping values already present under the same name.
    #[must_use]
    pub fn with_header(mut self, name: impl IntoHeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Attaches a file to upload.
    ///
    /// Files can only be sent by a client in [multipart](crate::TransportMode::Multipart) mode.
    pub fn add_file(
        &mut self,
        field: impl Into<String>,
        name: impl Into<String>,
        content: impl AsyncRead + Send + Unpin + 'static,
    ) {
        self.files.push(File {
            field: field.into(),
            name: name.into(),
            content: Box::new(content),
        });
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn variables(&self) -> Option<&Variables> {
        self.variables.as_ref()
    }

    pub fn files(&self) -> &[File] {
        &self.files
    }

    /// Headers sent in addition to the client defaults.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub(crate) fn into_parts(self) -> RequestParts {
        RequestParts {
            query: self.query,
            variables: self.variables,
            files: self.files,
            headers: self.headers,
        }
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("query", &self.query)
            .field("variables", &self.variables)
            .field("files", &self.files)
            .field("headers", &self.headers)
            .finish()
    }
}

pub(crate) struct RequestParts {
    pub query: String,
    pub variables: Option<Variables>,
    pub files: Vec<File>,
    pub headers: HeaderMap,
}

/// A file attached to a [`Request`].
///
/// The content is read once, to the end, while the request body is encoded. Executing a request
/// consumes it, so a file is never sent twice.
pub struct File {
    pub(crate) field: String,
    pub(crate) name: String,
    pub(crate) content: Box<dyn AsyncRead + Send + Unpin>,
}

impl File {
    /// The form field the file is attached under.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The file name reported to the server.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("File")
            .field("field", &self.field)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
