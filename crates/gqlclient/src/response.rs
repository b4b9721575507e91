use std::fmt;

use http::{header::SET_COOKIE, HeaderMap, StatusCode, Version};
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::value::RawValue;

/// Use as the data type to skip decoding `data` entirely.
pub type Discard = serde::de::IgnoredAny;

/// The top-level object a GraphQL server answers with. Other keys are ignored.
///
/// `data` is kept as raw JSON until the errors are known, so it can be handed back next to them.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    pub data: Option<Box<RawValue>>,
    pub errors: Option<Vec<GraphQlError>>,
}

/// The first error of a response and whatever data came with it.
#[derive(Debug)]
pub(crate) struct FirstError {
    pub error: GraphQlError,
    pub data: Option<Box<RawValue>>,
}

impl Envelope {
    /// Errors are surfaced one at a time: the first listed by the server wins.
    pub fn into_result(self) -> Result<Option<Box<RawValue>>, FirstError> {
        match self.errors.and_then(|errors| errors.into_iter().next()) {
            Some(error) => Err(FirstError { error, data: self.data }),
            None => Ok(self.data),
        }
    }
}

pub(crate) fn decode_data<T: DeserializeOwned>(data: Option<&RawValue>) -> Result<Option<T>, serde_json::Error> {
    data.map(|data| serde_json::from_str(data.get())).transpose()
}

/// An error reported by the server in the `errors` list of a response.
///
/// Only `message` is required. The other fields are `None` when missing, `null` or malformed.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(default, deserialize_with = "lenient")]
    pub locations: Option<Vec<ErrorLocation>>,
    #[serde(default, deserialize_with = "lenient")]
    pub path: Option<Vec<serde_json::Value>>,
    #[serde(default, deserialize_with = "lenient")]
    pub extensions: Option<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct ErrorLocation {
    pub line: u32,
    pub column: u32,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;

    Ok(T::deserialize(value).ok())
}

impl fmt::Display for GraphQlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for GraphQlError {}

/// Status line and headers of an HTTP response.
#[derive(Clone, Debug)]
pub struct ResponseHead {
    pub status: StatusCode,
    pub version: Version,
    pub headers: HeaderMap,
}

impl ResponseHead {
    pub(crate) fn from_response(response: &reqwest::Response) -> Self {
        Self {
            status: response.status(),
            version: response.version(),
            headers: response.headers().clone(),
        }
    }

    /// Raw `Set-Cookie` values, in the order the server sent them. Non UTF-8 values are skipped.
    pub fn cookies(&self) -> impl Iterator<Item = &str> {
        self.headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
    }
}

/// A successful execution.
#[derive(Debug)]
pub struct Response<T> {
    head: ResponseHead,
    data: Option<T>,
}

impl<T> Response<T> {
    pub(crate) fn new(head: ResponseHead, data: Option<T>) -> Self {
        Self { head, data }
    }

    pub fn head(&self) -> &ResponseHead {
        &self.head
    }

    pub fn status(&self) -> StatusCode {
        self.head.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.head.headers
    }

    /// The decoded `data` field, `None` when the server sent none or `null`.
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }

    pub fn into_parts(self) -> (ResponseHead, Option<T>) {
        (self.head, self.data)
    }
}
