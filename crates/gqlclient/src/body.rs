use http::{header::CONTENT_TYPE, HeaderValue, Method};
use reqwest::multipart::{Form, Part};
use serde_json::value::RawValue;
use tokio::io::AsyncReadExt;
use url::Url;

use crate::{default_http_client, request::File, Error, Variables};

pub(crate) const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";
const FILE_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(serde::Serialize)]
struct JsonBody<'a> {
    query: &'a str,
    variables: Option<&'a RawValue>,
}

#[derive(Debug)]
pub(crate) struct JsonRequest {
    pub request: reqwest::Request,
    /// The encoded variables, `None` when they were sent as `null`.
    pub variables: Option<Box<RawValue>>,
}

/// `{"query": ..., "variables": ...}`, with `variables` set to `null` when there are none.
pub(crate) fn json(endpoint: &Url, query: &str, variables: Option<&Variables>) -> Result<JsonRequest, Error> {
    let variables = variables
        .map(serde_json::value::to_raw_value)
        .transpose()
        .map_err(Error::Encode)?;

    let body = serde_json::to_vec(&JsonBody {
        query,
        variables: variables.as_deref(),
    })
    .map_err(Error::Encode)?;

    let mut request = reqwest::Request::new(Method::POST, endpoint.clone());
    request
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
    *request.body_mut() = Some(body.into());

    Ok(JsonRequest { request, variables })
}

#[derive(Debug)]
pub(crate) struct MultipartRequest {
    pub request: reqwest::Request,
    /// The encoded `variables` part, empty when it was not written.
    pub variables: Vec<u8>,
    pub file_count: usize,
}

/// A `query` part, a `variables` part when there are any, then one part per file in order.
///
/// Files are read to the end before anything is sent, so a failing reader aborts the execution
/// without touching the network.
pub(crate) async fn multipart(
    endpoint: &Url,
    query: &str,
    variables: Option<&Variables>,
    files: Vec<File>,
) -> Result<MultipartRequest, Error> {
    let mut form = Form::new().text("query", query.to_owned());

    let mut encoded_variables = Vec::new();
    if let Some(variables) = variables.filter(|variables| !variables.is_empty()) {
        encoded_variables = serde_json::to_vec(variables).map_err(Error::Encode)?;
        form = form.part("variables", Part::bytes(encoded_variables.clone()));
    }

    let file_count = files.len();
    for File {
        field,
        name,
        mut content,
    } in files
    {
        let mut bytes = Vec::new();
        if let Err(source) = content.read_to_end(&mut bytes).await {
            return Err(Error::File { name, source });
        }

        let part = Part::bytes(bytes)
            .file_name(name)
            .mime_str(FILE_CONTENT_TYPE)
            .map_err(Error::Build)?;

        form = form.part(field, part);
    }

    // The builder client is only used to reach the form encoder, the request is sent by the
    // configured executor.
    let request = reqwest::RequestBuilder::from_parts(
        default_http_client(),
        reqwest::Request::new(Method::POST, endpoint.clone()),
    )
    .multipart(form)
    .build()
    .map_err(Error::Build)?;

    Ok(MultipartRequest {
        request,
        variables: encoded_variables,
        file_count,
    })
}
