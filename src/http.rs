//! HTTP request helper for the hosting API.
//!
//! Every call issues exactly one request: no retries, no caching. The client
//! carries the user agent and bearer token as default headers, so headers set
//! on an [`ApiRequest`] replace them when both name the same header.
//!
//! Response bodies are decoded in a fixed order:
//! 1. status 204 or `content-length: 0` gives [`ResponseBody::Empty`]
//! 2. a body that parses as JSON gives [`ResponseBody::Json`]
//! 3. anything else is kept as [`ResponseBody::Raw`]
//!
//! Any 4xx/5xx status becomes [`MetadataError::Request`], unless the caller
//! asked for a plain success flag through [`HttpClient::succeeds`].

use crate::error::{MetadataError, Result};
use crate::settings::Settings;
use reqwest::header::{AUTHORIZATION, CONTENT_LENGTH, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;

/// Decoded response body
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Empty,
    Json(Value),
    Raw(Vec<u8>),
}

impl ResponseBody {
    /// Decode a body given the response status and `content-length` header
    pub fn decode(status: StatusCode, content_length: Option<&str>, bytes: &[u8]) -> Self {
        if status == StatusCode::NO_CONTENT || content_length == Some("0") {
            return ResponseBody::Empty;
        }

        match serde_json::from_slice(bytes) {
            Ok(value) => ResponseBody::Json(value),
            Err(_) => ResponseBody::Raw(bytes.to_vec()),
        }
    }

    /// The JSON value, if the body decoded as JSON
    pub fn into_json(self) -> Option<Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseBody::Empty => write!(f, "null"),
            ResponseBody::Json(value) => write!(f, "{}", value),
            ResponseBody::Raw(bytes) => write!(f, "{{\"body\": {:?}}}", String::from_utf8_lossy(bytes)),
        }
    }
}

/// One request against the API host
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub uri: String,
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, uri: impl Into<String>) -> Self {
        Self {
            method,
            uri: uri.into(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn get(uri: impl Into<String>) -> Self {
        Self::new(Method::GET, uri)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Attach a JSON body (sets `Content-Type: application/json`)
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Authenticated client for the hosting API
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", settings.token))?;
        auth.set_sensitive(true);

        let mut default_headers = HeaderMap::new();
        default_headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .user_agent(settings.user_agent.clone())
            .default_headers(default_headers)
            .danger_accept_invalid_certs(!settings.verify_certificates)
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.clone(),
        })
    }

    /// Absolute URL for a request URI
    pub fn url_for(&self, uri: &str) -> String {
        format!("{}{}", self.base_url, uri)
    }

    async fn send(&self, request: &ApiRequest) -> Result<reqwest::Response> {
        // request bodies may be large, only the method and URI are logged
        tracing::info!("Making HTTP request: {} {}", request.method, request.uri);

        let mut builder = self
            .client
            .request(request.method.clone(), self.url_for(&request.uri))
            .headers(request.headers.clone());

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        Ok(builder.send().await?)
    }

    /// Send a request and return the decoded body with its status code.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::Request`] on any 4xx/5xx status.
    pub async fn request_with_status(
        &self,
        request: &ApiRequest,
    ) -> Result<(ResponseBody, StatusCode)> {
        let response = self.send(request).await?;

        let status = response.status();
        let reason = status.canonical_reason().unwrap_or_default().to_string();
        let url = response.url().to_string();
        let content_length = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let bytes = response.bytes().await?;
        let body = ResponseBody::decode(status, content_length.as_deref(), &bytes);

        tracing::info!("HTTP response: {} {}", status.as_u16(), reason);
        tracing::debug!("HTTP response body: {}", body);

        if status.is_client_error() || status.is_server_error() {
            return Err(MetadataError::Request {
                url,
                status: status.as_u16(),
                reason,
                body,
            });
        }

        Ok((body, status))
    }

    /// Send a request and return the decoded body
    pub async fn request(&self, request: &ApiRequest) -> Result<ResponseBody> {
        let (body, _) = self.request_with_status(request).await?;
        Ok(body)
    }

    /// Send a request and report only whether it succeeded.
    ///
    /// Error statuses yield `Ok(false)`; transport failures still propagate.
    pub async fn succeeds(&self, request: &ApiRequest) -> Result<bool> {
        let response = self.send(request).await?;
        let status = response.status();
        tracing::info!(
            "HTTP response: {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or_default()
        );
        Ok(!(status.is_client_error() || status.is_server_error()))
    }

    /// Send a request and deserialize its JSON body into `T`
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        request: &ApiRequest,
        expected: &'static str,
    ) -> Result<T> {
        let body = self.request(request).await?;
        let value = body.into_json().ok_or_else(|| MetadataError::UnexpectedBody {
            url: self.url_for(&request.uri),
            expected,
        })?;
        Ok(serde_json::from_value(value)?)
    }
}
