//! Request builder.

use crate::{ApiClient, ClientError, REQUEST_ID_HEADER, RequestContext, Response, Result};
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde::Serialize;
use tracing::{Instrument, debug};

/// API request builder.
pub struct RequestBuilder<'a> {
    client: &'a ApiClient,
    method: Method,
    path: String,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
    context: Option<RequestContext>,
}

impl<'a> RequestBuilder<'a> {
    /// Create a new request builder.
    pub(crate) fn new(client: &'a ApiClient, method: Method, path: String) -> Self {
        Self {
            client,
            method,
            path,
            headers: HeaderMap::new(),
            body: None,
            context: None,
        }
    }

    /// Add a header to the request. Invalid names or values are dropped.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        if let (Ok(name), Ok(value)) = (
            HeaderName::try_from(name.as_str()),
            HeaderValue::try_from(value.as_str()),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Attach the request context; its id is sent as `X-Vela-Request-Id`.
    pub fn context(mut self, ctx: &RequestContext) -> Self {
        self.context = Some(ctx.clone());
        self.header(REQUEST_ID_HEADER, ctx.request_id())
    }

    /// Set bearer authentication.
    pub fn bearer_auth(self, token: impl AsRef<str>) -> Self {
        self.header("Authorization", format!("Bearer {}", token.as_ref()))
    }

    /// Set the request body as JSON.
    pub fn json<T: Serialize>(mut self, json: &T) -> Result<Self> {
        let bytes = serde_json::to_vec(json).map_err(|e| ClientError::Json(e.to_string()))?;
        self.headers.insert(
            http::header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        self.body = Some(bytes);
        Ok(self)
    }

    /// Set the request body as form data.
    pub fn form<T: Serialize>(mut self, form: &T) -> Result<Self> {
        let encoded =
            serde_urlencoded::to_string(form).map_err(|e| ClientError::Json(e.to_string()))?;
        self.headers.insert(
            http::header::CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        self.body = Some(encoded.into_bytes());
        Ok(self)
    }

    /// Full request URL.
    pub fn url(&self) -> String {
        self.client.url(&self.path)
    }

    /// Send the request and read the whole response.
    pub async fn send(self) -> Result<Response> {
        let url = url::Url::parse(&self.url()).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        let config = self.client.config();

        let mut request = self.client.inner().request(self.method.clone(), url);

        for (name, value) in &config.default_headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if !config.keep_alive {
            request = request.header(http::header::CONNECTION, "close");
        }
        if !self.headers.contains_key(http::header::CONTENT_TYPE) {
            request = request.header(http::header::CONTENT_TYPE, "application/json");
        }
        for (name, value) in &self.headers {
            request = request.header(name, value);
        }
        if let Some(body) = self.body {
            request = request.body(body);
        }

        let span = self.context.unwrap_or_default().span();
        let method = self.method;
        let path = self.path;
        async move {
            debug!(%method, path = %path, "Sending API request");
            let response = request.send().await?;
            let response = Response::from_reqwest(response).await?;
            debug!(%method, path = %path, status = response.status().as_u16(), "API response");
            Ok(response)
        }
        .instrument(span)
        .await
    }
}
