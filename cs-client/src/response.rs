//! HTTP response wrapper.

use crate::{ApiError, ClientError, Result};
use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;

/// Fully read HTTP response.
#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    url: url::Url,
}

impl Response {
    /// Create a response from a reqwest response, reading the whole body.
    pub(crate) async fn from_reqwest(response: reqwest::Response) -> Result<Self> {
        let status = response.status();
        let headers = response.headers().clone();
        let url = response.url().clone();
        let body = response.bytes().await?;

        Ok(Self {
            status,
            headers,
            body,
            url,
        })
    }

    /// Get the status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Whether the status is exactly 200, the only status the API uses for
    /// success.
    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK
    }

    /// Get the response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get the response URL.
    pub fn url(&self) -> &url::Url {
        &self.url
    }

    /// Get the response body as bytes.
    pub fn bytes(&self) -> &Bytes {
        &self.body
    }

    /// Get the response body as text, replacing invalid UTF-8.
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Parse the response body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| ClientError::Json(e.to_string()))
    }

    /// Decode the API error body.
    ///
    /// Bodies that are not an API error document become a bare error
    /// carrying the status and raw text. The path is always the request's.
    pub fn api_error(&self, path: &str) -> ApiError {
        let mut error = self.json::<ApiError>().unwrap_or_else(|_| ApiError {
            message: self.text_lossy(),
            ..ApiError::default()
        });
        if error.status_code == 0 {
            error.status_code = self.status.as_u16();
        }
        error.path = path.to_string();
        error
    }

    /// Turn any non-200 response into [`ClientError::Api`].
    pub fn error_for_status(self, path: &str) -> Result<Self> {
        if self.is_ok() {
            Ok(self)
        } else {
            Err(ClientError::Api(self.api_error(path)))
        }
    }
}
