//! Responses produced by the static responder.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use http::StatusCode;
use lambda_http::{Body, Response};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::Result;

/// Static responder HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticResponse {
    /// Status code.
    pub status: u16,
    /// Response headers, lower-case names.
    pub headers: HashMap<String, String>,
    /// Raw body.
    pub body: Bytes,
    /// Whether the body is sent base64 encoded.
    pub is_binary: bool,
}

impl StaticResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.into(),
            is_binary: false,
        }
    }

    pub fn ok(body: impl Into<Bytes>) -> Self {
        Self::new(200, body)
    }

    /// Plain-text 404.
    pub fn not_found() -> Self {
        Self::new(404, "Not Found").content_type("text/plain; charset=utf-8")
    }

    /// Add a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    pub fn content_type(self, content_type: impl Into<String>) -> Self {
        self.header("content-type", content_type)
    }

    pub fn binary(mut self, is_binary: bool) -> Self {
        self.is_binary = is_binary;
        self
    }

    /// Header value by case-insensitive name.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// `"200 OK"` style status line used by ALB.
    pub fn status_description(&self) -> String {
        match StatusCode::from_u16(self.status) {
            Ok(code) => match code.canonical_reason() {
                Some(reason) => format!("{} {}", self.status, reason),
                None => self.status.to_string(),
            },
            Err(_) => self.status.to_string(),
        }
    }

    /// Body as it appears in the ALB payload.
    pub fn encoded_body(&self) -> String {
        if self.is_binary {
            STANDARD.encode(&self.body)
        } else {
            String::from_utf8_lossy(&self.body).into_owned()
        }
    }

    /// ALB target-group response payload.
    pub fn to_alb(&self) -> AlbResponse {
        AlbResponse {
            status_code: self.status,
            status_description: self.status_description(),
            headers: self.headers.clone(),
            body: self.encoded_body(),
            is_base64_encoded: self.is_binary,
        }
    }

    /// Convert into a `lambda_http` response.
    ///
    /// Binary bodies are passed as [`Body::Binary`] so the runtime applies
    /// base64 encoding.
    pub fn into_lambda_response(self) -> Result<Response<Body>> {
        let mut builder = Response::builder().status(self.status);
        for (name, value) in &self.headers {
            builder = builder.header(name, value);
        }

        let body = if self.body.is_empty() {
            Body::Empty
        } else if self.is_binary {
            Body::Binary(self.body.to_vec())
        } else {
            match String::from_utf8(self.body.to_vec()) {
                Ok(text) => Body::Text(text),
                Err(e) => Body::Binary(e.into_bytes()),
            }
        };

        Ok(builder.body(body)?)
    }
}

impl Default for StaticResponse {
    fn default() -> Self {
        Self::new(200, Bytes::new())
    }
}

/// JSON shape an ALB expects back from a Lambda target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbResponse {
    pub status_code: u16,
    pub status_description: String,
    pub headers: HashMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_are_lowercased() {
        let response = StaticResponse::ok("x").header("Cache-Control", "no-store");
        assert_eq!(response.header_value("cache-control"), Some("no-store"));
        assert_eq!(response.header_value("CACHE-CONTROL"), Some("no-store"));
    }

    #[test]
    fn test_status_description() {
        assert_eq!(StaticResponse::ok("").status_description(), "200 OK");
        assert_eq!(StaticResponse::not_found().status_description(), "404 Not Found");
        assert_eq!(StaticResponse::new(599, "").status_description(), "599");
    }

    #[test]
    fn test_alb_payload() {
        let alb = StaticResponse::ok(vec![1u8, 2, 3])
            .content_type("image/png")
            .binary(true)
            .to_alb();
        let value = serde_json::to_value(&alb).unwrap();

        assert_eq!(value["statusCode"], 200);
        assert_eq!(value["statusDescription"], "200 OK");
        assert_eq!(value["headers"]["content-type"], "image/png");
        assert_eq!(value["body"], "AQID");
        assert_eq!(value["isBase64Encoded"], true);
    }

    #[test]
    fn test_into_lambda_response() {
        let response = StaticResponse::ok("body{}")
            .content_type("text/css; charset=utf-8")
            .into_lambda_response()
            .unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()["content-type"], "text/css; charset=utf-8");
        assert_eq!(response.body(), &Body::Text("body{}".to_string()));

        let response = StaticResponse::ok(vec![0xffu8]).binary(true).into_lambda_response().unwrap();
        assert_eq!(response.body(), &Body::Binary(vec![0xff]));
    }
}
