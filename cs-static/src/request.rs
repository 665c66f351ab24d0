//! Incoming request view.

use http::Method;
use lambda_http::Request;
use lambda_http::request::RequestContext;
use std::collections::HashMap;

/// The parts of a Lambda HTTP request the responder looks at.
#[derive(Debug, Clone)]
pub struct StaticRequest {
    pub method: Method,
    pub path: String,
    /// Headers with lower-case names; values that are not valid strings are dropped.
    pub headers: HashMap<String, String>,
    pub request_id: Option<String>,
}

impl StaticRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HashMap::new(),
            request_id: None,
        }
    }

    /// Create from a lambda_http::Request.
    pub fn from_lambda_request(request: &Request) -> Self {
        let headers = request
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        // ALB events carry no request id of their own.
        let request_id = match request.extensions().get::<RequestContext>() {
            Some(RequestContext::ApiGatewayV2(ctx)) => ctx.request_id.clone(),
            Some(RequestContext::ApiGatewayV1(ctx)) => ctx.request_id.clone(),
            _ => None,
        };

        Self {
            method: request.method().clone(),
            path: request.uri().path().to_string(),
            headers,
            request_id,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// Drop `base_path` from the front of the path, leaving at least `/`.
    pub fn strip_base_path(&mut self, base_path: &str) {
        if let Some(rest) = self.path.strip_prefix(base_path) {
            self.path = if rest.is_empty() { "/".to_string() } else { rest.to_string() };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_lambda_request() {
        let request = http::Request::builder()
            .method("GET")
            .uri("https://example.com/css/test.css?v=1")
            .header("User-Agent", "test")
            .body(lambda_http::Body::Empty)
            .unwrap();

        let request = StaticRequest::from_lambda_request(&request);
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.path, "/css/test.css");
        assert_eq!(request.header("user-agent"), Some("test"));
        assert!(request.request_id.is_none());
    }

    #[test]
    fn test_strip_base_path() {
        let mut request = StaticRequest::new(Method::GET, "/prod/index.html");
        request.strip_base_path("/prod");
        assert_eq!(request.path, "/index.html");

        let mut request = StaticRequest::new(Method::GET, "/prod");
        request.strip_base_path("/prod");
        assert_eq!(request.path, "/");

        let mut request = StaticRequest::new(Method::GET, "/dev/index.html");
        request.strip_base_path("/prod");
        assert_eq!(request.path, "/dev/index.html");
    }
}
