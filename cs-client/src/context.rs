//! Per-request context.

use tracing::Span;

/// Header carrying the request id to the API.
pub const REQUEST_ID_HEADER: &str = "X-Vela-Request-Id";

/// Values that travel with one inbound request through every API call it
/// makes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    request_id: String,
}

impl RequestContext {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
        }
    }

    /// Request id, empty when the caller has none.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Span carrying the request id for logs emitted during the call.
    pub fn span(&self) -> Span {
        tracing::info_span!("api_request", request_id = %self.request_id)
    }
}

impl From<&str> for RequestContext {
    fn from(request_id: &str) -> Self {
        Self::new(request_id)
    }
}

impl From<String> for RequestContext {
    fn from(request_id: String) -> Self {
        Self::new(request_id)
    }
}
