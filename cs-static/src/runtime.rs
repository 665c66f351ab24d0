//! Lambda runtime serving static assets ahead of a fallback handler.

use lambda_http::{Body, Request, Response, run, service_fn};
use std::sync::Arc;
use tracing::{debug, info};

use crate::{Result, StaticAssets, StaticRequest, StaticResponse};

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct StaticConfig {
    /// Log each request at debug level.
    pub log_requests: bool,
    /// Base path to strip (e.g. "/prod").
    pub base_path: Option<String>,
}

impl Default for StaticConfig {
    fn default() -> Self {
        Self {
            log_requests: true,
            base_path: None,
        }
    }
}

impl StaticConfig {
    pub fn log_requests(mut self, enabled: bool) -> Self {
        self.log_requests = enabled;
        self
    }

    pub fn base_path(mut self, path: impl Into<String>) -> Self {
        self.base_path = Some(path.into());
        self
    }
}

/// Handler for requests the asset table does not serve.
#[async_trait::async_trait]
pub trait RequestHandler: Send + Sync {
    async fn handle(&self, request: StaticRequest) -> StaticResponse;
}

#[async_trait::async_trait]
impl<F, Fut> RequestHandler for F
where
    F: Fn(StaticRequest) -> Fut + Send + Sync,
    Fut: std::future::Future<Output = StaticResponse> + Send,
{
    async fn handle(&self, request: StaticRequest) -> StaticResponse {
        self(request).await
    }
}

/// Fallback that answers everything with 404.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotFound;

#[async_trait::async_trait]
impl RequestHandler for NotFound {
    async fn handle(&self, _request: StaticRequest) -> StaticResponse {
        StaticResponse::not_found()
    }
}

/// Serves `GET` requests from a [`StaticAssets`] table and passes
/// everything else to the fallback handler.
pub struct StaticRuntime<H = NotFound> {
    assets: Arc<StaticAssets>,
    fallback: Arc<H>,
    config: StaticConfig,
}

impl StaticRuntime<NotFound> {
    pub fn new(assets: StaticAssets) -> Self {
        Self {
            assets: Arc::new(assets),
            fallback: Arc::new(NotFound),
            config: StaticConfig::default(),
        }
    }
}

impl<H> StaticRuntime<H>
where
    H: RequestHandler + 'static,
{
    /// Replace the fallback handler.
    pub fn fallback<F: RequestHandler + 'static>(self, fallback: F) -> StaticRuntime<F> {
        StaticRuntime {
            assets: self.assets,
            fallback: Arc::new(fallback),
            config: self.config,
        }
    }

    pub fn with_config(mut self, config: StaticConfig) -> Self {
        self.config = config;
        self
    }

    pub fn assets(&self) -> &StaticAssets {
        &self.assets
    }

    /// Answer one request.
    pub async fn handle(&self, mut request: StaticRequest) -> StaticResponse {
        if let Some(base_path) = &self.config.base_path {
            request.strip_base_path(base_path);
        }

        if self.config.log_requests {
            debug!(
                method = %request.method,
                path = %request.path,
                request_id = ?request.request_id,
                "Handling request"
            );
        }

        match self.assets.lookup(&request.method, &request.path) {
            Some(response) => response,
            None => self.fallback.handle(request).await,
        }
    }

    /// Run on the Lambda runtime. Returns only if the runtime stops.
    pub async fn run(self) -> Result<()> {
        info!(assets = self.assets.len(), "Starting static Lambda runtime");

        let runtime = Arc::new(self);
        run(service_fn(move |request: Request| {
            let runtime = Arc::clone(&runtime);
            async move { runtime.respond(request).await }
        }))
        .await?;
        Ok(())
    }

    async fn respond(&self, request: Request) -> std::result::Result<Response<Body>, lambda_http::Error> {
        let response = self.handle(StaticRequest::from_lambda_request(&request)).await;
        Ok(response.into_lambda_response()?)
    }
}
