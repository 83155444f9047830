use async_trait::async_trait;
use axum::extract::Request;
use axum::response::Response;

/// Where a filter runs relative to the other filters of a pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterPosition {
    PreAuthentication,
    Authentication,
    PostAuthentication,
}

/// What a filter decided for one request.
pub enum FilterOutcome {
    /// The filter answered the request; the chain stops here.
    Respond(Response),
    /// Hand the request on to the next filter.
    Continue(Request),
}

/// One stage of a [`SecurityPipeline`](crate::SecurityPipeline) filter chain.
#[async_trait]
pub trait SecurityFilter: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    async fn filter(&self, request: Request) -> FilterOutcome;
}
