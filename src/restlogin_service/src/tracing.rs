use std::time::Duration;

use axum::{body::Body, extract::Request, response::Response};
use color_eyre::eyre::Result;
use restlogin_axum::LastAuthenticationFailure;
use tracing::{Level, Span};
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber: `RUST_LOG` filter (default `info`), compact
/// formatting and span traces for errors.
pub fn init_tracing() -> Result<()> {
    let fmt_layer = fmt::layer().compact();

    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .with(ErrorLayer::default())
        .try_init()?;

    Ok(())
}

/// Root span of every request, tagged with a fresh request id.
pub fn make_span_with_request_id(request: &Request<Body>) -> Span {
    let request_id = uuid::Uuid::new_v4();
    tracing::span!(
        Level::INFO,
        "[REQUEST]",
        method = tracing::field::display(request.method()),
        uri = tracing::field::display(request.uri()),
        version = tracing::field::debug(request.version()),
        request_id = tracing::field::display(request_id),
    )
}

pub fn on_request(_request: &Request<Body>, _span: &Span) {
    tracing::event!(Level::INFO, "[REQUEST START]");
}

pub fn on_response(response: &Response, latency: Duration, _span: &Span) {
    let status = response.status();
    let status_code = status.as_u16();
    let failure = response
        .extensions()
        .get::<LastAuthenticationFailure>()
        .map(|LastAuthenticationFailure(error)| error.code());

    // Client errors are expected on a login endpoint; only server errors are loud.
    match status_code / 100 {
        5 => tracing::event!(Level::ERROR, latency = ?latency, status = status_code, failure, "[REQUEST END]"),
        4 => tracing::event!(Level::WARN, latency = ?latency, status = status_code, failure, "[REQUEST END]"),
        _ => tracing::event!(Level::INFO, latency = ?latency, status = status_code, "[REQUEST END]"),
    }
}
