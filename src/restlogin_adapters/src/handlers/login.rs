//! Framework-agnostic login handler.

use std::future::Future;

use restlogin_application::AttemptAuthenticationUseCase;
use restlogin_core::{
    AuthRequest, AuthResponseBuilder, AuthenticationDetailsSource, AuthenticationError,
    AuthenticationFailureHandler, AuthenticationOutcome, AuthenticationSuccessHandler,
    SessionAuthenticationStrategy,
};

/// Handle one request to the login path, framework agnostic.
///
/// Records request details, runs the attempt, lets the optional session strategy contribute headers,
/// and hands the outcome to the success or failure handler. The body future
/// is only polled once the request method has been accepted.
///
/// # Example
///
/// ```ignore
/// // Inside an axum filter:
/// let mut request = AxumRequest::new(parts);
/// let response = handle_login(
///     &use_case,
///     &mut request,
///     read_body(body, limit),
///     response_builder(),
///     &success_handler,
///     &failure_handler,
///     session_strategy.as_deref(),
///     &AuthenticationDetailsSource::default(),
/// )
/// .await;
/// ```
#[allow(clippy::too_many_arguments)]
#[tracing::instrument(
    name = "handle_login",
    skip_all,
    fields(method = request.method(), path = request.path())
)]
pub async fn handle_login<R, Fut, Body, B, S, F>(
    use_case: &AttemptAuthenticationUseCase,
    request: &mut R,
    body: Fut,
    builder: B,
    success_handler: &S,
    failure_handler: &F,
    session_strategy: Option<&dyn SessionAuthenticationStrategy>,
    details_source: &AuthenticationDetailsSource,
) -> B::Response
where
    R: AuthRequest + Send,
    Fut: Future<Output = Result<Body, AuthenticationError>> + Send,
    Body: AsRef<[u8]>,
    B: AuthResponseBuilder,
    S: AuthenticationSuccessHandler,
    F: AuthenticationFailureHandler,
{
    let details = details_source.build_details(&*request);
    let outcome: AuthenticationOutcome = use_case
        .execute(request.method(), body, details)
        .await
        .into();

    let authentication = match outcome {
        AuthenticationOutcome::Authenticated(authentication) => authentication,
        AuthenticationOutcome::Rejected(error) => {
            return failure_handler.on_authentication_failure(request, builder, &error);
        }
    };

    let builder = match session_strategy {
        Some(strategy) => match strategy.on_authentication(&authentication, &*request) {
            Ok(directives) => directives.apply(builder),
            Err(error) => {
                tracing::warn!("Session strategy refused the authentication: {error}");
                return failure_handler.on_authentication_failure(request, builder, &error);
            }
        },
        None => builder,
    };

    success_handler.on_authentication_success(request, builder, &authentication)
}
