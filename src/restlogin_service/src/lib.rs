//! Ready-to-run HTTP service exposing the JSON login endpoint in front of a
//! protected router.

pub mod login_service;
pub mod tracing;

pub use login_service::LoginService;
pub use self::tracing::init_tracing;
