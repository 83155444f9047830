use thiserror::Error;

/// Faults detected while assembling the security pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("No authentication authority is configured on the security pipeline")]
    MissingAuthority,

    #[error("permit_all was requested for {0} but the pipeline has no authorization rules")]
    MissingAuthorizationLayer(String),
}
