use restlogin_core::{AuthenticationError, Credentials};
use serde_json::Value;

pub const DEFAULT_USERNAME_PARAMETER: &str = "username";
pub const DEFAULT_PASSWORD_PARAMETER: &str = "password";

/// Reads a username/password pair from a JSON request body.
#[derive(Debug, Clone)]
pub struct CredentialExtractor {
    username_parameter: String,
    password_parameter: String,
}

impl CredentialExtractor {
    pub fn new(username_parameter: impl Into<String>, password_parameter: impl Into<String>) -> Self {
        Self {
            username_parameter: username_parameter.into(),
            password_parameter: password_parameter.into(),
        }
    }

    /// Parse `body` and pull out the two configured fields.
    ///
    /// Missing or non-string fields become empty strings. Only a body that is
    /// not JSON at all is an error; the parser message is logged, never
    /// returned.
    pub fn extract(&self, body: &[u8]) -> Result<Credentials, AuthenticationError> {
        let document: Value = serde_json::from_slice(body).map_err(|error| {
            tracing::debug!(%error, "Login body could not be parsed as JSON");
            AuthenticationError::MalformedBody
        })?;

        Ok(Credentials::new(
            text_field(&document, &self.username_parameter),
            text_field(&document, &self.password_parameter),
        ))
    }
}

impl Default for CredentialExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_USERNAME_PARAMETER, DEFAULT_PASSWORD_PARAMETER)
    }
}

fn text_field(document: &Value, name: &str) -> String {
    document
        .get(name)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned()
}
