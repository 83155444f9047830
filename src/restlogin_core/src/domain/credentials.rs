use secrecy::{ExposeSecret, Secret};

/// Username/password pair submitted to the login endpoint.
///
/// Both fields are always present: missing values are represented as empty
/// strings so the authentication authority never sees an absent credential.
#[derive(Debug)]
pub struct Credentials {
    username: String,
    password: Secret<String>,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Secret::new(password.into()),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &Secret<String> {
        &self.password
    }

    /// Compare the submitted password with a stored one.
    pub fn password_matches(&self, expected: &Secret<String>) -> bool {
        self.password.expose_secret() == expected.expose_secret()
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self::new("", "")
    }
}
