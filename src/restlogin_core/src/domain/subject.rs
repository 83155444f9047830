/// The principal returned by the authentication authority.
///
/// Flags follow the "non-expired / non-locked" convention of typical user
/// stores; `is_expired` and `is_locked` are the negated views exposed to
/// clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    username: String,
    enabled: bool,
    credentials_non_expired: bool,
    account_non_expired: bool,
    account_non_locked: bool,
}

impl Subject {
    /// An enabled, unexpired, unlocked subject.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            enabled: true,
            credentials_non_expired: true,
            account_non_expired: true,
            account_non_locked: true,
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_credentials_non_expired(mut self, credentials_non_expired: bool) -> Self {
        self.credentials_non_expired = credentials_non_expired;
        self
    }

    pub fn with_account_non_expired(mut self, account_non_expired: bool) -> Self {
        self.account_non_expired = account_non_expired;
        self
    }

    pub fn with_account_non_locked(mut self, account_non_locked: bool) -> Self {
        self.account_non_locked = account_non_locked;
        self
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_credentials_non_expired(&self) -> bool {
        self.credentials_non_expired
    }

    pub fn is_account_non_expired(&self) -> bool {
        self.account_non_expired
    }

    pub fn is_account_non_locked(&self) -> bool {
        self.account_non_locked
    }

    pub fn is_expired(&self) -> bool {
        !self.account_non_expired
    }

    pub fn is_locked(&self) -> bool {
        !self.account_non_locked
    }
}
