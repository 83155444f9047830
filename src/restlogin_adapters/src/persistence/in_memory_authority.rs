use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use restlogin_core::{AuthenticationAuthority, AuthorityError, Credentials, RejectionReason, Subject};
use secrecy::Secret;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UserRegistryError {
    #[error("User already exists")]
    UserAlreadyExists,
}

#[derive(Debug)]
struct UserRecord {
    subject: Subject,
    password: Secret<String>,
}

/// Authority backed by an in-process user table.
///
/// Meant for development and tests; passwords are held in memory as given.
#[derive(Debug, Default, Clone)]
pub struct InMemoryAuthority {
    users: Arc<RwLock<HashMap<String, UserRecord>>>,
}

impl InMemoryAuthority {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an authority pre-populated with `(subject, password)` pairs.
    pub fn from_users<I, P>(users: I) -> Self
    where
        I: IntoIterator<Item = (Subject, P)>,
        P: Into<String>,
    {
        let users = users
            .into_iter()
            .map(|(subject, password)| {
                let record = UserRecord {
                    password: Secret::new(password.into()),
                    subject,
                };
                (record.subject.username().to_owned(), record)
            })
            .collect();

        Self {
            users: Arc::new(RwLock::new(users)),
        }
    }

    pub async fn add_user(
        &self,
        subject: Subject,
        password: impl Into<String>,
    ) -> Result<(), UserRegistryError> {
        let mut users = self.users.write().await;
        if users.contains_key(subject.username()) {
            return Err(UserRegistryError::UserAlreadyExists);
        }
        users.insert(
            subject.username().to_owned(),
            UserRecord {
                password: Secret::new(password.into()),
                subject,
            },
        );
        Ok(())
    }
}

#[async_trait]
impl AuthenticationAuthority for InMemoryAuthority {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Subject, AuthorityError> {
        let users = self.users.read().await;
        // Unknown users and wrong passwords are indistinguishable to the caller.
        let record = users
            .get(credentials.username())
            .ok_or(RejectionReason::BadCredentials)?;
        let subject = &record.subject;

        if subject.is_locked() {
            return Err(RejectionReason::Locked.into());
        }
        if !subject.is_enabled() {
            return Err(RejectionReason::Disabled.into());
        }
        if subject.is_expired() {
            return Err(RejectionReason::AccountExpired.into());
        }
        if !credentials.password_matches(&record.password) {
            return Err(RejectionReason::BadCredentials.into());
        }
        if !subject.is_credentials_non_expired() {
            return Err(RejectionReason::CredentialsExpired.into());
        }

        Ok(subject.clone())
    }
}
