//! Collaborator traits for the two services

use anyhow::Result;
use std::fmt;

use crate::models::{Entry, EntryBatch, EntryKind, TimeWindow};

/// Where entries are read from
pub trait EntrySource {
    /// Fetch every entry of `kind` whose time falls inside `window`
    fn fetch(&self, kind: EntryKind, window: &TimeWindow) -> Result<Vec<Entry>>;
}

/// What the sink needs to open a session
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub device_id: String,
    /// Ask the sink to register `device_id` as the account's active device
    pub reset_device: bool,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"********")
            .field("device_id", &self.device_id)
            .field("reset_device", &self.reset_device)
            .finish()
    }
}

/// A session opened by [`EntrySink::authenticate`]
#[derive(Clone, PartialEq, Eq)]
pub struct AuthSession {
    token: String,
    account_id: Option<String>,
}

impl AuthSession {
    pub fn new(token: impl Into<String>, account_id: Option<String>) -> Self {
        Self {
            token: token.into(),
            account_id,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn account_id(&self) -> Option<&str> {
        self.account_id.as_deref()
    }
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("token", &"********")
            .field("account_id", &self.account_id)
            .finish()
    }
}

/// Where entries are written to
pub trait EntrySink {
    /// Open a session
    ///
    /// `Ok(None)` means the sink rejected the credentials.
    fn authenticate(&self, credentials: &Credentials) -> Result<Option<AuthSession>>;

    /// Upload all three sequences in one call
    fn transfer(&self, device_id: &str, session: &AuthSession, batch: &EntryBatch) -> Result<()>;
}
