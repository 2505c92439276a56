//! Session context: the authentication gate.
//!
//! An `Identity` can only be obtained through `authenticate`. Every ledger
//! operation takes one explicitly, so there is no ambient "current user".

use crate::{credential::CredentialStore, error::AuthError, types::MarketerName};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    name: MarketerName,
}

impl Identity {
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Look `username` up by exact match and compare the password in plaintext.
pub fn authenticate(
    credentials: &CredentialStore,
    username: &str,
    password: &str,
) -> Result<Identity, AuthError> {
    match credentials.verify(username, password) {
        Ok(()) => {
            log::info!("session: marketer={username} authenticated");
            Ok(Identity {
                name: username.to_string(),
            })
        }
        Err(e) => {
            log::warn!("session: login rejected: {e}");
            Err(e)
        }
    }
}

