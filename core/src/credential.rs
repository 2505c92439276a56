//! Credential store: the read-only marketer table.
//!
//! Loaded once per process. Passwords are compared in plaintext,
//! exactly as they appear in the table.

use crate::{
    error::{AuthError, DeskResult, IoError},
    table_io,
    types::MarketerName,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MarketerCredential {
    #[serde(rename = "Name")]
    pub name: MarketerName,
    #[serde(rename = "Password")]
    pub password: String,
}

#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    marketers: Vec<MarketerCredential>,
}

impl CredentialStore {
    pub fn new(marketers: Vec<MarketerCredential>) -> Self {
        Self { marketers }
    }

    /// Read the `Name,Password` table at `path`.
    pub fn load(path: &str) -> DeskResult<Self> {
        let file = std::fs::File::open(path).map_err(|source| IoError::ReadFailed {
            path: path.to_string(),
            source,
        })?;
        let mut reader = table_io::reader(file);
        let marketers = reader
            .deserialize::<MarketerCredential>()
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!("credentials: loaded {} marketers from {path}", marketers.len());
        Ok(Self { marketers })
    }

    /// All rows in table order.
    pub fn marketers(&self) -> &[MarketerCredential] {
        &self.marketers
    }

    /// First row whose name matches exactly.
    pub fn lookup(&self, name: &str) -> Option<&MarketerCredential> {
        self.marketers.iter().find(|m| m.name == name)
    }

    /// Plaintext check of a name/password pair.
    pub fn verify(&self, name: &str, password: &str) -> Result<(), AuthError> {
        let row = self.lookup(name).ok_or_else(|| AuthError::NotFound {
            name: name.to_string(),
        })?;
        if row.password != password {
            return Err(AuthError::BadPassword {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    /// Serialize the full table with its original headers.
    pub fn to_tabular_bytes(&self) -> DeskResult<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        writer.write_record(["Name", "Password"])?;
        for row in &self.marketers {
            writer.serialize(row)?;
        }
        table_io::finish(writer)
    }
}
