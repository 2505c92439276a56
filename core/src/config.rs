use chrono::format::{Item, StrftimeItems};
use crate::types::{LedgerBackend, MEETING_DATE_FORMAT};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = "desk.json";

#[derive(Debug, Clone, Deserialize)]
struct DeskConfigFile {
    #[serde(default = "default_credentials_file")]
    credentials_file: String,
    #[serde(default = "default_ledger_file")]
    ledger_file: String,
    #[serde(default)]
    backend: LedgerBackend,
    #[serde(default = "default_date_format")]
    date_format: String,
}

fn default_credentials_file() -> String {
    "marketers.csv".into()
}

fn default_ledger_file() -> String {
    "customers.csv".into()
}

fn default_date_format() -> String {
    MEETING_DATE_FORMAT.into()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeskConfig {
    /// Credential table (`Name,Password`). Read once at startup.
    pub credentials_path: String,
    /// Customer ledger. A CSV file for the tabular backend, a database file for sqlite.
    pub ledger_path: String,
    pub backend: LedgerBackend,
    /// chrono format for the `Next Meeting` column of tabular files.
    pub date_format: String,
}

impl DeskConfig {
    /// Load from `{data_dir}/desk.json`. Relative paths in the file
    /// resolve against `data_dir`.
    /// In tests, use DeskConfig::default_test().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/{CONFIG_FILE_NAME}");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let file: DeskConfigFile = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;

        // Fail at startup rather than on first write.
        if file.date_format.is_empty()
            || StrftimeItems::new(&file.date_format).any(|item| matches!(item, Item::Error))
        {
            anyhow::bail!("Invalid date_format '{}' in {path}", file.date_format);
        }

        Ok(Self {
            credentials_path: resolve(data_dir, &file.credentials_file),
            ledger_path: resolve(data_dir, &file.ledger_file),
            backend: file.backend,
            date_format: file.date_format,
        })
    }

    /// Defaults rooted at `data_dir`, used when no desk.json exists and in tests.
    pub fn defaults_in(data_dir: &str) -> Self {
        Self {
            credentials_path: resolve(data_dir, &default_credentials_file()),
            ledger_path: resolve(data_dir, &default_ledger_file()),
            backend: LedgerBackend::Tabular,
            date_format: default_date_format(),
        }
    }

    /// Config with hardcoded defaults for use in unit tests.
    pub fn default_test() -> Self {
        Self::defaults_in(".")
    }
}

fn resolve(data_dir: &str, file: &str) -> String {
    if Path::new(file).is_absolute() {
        file.to_string()
    } else {
        format!("{data_dir}/{file}")
    }
}
