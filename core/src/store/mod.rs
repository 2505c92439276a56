//! Ledger persistence layer.
//!
//! RULE: Only store/ talks to the backing table.
//! The desk calls `LedgerStore` methods; it never touches files or SQL directly.
//!
//! Every persist rewrites the whole table. Because the ledger only grows,
//! the stored row count is its version: a persist whose ledger was loaded
//! at a different count than the store now holds is refused as stale.

use crate::{
    config::DeskConfig,
    customer::CustomerRecord,
    error::{DeskResult, IoError},
    ledger::Ledger,
    types::LedgerBackend,
};

mod sqlite;
mod tabular;

pub use sqlite::SqliteLedgerStore;
pub use tabular::{decode_customers, encode_customers, temp_path, TabularLedgerStore, CUSTOMER_HEADERS};

pub trait LedgerStore: Send {
    /// Human-readable location, used in logs and errors.
    fn location(&self) -> &str;

    /// Read every stored row in insertion order.
    fn load(&self) -> DeskResult<Ledger>;

    /// Number of rows currently in the backing table.
    fn stored_len(&self) -> DeskResult<usize>;

    /// Overwrite the backing table with `records`, provided it still holds
    /// `expected_len` rows. Implementations make the check and the write
    /// as close to atomic as their medium allows.
    fn replace_all(&mut self, expected_len: usize, records: &[CustomerRecord]) -> DeskResult<()>;

    /// Write the full ledger. On any error the ledger keeps its rows and stays dirty.
    fn persist(&mut self, ledger: &mut Ledger) -> DeskResult<()> {
        let expected = ledger.persisted_len();
        match self.replace_all(expected, ledger.records()) {
            Ok(()) => {
                ledger.mark_persisted();
                log::info!("store: persisted {} rows to {}", ledger.len(), self.location());
                Ok(())
            }
            Err(e) => {
                log::warn!(
                    "store: persist to {} failed, {} rows left pending: {e}",
                    self.location(),
                    ledger.pending().len()
                );
                Err(e)
            }
        }
    }
}

/// Open the backend named in `config`.
pub fn open(config: &DeskConfig) -> DeskResult<Box<dyn LedgerStore>> {
    let store: Box<dyn LedgerStore> = match config.backend {
        LedgerBackend::Tabular => Box::new(TabularLedgerStore::open(
            &config.ledger_path,
            &config.date_format,
        )?),
        LedgerBackend::Sqlite => {
            let store = SqliteLedgerStore::open(&config.ledger_path)?;
            store.migrate()?;
            Box::new(store)
        }
    };
    log::debug!("store: opened {:?} ledger at {}", config.backend, store.location());
    Ok(store)
}

pub(crate) fn stale(path: &str, expected: usize, on_disk: usize) -> IoError {
    IoError::StaleWrite {
        path: path.to_string(),
        expected,
        on_disk,
    }
}
