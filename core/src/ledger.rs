//! The customer ledger: an append-only, insertion-ordered table of
//! visit/sale records.
//!
//! The ledger is plain in-memory state. Reading and writing the backing
//! table is the job of a `LedgerStore`; the ledger only remembers how many
//! of its rows the store is known to hold, which doubles as the version
//! used to detect stale writes.

use crate::{
    customer::{CustomerRecord, NewCustomer},
    error::ValidationError,
    session::Identity,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    records: Vec<CustomerRecord>,
    persisted_len: usize,
}

impl Ledger {
    /// An empty ledger with nothing persisted.
    pub fn new() -> Self {
        Self::default()
    }

    /// A ledger whose rows were all just read from the backing store.
    pub fn loaded(records: Vec<CustomerRecord>) -> Self {
        let persisted_len = records.len();
        Self { records, persisted_len }
    }

    pub fn records(&self) -> &[CustomerRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows owned by `identity`, in insertion order.
    pub fn filter_by_marketer(&self, identity: &Identity) -> Vec<&CustomerRecord> {
        self.records_for(identity.name())
    }

    /// Rows whose marketer field equals `marketer` exactly.
    pub fn records_for(&self, marketer: &str) -> Vec<&CustomerRecord> {
        self.records.iter().filter(|r| r.marketer == marketer).collect()
    }

    /// Validate `form` and add it to the end of the ledger under `identity`.
    /// A rejected form leaves the ledger untouched.
    pub fn append(
        &mut self,
        identity: &Identity,
        form: NewCustomer,
    ) -> Result<&CustomerRecord, ValidationError> {
        let record = form.into_record(identity).inspect_err(|e| {
            log::warn!("ledger: marketer={} append rejected: {e}", identity.name());
        })?;
        log::info!(
            "ledger: marketer={} appended company={:?} sold={} qty={}",
            record.marketer,
            record.company_name,
            record.product_sold,
            record.product_quantity,
        );
        self.records.push(record);
        Ok(self.records.last().expect("record was just pushed"))
    }

    /// Number of rows the backing store held at the last load or persist.
    pub fn persisted_len(&self) -> usize {
        self.persisted_len
    }

    /// True while appended rows have not reached the backing store.
    pub fn is_dirty(&self) -> bool {
        self.records.len() != self.persisted_len
    }

    /// Rows appended since the last load or persist.
    pub fn pending(&self) -> &[CustomerRecord] {
        &self.records[self.persisted_len.min(self.records.len())..]
    }

    pub(crate) fn mark_persisted(&mut self) {
        self.persisted_len = self.records.len();
    }

    /// Replace the persisted prefix with `fresh` rows from the store and
    /// replay pending rows on top of it.
    pub(crate) fn rebase(&mut self, fresh: Ledger) {
        let pending = self.pending().to_vec();
        let mut rebased = fresh;
        rebased.records.extend(pending);
        *self = rebased;
    }
}
