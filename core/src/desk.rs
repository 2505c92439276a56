//! The desk: single owner of the credential table, the ledger and the
//! ledger store.
//!
//! FLOW:
//!   login -> Identity
//!   customers_for / add_customer take that Identity explicitly
//!   performance / charts / exports read the whole ledger
//!
//! RULES:
//!   - Only the desk mutates the ledger, and only through append.
//!   - Every successful append is followed by a full persist.
//!   - A failed persist keeps the new rows in memory; flush() retries.

use crate::{
    aggregate::{self, PerformanceCharts, PerformanceSummary},
    config::DeskConfig,
    credential::{CredentialStore, MarketerCredential},
    customer::{CustomerRecord, NewCustomer},
    error::DeskResult,
    export::{self, Export},
    ledger::Ledger,
    session::{self, Identity},
    store::{self, LedgerStore},
};

pub struct Desk {
    pub config: DeskConfig,
    credentials: CredentialStore,
    ledger: Ledger,
    store: Box<dyn LedgerStore>,
}

impl Desk {
    /// Load the credential table and the ledger named in `config`.
    /// Either one missing is a startup failure.
    pub fn open(config: DeskConfig) -> DeskResult<Self> {
        let credentials = CredentialStore::load(&config.credentials_path)?;
        let store = store::open(&config)?;
        Self::with_parts(config, credentials, store)
    }

    /// Wire a desk from already-open parts (used in tests and tooling).
    pub fn with_parts(
        config: DeskConfig,
        credentials: CredentialStore,
        store: Box<dyn LedgerStore>,
    ) -> DeskResult<Self> {
        let ledger = store.load()?;
        log::info!(
            "desk: {} marketers, {} customer rows from {}",
            credentials.marketers().len(),
            ledger.len(),
            store.location()
        );
        Ok(Self {
            config,
            credentials,
            ledger,
            store,
        })
    }

    // ── Session ────────────────────────────────────────────────

    pub fn login(&self, username: &str, password: &str) -> DeskResult<Identity> {
        Ok(session::authenticate(&self.credentials, username, password)?)
    }

    pub fn marketers(&self) -> &[MarketerCredential] {
        self.credentials.marketers()
    }

    // ── Ledger ─────────────────────────────────────────────────

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn customers_for(&self, identity: &Identity) -> Vec<&CustomerRecord> {
        self.ledger.filter_by_marketer(identity)
    }

    /// Append a customer for `identity` and persist the full ledger.
    ///
    /// Validation errors leave the ledger untouched. A persist error is
    /// returned as-is, but the record stays in memory and the desk is dirty.
    pub fn add_customer(
        &mut self,
        identity: &Identity,
        form: NewCustomer,
    ) -> DeskResult<CustomerRecord> {
        let record = self.ledger.append(identity, form)?.clone();
        self.store.persist(&mut self.ledger)?;
        Ok(record)
    }

    pub fn is_dirty(&self) -> bool {
        self.ledger.is_dirty()
    }

    /// Retry persisting rows left over from a failed add_customer.
    pub fn flush(&mut self) -> DeskResult<()> {
        if !self.ledger.is_dirty() {
            return Ok(());
        }
        self.store.persist(&mut self.ledger)
    }

    /// Re-read the store and replay pending rows on top of it.
    /// This is how a session recovers from a stale-write rejection.
    pub fn reload(&mut self) -> DeskResult<()> {
        let fresh = self.store.load()?;
        let pending = self.ledger.pending().len();
        self.ledger.rebase(fresh);
        log::info!(
            "desk: reloaded {} rows from {}, {pending} pending",
            self.ledger.persisted_len(),
            self.store.location()
        );
        Ok(())
    }

    // ── Views ──────────────────────────────────────────────────

    pub fn performance(&self) -> Vec<PerformanceSummary> {
        aggregate::aggregate(self.ledger.records())
    }

    pub fn charts(&self) -> PerformanceCharts {
        aggregate::charts(&self.performance())
    }

    pub fn export_marketers(&self) -> DeskResult<Export> {
        export::export_marketers(&self.credentials)
    }

    pub fn export_customers(&self) -> DeskResult<Export> {
        export::export_customers(self.ledger.records(), &self.config.date_format)
    }
}

impl std::fmt::Debug for Desk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Desk")
            .field("config", &self.config)
            .field("marketers", &self.credentials.marketers().len())
            .field("rows", &self.ledger.len())
            .field("dirty", &self.ledger.is_dirty())
            .finish()
    }
}

