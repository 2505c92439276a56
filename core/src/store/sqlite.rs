//! SQLite-backed ledger. Same contract as the tabular file, but the
//! stale check and the rewrite share one IMMEDIATE transaction.

use super::{stale, LedgerStore};
use crate::{
    customer::CustomerRecord,
    error::{DeskError, DeskResult},
    ledger::Ledger,
    types::MEETING_DATE_FORMAT,
};
use chrono::NaiveDate;
use rusqlite::{params, Connection, TransactionBehavior};

pub struct SqliteLedgerStore {
    conn: Connection,
    path: String,
}

impl SqliteLedgerStore {
    /// Open (or create) the ledger database at `path`.
    pub fn open(path: &str) -> DeskResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode only matters for real files.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        Ok(Self {
            conn,
            path: path.to_string(),
        })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> DeskResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn,
            path: ":memory:".to_string(),
        })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> DeskResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_ledger.sql"))?;
        Ok(())
    }

    fn count(conn: &Connection) -> DeskResult<usize> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM customer", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

impl LedgerStore for SqliteLedgerStore {
    fn location(&self) -> &str {
        &self.path
    }

    fn load(&self) -> DeskResult<Ledger> {
        let mut stmt = self.conn.prepare(
            "SELECT company_name, next_meeting, rating, product_sold,
                    product_name, product_quantity, marketer
             FROM customer ORDER BY row_index ASC",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, i32>(3)? != 0,
                    row.get::<_, String>(4)?,
                    row.get::<_, i64>(5)?,
                    row.get::<_, String>(6)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut records = Vec::with_capacity(rows.len());
        for (i, (company_name, meeting, rating, sold, product_name, qty, marketer)) in
            rows.into_iter().enumerate()
        {
            let malformed = |reason: String| DeskError::MalformedRow {
                path: self.path.clone(),
                row: i + 1,
                reason,
            };
            let next_meeting = NaiveDate::parse_from_str(&meeting, MEETING_DATE_FORMAT)
                .map_err(|e| malformed(format!("next_meeting {meeting:?}: {e}")))?;
            let rating = u8::try_from(rating)
                .map_err(|_| malformed(format!("rating {rating} out of range")))?;
            let product_quantity = u64::try_from(qty)
                .map_err(|_| malformed(format!("product_quantity {qty} is negative")))?;
            let record = CustomerRecord {
                company_name,
                next_meeting,
                rating,
                product_sold: sold,
                product_name,
                product_quantity,
                marketer,
            }
            .checked()
            .map_err(malformed)?;
            records.push(record);
        }
        log::debug!("store: loaded {} rows from {}", records.len(), self.path);
        Ok(Ledger::loaded(records))
    }

    fn stored_len(&self) -> DeskResult<usize> {
        Self::count(&self.conn)
    }

    fn replace_all(&mut self, expected_len: usize, records: &[CustomerRecord]) -> DeskResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let on_disk = Self::count(&tx)?;
        if on_disk != expected_len {
            return Err(stale(&self.path, expected_len, on_disk).into());
        }
        tx.execute("DELETE FROM customer", [])?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO customer (
                    row_index, company_name, next_meeting, rating, product_sold,
                    product_name, product_quantity, marketer
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for (i, r) in records.iter().enumerate() {
                insert.execute(params![
                    i as i64,
                    &r.company_name,
                    r.next_meeting.format(MEETING_DATE_FORMAT).to_string(),
                    r.rating as i64,
                    if r.product_sold { 1 } else { 0 },
                    &r.product_name,
                    r.product_quantity as i64,
                    &r.marketer,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}
