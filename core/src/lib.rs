//! Sales desk core: marketer login, the customer ledger, and
//! per-marketer performance rollups.

pub mod aggregate;
pub mod config;
pub mod credential;
pub mod customer;
pub mod desk;
pub mod error;
pub mod export;
pub mod ledger;
pub mod session;
pub mod store;
pub mod table_io;
pub mod types;
