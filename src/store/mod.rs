//! Persistence for the ledger.
//! The core only talks to [ledger_store::LedgerStore]; the shipped
//! implementation is [json_store::JsonStore], which keeps one JSON-lines
//! file per table under the application state directory.

pub mod entities;
pub mod json_store;
pub mod ledger_store;
