//! Two-person workout accountability tracker. Keeps a ledger of who worked
//! out on the scheduled days (Tuesday, Thursday, Saturday), lets each user
//! plan their next session, and shames whoever skipped the last one.
//!

pub mod cli;
pub mod ledger;
pub mod store;
pub mod tracker;
pub mod utils;
