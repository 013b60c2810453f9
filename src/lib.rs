pub mod command;
pub mod config;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod store;
pub mod trade;
pub mod utils;

pub use command::{Command, Query};
pub use error::{LedgerError, Result};
pub use ledger::{DIAGNOSTIC_KEY, TRADE_INDEX_KEY, TradeLedger};
pub use store::{MemoryStore, SledStore, StateStore};
pub use trade::{Trade, TradeStatus};
