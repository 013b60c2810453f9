//! Trade ledger facade over a [`StateStore`]
//!
//! Trades live under their creation timestamp; `_tradeindex` holds a JSON array
//! of every timestamp ever created, in creation order. The host-style entry
//! points (`deploy`, `invoke`, `query`) parse a function name and positional
//! arguments into a [`Command`] or [`Query`] and run it against the store.
use super::command::{Command, Query, validate_trade_and_user};
use super::error::{LedgerError, Result};
use super::store::StateStore;
use super::trade::Trade;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// Reserved key holding the JSON array of trade timestamps.
pub const TRADE_INDEX_KEY: &str = "_tradeindex";
/// Reserved key holding the seed written by `init`.
pub const DIAGNOSTIC_KEY: &str = "abc";

pub struct TradeLedger<S> {
    store: S,
    // serialises read-modify-write cycles issued through this facade
    invocation: Mutex<()>,
}

impl<S: StateStore> TradeLedger<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            invocation: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Deployment entry point. Only `init` is accepted here.
    pub fn deploy(&self, function: &str, args: &[String]) -> Result<()> {
        info!(function, "deploy");
        if function != "init" {
            warn!(function, "deploy did not find function");
            return Err(LedgerError::Unrecognized(
                "Received unknown function invocation".into(),
            ));
        }
        self.execute(Command::parse(function, args)?)
    }

    /// Mutating entry point.
    pub fn invoke(&self, function: &str, args: &[String]) -> Result<()> {
        info!(function, "invoke");
        let command = Command::parse(function, args).inspect_err(|e| {
            if matches!(e, LedgerError::Unrecognized(_)) {
                warn!(function, "invoke did not find function");
            }
        })?;
        self.execute(command)
    }

    /// Read-only entry point.
    pub fn query(&self, function: &str, args: &[String]) -> Result<Vec<u8>> {
        info!(function, "query");
        let query = Query::parse(function, args).inspect_err(|e| {
            if matches!(e, LedgerError::Unrecognized(_)) {
                warn!(function, "query did not find function");
            }
        })?;
        match query {
            Query::Read { key } => self.read_raw(&key),
        }
    }

    pub fn execute(&self, command: Command) -> Result<()> {
        debug!(command = command.name(), "execute");
        match command {
            Command::Init { seed } => self.init(seed),
            Command::Write { key, value } => self.write_raw(&key, &value),
            Command::CreateAndSubmitTrade(trade) => self.create_and_submit_trade(trade),
            Command::MarkRevisionNeeded { timestamp, user } => {
                self.mark_revision_needed(&timestamp, &user)
            }
            Command::MarkRevised { timestamp, user } => self.mark_revised(&timestamp, &user),
            Command::EnrichAndSettle { timestamp, user } => {
                self.enrich_and_settle(&timestamp, &user)
            }
        }
    }

    /// Write the seed under the diagnostic key and reset the index to `[]`.
    pub fn init(&self, seed: i64) -> Result<()> {
        let _guard = self.lock();
        self.store.put_states(&[
            (DIAGNOSTIC_KEY.to_string(), seed.to_string().into_bytes()),
            (TRADE_INDEX_KEY.to_string(), b"[]".to_vec()),
        ])?;
        info!(seed, "ledger initialised, trade index cleared");
        Ok(())
    }

    pub fn write_raw(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock();
        self.store.put_state(key, value.as_bytes())
    }

    pub fn read_raw(&self, key: &str) -> Result<Vec<u8>> {
        self.store
            .get_state(key)?
            .ok_or_else(|| LedgerError::NotFound(key.to_string()))
    }

    /// Store the trade under its timestamp and append the timestamp to the
    /// index. Both keys are written in one atomic batch.
    ///
    /// Text fields are lower-cased first. An existing trade under the same
    /// timestamp is overwritten and the timestamp is indexed a second time.
    pub fn create_and_submit_trade(&self, trade: Trade) -> Result<()> {
        let trade = trade.lowercased();
        reject_index_key(&trade.timestamp)?;

        let _guard = self.lock();
        let mut index = self.trade_index()?;
        index.push(trade.timestamp.clone());
        let index_bytes = serde_json::to_vec(&index).map_err(LedgerError::Encode)?;

        self.store.put_states(&[
            (trade.timestamp.clone(), trade.to_json()?),
            (TRADE_INDEX_KEY.to_string(), index_bytes),
        ])?;

        info!(
            timestamp = trade.timestamp.as_str(),
            indexed = index.len(),
            "trade created"
        );
        Ok(())
    }

    pub fn mark_revision_needed(&self, timestamp: &str, user: &str) -> Result<()> {
        self.update_trade(timestamp, user, |trade, timestamp, user| {
            if trade.is_settled() {
                warn!(timestamp, "revision requested on a settled trade");
            }
            trade.mark_revision_needed(user);
        })
    }

    pub fn mark_revised(&self, timestamp: &str, user: &str) -> Result<()> {
        self.update_trade(timestamp, user, |trade, timestamp, user| {
            if !trade.needs_revision() {
                debug!(timestamp, "trade revised without a pending revision request");
            }
            trade.mark_revised(user);
        })
    }

    pub fn enrich_and_settle(&self, timestamp: &str, user: &str) -> Result<()> {
        self.update_trade(timestamp, user, |trade, timestamp, user| {
            if trade.is_settled() {
                warn!(timestamp, "settling a trade that is already settled");
            }
            trade.enrich_and_settle(user);
        })
    }

    /// Fails with `NotFound` when nothing is stored under `timestamp` and with
    /// `Decode` when the stored bytes are not a trade record.
    pub fn trade(&self, timestamp: &str) -> Result<Trade> {
        match self.store.get_state(timestamp)? {
            Some(bytes) if !bytes.is_empty() => Trade::from_json(timestamp, &bytes),
            _ => Err(LedgerError::NotFound(timestamp.to_string())),
        }
    }

    pub fn trade_index(&self) -> Result<Vec<String>> {
        let Some(bytes) = self.store.get_state(TRADE_INDEX_KEY)? else {
            return Ok(Vec::new());
        };
        // `null` is accepted as the empty index
        let index: Option<Vec<String>> =
            serde_json::from_slice(&bytes).map_err(|source| LedgerError::Decode {
                key: TRADE_INDEX_KEY.to_string(),
                source,
            })?;
        Ok(index.unwrap_or_default())
    }

    /// Every indexed trade, in index order.
    pub fn trades(&self) -> Result<Vec<Trade>> {
        self.trade_index()?
            .iter()
            .map(|timestamp| self.trade(timestamp))
            .collect()
    }

    // validate and lower-case the pair, then load, mutate and store the trade
    fn update_trade(
        &self,
        timestamp: &str,
        user: &str,
        apply: impl FnOnce(&mut Trade, &str, String),
    ) -> Result<()> {
        let (timestamp, user) = validate_trade_and_user(timestamp, user)?;
        reject_index_key(&timestamp)?;

        let _guard = self.lock();
        let mut trade = self.trade(&timestamp)?;
        let before = trade.status();
        apply(&mut trade, &timestamp, user);
        self.store.put_state(&timestamp, &trade.to_json()?)?;

        info!(
            timestamp = timestamp.as_str(),
            from = %before,
            to = %trade.status(),
            "trade updated"
        );
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.invocation.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn reject_index_key(timestamp: &str) -> Result<()> {
    if timestamp == TRADE_INDEX_KEY {
        return Err(LedgerError::InvalidArgument(format!(
            "Timestamp {timestamp} collides with the trade index key"
        )));
    }
    Ok(())
}
