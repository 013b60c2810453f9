//! The trade record and its field-update laws
use super::error::{LedgerError, Result};
use serde::{Deserialize, Serialize};

/// Number of positional arguments `create_and_submit_trade` takes.
pub const CREATE_ARGS: usize = 11;

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct Trade {
    #[serde(rename = "tradedate")]
    pub trade_date: String,
    #[serde(rename = "valuedate")]
    pub value_date: String,
    pub operation: String,
    #[serde(with = "stringified")]
    pub quantity: i64,
    pub security: String,
    pub price: String,
    pub counterparty: String,
    pub user: String,
    // creation time as sent by the client, epoch millis by convention. Doubles as the key.
    pub timestamp: String,
    #[serde(with = "stringified")]
    pub settled: i64,
    #[serde(rename = "needsrevision", with = "stringified")]
    pub needs_revision: i64,
}

/// Status derived from the two flags. Nothing is guarded on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeStatus {
    Open,
    NeedsRevision,
    Settled,
}

impl std::fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            TradeStatus::Open => "open",
            TradeStatus::NeedsRevision => "needs-revision",
            TradeStatus::Settled => "settled",
        };
        f.write_str(label)
    }
}

impl Trade {
    /// Parse the positional arguments of `create_and_submit_trade`.
    ///
    /// Order: trade date, value date, operation, quantity, security, price,
    /// counterparty, user, timestamp, settled, needs-revision. String fields are
    /// lower-cased, the three integer fields must parse as `i64`.
    pub fn from_args(args: &[String]) -> Result<Self> {
        if args.len() != CREATE_ARGS {
            return Err(LedgerError::argument_count(CREATE_ARGS));
        }

        let trade = Self {
            trade_date: args[0].clone(),
            value_date: args[1].clone(),
            operation: args[2].clone(),
            quantity: parse_int(&args[3], "4th argument must be a numeric string")?,
            security: args[4].clone(),
            price: args[5].clone(),
            counterparty: args[6].clone(),
            user: args[7].clone(),
            timestamp: args[8].clone(),
            settled: parse_int(
                &args[9],
                "10th argument must be a numeric string, either 0 or 1",
            )?,
            needs_revision: parse_int(
                &args[10],
                "11th argument must be a numeric string, either 0 or 1",
            )?,
        };
        Ok(trade.lowercased())
    }

    /// Lower-case every text field, the form trades are stored in.
    pub fn lowercased(self) -> Self {
        Self {
            trade_date: self.trade_date.to_lowercase(),
            value_date: self.value_date.to_lowercase(),
            operation: self.operation.to_lowercase(),
            security: self.security.to_lowercase(),
            price: self.price.to_lowercase(),
            counterparty: self.counterparty.to_lowercase(),
            user: self.user.to_lowercase(),
            timestamp: self.timestamp.to_lowercase(),
            ..self
        }
    }

    pub fn mark_revision_needed(&mut self, user: String) {
        self.user = user;
        self.needs_revision = 1;
    }

    pub fn mark_revised(&mut self, user: String) {
        self.user = user;
        self.needs_revision = 0;
    }

    pub fn enrich_and_settle(&mut self, user: String) {
        self.user = user;
        self.needs_revision = 0;
        self.settled = 1;
    }

    pub fn is_settled(&self) -> bool {
        self.settled != 0
    }

    pub fn needs_revision(&self) -> bool {
        self.needs_revision != 0
    }

    pub fn status(&self) -> TradeStatus {
        if self.is_settled() {
            TradeStatus::Settled
        } else if self.needs_revision() {
            TradeStatus::NeedsRevision
        } else {
            TradeStatus::Open
        }
    }

    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(LedgerError::Encode)
    }

    /// Decode the record stored under `key`.
    ///
    /// Only a JSON object is a trade; arrays that happen to have eleven
    /// elements are rejected.
    pub fn from_json(key: &str, bytes: &[u8]) -> Result<Self> {
        let decode_error = |source| LedgerError::Decode {
            key: key.to_string(),
            source,
        };
        let value: serde_json::Value = serde_json::from_slice(bytes).map_err(decode_error)?;
        if !value.is_object() {
            return Err(decode_error(serde::de::Error::custom(
                "expected a trade record object",
            )));
        }
        serde_json::from_value(value).map_err(decode_error)
    }
}

fn parse_int(raw: &str, message: &str) -> Result<i64> {
    raw.parse()
        .map_err(|_| LedgerError::InvalidArgument(message.to_string()))
}

// Integers are written as JSON strings. Reading also accepts bare numbers,
// which is how older records stored the quantity.
mod stringified {
    use serde::{Deserialize, Deserializer, Serializer, de};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(i64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(n) => Ok(n),
            Repr::Text(s) => s
                .parse()
                .map_err(|_| de::Error::custom(format!("expected an integer, found {s:?}"))),
        }
    }
}
