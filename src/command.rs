//! Host calls parsed into typed commands
use super::error::{LedgerError, Result};
use super::trade::Trade;

/// State-changing operations reachable through `invoke`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Init { seed: i64 },
    Write { key: String, value: String },
    CreateAndSubmitTrade(Trade),
    MarkRevisionNeeded { timestamp: String, user: String },
    MarkRevised { timestamp: String, user: String },
    EnrichAndSettle { timestamp: String, user: String },
}

/// Read-only operations reachable through `query`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Read { key: String },
}

impl Command {
    pub fn parse(function: &str, args: &[String]) -> Result<Self> {
        match function {
            "init" => {
                expect_args(args, 1)?;
                let seed = args[0].parse().map_err(|_| {
                    LedgerError::InvalidArgument("Expecting integer value for seed".into())
                })?;
                Ok(Command::Init { seed })
            }
            "write" => {
                expect_args(args, 2)?;
                Ok(Command::Write {
                    key: args[0].clone(),
                    value: args[1].clone(),
                })
            }
            "create_and_submit_trade" => Ok(Command::CreateAndSubmitTrade(Trade::from_args(args)?)),
            "mark_revision_needed" => {
                let (timestamp, user) = trade_and_user(args)?;
                Ok(Command::MarkRevisionNeeded { timestamp, user })
            }
            "mark_revised" => {
                let (timestamp, user) = trade_and_user(args)?;
                Ok(Command::MarkRevised { timestamp, user })
            }
            "enrich_and_settle" => {
                let (timestamp, user) = trade_and_user(args)?;
                Ok(Command::EnrichAndSettle { timestamp, user })
            }
            _ => Err(LedgerError::Unrecognized(
                "Received unknown function invocation".into(),
            )),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Init { .. } => "init",
            Command::Write { .. } => "write",
            Command::CreateAndSubmitTrade(_) => "create_and_submit_trade",
            Command::MarkRevisionNeeded { .. } => "mark_revision_needed",
            Command::MarkRevised { .. } => "mark_revised",
            Command::EnrichAndSettle { .. } => "enrich_and_settle",
        }
    }
}

impl Query {
    pub fn parse(function: &str, args: &[String]) -> Result<Self> {
        match function {
            "read" => {
                if args.len() != 1 {
                    return Err(LedgerError::InvalidArgument(
                        "Incorrect number of arguments. Expecting key of the value to query"
                            .into(),
                    ));
                }
                Ok(Query::Read {
                    key: args[0].clone(),
                })
            }
            _ => Err(LedgerError::Unrecognized(
                "Received unknown function query".into(),
            )),
        }
    }
}

fn expect_args(args: &[String], expected: usize) -> Result<()> {
    if args.len() != expected {
        return Err(LedgerError::argument_count(expected));
    }
    Ok(())
}

fn trade_and_user(args: &[String]) -> Result<(String, String)> {
    expect_args(args, 2)?;
    validate_trade_and_user(&args[0], &args[1])
}

/// The (timestamp, user) pair shared by the three lifecycle updates: both
/// non-empty, returned lower-cased.
pub(crate) fn validate_trade_and_user(timestamp: &str, user: &str) -> Result<(String, String)> {
    if timestamp.is_empty() {
        return Err(LedgerError::InvalidArgument(
            "1st argument must be a non-empty string".into(),
        ));
    }
    if user.is_empty() {
        return Err(LedgerError::InvalidArgument(
            "2nd argument must be a non-empty string".into(),
        ));
    }
    Ok((timestamp.to_lowercase(), user.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn init_requires_integer_seed() {
        assert_eq!(
            Command::parse("init", &strings(&["5"])).unwrap(),
            Command::Init { seed: 5 }
        );
        assert!(matches!(
            Command::parse("init", &strings(&["five"])),
            Err(LedgerError::InvalidArgument(_))
        ));
        assert!(matches!(
            Command::parse("init", &strings(&[])),
            Err(LedgerError::InvalidArgument(_))
        ));
    }

    #[test]
    fn lifecycle_updates_reject_empty_arguments() {
        for function in ["mark_revision_needed", "mark_revised", "enrich_and_settle"] {
            let err = Command::parse(function, &strings(&["", "bob"])).unwrap_err();
            assert!(matches!(err, LedgerError::InvalidArgument(_)), "{function}");

            let err = Command::parse(function, &strings(&["123", ""])).unwrap_err();
            assert!(matches!(err, LedgerError::InvalidArgument(_)), "{function}");

            let err = Command::parse(function, &strings(&["123"])).unwrap_err();
            assert!(matches!(err, LedgerError::InvalidArgument(_)), "{function}");
        }
    }

    #[test]
    fn lifecycle_updates_lowercase_arguments() {
        let command = Command::parse("mark_revised", &strings(&["ABC", "Bob"])).unwrap();
        assert_eq!(
            command,
            Command::MarkRevised {
                timestamp: "abc".into(),
                user: "bob".into()
            }
        );
        assert_eq!(command.name(), "mark_revised");
    }

    #[test]
    fn unknown_functions_are_unrecognized() {
        assert!(matches!(
            Command::parse("read", &strings(&["abc"])),
            Err(LedgerError::Unrecognized(_))
        ));
        assert!(matches!(
            Query::parse("write", &strings(&["abc", "1"])),
            Err(LedgerError::Unrecognized(_))
        ));
    }
}
