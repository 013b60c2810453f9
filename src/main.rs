use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use trade_ledger::config::{DEFAULT_DB_PATH, DEFAULT_LOG_FILTER, LedgerConfig};
use trade_ledger::{TradeLedger, logging, utils};

/// Trade lifecycle ledger over an embedded world state.
#[derive(Parser, Debug)]
#[command(name = "trade-ledger", about, long_about = None)]
struct Cli {
    /// Path of the sled database holding the world state.
    #[arg(long, env = "TRADE_LEDGER_DB", default_value = DEFAULT_DB_PATH)]
    db: PathBuf,

    /// Log filter directive.
    #[arg(long, env = "RUST_LOG", default_value = DEFAULT_LOG_FILTER)]
    log: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a mutating function, e.g. `invoke mark_revised 1420070400000 bob`.
    Invoke {
        function: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Run a read-only function, e.g. `query read _tradeindex`.
    Query {
        function: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Create and submit a trade from named fields.
    Submit {
        #[arg(long)]
        trade_date: String,
        #[arg(long)]
        value_date: String,
        #[arg(long)]
        operation: String,
        #[arg(long)]
        quantity: String,
        #[arg(long)]
        security: String,
        #[arg(long)]
        price: String,
        #[arg(long)]
        counterparty: String,
        #[arg(long)]
        user: String,
        /// Defaults to the current time in epoch milliseconds.
        #[arg(long)]
        timestamp: Option<String>,
        #[arg(long, default_value = "0")]
        settled: String,
        #[arg(long, default_value = "0")]
        needs_revision: String,
    },
    /// List every indexed trade.
    Trades,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = LedgerConfig::default()
        .with_db_path(cli.db)
        .with_log_filter(cli.log);
    logging::init(&config.log_filter);

    let store = config
        .open_store()
        .with_context(|| format!("Failed to open {}", config.db_path.display()))?;
    let ledger = TradeLedger::new(store);

    match cli.command {
        Commands::Invoke { function, args } => {
            ledger
                .invoke(&function, &args)
                .with_context(|| format!("invoke {function} failed"))?;
        }
        Commands::Query { function, args } => {
            let value = ledger
                .query(&function, &args)
                .with_context(|| format!("query {function} failed"))?;
            println!("{}", String::from_utf8_lossy(&value));
        }
        Commands::Submit {
            trade_date,
            value_date,
            operation,
            quantity,
            security,
            price,
            counterparty,
            user,
            timestamp,
            settled,
            needs_revision,
        } => {
            let timestamp = timestamp.unwrap_or_else(|| utils::make_timestamp().to_string());
            let args = vec![
                trade_date,
                value_date,
                operation,
                quantity,
                security,
                price,
                counterparty,
                user,
                timestamp.clone(),
                settled,
                needs_revision,
            ];
            ledger
                .invoke("create_and_submit_trade", &args)
                .context("Trade failed on submit")?;
            println!("{timestamp}");
        }
        Commands::Trades => {
            let mut out = std::io::stdout().lock();
            for trade in ledger.trades().context("Failed to enumerate trades")? {
                writeln!(
                    out,
                    "{}\t{}\t{}\t{} {} @ {}\t{}\t{}",
                    trade.timestamp,
                    trade.status(),
                    trade.trade_date,
                    trade.operation,
                    trade.quantity,
                    trade.price,
                    trade.security,
                    trade.user,
                )?;
            }
        }
    }

    ledger.store().flush().context("Failed to flush world state")?;
    Ok(())
}
