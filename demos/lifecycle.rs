use trade_ledger::{SledStore, TradeLedger, logging, utils};

fn args(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}

fn main() -> anyhow::Result<()> {
    logging::init("debug");

    let db = sled::open("sled")?;

    if !db.is_empty() {
        db.clear()?;
    }

    let ledger = TradeLedger::new(SledStore::new(std::sync::Arc::new(db)));
    ledger.deploy("init", &args(&["5"]))?;

    let timestamp = utils::make_timestamp().to_string();
    ledger.invoke(
        "create_and_submit_trade",
        &args(&[
            "2015-01-01", "2015-01-02", "buy", "100", "GOOG", "500", "cpty1", "alice",
            &timestamp, "0", "0",
        ]),
    )?;
    ledger.invoke("mark_revision_needed", &args(&[&timestamp, "bob"]))?;
    ledger.invoke("mark_revised", &args(&[&timestamp, "alice"]))?;
    ledger.invoke("enrich_and_settle", &args(&[&timestamp, "carol"]))?;

    for trade in ledger.trades()? {
        println!("{:#?} ({})", trade, trade.status());
    }

    let raw = ledger.query("read", &args(&["_tradeindex"]))?;
    println!("index: {}", String::from_utf8_lossy(&raw));

    Ok(())
}
