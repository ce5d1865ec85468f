//! Subcommand implementations.

use std::io::Write;

use anyhow::{Context, Result};
use tracing::debug;

use stockledger_inventory::{JsonStore, Ledger, write_report};

use crate::cli::{Cli, Command};

/// Execute the parsed command line, writing user-facing output to `out`.
pub fn run<W: Write>(cli: &Cli, mut out: W) -> Result<()> {
    let store = JsonStore::new(&cli.data);
    let command = cli.command.clone().unwrap_or(Command::Demo);
    debug!("Running {:?} against {}", command, store.path().display());

    match command {
        Command::Demo => run_demo(&store, out),
        Command::Add { item, qty } => {
            let mut ledger = load_for_update(&store)?;
            let total = ledger.add(&item, qty, None)?;
            store.save(&ledger)?;
            writeln!(out, "{item} -> {total}")?;
            Ok(())
        }
        Command::Remove { item, qty } => {
            let mut ledger = load_for_update(&store)?;
            ledger.remove(&item, qty)?;
            store.save(&ledger)?;
            writeln!(out, "{item} -> {}", ledger.quantity(&item))?;
            Ok(())
        }
        Command::Qty { item } => {
            writeln!(out, "{}", store.load().quantity(&item))?;
            Ok(())
        }
        Command::Low { threshold } => {
            for item in store.load().low_stock(threshold) {
                writeln!(out, "{item}")?;
            }
            Ok(())
        }
        Command::Report => {
            write_report(&store.load(), out)?;
            Ok(())
        }
    }
}

/// The sample session: load the ledger behind `store`, stock and destock a
/// few items, show the results, then save and reload.
///
/// Existing entries are kept. An unreadable or malformed file aborts the
/// session before anything is written.
pub fn run_demo<W: Write>(store: &JsonStore, mut out: W) -> Result<()> {
    let mut ledger = load_for_update(store)?;

    // Rejections are already in the operational log.
    let _ = ledger.add("apple", 10, None);
    let _ = ledger.add("banana", 2, None);
    let _ = ledger.remove("apple", 3);
    let _ = ledger.remove("orange", 1);

    writeln!(out, "Apple stock: {}", ledger.quantity("apple"))?;
    writeln!(out, "Low items: {:?}", ledger.low_stock_default())?;

    store.save(&ledger)?;
    let reloaded = store.load();
    write_report(&reloaded, out)?;
    Ok(())
}

/// A ledger that cannot be read must not be overwritten by a save.
fn load_for_update(store: &JsonStore) -> Result<Ledger> {
    let mut ledger = Ledger::new();
    store
        .load_into(&mut ledger)
        .with_context(|| format!("refusing to modify {}", store.path().display()))?;
    Ok(ledger)
}
