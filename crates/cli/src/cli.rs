use std::path::PathBuf;

use clap::{Parser, Subcommand};

use stockledger_inventory::{DEFAULT_DATA_PATH, DEFAULT_LOW_STOCK_THRESHOLD};
use stockledger_observability::DEFAULT_LOG_PATH;

/// Track item quantities in a JSON stock ledger.
#[derive(Parser, Debug)]
#[command(name = "stockledger")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Ledger file
    #[arg(long, global = true, value_name = "FILE", default_value = DEFAULT_DATA_PATH)]
    pub data: PathBuf,

    /// Operational log file (filter with RUST_LOG)
    #[arg(long, global = true, value_name = "FILE", default_value = DEFAULT_LOG_PATH)]
    pub log: PathBuf,

    /// Defaults to `demo`
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the sample session: add, remove, report, save and reload
    Demo,
    /// Add units of an item
    Add {
        item: String,
        #[arg(allow_negative_numbers = true)]
        qty: i64,
    },
    /// Remove units of an item; the entry is dropped when it reaches zero
    Remove {
        item: String,
        #[arg(allow_negative_numbers = true)]
        qty: i64,
    },
    /// Print the stocked quantity of an item (0 if absent)
    Qty { item: String },
    /// List items below a threshold
    Low {
        #[arg(short, long, default_value_t = DEFAULT_LOW_STOCK_THRESHOLD)]
        threshold: i64,
    },
    /// Print every item and its quantity
    Report,
}
