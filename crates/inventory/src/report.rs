//! Plain-text stock report.

use std::io::{self, Write};

use crate::ledger::Ledger;

pub const REPORT_HEADER: &str = "Items Report:";

/// Write the header line, then one `<item> -> <quantity>` line per entry.
pub fn write_report<W: Write>(ledger: &Ledger, mut out: W) -> io::Result<()> {
    writeln!(out, "{REPORT_HEADER}")?;
    for (item, qty) in ledger.iter() {
        writeln!(out, "{item} -> {qty}")?;
    }
    out.flush()
}

pub fn print_report(ledger: &Ledger) -> io::Result<()> {
    write_report(ledger, io::stdout().lock())
}
