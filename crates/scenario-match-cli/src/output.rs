//! Helpers for rendering command output.

use std::io::Write;

use clap::ValueEnum;
use eyre::{Context, Result};
use scenario_match::{ComparisonResult, SymbolTable};

/// Output style for comparison reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub(crate) enum Format {
    /// Readable text.
    #[default]
    Human,
    /// A single JSON object.
    Json,
}

pub(crate) fn write_comparison(
    writer: &mut dyn Write,
    result: &ComparisonResult,
    format: Format,
) -> Result<()> {
    match format {
        Format::Json => {
            serde_json::to_writer_pretty(&mut *writer, result)
                .wrap_err("failed to serialize comparison result to JSON")?;
            writeln!(writer).wrap_err("failed to terminate JSON output with newline")
        }
        Format::Human => {
            writeln!(writer, "{result}").wrap_err("failed to write comparison summary")?;
            if result.is_match() {
                write_symbols(writer, result.captured())?;
            }
            Ok(())
        }
    }
}

fn write_symbols(writer: &mut dyn Write, symbols: &SymbolTable) -> Result<()> {
    for (name, value) in symbols.iter() {
        writeln!(writer, "  {name} = {value}")
            .wrap_err_with(|| format!("failed to write captured symbol {name}"))?;
    }
    Ok(())
}

pub(crate) fn write_resolved(writer: &mut dyn Write, resolved: &str) -> Result<()> {
    writeln!(writer, "{resolved}").wrap_err("failed to write resolved template")
}
