//! Standard-output row sink used for dry runs
//!
//! Prints tab-separated rows instead of touching a spreadsheet. It reports an
//! empty header row, so a dry run always prints the header first.

use crate::output::traits::{Record, RowSink};
use crate::SinkResult;
use async_trait::async_trait;
use std::io::Write;

/// Row sink that writes tab-separated values to stdout
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn new() -> Self {
        Self
    }
}

/// Formats one row as tab-separated text
///
/// Tabs and newlines inside cells are replaced by spaces so each row stays on
/// one line.
pub(crate) fn format_row(values: &[String]) -> String {
    values
        .iter()
        .map(|value| value.replace(['\t', '\n', '\r'], " "))
        .collect::<Vec<_>>()
        .join("\t")
}

#[async_trait]
impl RowSink for ConsoleSink {
    async fn read_header(&self) -> SinkResult<Vec<String>> {
        Ok(Vec::new())
    }

    async fn clear_header(&self) -> SinkResult<()> {
        Ok(())
    }

    async fn write_header(&self, header: &[String]) -> SinkResult<()> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "{}", format_row(header))?;
        Ok(())
    }

    async fn append_rows(&self, rows: &[Record]) -> SinkResult<()> {
        let mut out = std::io::stdout().lock();
        for record in rows {
            writeln!(out, "{}", format_row(record))?;
        }
        out.flush()?;
        Ok(())
    }
}
