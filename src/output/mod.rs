//! Output module for writing harvested listings to a tabular destination
//!
//! This module handles:
//! - The fixed column schema of the destination sheet
//! - Making sure the header row matches that schema
//! - Appending a whole batch of records in a single write

mod console;
mod memory;
mod sheets;
mod traits;

pub use console::ConsoleSink;
pub use memory::{MemorySink, SinkCall};
pub use sheets::SheetsSink;
pub use traits::{Batch, Record, RowSink};

use crate::SinkResult;
use std::ops::Deref;

/// Column headers of the destination sheet, in order
const LISTING_COLUMNS: [&str; 32] = [
    "標題",
    "連結",
    "價格/坪",
    "價格/戶",
    "車位價格",
    "格局",
    "坪數",
    "交屋時間",
    "建設公司",
    "地址",
    "公設比",
    "建蔽率",
    "基地面積",
    "管理費用",
    "車位配比",
    "車位規劃",
    "棟戶規劃",
    "樓層規劃",
    "捷運系統",
    "高速公路",
    "快速道路",
    "高鐵系統",
    "台鐵系統",
    "其他方式",
    "學區",
    "超商/賣場",
    "傳統市場",
    "公共建設",
    "熱門商圈",
    "醫療機構",
    "政府機構",
    "其他配套",
];

/// Ordered header labels for the destination sheet
///
/// Used only to seed and verify the header row. Records are never checked
/// against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSchema(Vec<String>);

impl ColumnSchema {
    /// Creates a schema from arbitrary labels
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(labels.into_iter().map(Into::into).collect())
    }

    /// The 32 listing columns
    pub fn listing() -> Self {
        Self::new(LISTING_COLUMNS)
    }

    /// Returns true if `row` is exactly this schema
    pub fn matches(&self, row: &[String]) -> bool {
        self.0.as_slice() == row
    }
}

impl Default for ColumnSchema {
    fn default() -> Self {
        Self::listing()
    }
}

impl Deref for ColumnSchema {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// What `ensure_header` did to the header row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderAction {
    /// The header already matched; nothing was written
    Kept,
    /// Row 1 was empty and the schema was written
    Written,
    /// Row 1 held something else; it was cleared and the schema written
    Replaced,
}

/// Makes sure row 1 of the destination holds exactly `schema`
///
/// # Returns
///
/// * `Ok(HeaderAction)` - What was done to the header row
/// * `Err(SinkError)` - Reading, clearing, or writing the header failed
pub async fn ensure_header(sink: &dyn RowSink, schema: &ColumnSchema) -> SinkResult<HeaderAction> {
    let current = sink.read_header().await?;

    if schema.matches(&current) {
        tracing::debug!("Header row already matches the {} column schema", schema.len());
        return Ok(HeaderAction::Kept);
    }

    let action = if current.is_empty() {
        HeaderAction::Written
    } else {
        tracing::info!(
            "Header row has {} cells that do not match the schema, replacing it",
            current.len()
        );
        sink.clear_header().await?;
        HeaderAction::Replaced
    };

    sink.write_header(schema).await?;
    tracing::info!("Wrote {} column header", schema.len());

    Ok(action)
}

/// Appends every record of `batch` with a single sink call
///
/// An empty batch writes nothing.
///
/// # Returns
///
/// The number of rows appended
pub async fn write_batch(sink: &dyn RowSink, batch: &[Record]) -> SinkResult<usize> {
    if batch.is_empty() {
        tracing::warn!("No records harvested, nothing to append");
        return Ok(0);
    }

    sink.append_rows(batch).await?;
    tracing::info!("Appended {} rows", batch.len());

    Ok(batch.len())
}
