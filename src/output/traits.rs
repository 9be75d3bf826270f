//! Row sink trait and record types
//!
//! This module defines the trait interface for tabular destinations and the
//! data structures that flow into them.

use crate::SinkResult;
use async_trait::async_trait;
use std::ops::Deref;

/// One listing's extracted values, in column order
///
/// A record may be shorter than the column schema when optional sections are
/// missing from the page. Its shape is never validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record(Vec<String>);

impl Record {
    /// Creates a record from already ordered values
    pub fn new(values: Vec<String>) -> Self {
        Self(values)
    }

    /// Appends one extractor's field group
    pub fn extend_group(&mut self, group: Vec<String>) {
        self.0.extend(group);
    }

    /// Returns the values as a slice
    pub fn values(&self) -> &[String] {
        &self.0
    }

    /// Consumes the record and returns its values
    pub fn into_values(self) -> Vec<String> {
        self.0
    }
}

impl Deref for Record {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<String>> for Record {
    fn from(values: Vec<String>) -> Self {
        Self(values)
    }
}

/// All records collected during one run, in completion order
pub type Batch = Vec<Record>;

/// Trait for tabular destinations
///
/// Row 1 of the destination holds the column header; data rows follow it.
/// Every operation is a single round trip and any failure is final.
#[async_trait]
pub trait RowSink: Send + Sync {
    /// Reads the current header row; an empty vector means row 1 is empty
    async fn read_header(&self) -> SinkResult<Vec<String>>;

    /// Clears the header row
    async fn clear_header(&self) -> SinkResult<()>;

    /// Overwrites the header row with `header`
    async fn write_header(&self, header: &[String]) -> SinkResult<()>;

    /// Appends `rows` after the existing content in one call
    async fn append_rows(&self, rows: &[Record]) -> SinkResult<()>;
}
