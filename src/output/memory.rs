//! In-memory row sink
//!
//! Keeps the header and appended rows in memory and records every call made
//! against it, so callers can check exactly how a destination was driven.

use crate::output::traits::{Record, RowSink};
use crate::{SinkError, SinkResult};
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};

/// A single operation performed against a [`MemorySink`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkCall {
    ReadHeader,
    ClearHeader,
    /// Header written, with its number of cells
    WriteHeader(usize),
    /// Rows appended, with the number of rows
    AppendRows(usize),
}

#[derive(Debug, Default)]
struct MemoryState {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    calls: Vec<SinkCall>,
}

/// Row sink backed by process memory
#[derive(Debug, Default)]
pub struct MemorySink {
    state: Mutex<MemoryState>,
}

impl MemorySink {
    /// Creates a sink with an empty header row
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sink whose row 1 already holds `header`
    pub fn with_header(header: Vec<String>) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                header,
                ..MemoryState::default()
            }),
        }
    }

    /// Current header row
    pub fn header(&self) -> Vec<String> {
        self.snapshot(|state| state.header.clone())
    }

    /// All appended rows, in append order
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.snapshot(|state| state.rows.clone())
    }

    /// Every call made so far, in order
    pub fn calls(&self) -> Vec<SinkCall> {
        self.snapshot(|state| state.calls.clone())
    }

    fn snapshot<T>(&self, read: impl FnOnce(&MemoryState) -> T) -> T {
        // A poisoned lock still holds consistent data for reading
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        read(&state)
    }

    fn lock(&self) -> SinkResult<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|e| SinkError::Endpoint(format!("Failed to lock memory sink: {}", e)))
    }
}

#[async_trait]
impl RowSink for MemorySink {
    async fn read_header(&self) -> SinkResult<Vec<String>> {
        let mut state = self.lock()?;
        state.calls.push(SinkCall::ReadHeader);
        Ok(state.header.clone())
    }

    async fn clear_header(&self) -> SinkResult<()> {
        let mut state = self.lock()?;
        state.calls.push(SinkCall::ClearHeader);
        state.header.clear();
        Ok(())
    }

    async fn write_header(&self, header: &[String]) -> SinkResult<()> {
        let mut state = self.lock()?;
        state.calls.push(SinkCall::WriteHeader(header.len()));
        state.header = header.to_vec();
        Ok(())
    }

    async fn append_rows(&self, rows: &[Record]) -> SinkResult<()> {
        let mut state = self.lock()?;
        state.calls.push(SinkCall::AppendRows(rows.len()));
        state
            .rows
            .extend(rows.iter().map(|record| record.values().to_vec()));
        Ok(())
    }
}
