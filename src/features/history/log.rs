//! # Feature: History Log
//!
//! Bounded, append-ordered record history shared between the scheduler
//! task and the interactive views. Once full, the oldest record is
//! evicted to make room: a sliding window of the most recent events.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Capacity made configurable
//! - 1.0.0: Initial release with 200-record window

use std::collections::VecDeque;
use std::sync::Arc;

use log::debug;
use tokio::sync::RwLock;

use super::record::{Record, RecordKind};

/// Bounded care-event history. Cloning shares the underlying state.
#[derive(Clone)]
pub struct HistoryLog {
    records: Arc<RwLock<VecDeque<Record>>>,
    capacity: usize,
}

impl HistoryLog {
    pub fn new(capacity: usize) -> Self {
        HistoryLog {
            records: Arc::new(RwLock::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    /// Append a record, evicting the oldest entry once the log is full.
    ///
    /// Never fails; callers must accept that the oldest entry is dropped
    /// silently once the window is full.
    pub async fn append(&self, record: Record) {
        let mut records = self.records.write().await;
        if records.len() >= self.capacity {
            records.pop_front();
            debug!(
                "History log full (capacity {}), oldest record evicted",
                self.capacity
            );
        }
        records.push_back(record);
    }

    /// Cloned snapshot of every record, oldest first
    pub async fn all(&self) -> Vec<Record> {
        self.records.read().await.iter().cloned().collect()
    }

    /// Records of one variant, order preserved
    pub async fn of_kind(&self, kind: RecordKind) -> Vec<Record> {
        self.records
            .read()
            .await
            .iter()
            .filter(|r| r.kind() == kind)
            .cloned()
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
