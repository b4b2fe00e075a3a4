//! Fixtures for record and dataset generation.
//!
//! Timestamps are expressed as second offsets from a fixed base so tests can
//! write `ts(9)` for "T9" and reason about ties directly.

use chrono::{DateTime, Duration, TimeZone, Utc};
use logstitch_types::{
    DEFAULT_TIMESTAMP_FIELD, FieldMap, Record, TimeWindow, Timestamp, format_api_timestamp,
};

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .expect("fixed base timestamp is valid")
}

/// Timestamp `offset` seconds after the fixture base.
pub fn ts(offset: i64) -> Timestamp {
    base() + Duration::seconds(offset)
}

/// A record at `ts(offset)` whose `event_id` is `tag`.
pub fn record(offset: i64, tag: &str) -> Record {
    record_at(ts(offset), tag)
}

/// A record at an arbitrary timestamp whose `event_id` is `tag`.
pub fn record_at(timestamp: Timestamp, tag: &str) -> Record {
    let mut fields = FieldMap::new();
    fields.insert(
        DEFAULT_TIMESTAMP_FIELD.to_string(),
        format_api_timestamp(&timestamp).into(),
    );
    fields.insert("event_id".to_string(), tag.into());
    fields.insert("obj_name".to_string(), format!("obj-{}", tag).into());
    Record::new(timestamp, fields)
}

/// Window `[ts(start), ts(end)]`.
pub fn window(start: i64, end: i64) -> TimeWindow {
    TimeWindow::new(ts(start), ts(end)).expect("fixture window has start <= end")
}

/// Records held by a fake analytics backend.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// One record per offset, tagged by insertion order.
    pub fn from_offsets(offsets: &[i64]) -> Self {
        let mut dataset = Self::new();
        for offset in offsets {
            dataset = dataset.at(*offset, 1);
        }
        dataset
    }

    /// Add `count` distinct records at `ts(offset)`.
    pub fn at(mut self, offset: i64, count: usize) -> Self {
        for _ in 0..count {
            let tag = format!("e{}", self.records.len());
            self.records.push(record(offset, &tag));
        }
        self
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records inside `window`, newest first.
    ///
    /// Ties keep insertion order, so repeated queries return tied records in
    /// the same order the way the real API does.
    pub fn in_window(&self, window: &TimeWindow) -> Vec<Record> {
        let mut selected: Vec<Record> = self
            .records
            .iter()
            .filter(|r| window.contains(&r.timestamp()))
            .cloned()
            .collect();
        selected.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));
        selected
    }

    /// First `page_size` records of [`Dataset::in_window`].
    pub fn page(&self, window: &TimeWindow, page_size: usize) -> Vec<Record> {
        let mut selected = self.in_window(window);
        selected.truncate(page_size);
        selected
    }
}
