use crate::timestamp::{Timestamp, format_api_timestamp};
use crate::{Error, Result};
use std::fmt;

/// Inclusive `[start, end]` range of record timestamps still to be retrieved.
///
/// `start` is fixed for the lifetime of an export; `end` only ever moves
/// backward as pages are consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: Timestamp,
    end: Timestamp,
}

impl TimeWindow {
    pub fn new(start: Timestamp, end: Timestamp) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidWindow(format!(
                "start {} is after end {}",
                format_api_timestamp(&start),
                format_api_timestamp(&end)
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> Timestamp {
        self.start
    }

    pub fn end(&self) -> Timestamp {
        self.end
    }

    pub fn contains(&self, ts: &Timestamp) -> bool {
        self.start <= *ts && *ts <= self.end
    }

    /// Narrow the window to a new, earlier or equal, end boundary.
    pub fn with_end(&self, end: Timestamp) -> Result<Self> {
        if end > self.end {
            return Err(Error::InvalidWindow(format!(
                "end may only move backward ({} -> {})",
                format_api_timestamp(&self.end),
                format_api_timestamp(&end)
            )));
        }
        Self::new(self.start, end)
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format("%c %Z"),
            self.end.format("%c %Z")
        )
    }
}
