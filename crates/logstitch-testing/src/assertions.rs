//! Stream-level assertions for exported records.
//!
//! Each check returns an error describing the first violation so tests can
//! use `?` and still get a readable failure.

use anyhow::Result;
use logstitch_types::{Record, TimeWindow, format_api_timestamp};

/// Timestamps never increase along the stream.
pub fn assert_newest_first(records: &[Record]) -> Result<()> {
    if let Some((i, pair)) = records
        .windows(2)
        .enumerate()
        .find(|(_, pair)| pair[0].timestamp() < pair[1].timestamp())
    {
        anyhow::bail!(
            "record {} ({}) is older than record {} ({})",
            i,
            format_api_timestamp(&pair[0].timestamp()),
            i + 1,
            format_api_timestamp(&pair[1].timestamp())
        );
    }
    Ok(())
}

/// No record appears twice.
pub fn assert_no_duplicates(records: &[Record]) -> Result<()> {
    for (i, record) in records.iter().enumerate() {
        if let Some(j) = records[i + 1..].iter().position(|other| other == record) {
            anyhow::bail!(
                "record {} at {} emitted again at position {}",
                i,
                format_api_timestamp(&record.timestamp()),
                i + 1 + j
            );
        }
    }
    Ok(())
}

/// Every record lies inside `window`.
pub fn assert_within(records: &[Record], window: &TimeWindow) -> Result<()> {
    if let Some(record) = records.iter().find(|r| !window.contains(&r.timestamp())) {
        anyhow::bail!(
            "record at {} is outside {}",
            format_api_timestamp(&record.timestamp()),
            window
        );
    }
    Ok(())
}

/// `emitted` holds exactly the records of `expected`, in any order.
pub fn assert_same_records(emitted: &[Record], expected: &[Record]) -> Result<()> {
    if emitted.len() != expected.len() {
        anyhow::bail!(
            "expected {} records, got {}",
            expected.len(),
            emitted.len()
        );
    }
    if let Some(missing) = expected.iter().find(|r| !emitted.contains(r)) {
        anyhow::bail!(
            "record {:?} at {} was never emitted",
            missing.field("event_id"),
            format_api_timestamp(&missing.timestamp())
        );
    }
    Ok(())
}
