//! Sinks for exercising failure paths.

use logstitch_core::{RecordSink, SinkError};
use logstitch_types::Record;

/// Accepts `capacity` records, then fails every write.
#[derive(Debug, Default)]
pub struct FailingSink {
    capacity: usize,
    accepted: Vec<Record>,
    finished: bool,
}

impl FailingSink {
    pub fn after(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    pub fn accepted(&self) -> &[Record] {
        &self.accepted
    }

    pub fn finished(&self) -> bool {
        self.finished
    }
}

impl RecordSink for FailingSink {
    fn emit(&mut self, record: &Record) -> Result<(), SinkError> {
        if self.accepted.len() >= self.capacity {
            return Err(SinkError::new("disk full"));
        }
        self.accepted.push(record.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.finished = true;
        Ok(())
    }
}
