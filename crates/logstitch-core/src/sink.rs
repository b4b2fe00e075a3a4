use crate::error::SinkError;
use logstitch_types::Record;

/// Consumer of the final record stream.
///
/// `emit` is called once per record in emission order. Errors must be
/// reported, never swallowed: any failure aborts the export.
pub trait RecordSink {
    fn emit(&mut self, record: &Record) -> Result<(), SinkError>;

    /// Flush buffered output. Called once when the export stops.
    fn finish(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

impl<S: RecordSink + ?Sized> RecordSink for &mut S {
    fn emit(&mut self, record: &Record) -> Result<(), SinkError> {
        (**self).emit(record)
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        (**self).finish()
    }
}

impl RecordSink for Vec<Record> {
    fn emit(&mut self, record: &Record) -> Result<(), SinkError> {
        self.push(record.clone());
        Ok(())
    }
}
