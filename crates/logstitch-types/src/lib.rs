pub mod error;
pub mod record;
pub mod timestamp;
pub mod window;

pub use error::{Error, Result};
pub use record::{DEFAULT_TIMESTAMP_FIELD, FieldMap, FieldValue, Record};
pub use timestamp::{Timestamp, format_api_timestamp, parse_api_timestamp, parse_local_timestamp};
pub use window::TimeWindow;
