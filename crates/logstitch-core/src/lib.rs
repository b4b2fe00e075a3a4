//! Timestamp-boundary pagination.
//!
//! The analytics API pages by time only: each request names an inclusive
//! `[start, end]` window and returns up to `page_size` records, newest first.
//! [`WindowAdvancer`] walks the window backward, reusing the oldest timestamp
//! of each page as the next end boundary and dropping the records the new
//! page repeats, so every record in the window reaches the sink once.
//!
//! # Example
//!
//! ```
//! use logstitch_core::{ExportOptions, PageFetcher, PageRequest, WindowAdvancer};
//! use logstitch_types::{Record, TimeWindow, parse_api_timestamp};
//! use std::sync::atomic::AtomicBool;
//!
//! struct Empty;
//!
//! impl PageFetcher for Empty {
//!     fn fetch(&mut self, _: &PageRequest<'_>) -> logstitch_core::Result<Vec<Record>> {
//!         Ok(Vec::new())
//!     }
//! }
//!
//! let window = TimeWindow::new(
//!     parse_api_timestamp("2024-01-01T00:00:00Z")?,
//!     parse_api_timestamp("2024-01-02T00:00:00Z")?,
//! )?;
//! let mut sink: Vec<Record> = Vec::new();
//! let summary = WindowAdvancer::new(window, ExportOptions::default())
//!     .run(&mut Empty, &mut sink, &AtomicBool::new(false))?;
//! assert_eq!(summary.emitted, 0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod advancer;
pub mod error;
pub mod fetcher;
pub mod overlap;
pub mod sink;

pub use advancer::{
    AdvancerState, ExportFailure, ExportOptions, ExportSummary, PageReport, StopReason, TiePolicy,
    WindowAdvancer,
};
pub use error::{Error, Result, SinkError, TransportError};
pub use fetcher::{MAX_PAGE_SIZE, PageFetcher, PageRequest, QueryIdSource};
pub use overlap::overlap_length;
pub use sink::RecordSink;
