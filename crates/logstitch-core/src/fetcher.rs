use crate::Result;
use chrono::Utc;
use logstitch_types::{Record, TimeWindow};

/// Upper bound on records per page accepted by the analytics API.
pub const MAX_PAGE_SIZE: usize = 10_000;

/// Parameters of a single page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest<'a> {
    pub window: TimeWindow,
    pub page_size: usize,
    pub filters: &'a [String],
    /// Varies per call so the remote side never serves a cached result.
    pub query_id: i64,
}

/// Source of pages of records, newest first.
///
/// Implementations return at most `page_size` records whose timestamps lie in
/// the inclusive request window, ordered by descending timestamp. Transport
/// failures are returned as [`crate::Error::Transport`]; the engine never
/// retries them.
pub trait PageFetcher {
    fn fetch(&mut self, request: &PageRequest<'_>) -> Result<Vec<Record>>;
}

impl<F: PageFetcher + ?Sized> PageFetcher for &mut F {
    fn fetch(&mut self, request: &PageRequest<'_>) -> Result<Vec<Record>> {
        (**self).fetch(request)
    }
}

impl<F: PageFetcher + ?Sized> PageFetcher for Box<F> {
    fn fetch(&mut self, request: &PageRequest<'_>) -> Result<Vec<Record>> {
        (**self).fetch(request)
    }
}

/// Generates query ids from the wall clock in hundredths of a second,
/// bumped when two calls land in the same tick.
#[derive(Debug, Default)]
pub struct QueryIdSource {
    last: Option<i64>,
}

impl QueryIdSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> i64 {
        let now = Utc::now().timestamp_millis() / 10;
        let id = match self.last {
            Some(last) if now <= last => last + 1,
            _ => now,
        };
        self.last = Some(id);
        id
    }
}
