use crate::fetcher::{MAX_PAGE_SIZE, PageFetcher, PageRequest, QueryIdSource};
use crate::overlap::overlap_length;
use crate::sink::RecordSink;
use crate::{Error, Result};
use logstitch_types::{Record, TimeWindow, Timestamp, format_api_timestamp};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

/// How to handle a page whose records all share one timestamp.
///
/// The API has no secondary ordering key, so neither policy can page past
/// more than `page_size` records at a single timestamp. Both report that
/// case as [`StopReason::Saturated`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TiePolicy {
    /// Stop right after emitting a page whose first and last timestamps match.
    #[default]
    StopOnSaturatedPage,

    /// Keep paging and rely on overlap matching alone, stopping only when the
    /// next request could not differ from the last one.
    OverlapOnly,
}

/// Why an export finished without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// No records remain below the current end boundary.
    Exhausted,

    /// A full page sat on a single timestamp; records at that timestamp
    /// beyond the page size may not have been retrieved.
    Saturated { timestamp: Timestamp },

    /// The caller asked the export to stop.
    Cancelled,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::Exhausted => write!(f, "window exhausted"),
            StopReason::Saturated { timestamp } => write!(
                f,
                "page saturated at {}",
                format_api_timestamp(timestamp)
            ),
            StopReason::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvancerState {
    Running,
    Done(StopReason),
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    pub page_size: usize,
    pub filters: Vec<String>,
    pub tie_policy: TiePolicy,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            page_size: MAX_PAGE_SIZE,
            filters: Vec::new(),
            tie_policy: TiePolicy::default(),
        }
    }
}

/// Totals for one export run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    pub emitted: u64,
    pub pages: u64,
    pub stop: StopReason,
}

/// An aborted export, with the progress made before the error.
#[derive(Debug)]
pub struct ExportFailure {
    pub error: Error,
    pub emitted: u64,
    pub pages: u64,
}

impl fmt::Display for ExportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (after {} records in {} pages)",
            self.error, self.emitted, self.pages
        )
    }
}

impl std::error::Error for ExportFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// What one iteration did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageReport {
    /// Window the page was requested for
    pub window: TimeWindow,
    pub fetched: usize,
    pub overlap: usize,
    pub emitted: usize,
    /// Set when this iteration ended the export
    pub stop: Option<StopReason>,
}

/// Walks a time window backward page by page, emitting every record once.
///
/// Each request reuses the oldest timestamp of the previous page as its end
/// boundary, so the API returns records at that timestamp again. The leading
/// records that repeat the tail of the previous page are dropped before the
/// rest of the page goes to the sink.
pub struct WindowAdvancer {
    window: TimeWindow,
    options: ExportOptions,
    previous_page: Vec<Record>,
    emitted: u64,
    pages: u64,
    state: AdvancerState,
    query_ids: QueryIdSource,
}

impl WindowAdvancer {
    pub fn new(window: TimeWindow, mut options: ExportOptions) -> Self {
        options.page_size = options.page_size.clamp(1, MAX_PAGE_SIZE);
        Self {
            window,
            options,
            previous_page: Vec::new(),
            emitted: 0,
            pages: 0,
            state: AdvancerState::Running,
            query_ids: QueryIdSource::new(),
        }
    }

    pub fn state(&self) -> AdvancerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == AdvancerState::Running
    }

    /// Window the next page will be requested for.
    pub fn window(&self) -> TimeWindow {
        self.window
    }

    pub fn page_size(&self) -> usize {
        self.options.page_size
    }

    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    pub fn pages(&self) -> u64 {
        self.pages
    }

    /// Stop before the next fetch. Records already emitted stay valid.
    pub fn cancel(&mut self) {
        if self.is_running() {
            log::info!("export cancelled after {} records", self.emitted);
            self.state = AdvancerState::Done(StopReason::Cancelled);
        }
    }

    /// Fetch and emit one page.
    pub fn step<F, S>(&mut self, fetcher: &mut F, sink: &mut S) -> Result<PageReport>
    where
        F: PageFetcher + ?Sized,
        S: RecordSink + ?Sized,
    {
        if let AdvancerState::Done(reason) = self.state {
            return Ok(self.report(0, 0, 0, Some(reason)));
        }
        if self.state == AdvancerState::Failed {
            return Err(Error::MalformedPage(
                "export already failed; no further pages".to_string(),
            ));
        }

        match self.advance(fetcher, sink) {
            Ok(report) => Ok(report),
            Err(err) => {
                log::debug!("export failed: {}", err);
                self.state = AdvancerState::Failed;
                Err(err)
            }
        }
    }

    /// Run to completion, checking `cancel` before every fetch.
    pub fn run<F, S>(
        mut self,
        fetcher: &mut F,
        sink: &mut S,
        cancel: &AtomicBool,
    ) -> std::result::Result<ExportSummary, ExportFailure>
    where
        F: PageFetcher + ?Sized,
        S: RecordSink + ?Sized,
    {
        while self.is_running() {
            if cancel.load(Ordering::SeqCst) {
                self.cancel();
                break;
            }
            if let Err(error) = self.step(fetcher, sink) {
                if let Err(flush) = sink.finish() {
                    log::warn!("could not flush output after failure: {}", flush);
                }
                return Err(self.fail(error));
            }
        }
        self.finish(sink)
    }

    /// Flush the sink and summarize a stopped export.
    pub fn finish<S>(&mut self, sink: &mut S) -> std::result::Result<ExportSummary, ExportFailure>
    where
        S: RecordSink + ?Sized,
    {
        let stop = match self.state {
            AdvancerState::Done(reason) => reason,
            AdvancerState::Running => {
                self.cancel();
                StopReason::Cancelled
            }
            AdvancerState::Failed => {
                return Err(self.fail(Error::MalformedPage(
                    "finish called on a failed export".to_string(),
                )));
            }
        };
        if let Err(err) = sink.finish() {
            self.state = AdvancerState::Failed;
            return Err(self.fail(Error::Sink(err)));
        }
        Ok(ExportSummary {
            emitted: self.emitted,
            pages: self.pages,
            stop,
        })
    }

    /// Attach the progress counters to an error.
    pub fn fail(&self, error: Error) -> ExportFailure {
        ExportFailure {
            error,
            emitted: self.emitted,
            pages: self.pages,
        }
    }

    fn advance<F, S>(&mut self, fetcher: &mut F, sink: &mut S) -> Result<PageReport>
    where
        F: PageFetcher + ?Sized,
        S: RecordSink + ?Sized,
    {
        let request = PageRequest {
            window: self.window,
            page_size: self.options.page_size,
            filters: &self.options.filters,
            query_id: self.query_ids.next_id(),
        };
        log::debug!(
            "requesting up to {} records in [{}, {}] (query_id {})",
            request.page_size,
            format_api_timestamp(&self.window.start()),
            format_api_timestamp(&self.window.end()),
            request.query_id
        );

        let page = fetcher.fetch(&request)?;
        self.pages += 1;
        self.validate(&page)?;

        let (Some(newest), Some(oldest)) = (page.first(), page.last()) else {
            return Ok(self.stop(0, 0, 0, StopReason::Exhausted));
        };
        let newest = newest.timestamp();
        let oldest = oldest.timestamp();
        let single_timestamp = newest == oldest;
        let saturated = single_timestamp && page.len() == self.options.page_size;
        let boundary_unchanged = oldest == self.window.end();

        let overlap = overlap_length(&self.previous_page, &page);
        let fresh = &page[overlap..];
        log::debug!(
            "page {}: {} fetched, {} overlapping, {} new",
            self.pages,
            page.len(),
            overlap,
            fresh.len()
        );

        if fresh.is_empty() {
            let reason = if saturated {
                StopReason::Saturated { timestamp: oldest }
            } else {
                StopReason::Exhausted
            };
            return Ok(self.stop(page.len(), overlap, 0, reason));
        }

        for record in fresh {
            sink.emit(record)?;
            self.emitted += 1;
        }
        let emitted = fresh.len();

        let stop_now = match self.options.tie_policy {
            TiePolicy::StopOnSaturatedPage => single_timestamp,
            // The next request would repeat this one exactly.
            TiePolicy::OverlapOnly => single_timestamp && boundary_unchanged,
        };

        let window = self.window;
        self.window = self.window.with_end(oldest).map_err(|e| {
            Error::MalformedPage(format!("page moved the end boundary forward: {}", e))
        })?;
        self.previous_page = page;

        if stop_now {
            let reason = if saturated {
                log::warn!(
                    "{} records share timestamp {}; records beyond the page size may be missing",
                    self.options.page_size,
                    format_api_timestamp(&oldest)
                );
                StopReason::Saturated { timestamp: oldest }
            } else {
                StopReason::Exhausted
            };
            log::info!("export stopped: {}", reason);
            self.state = AdvancerState::Done(reason);
            return Ok(PageReport {
                window,
                fetched: self.previous_page.len(),
                overlap,
                emitted,
                stop: Some(reason),
            });
        }

        Ok(PageReport {
            window,
            fetched: self.previous_page.len(),
            overlap,
            emitted,
            stop: None,
        })
    }

    fn validate(&self, page: &[Record]) -> Result<()> {
        if page.len() > self.options.page_size {
            return Err(Error::MalformedPage(format!(
                "{} records returned for a page size of {}",
                page.len(),
                self.options.page_size
            )));
        }
        if let Some(record) = page.iter().find(|r| !self.window.contains(&r.timestamp())) {
            return Err(Error::MalformedPage(format!(
                "record at {} lies outside the requested window",
                format_api_timestamp(&record.timestamp())
            )));
        }
        if let Some(pair) = page
            .windows(2)
            .find(|pair| pair[0].timestamp() < pair[1].timestamp())
        {
            return Err(Error::MalformedPage(format!(
                "records not newest-first ({} before {})",
                format_api_timestamp(&pair[0].timestamp()),
                format_api_timestamp(&pair[1].timestamp())
            )));
        }
        Ok(())
    }

    fn stop(
        &mut self,
        fetched: usize,
        overlap: usize,
        emitted: usize,
        reason: StopReason,
    ) -> PageReport {
        log::info!("export stopped: {}", reason);
        self.state = AdvancerState::Done(reason);
        self.report(fetched, overlap, emitted, Some(reason))
    }

    fn report(
        &self,
        fetched: usize,
        overlap: usize,
        emitted: usize,
        stop: Option<StopReason>,
    ) -> PageReport {
        PageReport {
            window: self.window,
            fetched,
            overlap,
            emitted,
            stop,
        }
    }
}
