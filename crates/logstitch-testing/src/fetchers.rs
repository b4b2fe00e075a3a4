//! Page fetchers that never touch the network.

use crate::fixtures::Dataset;
use logstitch_core::{Error, PageFetcher, PageRequest, Result, TransportError};
use logstitch_types::{Record, TimeWindow};
use std::collections::VecDeque;

/// A request as seen by a test fetcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeenRequest {
    pub window: TimeWindow,
    pub page_size: usize,
    pub filters: Vec<String>,
    pub query_id: i64,
}

impl SeenRequest {
    fn from_request(request: &PageRequest<'_>) -> Self {
        Self {
            window: request.window,
            page_size: request.page_size,
            filters: request.filters.to_vec(),
            query_id: request.query_id,
        }
    }
}

/// Returns pre-scripted pages in order, then empty pages.
#[derive(Debug, Default)]
pub struct ScriptedFetcher {
    responses: VecDeque<Result<Vec<Record>>>,
    requests: Vec<SeenRequest>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, records: Vec<Record>) -> Self {
        self.responses.push_back(Ok(records));
        self
    }

    pub fn error(mut self, error: Error) -> Self {
        self.responses.push_back(Err(error));
        self
    }

    pub fn requests(&self) -> &[SeenRequest] {
        &self.requests
    }
}

impl PageFetcher for ScriptedFetcher {
    fn fetch(&mut self, request: &PageRequest<'_>) -> Result<Vec<Record>> {
        self.requests.push(SeenRequest::from_request(request));
        self.responses.pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Answers requests from a [`Dataset`] the way the analytics API would:
/// inclusive window, newest first, truncated to the page size.
#[derive(Debug)]
pub struct SyntheticApi {
    dataset: Dataset,
    fail_on_call: Option<(usize, TransportError)>,
    requests: Vec<SeenRequest>,
}

impl SyntheticApi {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset,
            fail_on_call: None,
            requests: Vec::new(),
        }
    }

    /// Fail the `call`-th request (1-based) with `error`.
    pub fn fail_on_call(mut self, call: usize, error: TransportError) -> Self {
        self.fail_on_call = Some((call, error));
        self
    }

    pub fn requests(&self) -> &[SeenRequest] {
        &self.requests
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }
}

impl PageFetcher for SyntheticApi {
    fn fetch(&mut self, request: &PageRequest<'_>) -> Result<Vec<Record>> {
        self.requests.push(SeenRequest::from_request(request));
        if let Some((call, error)) = &self.fail_on_call
            && *call == self.requests.len()
        {
            return Err(Error::Transport(error.clone()));
        }
        Ok(self.dataset.page(&request.window, request.page_size))
    }
}
