//! HTTP access to a controller's analytics API.
//!
//! [`HttpPageFetcher`] implements the engine's page contract over
//! `GET /api/analytics/logs`; [`ControllerClient::discover_api_version`]
//! reads the running version from `/api/initial-data` when none is pinned.

pub mod client;
pub mod error;
pub mod fetcher;

pub use client::{ControllerClient, ControllerConfig, LogsResponse};
pub use error::{Error, Result};
pub use fetcher::HttpPageFetcher;
