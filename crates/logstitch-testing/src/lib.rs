//! Testing infrastructure for logstitch tests.
//!
//! This crate provides utilities for exercising the export pipeline without a
//! real controller:
//! - `fixtures`: record construction and synthetic datasets
//! - `fetchers`: scripted and dataset-backed page fetchers
//! - `sinks`: sinks that fail on demand
//! - `controller`: an in-process HTTP controller serving a dataset
//! - `assertions`: stream-level checks (order, completeness, duplicates)

pub mod assertions;
pub mod controller;
pub mod fetchers;
pub mod fixtures;
pub mod sinks;

pub use controller::{FakeController, FakeControllerBuilder, RecordedRequest};
pub use fetchers::{ScriptedFetcher, SyntheticApi};
pub use fixtures::{Dataset, record, record_at, ts, window};
pub use sinks::FailingSink;
