use clap::ValueEnum;
use logstitch_core::TiePolicy;
use serde::Deserialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}

/// Tie policy as spelled on the command line and in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[value(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TiePolicyName {
    /// Stop after a page whose records all share one timestamp
    Stop,
    /// Rely on overlap matching alone
    Overlap,
}

impl fmt::Display for TiePolicyName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TiePolicyName::Stop => write!(f, "stop"),
            TiePolicyName::Overlap => write!(f, "overlap"),
        }
    }
}

impl From<TiePolicyName> for TiePolicy {
    fn from(name: TiePolicyName) -> Self {
        match name {
            TiePolicyName::Stop => TiePolicy::StopOnSaturatedPage,
            TiePolicyName::Overlap => TiePolicy::OverlapOnly,
        }
    }
}
