//! Scrape stages and the provider-level error

use crate::browser::{PageError, PageResult};
use std::fmt;
use thiserror::Error;

/// Steps of a provider scrape, in the order they run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrapeStage {
    Navigate,
    DismissConsent,
    WaitForContent,
    ExtractRows,
    FilterRegion,
    ParsePrices,
    Done,
}

impl ScrapeStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Navigate => "navigate",
            Self::DismissConsent => "dismiss consent",
            Self::WaitForContent => "wait for content",
            Self::ExtractRows => "extract rows",
            Self::FilterRegion => "filter region",
            Self::ParsePrices => "parse prices",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for ScrapeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A provider scrape that stopped at `stage`
#[derive(Debug, Error)]
#[error("{provider} failed during {stage}: {source}")]
pub struct ScrapeError {
    pub provider: String,
    pub stage: ScrapeStage,
    pub source: PageError,
}

/// Tags page errors with the provider and stage they happened in
pub trait StageExt<T> {
    fn during(self, provider: &str, stage: ScrapeStage) -> Result<T, ScrapeError>;
}

impl<T> StageExt<T> for PageResult<T> {
    fn during(self, provider: &str, stage: ScrapeStage) -> Result<T, ScrapeError> {
        self.map_err(|source| ScrapeError {
            provider: provider.to_string(),
            stage,
            source,
        })
    }
}
