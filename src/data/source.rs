//! Series Source Module
//! Data-access seam used by the refresh controller.

use crate::data::{QuestionNumber, SampleSeries};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Default look-back window for question results.
pub const DEFAULT_WINDOW_DAYS: u32 = 7;

const SECONDS_PER_DAY: i64 = 86_400;

/// Values substituted when no real result store is configured.
pub const PLACEHOLDER_SAMPLES: [f64; 5] = [10.0, 6.5, 5.7, 9.0, 8.2];

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("No results loaded")]
    NoData,
}

/// Time window `[end - days, end]` in Unix seconds, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryWindow {
    pub days: u32,
    pub end: i64,
}

impl QueryWindow {
    /// Window of `days` ending now.
    pub fn last_days(days: u32) -> Self {
        let end = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);
        Self::ending_at(end, days)
    }

    pub fn ending_at(end: i64, days: u32) -> Self {
        Self { days, end }
    }

    pub fn start(&self) -> i64 {
        self.end - i64::from(self.days) * SECONDS_PER_DAY
    }

    pub fn contains(&self, timestamp: i64) -> bool {
        timestamp >= self.start() && timestamp <= self.end
    }
}

/// Fetches the result series of a question over a time window.
pub trait SeriesSource {
    fn fetch(&self, question: QuestionNumber, window: QueryWindow)
        -> Result<SampleSeries, SourceError>;
}

impl<S: SeriesSource + ?Sized> SeriesSource for Box<S> {
    fn fetch(
        &self,
        question: QuestionNumber,
        window: QueryWindow,
    ) -> Result<SampleSeries, SourceError> {
        (**self).fetch(question, window)
    }
}

/// Always yields [`PLACEHOLDER_SAMPLES`], whatever the question.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderSource;

impl SeriesSource for PlaceholderSource {
    fn fetch(
        &self,
        question: QuestionNumber,
        _window: QueryWindow,
    ) -> Result<SampleSeries, SourceError> {
        tracing::debug!(%question, "placeholder source ignores question number");
        Ok(SampleSeries::from(PLACEHOLDER_SAMPLES.to_vec()))
    }
}
