//! Data module - Sample series, data sources and CSV loading

mod loader;
mod series;
mod source;

pub use loader::{LoaderError, ResultLoader, ResultRow, ResultTable};
pub use series::{QuestionNumber, Sample, SampleSeries};
pub use source::{
    PlaceholderSource, QueryWindow, SeriesSource, SourceError, DEFAULT_WINDOW_DAYS,
    PLACEHOLDER_SAMPLES,
};
