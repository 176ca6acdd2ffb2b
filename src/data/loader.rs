//! Result CSV Loader Module
//! Loads per-question answer history using Polars and serves it as a series source.
//!
//! Expected columns: `question` (integer), `value` (number), `answered_at` (Unix seconds).

use crate::data::{QueryWindow, QuestionNumber, SampleSeries, SeriesSource, SourceError};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const QUESTION_COL: &str = "question";
pub const VALUE_COL: &str = "value";
pub const ANSWERED_AT_COL: &str = "answered_at";

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Missing column: {0}")]
    MissingColumn(&'static str),
}

/// One recorded answer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResultRow {
    pub question: QuestionNumber,
    pub value: f64,
    pub answered_at: i64,
}

/// In-memory answer history.
#[derive(Debug, Clone, Default)]
pub struct ResultTable {
    rows: Vec<ResultRow>,
    source_path: Option<PathBuf>,
}

impl ResultTable {
    pub fn new(rows: Vec<ResultRow>) -> Self {
        Self {
            rows,
            source_path: None,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// Distinct question numbers, ascending.
    pub fn questions(&self) -> Vec<QuestionNumber> {
        let mut questions: Vec<QuestionNumber> = self.rows.iter().map(|r| r.question).collect();
        questions.sort();
        questions.dedup();
        questions
    }

    /// Values for `question` answered inside `window`, oldest first.
    pub fn series_for(&self, question: QuestionNumber, window: QueryWindow) -> SampleSeries {
        let mut matching: Vec<&ResultRow> = self
            .rows
            .iter()
            .filter(|r| r.question == question && window.contains(r.answered_at))
            .collect();
        matching.sort_by_key(|r| r.answered_at);
        matching.into_iter().map(|r| r.value).collect()
    }
}

impl SeriesSource for ResultTable {
    fn fetch(
        &self,
        question: QuestionNumber,
        window: QueryWindow,
    ) -> Result<SampleSeries, SourceError> {
        if self.rows.is_empty() {
            return Err(SourceError::NoData);
        }
        let series = self.series_for(question, window);
        tracing::debug!(
            %question,
            days = window.days,
            samples = series.len(),
            "fetched results from table"
        );
        Ok(series)
    }
}

/// Reads answer history CSV files.
pub struct ResultLoader;

impl ResultLoader {
    /// Load a CSV file using Polars.
    pub fn load_csv(file_path: &Path) -> Result<ResultTable, LoaderError> {
        let df = LazyCsvReader::new(file_path)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;

        let mut table = Self::from_dataframe(&df)?;
        table.source_path = Some(file_path.to_path_buf());
        tracing::info!(
            path = %file_path.display(),
            rows = table.len(),
            questions = table.questions().len(),
            "loaded result history"
        );
        Ok(table)
    }

    /// Extract rows, skipping any with a null or non-finite cell.
    pub fn from_dataframe(df: &DataFrame) -> Result<ResultTable, LoaderError> {
        let question_col = Self::require(df, QUESTION_COL)?.cast(&DataType::Int64)?;
        let value_col = Self::require(df, VALUE_COL)?.cast(&DataType::Float64)?;
        let time_col = Self::require(df, ANSWERED_AT_COL)?.cast(&DataType::Int64)?;

        let questions = question_col.i64()?;
        let values = value_col.f64()?;
        let times = time_col.i64()?;

        let mut rows = Vec::with_capacity(df.height());
        let mut skipped = 0usize;
        for i in 0..df.height() {
            let question = questions.get(i).and_then(|q| u32::try_from(q).ok());
            match (question, values.get(i), times.get(i)) {
                (Some(q), Some(v), Some(t)) if v.is_finite() => {
                    rows.push(ResultRow {
                        question: QuestionNumber(q),
                        value: v,
                        answered_at: t,
                    });
                }
                _ => skipped += 1,
            }
        }

        if skipped > 0 {
            tracing::warn!(skipped, "skipped incomplete result rows");
        }
        Ok(ResultTable::new(rows))
    }

    fn require<'a>(df: &'a DataFrame, name: &'static str) -> Result<&'a Column, LoaderError> {
        let present = df.get_column_names().iter().any(|c| c.as_str() == name);
        if !present {
            return Err(LoaderError::MissingColumn(name));
        }
        Ok(df.column(name)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn row(question: u32, value: f64, answered_at: i64) -> ResultRow {
        ResultRow {
            question: QuestionNumber(question),
            value,
            answered_at,
        }
    }

    #[test]
    fn series_filters_question_and_window_in_time_order() {
        let table = ResultTable::new(vec![
            row(1, 3.0, 900_000),
            row(1, 7.5, 400_000),
            row(2, 9.0, 950_000),
            row(1, 1.0, 10),
            row(1, 4.25, 999_999),
        ]);
        let window = QueryWindow::ending_at(1_000_000, 7);

        let series = table.series_for(QuestionNumber(1), window);
        assert_eq!(series, SampleSeries::from(vec![7.5, 3.0, 4.25]));
        assert_eq!(table.questions(), vec![QuestionNumber(1), QuestionNumber(2)]);
    }

    #[test]
    fn empty_table_reports_no_data() {
        let table = ResultTable::default();
        let err = table
            .fetch(QuestionNumber(1), QueryWindow::ending_at(0, 7))
            .unwrap_err();
        assert!(matches!(err, SourceError::NoData));
    }

    #[test]
    fn load_csv_reads_rows() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "question,value,answered_at").unwrap();
        writeln!(file, "4,8.5,100").unwrap();
        writeln!(file, "4,,200").unwrap();
        writeln!(file, "5,2.0,300").unwrap();
        writeln!(file, "4,6,400").unwrap();
        file.flush().unwrap();

        let table = ResultLoader::load_csv(file.path()).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.source_path(), Some(file.path()));

        let series = table
            .fetch(QuestionNumber(4), QueryWindow::ending_at(500, 1))
            .unwrap();
        assert_eq!(series, SampleSeries::from(vec![8.5, 6.0]));
    }

    #[test]
    fn non_finite_values_are_skipped() {
        let df = polars::df!(
            QUESTION_COL => [3i64, 3, 3, 3],
            VALUE_COL => [1.0, f64::INFINITY, f64::NAN, f64::NEG_INFINITY],
            ANSWERED_AT_COL => [10i64, 20, 30, 40],
        )
        .unwrap();

        let table = ResultLoader::from_dataframe(&df).unwrap();
        assert_eq!(table.len(), 1);
        let series = table.series_for(QuestionNumber(3), QueryWindow::ending_at(100, 1));
        assert_eq!(series, SampleSeries::from(vec![1.0]));
    }

    #[test]
    fn load_csv_requires_columns() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "question,score").unwrap();
        writeln!(file, "1,2.0").unwrap();
        file.flush().unwrap();

        let err = ResultLoader::load_csv(file.path()).unwrap_err();
        assert!(matches!(err, LoaderError::MissingColumn(VALUE_COL)));
    }
}
