//! Refresh Controller
//! Replaces the chart of a region with the results of one question.

use crate::charts::{ChartRenderer, ChartView, RenderError};
use crate::data::{QueryWindow, QuestionNumber, SeriesSource, SourceError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RefreshError {
    #[error("Failed to fetch results: {0}")]
    Source(#[from] SourceError),
    #[error("Failed to render chart: {0}")]
    Render(#[from] RenderError),
}

/// Couples a data source with the renderer of one region.
pub struct RefreshController<S> {
    source: S,
    renderer: ChartRenderer,
    window_days: u32,
}

impl<S: SeriesSource> RefreshController<S> {
    pub fn new(source: S, renderer: ChartRenderer, window_days: u32) -> Self {
        Self {
            source,
            renderer,
            window_days,
        }
    }

    pub fn renderer(&self) -> &ChartRenderer {
        &self.renderer
    }

    pub fn window_days(&self) -> u32 {
        self.window_days
    }

    pub fn set_window_days(&mut self, days: u32) {
        self.window_days = days;
    }

    /// Swap the data source; the bound chart stays until the next refresh.
    pub fn set_source(&mut self, source: S) {
        self.source = source;
    }

    /// Clear the region, then chart `question` over the last `window_days`.
    pub fn refresh(&mut self, question: QuestionNumber) -> Result<&ChartView, RefreshError> {
        self.refresh_in(question, QueryWindow::last_days(self.window_days))
    }

    /// [`refresh`](Self::refresh) with an explicit window.
    pub fn refresh_in(
        &mut self,
        question: QuestionNumber,
        window: QueryWindow,
    ) -> Result<&ChartView, RefreshError> {
        self.renderer.clear();
        tracing::info!(
            %question,
            days = window.days,
            region = %self.renderer.region(),
            previous_renders = self.renderer.render_count(),
            "refreshing chart"
        );

        let series = self.source.fetch(question, window)?;
        Ok(self.renderer.render(&series)?)
    }
}
