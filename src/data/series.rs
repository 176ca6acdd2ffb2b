//! Sample Series Module
//! Ordered numeric results plotted against their implicit index.

use std::fmt;

/// A single observed value for a question.
pub type Sample = f64;

/// Identifier of the question whose results are plotted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct QuestionNumber(pub u32);

impl fmt::Display for QuestionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{}", self.0)
    }
}

impl From<u32> for QuestionNumber {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// Ordered sequence of samples. Insertion order is plotted order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SampleSeries {
    samples: Vec<Sample>,
}

impl SampleSeries {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Points as (x, y) with x the 1-based position in the series.
    pub fn indexed_points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.samples
            .iter()
            .enumerate()
            .map(|(i, &y)| ((i + 1) as f64, y))
    }

    /// Finite min/max of the samples, `None` if there is no finite value.
    pub fn finite_bounds(&self) -> Option<(f64, f64)> {
        self.samples
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

impl From<Vec<Sample>> for SampleSeries {
    fn from(samples: Vec<Sample>) -> Self {
        Self::new(samples)
    }
}

impl FromIterator<Sample> for SampleSeries {
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indexed_points_start_at_one() {
        let series = SampleSeries::from(vec![10.0, 6.5, 5.7]);
        let points: Vec<_> = series.indexed_points().collect();
        assert_eq!(points, vec![(1.0, 10.0), (2.0, 6.5), (3.0, 5.7)]);
    }

    #[test]
    fn finite_bounds_skip_nan() {
        let series = SampleSeries::from(vec![f64::NAN, 4.0, 9.0, 1.5]);
        assert_eq!(series.finite_bounds(), Some((1.5, 9.0)));
        assert_eq!(SampleSeries::from(vec![f64::NAN]).finite_bounds(), None);
        assert_eq!(SampleSeries::default().finite_bounds(), None);
    }

    #[test]
    fn question_number_display() {
        assert_eq!(QuestionNumber(12).to_string(), "Q12");
    }
}
