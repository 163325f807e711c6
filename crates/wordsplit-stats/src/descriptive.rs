/// Descriptive statistics of a fitness sample.
///
/// Fitness in the optimizer is an integer score, but averages are not, so the
/// whole summary is kept in `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DescriptiveStats {
    /// Number of values in the sample.
    pub count: usize,
    /// Smallest value.
    pub min: f64,
    /// Largest value.
    pub max: f64,
    /// Arithmetic mean.
    pub mean: f64,
    /// Median; the mean of the two middle values for even-sized samples.
    pub median: f64,
    /// Population variance.
    pub variance: f64,
    /// Population standard deviation.
    pub std_dev: f64,
}

impl DescriptiveStats {
    /// Computes statistics from values in any order.
    ///
    /// Returns `None` if the sample is empty or contains a NaN.
    ///
    /// # Examples
    ///
    /// ```
    /// # use wordsplit_stats::descriptive::DescriptiveStats;
    /// let stats = DescriptiveStats::new([5.0, 2.0, 4.0, 1.0]).unwrap();
    /// assert_eq!(stats.min, 1.0);
    /// assert_eq!(stats.max, 5.0);
    /// assert_eq!(stats.mean, 3.0);
    /// assert_eq!(stats.median, 3.0);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        if values.iter().any(|v| v.is_nan()) {
            return None;
        }
        values.sort_by(f64::total_cmp);
        Self::from_sorted(&values)
    }

    /// Like [`Self::new`], but for values already sorted in ascending order.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64]) -> Option<Self> {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let min = *sorted_values.first()?;
        let max = *sorted_values.last()?;
        let count = sorted_values.len();
        let n = count as f64;
        let mean = sorted_values.iter().sum::<f64>() / n;
        let mid = count / 2;
        let median = if count.is_multiple_of(2) {
            f64::midpoint(sorted_values[mid - 1], sorted_values[mid])
        } else {
            sorted_values[mid]
        };
        let variance = sorted_values
            .iter()
            .map(|v| (v - mean).powi(2))
            .sum::<f64>()
            / n;

        Some(Self {
            count,
            min,
            max,
            mean,
            median,
            variance,
            std_dev: variance.sqrt(),
        })
    }

    /// Convenience constructor for integer fitness values.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_fitness<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = i64>,
    {
        Self::new(values.into_iter().map(|v| v as f64))
    }

    /// Difference between the largest and smallest value.
    #[must_use]
    pub fn range(&self) -> f64 {
        self.max - self.min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sample() {
        assert_eq!(DescriptiveStats::new([]), None);
        assert_eq!(DescriptiveStats::from_fitness([]), None);
    }

    #[test]
    fn test_nan_rejected() {
        assert_eq!(DescriptiveStats::new([1.0, f64::NAN]), None);
    }

    #[test]
    fn test_single_value() {
        let stats = DescriptiveStats::new([7.0]).unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.min, 7.0);
        assert_eq!(stats.max, 7.0);
        assert_eq!(stats.median, 7.0);
        assert_eq!(stats.variance, 0.0);
        assert_eq!(stats.range(), 0.0);
    }

    #[test]
    fn test_odd_and_even_median() {
        let odd = DescriptiveStats::from_fitness([12, -10, 4]).unwrap();
        assert_eq!(odd.median, 4.0);

        let even = DescriptiveStats::from_fitness([1, 2, 3, 10]).unwrap();
        assert_eq!(even.median, 2.5);
        assert_eq!(even.mean, 4.0);
    }

    #[test]
    fn test_std_dev() {
        let stats = DescriptiveStats::new([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(stats.mean, 5.0);
        assert_eq!(stats.variance, 4.0);
        assert_eq!(stats.std_dev, 2.0);
    }

    #[test]
    #[should_panic(expected = "values must be sorted")]
    fn test_from_sorted_rejects_unsorted() {
        let _ = DescriptiveStats::from_sorted(&[3.0, 1.0]);
    }
}
