//! Index-keyed series for time-series charts

use serde::Serialize;

/// How values are prepared for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rounding {
    /// Pass values through untouched
    #[default]
    None,
    /// Round to two decimal places
    TwoDecimals,
}

impl Rounding {
    pub fn apply(self, value: f64) -> f64 {
        match self {
            Rounding::None => value,
            Rounding::TwoDecimals => round2(value),
        }
    }
}

/// Round to two decimal places, half away from zero
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// One chart line: x labels are sample indices, y values keep gaps as `None`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub label: String,
    pub labels: Vec<usize>,
    pub values: Vec<Option<f64>>,
}

impl ChartSeries {
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of samples that carry a value
    pub fn present(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    /// Smallest and largest present value
    pub fn range(&self) -> Option<(f64, f64)> {
        self.values.iter().flatten().fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

/// Pair each sample with its index.
///
/// Missing samples stay missing: a chart must draw a gap, not a drop to zero.
pub fn derive_chart_series(data: &[Option<f64>], label: &str, rounding: Rounding) -> ChartSeries {
    ChartSeries {
        label: label.to_string(),
        labels: (0..data.len()).collect(),
        values: data
            .iter()
            .map(|v| v.filter(|x| x.is_finite()).map(|x| rounding.apply(x)))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nulls_are_preserved() {
        let series = derive_chart_series(&[Some(10.0), None, Some(30.0)], "X", Rounding::None);
        assert_eq!(series.label, "X");
        assert_eq!(series.labels, vec![0, 1, 2]);
        assert_eq!(series.values, vec![Some(10.0), None, Some(30.0)]);
        assert_eq!(series.present(), 2);
    }

    #[test]
    fn test_rounding_to_two_decimals() {
        let series = derive_chart_series(&[Some(1.23456), Some(-2.005), None], "Speed", Rounding::TwoDecimals);
        assert_eq!(series.values[0], Some(1.23));
        assert_eq!(series.values[2], None);
    }

    #[test]
    fn test_empty_input() {
        let series = derive_chart_series(&[], "Altitude", Rounding::TwoDecimals);
        assert!(series.is_empty());
        assert!(series.labels.is_empty());
        assert_eq!(series.range(), None);
    }

    #[test]
    fn test_deterministic() {
        let data = [Some(3.3), None, Some(1.1)];
        assert_eq!(
            derive_chart_series(&data, "HR", Rounding::None),
            derive_chart_series(&data, "HR", Rounding::None)
        );
    }

    #[test]
    fn test_range_skips_gaps() {
        let series = derive_chart_series(&[None, Some(5.0), Some(-1.0), None], "Alt", Rounding::None);
        assert_eq!(series.range(), Some((-1.0, 5.0)));
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(12.345678), 12.35);
        assert_eq!(round2(40.000000000000004), 40.0);
    }
}
