//! Per-class metric records and the ordered metrics mapping.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Aggregated quality metrics for one class.
///
/// Ratios are rounded to 4 decimal digits; every zero denominator yields 0
/// rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassMetrics {
    /// tp / (tp + fp), 0 when nothing was predicted.
    pub precision: f64,
    /// tp / (tp + fn), 0 when the class has no gold spans.
    pub recall: f64,
    /// Harmonic mean of precision and recall, 0 when both are 0.
    pub f1: f64,
    /// Number of gold spans for the class (tp + fn).
    pub support: u64,
    /// Correctly matched spans.
    #[serde(rename = "tp")]
    pub true_positives: u64,
    /// Predicted spans with no gold counterpart.
    #[serde(rename = "fp")]
    pub false_positives: u64,
    /// Gold spans left unmatched.
    #[serde(rename = "fn")]
    pub false_negatives: u64,
}

impl ClassMetrics {
    /// Derive the metric record from raw counts.
    pub(crate) fn from_counts(tp: u64, fp: u64, fn_count: u64) -> Self {
        let precision = ratio(tp, tp + fp);
        let recall = ratio(tp, tp + fn_count);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        Self {
            precision: round4(precision),
            recall: round4(recall),
            f1: round4(f1),
            support: tp + fn_count,
            true_positives: tp,
            false_positives: fp,
            false_negatives: fn_count,
        }
    }
}

fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Ordered class-to-metrics mapping produced by an evaluation run.
///
/// Iteration yields real classes in their configured order and the synthetic
/// `OVERALL` class last. Serializes as a JSON object in that same order.
#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    entries: Vec<(String, ClassMetrics)>,
}

impl Metrics {
    pub(crate) fn new(entries: Vec<(String, ClassMetrics)>) -> Self {
        Self { entries }
    }

    /// Metrics for one class, by name.
    pub fn get(&self, class: &str) -> Option<&ClassMetrics> {
        self.entries
            .iter()
            .find(|(name, _)| name == class)
            .map(|(_, metrics)| metrics)
    }

    /// Iterate classes in report order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ClassMetrics)> {
        self.entries
            .iter()
            .map(|(name, metrics)| (name.as_str(), metrics))
    }

    /// Number of classes, including `OVERALL`.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the mapping holds no classes at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Metrics {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (class, metrics) in &self.entries {
            map.serialize_entry(class, metrics)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_counts_yield_zero_metrics() {
        let metrics = ClassMetrics::from_counts(0, 0, 0);
        assert_eq!(metrics.precision, 0.0);
        assert_eq!(metrics.recall, 0.0);
        assert_eq!(metrics.f1, 0.0);
        assert_eq!(metrics.support, 0);
    }

    #[test]
    fn test_rounding_to_four_digits() {
        // 1/3 = 0.3333..., 2*(1/3)*(1/3)/(2/3) = 1/3 as well.
        let metrics = ClassMetrics::from_counts(1, 2, 2);
        assert_eq!(metrics.precision, 0.3333);
        assert_eq!(metrics.recall, 0.3333);
        assert_eq!(metrics.f1, 0.3333);
        assert_eq!(metrics.support, 3);
    }

    #[test]
    fn test_f1_from_unrounded_ratios() {
        // precision = 2/3, recall = 2/5, f1 = 0.5.
        let metrics = ClassMetrics::from_counts(2, 1, 3);
        assert_eq!(metrics.precision, 0.6667);
        assert_eq!(metrics.recall, 0.4);
        assert_eq!(metrics.f1, 0.5);
    }

    #[test]
    fn test_wire_keys() {
        let metrics = ClassMetrics::from_counts(3, 1, 2);
        let json = serde_json::to_string(&metrics).unwrap();
        assert!(json.contains("\"tp\":3"));
        assert!(json.contains("\"fp\":1"));
        assert!(json.contains("\"fn\":2"));
        assert!(json.contains("\"support\":5"));
    }

    #[test]
    fn test_metrics_serializes_in_report_order() {
        let metrics = Metrics::new(vec![
            ("PER".to_string(), ClassMetrics::from_counts(1, 0, 0)),
            ("LOC".to_string(), ClassMetrics::from_counts(0, 0, 0)),
            ("OVERALL".to_string(), ClassMetrics::from_counts(1, 0, 0)),
        ]);

        let json = serde_json::to_string(&metrics).unwrap();
        let per = json.find("\"PER\"").unwrap();
        let loc = json.find("\"LOC\"").unwrap();
        let overall = json.find("\"OVERALL\"").unwrap();
        assert!(per < loc && loc < overall);
    }
}
