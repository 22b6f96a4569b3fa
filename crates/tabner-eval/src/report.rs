//! Streaming per-class counter accumulation across evaluated records.

use crate::matcher::align_class;
use crate::metrics::{ClassMetrics, Metrics};
use std::collections::HashMap;
use tabner_model::{Entity, NerResult};
use tracing::debug;

/// Name of the synthetic class aggregating counts across all real classes.
pub const OVERALL: &str = "OVERALL";

/// Accumulates true/false positive and negative counts per class over a run.
///
/// Created with a fixed class inventory, mutated once per evaluated record
/// pair via [`update`](Self::update), and read via
/// [`calculate_metrics`](Self::calculate_metrics). The synthetic [`OVERALL`]
/// class never receives direct updates; its counts are derived at read time.
/// Counters only grow within a run; [`reset`](Self::reset) zeroes them.
#[derive(Debug, Clone)]
pub struct ClassificationReport {
    classes: Vec<String>,
    true_positives: HashMap<String, u64>,
    false_positives: HashMap<String, u64>,
    false_negatives: HashMap<String, u64>,
    // Kept for report-shape compatibility; span matching never produces one.
    true_negatives: HashMap<String, u64>,
}

impl ClassificationReport {
    /// Create an accumulator for the given real classes.
    ///
    /// The [`OVERALL`] name is reserved and filtered out if present.
    pub fn new<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let classes: Vec<String> = classes
            .into_iter()
            .map(Into::into)
            .filter(|class| class != OVERALL)
            .collect();

        let mut report = Self {
            classes,
            true_positives: HashMap::new(),
            false_positives: HashMap::new(),
            false_negatives: HashMap::new(),
            true_negatives: HashMap::new(),
        };
        report.reset();
        report
    }

    /// The configured real classes, in report order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Zero every counter.
    pub fn reset(&mut self) {
        for counters in [
            &mut self.true_positives,
            &mut self.false_positives,
            &mut self.false_negatives,
            &mut self.true_negatives,
        ] {
            counters.clear();
            for class in &self.classes {
                counters.insert(class.clone(), 0);
            }
        }
    }

    /// Accumulate counts for one gold/predicted record pair.
    ///
    /// An absent side counts as zero entities. Sentence boundaries are ignored
    /// for matching, and spans whose type is outside the configured class set
    /// are silently excluded from every tally.
    pub fn update(&mut self, gold: Option<&NerResult>, predicted: Option<&NerResult>) {
        let gold_spans = flatten(gold);
        let predicted_spans = flatten(predicted);

        debug!(
            gold = gold_spans.len(),
            predicted = predicted_spans.len(),
            "scoring record"
        );

        for class in &self.classes {
            let gold_class: Vec<&Entity> = gold_spans
                .iter()
                .copied()
                .filter(|span| span.entity_type == *class)
                .collect();
            let predicted_class: Vec<&Entity> = predicted_spans
                .iter()
                .copied()
                .filter(|span| span.entity_type == *class)
                .collect();

            let tally = align_class(&gold_class, &predicted_class);

            if let Some(count) = self.true_positives.get_mut(class) {
                *count += tally.true_positives;
            }
            if let Some(count) = self.false_positives.get_mut(class) {
                *count += tally.false_positives;
            }
            if let Some(count) = self.false_negatives.get_mut(class) {
                *count += tally.false_negatives;
            }
        }
    }

    /// Derive precision/recall/F1/support per class and for [`OVERALL`].
    ///
    /// Pure with respect to accumulator state; safe to call repeatedly.
    /// `OVERALL` uses counts summed across all real classes before the ratio
    /// formulas are applied (micro-averaging).
    pub fn calculate_metrics(&self) -> Metrics {
        let mut entries = Vec::with_capacity(self.classes.len() + 1);

        for class in &self.classes {
            let tp = self.true_positives.get(class).copied().unwrap_or(0);
            let fp = self.false_positives.get(class).copied().unwrap_or(0);
            let fn_count = self.false_negatives.get(class).copied().unwrap_or(0);
            entries.push((class.clone(), ClassMetrics::from_counts(tp, fp, fn_count)));
        }

        let tp_total = self.true_positives.values().sum();
        let fp_total = self.false_positives.values().sum();
        let fn_total = self.false_negatives.values().sum();
        entries.push((
            OVERALL.to_string(),
            ClassMetrics::from_counts(tp_total, fp_total, fn_total),
        ));

        Metrics::new(entries)
    }
}

fn flatten(result: Option<&NerResult>) -> Vec<&Entity> {
    result.map(NerResult::flatten).unwrap_or_default()
}
