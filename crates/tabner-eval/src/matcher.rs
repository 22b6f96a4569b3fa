//! Greedy alignment of gold and predicted spans within one class.

use tabner_model::Entity;

/// Counts produced by aligning one class's gold and predicted spans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ClassTally {
    pub true_positives: u64,
    pub false_positives: u64,
    pub false_negatives: u64,
}

/// Normalized form used for all text comparisons.
pub(crate) fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Align `gold` against `predicted`, both already filtered to a single class.
///
/// Two passes, each first-fit in original span order: exact normalized-text
/// equality, then partial containment (predicted text inside gold text). Each
/// span on either side is claimed at most once; partial matches earn full
/// true-positive credit. No optimal assignment is attempted, so an exact-pass
/// claim can shadow a partial match a later gold span would have needed.
pub(crate) fn align_class(gold: &[&Entity], predicted: &[&Entity]) -> ClassTally {
    let mut matched_gold = vec![false; gold.len()];
    let mut matched_pred = vec![false; predicted.len()];
    let mut true_positives = 0u64;

    // Exact pass.
    for (i, gold_span) in gold.iter().enumerate() {
        let gold_text = normalize(&gold_span.text);
        for (j, pred_span) in predicted.iter().enumerate() {
            if matched_pred[j] {
                continue;
            }
            if normalize(&pred_span.text) == gold_text {
                matched_gold[i] = true;
                matched_pred[j] = true;
                true_positives += 1;
                break;
            }
        }
    }

    // Partial pass over whatever is left.
    for (i, gold_span) in gold.iter().enumerate() {
        if matched_gold[i] {
            continue;
        }
        let gold_text = normalize(&gold_span.text);
        for (j, pred_span) in predicted.iter().enumerate() {
            if matched_pred[j] {
                continue;
            }
            if gold_text.contains(&normalize(&pred_span.text)) {
                matched_gold[i] = true;
                matched_pred[j] = true;
                true_positives += 1;
                break;
            }
        }
    }

    ClassTally {
        true_positives,
        false_positives: matched_pred.iter().filter(|claimed| !**claimed).count() as u64,
        false_negatives: matched_gold.iter().filter(|claimed| !**claimed).count() as u64,
    }
}
