//! Fixed-width text rendering of a metrics mapping.

use crate::metrics::Metrics;
use crate::report::OVERALL;
use std::fmt::Write;

const RULE_WIDTH: usize = 60;

/// Render the console report: banner, metric table, per-class count details.
pub fn render_console(metrics: &Metrics) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
    let _ = writeln!(out, "NER CLASSIFICATION REPORT");
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
    write_table(&mut out, metrics);
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
    let _ = writeln!(out);
    let _ = writeln!(out, "Confusion Matrix Details:");
    write_details(&mut out, metrics);

    out
}

/// Render the persisted report for one evaluated file.
pub fn render_file_report(file_name: &str, metrics: &Metrics) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "NER EVALUATION REPORT");
    let _ = writeln!(out, "File: {file_name}");
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
    write_table(&mut out, metrics);
    let _ = writeln!(out);
    let _ = writeln!(out, "Detailed Statistics:");
    write_details(&mut out, metrics);

    out
}

fn write_table(out: &mut String, metrics: &Metrics) {
    let _ = writeln!(
        out,
        "{:<10} {:<12} {:<12} {:<12} {:<10}",
        "Class", "Precision", "Recall", "F1-Score", "Support"
    );
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));

    for (class, m) in metrics.iter() {
        let _ = writeln!(
            out,
            "{:<10} {:<12} {:<12} {:<12} {:<10}",
            class,
            format!("{:.4}", m.precision),
            format!("{:.4}", m.recall),
            format!("{:.4}", m.f1),
            m.support
        );
    }
}

fn write_details(out: &mut String, metrics: &Metrics) {
    for (class, m) in metrics.iter() {
        if class == OVERALL {
            continue;
        }
        let _ = writeln!(
            out,
            "{}: TP={}, FP={}, FN={}",
            class, m.true_positives, m.false_positives, m.false_negatives
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ClassificationReport;
    use tabner_model::{Entity, NerResult};

    fn sample_metrics() -> Metrics {
        let mut report = ClassificationReport::new(["LOC", "PER"]);
        let gold = NerResult::new(vec![vec![
            Entity::new("Москва", "LOC", 0, 6),
            Entity::new("Пушкин", "PER", 10, 16),
        ]]);
        let predicted = NerResult::new(vec![vec![Entity::new("Москва", "LOC", 0, 6)]]);
        report.update(Some(&gold), Some(&predicted));
        report.calculate_metrics()
    }

    #[test]
    fn test_console_report_layout() {
        let rendered = render_console(&sample_metrics());

        assert!(rendered.contains("NER CLASSIFICATION REPORT"));
        assert!(rendered.contains("Class      Precision    Recall       F1-Score     Support"));
        assert!(rendered.contains("LOC        1.0000       1.0000       1.0000       1"));
        assert!(rendered.contains("PER        0.0000       0.0000       0.0000       1"));
        assert!(rendered.contains("OVERALL    1.0000       0.5000       0.6667       2"));
        assert!(rendered.contains("LOC: TP=1, FP=0, FN=0"));
        assert!(rendered.contains("PER: TP=0, FP=0, FN=1"));
        // OVERALL never appears in the detail section.
        assert!(!rendered.contains("OVERALL: TP="));
    }

    #[test]
    fn test_file_report_names_the_file() {
        let rendered = render_file_report("news.csv", &sample_metrics());

        assert!(rendered.starts_with("NER EVALUATION REPORT\nFile: news.csv\n"));
        assert!(rendered.contains("Detailed Statistics:"));
        assert!(rendered.contains("OVERALL"));
    }
}
