//! Evaluate command implementation.

use crate::cli::EvaluateArgs;
use crate::commands::parse_delimiter;
use crate::config::{Config, OutputFormat};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tabner_eval::{render_console, render_file_report, ClassificationReport, Metrics, OVERALL};
use tabner_model::NerResult;
use tabner_table::Table;
use tracing::warn;

const BANNER_WIDTH: usize = 60;

/// Suffix distinguishing prediction columns from their gold counterparts.
const PREDICTED_SUFFIX: &str = "_EST";

/// Execute the evaluate command.
pub async fn execute_evaluate(
    args: EvaluateArgs,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    let config = config.clone();

    let evaluation = tokio::task::spawn_blocking(move || run_evaluate(args, config))
        .await
        .map_err(|e| CliError::Task(format!("evaluation task failed: {e}")))??;

    match formatter.format() {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&evaluation)?),
        OutputFormat::Quiet => {
            for column in &evaluation.columns {
                println!("{} {:.4}", column.column, overall_f1(&column.metrics));
            }
            println!("FILE {:.4}", overall_f1(&evaluation.file_metrics));
        }
        OutputFormat::Table => {
            println!("{}", "=".repeat(BANNER_WIDTH));
            println!("Evaluating file: {}", evaluation.file);
            println!("{}", "=".repeat(BANNER_WIDTH));

            for column in &evaluation.columns {
                println!();
                println!("--- Column: {} ---", column.column);
                println!("{}", render_console(&column.metrics));
                if column.skipped_rows > 0 {
                    println!(
                        "{}",
                        formatter.warning(&format!(
                            "{} rows skipped (missing or unparseable annotations)",
                            column.skipped_rows
                        ))
                    );
                }
            }

            println!();
            println!("{}", "=".repeat(BANNER_WIDTH));
            println!("FINAL REPORT FOR FILE: {}", evaluation.file);
            println!("{}", "=".repeat(BANNER_WIDTH));
            println!("{}", render_console(&evaluation.file_metrics));

            if let Some(report_path) = &evaluation.report_path {
                println!(
                    "{}",
                    formatter.info(&format!("Report saved to: {}", report_path.display()))
                );
            }
        }
    }

    Ok(())
}

/// Outcome of one evaluation run.
#[derive(Debug, Serialize)]
pub struct Evaluation {
    file: String,
    columns: Vec<ColumnEvaluation>,
    file_metrics: Metrics,
    #[serde(skip_serializing_if = "Option::is_none")]
    report_path: Option<PathBuf>,
}

/// Scores for one gold/prediction column pair.
#[derive(Debug, Serialize)]
pub struct ColumnEvaluation {
    column: String,
    metrics: Metrics,
    skipped_rows: usize,
}

fn run_evaluate(args: EvaluateArgs, config: Config) -> Result<Evaluation> {
    let delimiter = parse_delimiter(args.delimiter)?;
    let table = Table::load(&args.input, delimiter)?;

    let classes = if args.classes.is_empty() {
        config.classes.clone()
    } else {
        args.classes.clone()
    };

    let file_name = args
        .input
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("table")
        .to_string();

    let (columns, file_metrics) = evaluate_table(&table, &args.prefix, &classes)?;

    let report_path = if args.no_report {
        None
    } else {
        let path = args
            .report
            .clone()
            .unwrap_or_else(|| default_report_path(&args.input));
        fs::write(&path, render_file_report(&file_name, &file_metrics))?;
        Some(path)
    };

    Ok(Evaluation {
        file: file_name,
        columns,
        file_metrics,
        report_path,
    })
}

/// Score every gold/prediction column pair of `table`.
///
/// Gold columns start with `prefix` and do not carry the prediction suffix;
/// each is paired with its `<column>_EST` counterpart. Rows where either cell
/// fails to parse are skipped entirely: no counters are touched, so one bad
/// row never skews or aborts the batch.
fn evaluate_table(
    table: &Table,
    prefix: &str,
    classes: &[String],
) -> Result<(Vec<ColumnEvaluation>, Metrics)> {
    let mut pairs = Vec::new();
    for (gold_index, header) in table.headers().iter().enumerate() {
        if !header.starts_with(prefix) || header.ends_with(PREDICTED_SUFFIX) {
            continue;
        }
        match table.column_index(&format!("{header}{PREDICTED_SUFFIX}")) {
            Some(predicted_index) => pairs.push((header.clone(), gold_index, predicted_index)),
            None => warn!(
                "Column '{}' has no '{}{}' counterpart, skipping",
                header, header, PREDICTED_SUFFIX
            ),
        }
    }

    if pairs.is_empty() {
        return Err(CliError::InvalidInput(format!(
            "no '{prefix}*' annotation column pairs found"
        )));
    }

    let mut file_report = ClassificationReport::new(classes.iter().cloned());
    let mut columns = Vec::with_capacity(pairs.len());

    for (column, gold_index, predicted_index) in pairs {
        let mut column_report = ClassificationReport::new(classes.iter().cloned());
        let mut skipped_rows = 0usize;

        for row in table.rows() {
            let gold_cell = row.get(gold_index).map(String::as_str).unwrap_or("");
            let predicted_cell = row.get(predicted_index).map(String::as_str).unwrap_or("");

            let parsed = (
                serde_json::from_str::<NerResult>(gold_cell),
                serde_json::from_str::<NerResult>(predicted_cell),
            );
            let (gold, predicted) = match parsed {
                (Ok(gold), Ok(predicted)) => (gold, predicted),
                _ => {
                    skipped_rows += 1;
                    continue;
                }
            };

            column_report.update(Some(&gold), Some(&predicted));
            file_report.update(Some(&gold), Some(&predicted));
        }

        columns.push(ColumnEvaluation {
            column,
            metrics: column_report.calculate_metrics(),
            skipped_rows,
        });
    }

    Ok((columns, file_report.calculate_metrics()))
}

fn overall_f1(metrics: &Metrics) -> f64 {
    metrics.get(OVERALL).map(|m| m.f1).unwrap_or(0.0)
}

fn default_report_path(input: &Path) -> PathBuf {
    input.with_extension("report.txt")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabner_model::Entity;

    fn ner_json(entities: &[(&str, &str)]) -> String {
        let spans: Vec<Entity> = entities
            .iter()
            .map(|(text, entity_type)| Entity::new(*text, *entity_type, 0, text.chars().count()))
            .collect();
        serde_json::to_string(&NerResult::new(vec![spans])).unwrap()
    }

    fn classes() -> Vec<String> {
        ["LOC", "PER", "MISC", "ORG"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_evaluate_table_scores_column_pairs() {
        let table = Table::new(
            vec!["TEXT".into(), "NER".into(), "NER_EST".into()],
            vec![
                vec![
                    "Москва".into(),
                    ner_json(&[("Москва", "LOC")]),
                    ner_json(&[("москва ", "LOC")]),
                ],
                vec![
                    "Пушкин".into(),
                    ner_json(&[("Пушкин", "PER")]),
                    ner_json(&[]),
                ],
            ],
        );

        let (columns, file_metrics) = evaluate_table(&table, "NER", &classes()).unwrap();

        assert_eq!(columns.len(), 1);
        assert_eq!(columns[0].column, "NER");
        assert_eq!(columns[0].skipped_rows, 0);

        let loc = columns[0].metrics.get("LOC").unwrap();
        assert_eq!(loc.true_positives, 1);

        let overall = file_metrics.get(OVERALL).unwrap();
        assert_eq!(overall.true_positives, 1);
        assert_eq!(overall.false_negatives, 1);
    }

    #[test]
    fn test_bad_rows_skipped_without_touching_counters() {
        let table = Table::new(
            vec!["NER".into(), "NER_EST".into()],
            vec![
                // Gold parses, prediction is garbage: the whole row is skipped.
                vec![ner_json(&[("Москва", "LOC")]), "not json".into()],
                // Empty prediction cell counts as missing, not as zero spans.
                vec![ner_json(&[("Тверь", "LOC")]), String::new()],
            ],
        );

        let (columns, file_metrics) = evaluate_table(&table, "NER", &classes()).unwrap();

        assert_eq!(columns[0].skipped_rows, 2);
        let overall = file_metrics.get(OVERALL).unwrap();
        assert_eq!(overall.true_positives, 0);
        assert_eq!(overall.false_negatives, 0);
        assert_eq!(overall.support, 0);
    }

    #[test]
    fn test_prediction_columns_not_treated_as_gold() {
        let table = Table::new(
            vec!["NER".into(), "NER_EST".into()],
            vec![vec![ner_json(&[]), ner_json(&[])]],
        );

        let (columns, _) = evaluate_table(&table, "NER", &classes()).unwrap();
        // NER_EST itself must not be discovered as a gold column.
        assert_eq!(columns.len(), 1);
    }

    #[test]
    fn test_no_pairs_is_invalid_input() {
        let table = Table::new(vec!["TEXT".into()], vec![vec!["x".into()]]);
        let result = evaluate_table(&table, "NER", &classes());
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
    }

    #[test]
    fn test_multiple_column_pairs_feed_file_report() {
        let table = Table::new(
            vec![
                "NER_A".into(),
                "NER_A_EST".into(),
                "NER_B".into(),
                "NER_B_EST".into(),
            ],
            vec![vec![
                ner_json(&[("Москва", "LOC")]),
                ner_json(&[("Москва", "LOC")]),
                ner_json(&[("Яндекс", "ORG")]),
                ner_json(&[("Google", "ORG")]),
            ]],
        );

        let (columns, file_metrics) = evaluate_table(&table, "NER", &classes()).unwrap();

        assert_eq!(columns.len(), 2);
        let overall = file_metrics.get(OVERALL).unwrap();
        // One exact match plus one miss, pooled across both columns.
        assert_eq!(overall.true_positives, 1);
        assert_eq!(overall.false_positives, 1);
        assert_eq!(overall.false_negatives, 1);
    }

    #[test]
    fn test_run_evaluate_writes_report_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("news.csv");

        let gold = ner_json(&[("Москва", "LOC")]);
        let predicted = ner_json(&[("москва", "LOC")]);

        let mut writer = csv::WriterBuilder::new()
            .delimiter(b'|')
            .from_path(&input)
            .unwrap();
        writer.write_record(["TEXT", "NER", "NER_EST"]).unwrap();
        writer
            .write_record(["Москва", gold.as_str(), predicted.as_str()])
            .unwrap();
        writer.flush().unwrap();
        drop(writer);

        let args = EvaluateArgs {
            input: input.clone(),
            prefix: "NER".to_string(),
            classes: Vec::new(),
            delimiter: None,
            report: None,
            no_report: false,
        };

        let evaluation = run_evaluate(args, Config::default()).unwrap();

        assert_eq!(evaluation.file, "news.csv");
        let report_path = evaluation.report_path.unwrap();
        assert_eq!(report_path, dir.path().join("news.report.txt"));

        let report = fs::read_to_string(&report_path).unwrap();
        assert!(report.starts_with("NER EVALUATION REPORT\nFile: news.csv\n"));
        assert!(report.contains("OVERALL"));
        assert!(report.contains("LOC: TP=1, FP=0, FN=0"));
    }
}
