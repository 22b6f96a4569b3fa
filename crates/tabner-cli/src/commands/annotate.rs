//! Annotate command implementation.

use crate::cli::AnnotateArgs;
use crate::commands::parse_delimiter;
use crate::config::{Config, OutputFormat};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::progress::ProgressReporter;
use serde::Serialize;
use std::path::PathBuf;
use tabner_linker::DbpediaLinker;
use tabner_llm::OllamaProvider;
use tabner_model::traits::{EntityRetriever, Linker};
use tabner_model::{LinkerKind, LinkingResult, NerResult, RetrieverKind};
use tabner_retriever::{LlmRetriever, PipelineRetriever};
use tabner_table::Table;
use tracing::info;

/// Execute the annotate command.
pub async fn execute_annotate(
    args: AnnotateArgs,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    let config = config.clone();
    let quiet = !matches!(formatter.format(), OutputFormat::Table);

    let summary = tokio::task::spawn_blocking(move || run_annotate(args, config, quiet))
        .await
        .map_err(|e| CliError::Task(format!("annotation task failed: {e}")))??;

    match formatter.format() {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Quiet => println!("{}", summary.output.display()),
        OutputFormat::Table => {
            println!(
                "{}",
                formatter.success(&format!(
                    "Annotated {} rows ({} entities) into column '{}'",
                    summary.rows, summary.entities, summary.ner_column
                ))
            );
            if let Some(resolved) = summary.linked {
                println!(
                    "{}",
                    formatter.success(&format!(
                        "Resolved {} of {} entities into column '{}'",
                        resolved, summary.entities, summary.nel_column
                    ))
                );
            }
            println!(
                "{}",
                formatter.info(&format!("Saved to {}", summary.output.display()))
            );
        }
    }

    Ok(())
}

/// Outcome of one annotation run.
#[derive(Debug, Serialize)]
pub struct AnnotateSummary {
    rows: usize,
    entities: usize,
    ner_column: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    linked: Option<usize>,
    nel_column: String,
    output: PathBuf,
}

fn run_annotate(args: AnnotateArgs, config: Config, quiet: bool) -> Result<AnnotateSummary> {
    let delimiter = parse_delimiter(args.delimiter)?;
    let mut table = Table::load(&args.input, delimiter)?;
    let source = table.column(&args.column)?;

    info!(
        "Annotating {} rows from column '{}' with the {} backend",
        source.len(),
        args.column,
        RetrieverKind::from(args.retriever)
    );

    let retriever = build_retriever(args.retriever.into(), &config);

    let mut progress = ProgressReporter::new(quiet);
    progress.init_rows(source.len() as u64);

    let mut results = Vec::with_capacity(source.len());
    for text in &source {
        results.push(retriever.retrieve(text));
        progress.row_completed();
    }
    progress.finish();

    let serialized: Vec<String> = results
        .iter()
        .map(serde_json::to_string)
        .collect::<std::result::Result<_, _>>()?;
    table.set_column(&args.ner_column, serialized)?;

    let linked = if args.link {
        let linker = build_linker(args.linker.into(), &config);
        let (cells, resolved) = link_results(&linker, &results, quiet)?;
        table.set_column(&args.nel_column, cells)?;
        Some(resolved)
    } else {
        None
    };

    let output = args.output.clone().unwrap_or_else(|| args.input.clone());
    table.save(&output)?;

    Ok(AnnotateSummary {
        rows: source.len(),
        entities: results.iter().map(NerResult::entity_count).sum(),
        ner_column: args.ner_column,
        linked,
        nel_column: args.nel_column,
        output,
    })
}

/// Resolve every entity in every result, returning one serialized
/// `LinkingResult` cell per row and the number of resolved links.
fn link_results<L: Linker>(
    linker: &L,
    results: &[NerResult],
    quiet: bool,
) -> Result<(Vec<String>, usize)> {
    let mut progress = ProgressReporter::new(quiet);
    progress.init_rows(results.len() as u64);

    let mut cells = Vec::with_capacity(results.len());
    let mut resolved = 0usize;

    for result in results {
        let mut sentences = Vec::with_capacity(result.sentences.len());
        for sentence in &result.sentences {
            let mut links = Vec::with_capacity(sentence.len());
            for entity in sentence {
                let record = linker.link(entity);
                if record.is_resolved() {
                    resolved += 1;
                }
                links.push(record.link);
            }
            sentences.push(links);
        }
        cells.push(serde_json::to_string(&LinkingResult::new(sentences))?);
        progress.row_completed();
    }
    progress.finish();

    Ok((cells, resolved))
}

fn build_linker(kind: LinkerKind, config: &Config) -> DbpediaLinker {
    match kind {
        LinkerKind::Dbpedia => DbpediaLinker::new(
            config.services.dbpedia_url.clone(),
            config.services.dbpedia_lang.clone(),
        ),
    }
}

fn build_retriever(kind: RetrieverKind, config: &Config) -> Box<dyn EntityRetriever> {
    let retriever_config = config.retrieval.to_retriever_config();

    match kind {
        RetrieverKind::Pipeline => Box::new(PipelineRetriever::new(
            config.services.pipeline_url.clone(),
            &retriever_config,
        )),
        RetrieverKind::Llm => {
            let provider = OllamaProvider::new(
                config.services.ollama_url.clone(),
                config.services.ollama_model.clone(),
            );
            Box::new(LlmRetriever::new(
                provider,
                config.classes.clone(),
                retriever_config,
            ))
        }
    }
}
