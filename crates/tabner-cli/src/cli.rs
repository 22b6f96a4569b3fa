//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tabner_model::{LinkerKind, RetrieverKind};

/// Tabner CLI - Annotate tabular text with named entities and score the results.
#[derive(Debug, Parser)]
#[command(name = "tabner")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Human-readable reports (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (scores only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Annotate a table column with recognized entities
    Annotate(AnnotateArgs),

    /// Score annotation columns against reference columns
    Evaluate(EvaluateArgs),

    /// Enter interactive REPL mode
    Repl,
}

/// Arguments for the annotate command.
#[derive(Debug, Parser)]
pub struct AnnotateArgs {
    /// Input table (.csv, .tsv, .xlsx, .xls, .ods)
    pub input: PathBuf,

    /// Source text column to annotate
    #[arg(short, long)]
    pub column: String,

    /// Column to write serialized extraction results into
    #[arg(long, default_value = "NER")]
    pub ner_column: String,

    /// Retrieval backend
    #[arg(short, long, value_enum, default_value = "pipeline")]
    pub retriever: RetrieverArg,

    /// Resolve every retrieved entity against the knowledge base
    #[arg(short, long)]
    pub link: bool,

    /// Linking backend
    #[arg(long, value_enum, default_value = "dbpedia")]
    pub linker: LinkerArg,

    /// Column to write serialized link results into
    #[arg(long, default_value = "NEL")]
    pub nel_column: String,

    /// Output path (defaults to overwriting the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Explicit field delimiter for CSV input
    #[arg(short, long)]
    pub delimiter: Option<char>,
}

/// Arguments for the evaluate command.
#[derive(Debug, Parser)]
pub struct EvaluateArgs {
    /// Input table with annotation and reference columns
    pub input: PathBuf,

    /// Prefix of gold annotation columns; predictions live in `<column>_EST`
    #[arg(short, long, default_value = "NER")]
    pub prefix: String,

    /// Entity classes to score (defaults to the configured inventory)
    #[arg(long, value_delimiter = ',')]
    pub classes: Vec<String>,

    /// Explicit field delimiter for CSV input
    #[arg(short, long)]
    pub delimiter: Option<char>,

    /// Where to write the persisted report (defaults to `<input>.report.txt`)
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Skip writing the report file
    #[arg(long)]
    pub no_report: bool,
}

/// Retrieval backend argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum RetrieverArg {
    /// NLP annotation-server pipeline
    Pipeline,
    /// Prompt-based LLM extraction
    Llm,
}

impl From<RetrieverArg> for RetrieverKind {
    fn from(arg: RetrieverArg) -> Self {
        match arg {
            RetrieverArg::Pipeline => RetrieverKind::Pipeline,
            RetrieverArg::Llm => RetrieverKind::Llm,
        }
    }
}

/// Linking backend argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum LinkerArg {
    /// DBpedia Lookup search API
    Dbpedia,
}

impl From<LinkerArg> for LinkerKind {
    fn from(arg: LinkerArg) -> Self {
        match arg {
            LinkerArg::Dbpedia => LinkerKind::Dbpedia,
        }
    }
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotate_command_parsing() {
        let cli = Cli::parse_from([
            "tabner", "annotate", "news.csv", "--column", "TEXT", "--link",
        ]);
        match cli.command {
            Some(Command::Annotate(args)) => {
                assert_eq!(args.column, "TEXT");
                assert_eq!(args.ner_column, "NER");
                assert_eq!(args.nel_column, "NEL");
                assert!(args.link);
                assert!(args.output.is_none());
            }
            _ => panic!("Expected Annotate command"),
        }
    }

    #[test]
    fn test_evaluate_command_parsing() {
        let cli = Cli::parse_from([
            "tabner", "evaluate", "news.csv", "--classes", "LOC,PER", "-d", "|",
        ]);
        match cli.command {
            Some(Command::Evaluate(args)) => {
                assert_eq!(args.prefix, "NER");
                assert_eq!(args.classes, ["LOC", "PER"]);
                assert_eq!(args.delimiter, Some('|'));
            }
            _ => panic!("Expected Evaluate command"),
        }
    }

    #[test]
    fn test_no_command_means_repl() {
        let cli = Cli::parse_from(["tabner"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_retriever_kind_conversion() {
        let kind: RetrieverKind = RetrieverArg::Llm.into();
        assert!(matches!(kind, RetrieverKind::Llm));
    }
}
