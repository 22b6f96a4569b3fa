//! Interactive REPL (Read-Eval-Print Loop) mode.

use crate::cli::{AnnotateArgs, EvaluateArgs, LinkerArg, RetrieverArg};
use crate::commands;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;

/// Run the interactive REPL.
pub async fn run_repl(config: &Config, formatter: &Formatter) -> Result<()> {
    println!(
        "{}",
        formatter.info("Tabner REPL - Type 'help' for commands, 'exit' to quit")
    );
    println!();

    let mut editor = DefaultEditor::new().map_err(|e| {
        CliError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("Failed to initialize editor: {}", e),
        ))
    })?;

    let history_path = get_history_path()?;
    let _ = editor.load_history(&history_path);

    loop {
        match editor.readline("tabner> ") {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                editor.add_history_entry(line).ok();

                match line {
                    "exit" | "quit" | "q" => {
                        println!("{}", formatter.info("Goodbye!"));
                        break;
                    }
                    "help" | "?" => {
                        print_help(formatter);
                    }
                    "annotate" => match prompt_annotate_args(&mut editor) {
                        Ok(args) => {
                            if let Err(e) =
                                commands::execute_annotate(args, config, formatter).await
                            {
                                eprintln!("{}", formatter.error(&e.to_string()));
                            }
                        }
                        Err(e) => eprintln!("{}", formatter.error(&e.to_string())),
                    },
                    "evaluate" => match prompt_evaluate_args(&mut editor) {
                        Ok(args) => {
                            if let Err(e) =
                                commands::execute_evaluate(args, config, formatter).await
                            {
                                eprintln!("{}", formatter.error(&e.to_string()));
                            }
                        }
                        Err(e) => eprintln!("{}", formatter.error(&e.to_string())),
                    },
                    other => {
                        eprintln!(
                            "{}",
                            formatter.error(&format!(
                                "Unknown command: {}. Type 'help' for available commands.",
                                other
                            ))
                        );
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'exit' to quit"));
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    editor.save_history(&history_path).ok();

    Ok(())
}

/// Collect annotate arguments interactively.
fn prompt_annotate_args(editor: &mut DefaultEditor) -> Result<AnnotateArgs> {
    let input = ask_required(editor, "Source table path: ")?;
    let column = ask_required(editor, "Source column: ")?;
    let ner_column = ask_with_default(editor, "NER column name", "NER")?;

    let retriever = match ask_with_default(editor, "Retriever (pipeline/llm)", "pipeline")?
        .to_lowercase()
        .as_str()
    {
        "pipeline" => RetrieverArg::Pipeline,
        "llm" => RetrieverArg::Llm,
        other => {
            return Err(CliError::InvalidInput(format!(
                "unknown retriever: {other}"
            )))
        }
    };

    let link = ask_yes_no(editor, "Link entities? [y/N]: ")?;
    let nel_column = if link {
        ask_with_default(editor, "NEL column name", "NEL")?
    } else {
        "NEL".to_string()
    };

    let output = ask(editor, "Output path (empty to overwrite source): ")?;

    Ok(AnnotateArgs {
        input: PathBuf::from(input),
        column,
        ner_column,
        retriever,
        link,
        linker: LinkerArg::Dbpedia,
        nel_column,
        output: if output.is_empty() {
            None
        } else {
            Some(PathBuf::from(output))
        },
        delimiter: None,
    })
}

/// Collect evaluate arguments interactively.
fn prompt_evaluate_args(editor: &mut DefaultEditor) -> Result<EvaluateArgs> {
    let input = ask_required(editor, "Table path: ")?;
    let prefix = ask_with_default(editor, "Annotation column prefix", "NER")?;

    Ok(EvaluateArgs {
        input: PathBuf::from(input),
        prefix,
        classes: Vec::new(),
        delimiter: None,
        report: None,
        no_report: false,
    })
}

fn ask(editor: &mut DefaultEditor, prompt: &str) -> Result<String> {
    let answer = editor
        .readline(prompt)
        .map_err(|e| CliError::InvalidInput(format!("Input aborted: {}", e)))?;
    Ok(answer.trim().to_string())
}

fn ask_required(editor: &mut DefaultEditor, prompt: &str) -> Result<String> {
    let answer = ask(editor, prompt)?;
    if answer.is_empty() {
        return Err(CliError::InvalidInput("a value is required".to_string()));
    }
    Ok(answer)
}

fn ask_with_default(editor: &mut DefaultEditor, prompt: &str, default: &str) -> Result<String> {
    let answer = ask(editor, &format!("{} [{}]: ", prompt, default))?;
    Ok(if answer.is_empty() {
        default.to_string()
    } else {
        answer
    })
}

fn ask_yes_no(editor: &mut DefaultEditor, prompt: &str) -> Result<bool> {
    let answer = ask(editor, prompt)?;
    Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
}

fn get_history_path() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
    let dir = home.join(".tabner");
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join("history"))
}

fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Available commands:"));
    println!("  annotate  - Annotate a table column with recognized entities");
    println!("  evaluate  - Score annotation columns against reference columns");
    println!("  help, ?   - Show this help");
    println!("  exit, q   - Leave the REPL");
}
