//! BlockCanvas command-line entry point.

use anyhow::{Context, Result};
use blockcanvas_cli::{builtin_registry, layout, outline, shortcuts};
use blockcanvas_core::{Editor, EditorConfig, EditorError, FormData};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Inspect BlockCanvas documents through the editing engine
#[derive(Parser)]
#[command(name = "blockcanvas")]
#[command(about = "Load, lay out and export BlockCanvas documents")]
struct Cli {
    /// Editor config JSON (snap tolerance, history limit, ...)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a document, lay it out and print an outline plus the export
    Show {
        /// Document JSON to import
        document: PathBuf,

        /// Form data JSON object used for two-way bindings
        #[arg(short, long)]
        form: Option<PathBuf>,

        /// Pretty-print the exported JSON
        #[arg(short, long)]
        pretty: bool,
    },

    /// Validate a document without printing it
    Check {
        /// Document JSON to import
        document: PathBuf,
    },

    /// List the editor's keyboard shortcuts
    Shortcuts,

    /// List the built-in components
    Components,
}

fn main() -> ExitCode {
    env_logger::init();

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Show {
            document,
            form,
            pretty,
        } => {
            let form = load_form(form.as_deref())?;
            let Some(mut editor) = import(&document, config)? else {
                return Ok(ExitCode::FAILURE);
            };
            let registry = builtin_registry()?;
            layout(&mut editor, &registry, &form);
            print!("{}", outline(&editor, &registry, &form));

            let document = editor.document();
            let json = if pretty {
                document.to_json_pretty()?
            } else {
                document.to_json()?
            };
            println!("{json}");
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check { document } => match import(&document, config)? {
            Some(editor) => {
                println!("ok: {} block(s)", editor.document().len());
                Ok(ExitCode::SUCCESS)
            }
            None => Ok(ExitCode::FAILURE),
        },
        Commands::Shortcuts => {
            let editor = Editor::new(config);
            shortcuts::print_all(editor.history().keymap());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Components => {
            for component in builtin_registry()?.iter() {
                println!("  {:8} {:8} {}", component.key, component.label, component.preview());
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<EditorConfig> {
    let Some(path) = path else {
        return Ok(EditorConfig::default());
    };
    let text = std::fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
    Ok(EditorConfig::from_json(&text)?)
}

fn load_form(path: Option<&Path>) -> Result<FormData> {
    let Some(path) = path else {
        return Ok(FormData::new());
    };
    let text = std::fs::read_to_string(path).with_context(|| format!("reading form data {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing form data {}", path.display()))
}

/// Import through the editor so malformed input is reported the same way the
/// import dialog reports it. `None` when the document was rejected.
fn import(path: &Path, config: EditorConfig) -> Result<Option<Editor>> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let mut editor = Editor::new(config);
    match editor.import_document(&text) {
        Ok(()) => {
            log::info!("imported {}", path.display());
            Ok(Some(editor))
        }
        Err(EditorError::MalformedImport(reason)) => {
            eprintln!("{}: malformed document: {}", path.display(), reason);
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}
