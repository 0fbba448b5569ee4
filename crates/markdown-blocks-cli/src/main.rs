mod script;

use anyhow::{Context, Result};
use markdown_blocks_config::{Config, EditorConfig};
use markdown_blocks_engine::editing::{BlockEditor, Document, EditorOptions, MemoryClipboard};
use markdown_blocks_engine::models::{BlockRegistry, ShortIdGenerator};
use markdown_blocks_engine::import_markdown;
use std::{env, path::Path, path::PathBuf, process, time::Duration};

#[derive(Debug, Default)]
struct Args {
    document: PathBuf,
    script: Option<PathBuf>,
    json: bool,
    clipboard: bool,
}

fn parse_args(args: &[String]) -> Option<Args> {
    let mut parsed = Args::default();
    let mut positional = Vec::new();
    for arg in args {
        match arg.as_str() {
            "--json" => parsed.json = true,
            "--clipboard" => parsed.clipboard = true,
            other => positional.push(PathBuf::from(other)),
        }
    }
    let mut positional = positional.into_iter();
    parsed.document = positional.next()?;
    parsed.script = positional.next();
    if positional.next().is_some() {
        return None;
    }
    Some(parsed)
}

fn editor_options(config: &EditorConfig) -> EditorOptions {
    EditorOptions {
        read_only: config.read_only,
        focus_clear: Duration::from_millis(config.focus_clear_ms),
    }
}

/// Load a JSON block array, or import Markdown for any other extension.
fn load_document(path: &Path, registry: &BlockRegistry, id_length: usize) -> Result<Document> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read document '{}'", path.display()))?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        Document::from_json(&text)
            .with_context(|| format!("Failed to parse document '{}'", path.display()))
    } else {
        let mut ids = ShortIdGenerator::new(id_length);
        Ok(Document::new(import_markdown(&text, registry, &mut ids)))
    }
}

fn run(args: Args, config: Option<Config>) -> Result<String> {
    let editor_config = config
        .as_ref()
        .map(|c| c.editor.clone())
        .unwrap_or_default();
    let document_path = match &config {
        Some(config) => config.resolve_document(&args.document),
        None => args.document.clone(),
    };

    let registry = BlockRegistry::default();
    let document = load_document(&document_path, &registry, editor_config.id_length)?;
    log::info!(
        "Loaded {} blocks from {}",
        document.len(),
        document_path.display()
    );

    let mut editor = BlockEditor::new(document)
        .with_registry(registry)
        .with_id_generator(ShortIdGenerator::new(editor_config.id_length))
        .with_options(editor_options(&editor_config));
    let mut clipboard = MemoryClipboard::default();

    if let Some(script_path) = &args.script {
        let text = std::fs::read_to_string(script_path)
            .with_context(|| format!("Failed to read script '{}'", script_path.display()))?;
        let steps = script::parse_script(&text)
            .with_context(|| format!("Invalid script '{}'", script_path.display()))?;
        let summary = script::run(&mut editor, steps, &mut clipboard);
        log::info!(
            "Replayed {} steps, {} changed the document",
            summary.steps,
            summary.changed
        );
    }

    if args.clipboard {
        return Ok(clipboard.contents.unwrap_or_default());
    }
    if args.json {
        return Ok(editor.store().to_json()?);
    }
    Ok(editor.to_markdown())
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map_or("markdown-blocks-cli", String::as_str);
    let Some(parsed) = parse_args(args.get(1..).unwrap_or_default()) else {
        eprintln!("Usage: {program} <document.(json|md)> [script] [--json] [--clipboard]");
        process::exit(1);
    };

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            eprintln!("Fix or remove {}", Config::config_path().display());
            process::exit(1);
        }
    };

    let output = run(parsed, config)?;
    println!("{output}");
    Ok(())
}
