//! semannot CLI: annotation extraction for biosimulation model metadata.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result, miette};

use semannot::aggregate::{GraphInput, extract_archive};
use semannot::config::ExtractionConfig;
use semannot::curie::CurieRegistry;
use semannot::graph::MemoryGraph;
use semannot::graph::load::{RdfSyntax, load_graph};
use semannot::outcome::{ErrorStage, ExtractionFailure};
use semannot::query::select_from;
use semannot::uri;

#[derive(Parser)]
#[command(name = "semannot", version, about = "Semantic annotation extraction for model metadata")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract annotations from RDF files, one model per file.
    Extract {
        /// RDF files to read.
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Reject models with more statements than this.
        #[arg(long)]
        max_triples: Option<usize>,

        /// TOML configuration file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// RDF syntax for every file (default: guessed from the extension).
        #[arg(long)]
        syntax: Option<String>,

        /// Pretty-print the JSON output.
        #[arg(long)]
        pretty: bool,
    },

    /// Run a SELECT query against one RDF file.
    Query {
        /// RDF file to query.
        file: PathBuf,

        /// Query text, e.g. "SELECT ?s WHERE { ?s a ?t }".
        query: String,
    },

    /// Print canonical and compacted forms of URIs.
    Canon {
        /// URIs or CURIEs.
        #[arg(required = true)]
        uris: Vec<String>,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            files,
            max_triples,
            config,
            syntax,
            pretty,
        } => {
            let mut extraction = match config {
                Some(path) => ExtractionConfig::load(&path)?,
                None => ExtractionConfig::default(),
            };
            if let Some(limit) = max_triples {
                extraction = extraction.with_max_triples(limit);
            }
            let forced = syntax.as_deref().map(str::parse::<RdfSyntax>).transpose()?;

            let mut inputs = Vec::new();
            let mut loading_errors = Vec::new();
            for path in &files {
                match read_model(path, forced) {
                    Ok(input) => inputs.push(input),
                    Err(failure) => {
                        tracing::warn!(file = %path.display(), error = %failure, "model skipped");
                        loading_errors.push(failure);
                    }
                }
            }

            let archive = extract_archive(&inputs, loading_errors, &extraction);
            let json = if pretty {
                serde_json::to_string_pretty(&archive)
            } else {
                serde_json::to_string(&archive)
            }
            .into_diagnostic()?;
            println!("{json}");
        }

        Commands::Query { file, query } => {
            let input = read_model(&file, None).map_err(|failure| miette!("{failure}"))?;
            let rows = select_from(
                &input.graph,
                &query,
                input.source.as_deref(),
                CurieRegistry::default_registry(),
            )
            .into_result()
            .map_err(|failure| miette!("{failure}"))?;
            println!("{}", serde_json::to_string_pretty(&rows).into_diagnostic()?);
        }

        Commands::Canon { uris } => {
            let registry = CurieRegistry::default_registry();
            for raw in &uris {
                let canonical = uri::canonical(&registry.expand(raw));
                let compacted = registry.compact(&canonical);
                println!("{canonical}\t{compacted}");
            }
        }
    }

    Ok(())
}

/// Read and parse one file. Read failures are `extract`, parse failures `rdf-parse`.
fn read_model(
    path: &Path,
    forced: Option<RdfSyntax>,
) -> std::result::Result<GraphInput<MemoryGraph>, ExtractionFailure> {
    let source = path.display().to_string();
    let bytes = std::fs::read(path).map_err(|e| {
        ExtractionFailure::new(ErrorStage::Extract, format!("cannot read {source}: {e}"))
            .with_detail("path", source.clone())
            .with_cause_kind("io")
    })?;
    let syntax = forced
        .or_else(|| RdfSyntax::from_path(path))
        .unwrap_or(RdfSyntax::RdfXml);
    let graph = load_graph(&bytes, syntax, Some(&source)).into_result()?;
    Ok(GraphInput::new(source, graph))
}
