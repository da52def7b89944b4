//! Command-line definition and execution

use anyhow::{Context, Result};
use clap::Parser;
use katachi_core::{syntax, GraphStore};
use katachi_shacl::{ShapesGraph, ValidationConfig, ValidationReport, Validator};
use std::path::PathBuf;

/// Exit code for a conforming data graph
pub const EXIT_CONFORMS: i32 = 0;
/// Exit code for a non-conforming data graph
pub const EXIT_DOES_NOT_CONFORM: i32 = 2;

/// Validate an RDF data graph against SHACL shapes
#[derive(Parser, Debug)]
#[command(name = "katachi", version, about)]
pub struct Cli {
    /// Path to the JSON-LD or Turtle data file
    #[arg(long)]
    pub data: PathBuf,

    /// One or more Turtle shape files
    #[arg(long, num_args = 1.., required = true)]
    pub shapes: Vec<PathBuf>,
}

/// Outcome of a validation run
#[derive(Debug)]
pub struct CommandResult {
    pub report: ValidationReport,
}

impl CommandResult {
    pub fn conforms(&self) -> bool {
        self.report.conforms
    }

    pub fn exit_code(&self) -> i32 {
        if self.report.conforms {
            EXIT_CONFORMS
        } else {
            EXIT_DOES_NOT_CONFORM
        }
    }
}

/// Load the graphs, run inference and validation, and build the report.
///
/// Operational failures (missing files, parse errors, malformed shapes)
/// surface as errors; a non-conforming graph is a successful run.
pub fn execute(cli: &Cli) -> Result<CommandResult> {
    let mut data = syntax::load_path(&cli.data)
        .with_context(|| format!("failed to load data graph from {}", cli.data.display()))?;
    tracing::debug!(triples = data.len(), "data graph loaded");

    let mut shapes_store = GraphStore::new();
    for (index, path) in cli.shapes.iter().enumerate() {
        let graph = syntax::load_turtle_path(path)
            .with_context(|| format!("failed to load shapes from {}", path.display()))?;
        // Blank node labels are per-document; keep each file's scope apart
        shapes_store.merge(graph.with_blank_prefix(&format!("f{}-", index)));
    }
    tracing::debug!(
        triples = shapes_store.len(),
        files = cli.shapes.len(),
        "shapes graph assembled"
    );

    let inferred = katachi_rdfs::expand(&mut data);
    tracing::debug!(inferred, "rdfs closure applied to data graph");

    let shapes = ShapesGraph::from_store(&shapes_store).context("invalid shapes graph")?;
    let validator = Validator::new(ValidationConfig {
        abort_on_first: false,
        allow_infos: true,
        allow_warnings: true,
    });
    let report = validator.validate(&shapes, &data).context("validation failed")?;
    tracing::info!(
        conforms = report.conforms,
        violations = report.violation_count(),
        warnings = report.warning_count(),
        infos = report.info_count(),
        "validation finished"
    );

    Ok(CommandResult { report })
}
