//! Per-graph and per-archive aggregation.
//!
//! [`extract_graph`] runs the protection guard and then every extractor on one
//! graph, folding individual failures into `extraction_errors` instead of
//! failing the graph. [`extract_archive`] fans out across graphs with rayon
//! and merges the per-graph results once they are all collected.

use rayon::prelude::*;
use serde::Serialize;

use crate::config::ExtractionConfig;
use crate::extract::opb::merge_frequencies;
use crate::extract::{
    self, AnnotationRecord, OpbFrequency, count_opb_terms, extract_composites,
    extract_energy_differentials, extract_processes, extract_with_table,
};
use crate::graph::RdfGraph;
use crate::guard;
use crate::outcome::{ErrorStage, ExtractionFailure, ExtractionOutcome};
use crate::vocab::{DUBLIN_CORE_TABLE, QUALIFIER_TABLE};

/// Everything extracted from one graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphAnnotations {
    pub source: Option<String>,
    pub triple_count: usize,
    pub dublin_core: Vec<AnnotationRecord>,
    pub qualifiers: Vec<AnnotationRecord>,
    pub composites: Vec<AnnotationRecord>,
    pub processes: Vec<AnnotationRecord>,
    pub energy_differentials: Vec<AnnotationRecord>,
    pub opb_frequency: OpbFrequency,
    pub extraction_errors: Vec<ExtractionFailure>,
}

impl GraphAnnotations {
    /// Total number of records of every kind.
    pub fn record_count(&self) -> usize {
        self.dublin_core.len()
            + self.qualifiers.len()
            + self.composites.len()
            + self.processes.len()
            + self.energy_differentials.len()
    }
}

/// Run the guard and all extractors on one graph.
///
/// Returns `Err` only when the guard rejects the graph; extractor failures
/// land in `extraction_errors`.
pub fn extract_graph<G: RdfGraph + ?Sized>(
    graph: &G,
    source: Option<&str>,
    config: &ExtractionConfig,
) -> ExtractionOutcome<GraphAnnotations> {
    if let ExtractionOutcome::Err(failure) = guard::check(graph, config.max_triples) {
        return ExtractionOutcome::err(failure);
    }

    let mut errors = Vec::new();
    let mut records = |stage: ErrorStage, outcome: extract::RecordOutcome| {
        extract::log_outcome(stage, source, &outcome);
        outcome.unwrap_or_record(Vec::new(), &mut errors)
    };

    let dublin_core = records(
        ErrorStage::SingularExtract,
        extract_with_table(graph, source, DUBLIN_CORE_TABLE),
    );
    let qualifiers = records(
        ErrorStage::SingularExtract,
        extract_with_table(graph, source, QUALIFIER_TABLE),
    );
    let composites = records(
        ErrorStage::CompositeExtract,
        extract_composites(graph, source),
    );
    let processes = records(ErrorStage::ProcessExtract, extract_processes(graph, source));
    let energy_differentials = records(
        ErrorStage::EnergyExtract,
        extract_energy_differentials(graph, source),
    );

    let opb_outcome = count_opb_terms(graph);
    if let Some(failure) = opb_outcome.failure() {
        tracing::warn!(
            source = source.unwrap_or("-"),
            error = %failure.message,
            "OPB count failed"
        );
    }
    let opb_frequency = opb_outcome.unwrap_or_record(OpbFrequency::new(), &mut errors);

    let triple_count = match graph.statement_count() {
        Ok(count) => count,
        Err(e) => {
            errors.push(ExtractionFailure::from_error(ErrorStage::RdfParse, e));
            0
        }
    };

    ExtractionOutcome::ok(GraphAnnotations {
        source: source.map(str::to_string),
        triple_count,
        dublin_core,
        qualifiers,
        composites,
        processes,
        energy_differentials,
        opb_frequency,
        extraction_errors: errors,
    })
}

/// One graph to extract, with the source it came from.
#[derive(Debug, Clone)]
pub struct GraphInput<G> {
    pub source: Option<String>,
    pub graph: G,
}

impl<G> GraphInput<G> {
    /// A graph named by its source document.
    pub fn new(source: impl Into<String>, graph: G) -> Self {
        Self {
            source: Some(source.into()),
            graph,
        }
    }
}

/// Extract every graph in parallel. Output order matches input order.
pub fn extract_graphs<G: RdfGraph + Sync>(
    inputs: &[GraphInput<G>],
    config: &ExtractionConfig,
) -> Vec<ExtractionOutcome<GraphAnnotations>> {
    inputs
        .par_iter()
        .map(|input| extract_graph(&input.graph, input.source.as_deref(), config))
        .collect()
}

/// Combined annotations of every model in an archive.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ArchiveAnnotations {
    /// Graphs that were extracted (guard rejections excluded).
    pub model_count: usize,
    pub dublin_core: Vec<AnnotationRecord>,
    pub qualifiers: Vec<AnnotationRecord>,
    pub composites: Vec<AnnotationRecord>,
    pub processes: Vec<AnnotationRecord>,
    pub energy_differentials: Vec<AnnotationRecord>,
    pub opb_frequency: OpbFrequency,
    /// Loading errors, guard rejections, then each graph's extraction errors.
    pub errors: Vec<ExtractionFailure>,
}

impl ArchiveAnnotations {
    fn absorb(mut self, outcome: ExtractionOutcome<GraphAnnotations>) -> Self {
        match outcome {
            ExtractionOutcome::Ok { data } => {
                self.model_count += 1;
                self.dublin_core.extend(data.dublin_core);
                self.qualifiers.extend(data.qualifiers);
                self.composites.extend(data.composites);
                self.processes.extend(data.processes);
                self.energy_differentials.extend(data.energy_differentials);
                merge_frequencies(&mut self.opb_frequency, &data.opb_frequency);
                self.errors.extend(data.extraction_errors);
            }
            ExtractionOutcome::Err(failure) => self.errors.push(failure),
        }
        self
    }
}

/// Merge per-graph outcomes and loading errors into one archive result.
pub fn aggregate_archive(
    outcomes: impl IntoIterator<Item = ExtractionOutcome<GraphAnnotations>>,
    loading_errors: Vec<ExtractionFailure>,
) -> ExtractionOutcome<ArchiveAnnotations> {
    let seed = ArchiveAnnotations {
        errors: loading_errors,
        ..Default::default()
    };
    ExtractionOutcome::ok(outcomes.into_iter().fold(seed, ArchiveAnnotations::absorb))
}

/// Extract all graphs of an archive and merge the results.
pub fn extract_archive<G: RdfGraph + Sync>(
    inputs: &[GraphInput<G>],
    loading_errors: Vec<ExtractionFailure>,
    config: &ExtractionConfig,
) -> ExtractionOutcome<ArchiveAnnotations> {
    let outcome = aggregate_archive(extract_graphs(inputs, config), loading_errors);
    if let Some(archive) = outcome.data() {
        tracing::info!(
            models = archive.model_count,
            composites = archive.composites.len(),
            processes = archive.processes.len(),
            errors = archive.errors.len(),
            "archive extraction finished"
        );
    }
    outcome
}
