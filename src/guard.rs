//! Protection guard: refuse graphs over the configured statement ceiling.
//!
//! Unlike extractor failures, a guard rejection is fatal for its graph:
//! extraction does not run.

use crate::graph::RdfGraph;
use crate::outcome::{ErrorStage, ExtractionFailure, ExtractionOutcome};

/// Check `graph` against `max_triples`. `None` means no limit.
pub fn check<G: RdfGraph + ?Sized>(graph: &G, max_triples: Option<usize>) -> ExtractionOutcome<()> {
    let Some(limit) = max_triples else {
        return ExtractionOutcome::ok(());
    };
    let triple_count = match graph.statement_count() {
        Ok(count) => count,
        Err(e) => {
            return ExtractionOutcome::err(ExtractionFailure::from_error(ErrorStage::RdfParse, e));
        }
    };
    if triple_count > limit {
        tracing::warn!(triple_count, limit, "graph exceeds max-triples limit");
        return ExtractionOutcome::err(
            ExtractionFailure::new(
                ErrorStage::RdfParse,
                format!("Model exceeds max-triples limit ({triple_count} > {limit})"),
            )
            .with_detail("triple_count", triple_count)
            .with_detail("limit", limit),
        );
    }
    ExtractionOutcome::ok(())
}
