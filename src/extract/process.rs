//! Process participants.
//!
//! A subject with any source, sink or mediator participant statement is a
//! process. Each participant list is collected independently and may be empty.

use crate::graph::{GraphResult, RdfGraph};
use crate::outcome::{ErrorStage, attempt};
use crate::term::{self, Provenance, Term};
use crate::vocab::{HAS_MEDIATOR_PARTICIPANT, HAS_SINK_PARTICIPANT, HAS_SOURCE_PARTICIPANT};

use super::{AnnotationRecord, RecordOutcome, dedup};

/// One process per subject with any participant, deduplicated.
pub fn extract_processes<G: RdfGraph + ?Sized>(graph: &G, source: Option<&str>) -> RecordOutcome {
    attempt(ErrorStage::ProcessExtract, || collect(graph, source))
}

fn collect<G: RdfGraph + ?Sized>(
    graph: &G,
    source: Option<&str>,
) -> GraphResult<Vec<AnnotationRecord>> {
    let mut records = Vec::new();
    for subject in graph.subjects()? {
        let sources = graph.objects(&subject, &HAS_SOURCE_PARTICIPANT)?;
        let sinks = graph.objects(&subject, &HAS_SINK_PARTICIPANT)?;
        let mediators = graph.objects(&subject, &HAS_MEDIATOR_PARTICIPANT)?;
        if sources.is_empty() && sinks.is_empty() && mediators.is_empty() {
            continue;
        }
        records.push(AnnotationRecord::Process {
            subject: Term::from_raw(&subject, source),
            sources: term::terms(&sources, source),
            sinks: term::terms(&sinks, source),
            mediators: term::terms(&mediators, source),
            provenance: Provenance::new(source),
        });
    }
    Ok(dedup(records))
}
