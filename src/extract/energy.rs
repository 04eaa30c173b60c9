//! Energy differentials.
//!
//! Driven by `hasSourceParticipant` statements: each one yields a record only
//! if its subject also has at least one `hasSinkParticipant`. Subjects with
//! only sinks are never visited; detection does not run from the sink side.

use crate::graph::{GraphResult, RdfGraph};
use crate::outcome::{ErrorStage, attempt};
use crate::term::{self, Provenance, Term};
use crate::vocab::{HAS_PHYSICAL_PROPERTY, HAS_SINK_PARTICIPANT, HAS_SOURCE_PARTICIPANT};

use super::{AnnotationRecord, RecordOutcome, dedup};

/// One differential per source participant of a subject that also has a sink.
pub fn extract_energy_differentials<G: RdfGraph + ?Sized>(
    graph: &G,
    source: Option<&str>,
) -> RecordOutcome {
    attempt(ErrorStage::EnergyExtract, || collect(graph, source))
}

fn collect<G: RdfGraph + ?Sized>(
    graph: &G,
    source: Option<&str>,
) -> GraphResult<Vec<AnnotationRecord>> {
    let mut records = Vec::new();
    for subject in graph.subjects()? {
        let sources = graph.objects(&subject, &HAS_SOURCE_PARTICIPANT)?;
        if sources.is_empty() {
            continue;
        }
        let sinks = graph.objects(&subject, &HAS_SINK_PARTICIPANT)?;
        if sinks.is_empty() {
            continue;
        }
        let subject_term = Term::from_raw(&subject, source);
        let sinks = term::terms(&sinks, source);
        let properties = term::terms(&graph.objects(&subject, &HAS_PHYSICAL_PROPERTY)?, source);

        for driving in &sources {
            records.push(AnnotationRecord::EnergyDifferential {
                subject: subject_term.clone(),
                source: Term::from_raw(driving, source),
                sinks: sinks.clone(),
                properties: properties.clone(),
                provenance: Provenance::new(source),
            });
        }
    }
    Ok(dedup(records))
}
