//! Entity-property composites.
//!
//! Any subject with a `semsim:hasPhysicalEntity` statement anchors one
//! composite. Values are kept as typed terms, so a multiplier may be a literal.

use crate::graph::{GraphResult, Predicate, RawNode, RdfGraph};
use crate::outcome::{ErrorStage, attempt};
use crate::term::{self, Provenance, Term};
use crate::vocab::{
    HAS_MULTIPLIER, HAS_PHYSICAL_ENTITY, HAS_PHYSICAL_ENTITY_REFERENCE, HAS_PHYSICAL_PROPERTY,
    PART_OF,
};

use super::{AnnotationRecord, RecordOutcome, dedup};

/// One composite per subject with a physical entity, deduplicated.
pub fn extract_composites<G: RdfGraph + ?Sized>(graph: &G, source: Option<&str>) -> RecordOutcome {
    attempt(ErrorStage::CompositeExtract, || collect(graph, source))
}

fn collect<G: RdfGraph + ?Sized>(
    graph: &G,
    source: Option<&str>,
) -> GraphResult<Vec<AnnotationRecord>> {
    let mut records = Vec::new();
    for subject in graph.subjects()? {
        let entities = graph.objects(&subject, &HAS_PHYSICAL_ENTITY)?;
        if entities.is_empty() {
            continue;
        }
        records.push(composite(graph, &subject, &entities, source)?);
    }
    Ok(dedup(records))
}

fn composite<G: RdfGraph + ?Sized>(
    graph: &G,
    subject: &RawNode,
    entities: &[RawNode],
    source: Option<&str>,
) -> GraphResult<AnnotationRecord> {
    let values = |predicate: &Predicate| -> GraphResult<Vec<Term>> {
        Ok(term::terms(&graph.objects(subject, predicate)?, source))
    };

    let mut part_of = Vec::new();
    for predicate in PART_OF {
        part_of.extend(values(predicate)?);
    }

    Ok(AnnotationRecord::EntityComposite {
        subject: Term::from_raw(subject, source),
        entities: term::terms(entities, source),
        properties: values(&HAS_PHYSICAL_PROPERTY)?,
        entity_references: values(&HAS_PHYSICAL_ENTITY_REFERENCE)?,
        multipliers: values(&HAS_MULTIPLIER)?,
        part_of,
        provenance: Provenance::new(source),
    })
}
