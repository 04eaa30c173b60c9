//! Singular annotations: one record per matching statement.
//!
//! Driven by a constant `(predicate, key)` table. Records come out in table
//! order, then subject order, then statement order, and are not de-duplicated.

use crate::graph::{GraphResult, RdfGraph};
use crate::outcome::{ErrorStage, attempt};
use crate::term::{Provenance, Term};
use crate::vocab::{self, SingularEntry};

use super::{AnnotationRecord, RecordOutcome};

/// Extract every Dublin Core and qualifier statement.
pub fn extract_singular<G: RdfGraph + ?Sized>(graph: &G, source: Option<&str>) -> RecordOutcome {
    extract_with_table(graph, source, vocab::singular_table())
}

/// Extract statements matching the given table entries.
pub fn extract_with_table<'t, G, T>(graph: &G, source: Option<&str>, table: T) -> RecordOutcome
where
    G: RdfGraph + ?Sized,
    T: IntoIterator<Item = &'t SingularEntry>,
{
    attempt(ErrorStage::SingularExtract, || collect(graph, source, table))
}

fn collect<'t, G, T>(
    graph: &G,
    source: Option<&str>,
    table: T,
) -> GraphResult<Vec<AnnotationRecord>>
where
    G: RdfGraph + ?Sized,
    T: IntoIterator<Item = &'t SingularEntry>,
{
    let subjects = graph.subjects()?;
    let provenance = Provenance::new(source);
    let mut records = Vec::new();

    for entry in table {
        let predicate_uri = entry.predicate.iri();
        for subject in &subjects {
            let objects = graph.objects(subject, &entry.predicate)?;
            if objects.is_empty() {
                continue;
            }
            let subject_term = Term::from_raw(subject, source);
            records.extend(objects.iter().map(|object| AnnotationRecord::Singular {
                subject: subject_term.clone(),
                predicate_key: entry.key,
                predicate_uri: predicate_uri.clone(),
                object: Term::from_raw(object, source),
                provenance: provenance.clone(),
            }));
        }
    }
    Ok(records)
}
