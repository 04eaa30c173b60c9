//! OPB term frequencies across all statements of a graph.

use std::collections::BTreeMap;

use crate::graph::{GraphResult, RawNode, RdfGraph};
use crate::outcome::{ErrorStage, ExtractionOutcome, attempt};
use crate::term::CanonicalUri;
use crate::vocab::OPB;

/// Canonical OPB URI -> number of statements whose object it is.
pub type OpbFrequency = BTreeMap<String, u64>;

pub fn count_opb_terms<G: RdfGraph + ?Sized>(graph: &G) -> ExtractionOutcome<OpbFrequency> {
    attempt(ErrorStage::OpbCount, || count(graph))
}

fn count<G: RdfGraph + ?Sized>(graph: &G) -> GraphResult<OpbFrequency> {
    let mut frequency = OpbFrequency::new();
    for statement in graph.statements()? {
        let RawNode::Iri { iri } = &statement.object else {
            continue;
        };
        let uri = CanonicalUri::new(iri);
        if uri.starts_with(OPB) {
            *frequency.entry(uri.into_string()).or_default() += 1;
        }
    }
    Ok(frequency)
}

/// Add `other`'s counts into `into`.
pub fn merge_frequencies(into: &mut OpbFrequency, other: &OpbFrequency) {
    for (uri, count) in other {
        *into.entry(uri.clone()).or_default() += count;
    }
}
