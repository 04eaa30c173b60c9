//! Vocabulary constants: namespaces and the predicates extractors look for.

use serde::{Deserialize, Serialize};

use crate::graph::Predicate;

pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
pub const DC_TERMS: &str = "http://purl.org/dc/terms/";
pub const DC_ELEMENTS: &str = "http://purl.org/dc/elements/1.1/";
pub const BQBIOL: &str = "http://biomodels.net/biology-qualifiers/";
pub const BQMODEL: &str = "http://biomodels.net/model-qualifiers/";
pub const SEMSIM: &str = "http://bime.uw.edu/semsim/";
/// Ontology of Physics for Biology, in canonical form.
pub const OPB: &str = "https://identifiers.org/opb/";
pub const RO: &str = "http://www.obofoundry.org/ro/ro.owl#";
pub const OBO: &str = "http://purl.obolibrary.org/obo/";

pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
pub const RDF_LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

pub const HAS_PHYSICAL_ENTITY: Predicate = Predicate::new(SEMSIM, "hasPhysicalEntity");
pub const HAS_PHYSICAL_PROPERTY: Predicate = Predicate::new(SEMSIM, "hasPhysicalProperty");
pub const HAS_PHYSICAL_ENTITY_REFERENCE: Predicate =
    Predicate::new(SEMSIM, "hasPhysicalEntityReference");
pub const HAS_MULTIPLIER: Predicate = Predicate::new(SEMSIM, "hasMultiplier");
pub const HAS_SOURCE_PARTICIPANT: Predicate = Predicate::new(SEMSIM, "hasSourceParticipant");
pub const HAS_SINK_PARTICIPANT: Predicate = Predicate::new(SEMSIM, "hasSinkParticipant");
pub const HAS_MEDIATOR_PARTICIPANT: Predicate = Predicate::new(SEMSIM, "hasMediatorParticipant");

/// `part_of` relations. Producers use either the OBO Relation Ontology URI
/// or the BFO identifier.
pub const PART_OF: &[Predicate] = &[
    Predicate::new(RO, "part_of"),
    Predicate::new(OBO, "BFO_0000050"),
];

/// Result key of a singular annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SingularKey {
    Creator,
    Description,
    Is,
    IsVersionOf,
    IsPropertyOf,
    HasTaxon,
    IsPartOf,
    IsDescribedBy,
    ModelIs,
    ModelIsDescribedBy,
}

impl SingularKey {
    /// Dublin Core keys, as opposed to BioModels qualifiers.
    pub fn is_dublin_core(self) -> bool {
        matches!(self, Self::Creator | Self::Description)
    }
}

/// One row of a singular extraction table.
#[derive(Debug, Clone, Copy)]
pub struct SingularEntry {
    pub predicate: Predicate,
    pub key: SingularKey,
}

const fn entry(namespace: &'static str, local: &'static str, key: SingularKey) -> SingularEntry {
    SingularEntry {
        predicate: Predicate::new(namespace, local),
        key,
    }
}

pub const DUBLIN_CORE_TABLE: &[SingularEntry] = &[
    entry(DC_TERMS, "creator", SingularKey::Creator),
    entry(DC_ELEMENTS, "creator", SingularKey::Creator),
    entry(DC_TERMS, "description", SingularKey::Description),
    entry(DC_ELEMENTS, "description", SingularKey::Description),
];

pub const QUALIFIER_TABLE: &[SingularEntry] = &[
    entry(BQBIOL, "is", SingularKey::Is),
    entry(BQBIOL, "isVersionOf", SingularKey::IsVersionOf),
    entry(BQBIOL, "isPropertyOf", SingularKey::IsPropertyOf),
    entry(BQBIOL, "hasTaxon", SingularKey::HasTaxon),
    entry(BQBIOL, "isPartOf", SingularKey::IsPartOf),
    entry(BQBIOL, "isDescribedBy", SingularKey::IsDescribedBy),
    entry(BQMODEL, "is", SingularKey::ModelIs),
    entry(BQMODEL, "isDescribedBy", SingularKey::ModelIsDescribedBy),
];

/// The full singular table: Dublin Core first, then qualifiers.
pub fn singular_table() -> impl Iterator<Item = &'static SingularEntry> {
    DUBLIN_CORE_TABLE.iter().chain(QUALIFIER_TABLE)
}
