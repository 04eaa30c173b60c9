//! Pattern extractors: annotation records pulled out of a triple graph.
//!
//! Each extractor runs independently behind its own stage boundary (see
//! [`attempt`](crate::outcome::attempt)), so a failing pattern produces an
//! `Err` outcome without affecting its siblings.
//!
//! - [`singular`]: Dublin Core and BioModels qualifier statements
//! - [`composite`]: SemSim entity-property composites
//! - [`process`]: process participants (source/sink/mediator)
//! - [`energy`]: energy differentials (source plus sinks)
//! - [`opb`]: OPB term frequencies

pub mod composite;
pub mod energy;
pub mod opb;
pub mod process;
pub mod singular;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::outcome::{ErrorStage, ExtractionOutcome};
use crate::term::{Provenance, Term};
use crate::vocab::SingularKey;

pub use composite::extract_composites;
pub use energy::extract_energy_differentials;
pub use opb::{OpbFrequency, count_opb_terms};
pub use process::extract_processes;
pub use singular::{extract_singular, extract_with_table};

/// Outcome type every record extractor returns.
pub type RecordOutcome = ExtractionOutcome<Vec<AnnotationRecord>>;

/// One extracted annotation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum AnnotationRecord {
    Singular {
        subject: Term,
        predicate_key: SingularKey,
        predicate_uri: String,
        object: Term,
        provenance: Provenance,
    },
    EntityComposite {
        subject: Term,
        entities: Vec<Term>,
        properties: Vec<Term>,
        entity_references: Vec<Term>,
        multipliers: Vec<Term>,
        part_of: Vec<Term>,
        provenance: Provenance,
    },
    Process {
        subject: Term,
        sources: Vec<Term>,
        sinks: Vec<Term>,
        mediators: Vec<Term>,
        provenance: Provenance,
    },
    EnergyDifferential {
        subject: Term,
        source: Term,
        sinks: Vec<Term>,
        properties: Vec<Term>,
        provenance: Provenance,
    },
}

impl AnnotationRecord {
    pub fn subject(&self) -> &Term {
        match self {
            Self::Singular { subject, .. }
            | Self::EntityComposite { subject, .. }
            | Self::Process { subject, .. }
            | Self::EnergyDifferential { subject, .. } => subject,
        }
    }

    pub fn provenance(&self) -> &Provenance {
        match self {
            Self::Singular { provenance, .. }
            | Self::EntityComposite { provenance, .. }
            | Self::Process { provenance, .. }
            | Self::EnergyDifferential { provenance, .. } => provenance,
        }
    }

    /// The `type` discriminator used in serialized output.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Singular { .. } => "singular",
            Self::EntityComposite { .. } => "entity-composite",
            Self::Process { .. } => "process",
            Self::EnergyDifferential { .. } => "energy-differential",
        }
    }
}

/// Log an extractor's outcome at the aggregation boundary.
pub(crate) fn log_outcome<T>(
    stage: ErrorStage,
    source: Option<&str>,
    outcome: &ExtractionOutcome<Vec<T>>,
) {
    match outcome {
        ExtractionOutcome::Ok { data } => {
            tracing::debug!(
                stage = %stage,
                source = source.unwrap_or("-"),
                count = data.len(),
                "extracted records"
            );
        }
        ExtractionOutcome::Err(failure) => {
            tracing::warn!(
                stage = %stage,
                source = source.unwrap_or("-"),
                error = %failure.message,
                "extractor failed"
            );
        }
    }
}

/// Drop exact duplicates, keeping the first occurrence of each record.
pub fn dedup(records: Vec<AnnotationRecord>) -> Vec<AnnotationRecord> {
    let mut seen = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|record| seen.insert(record.clone()))
        .collect()
}
