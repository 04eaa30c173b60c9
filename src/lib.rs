// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # semannot
//!
//! Semantic annotation extraction for biosimulation models: turns the RDF
//! metadata shipped with a model (SemSim composites, BioModels qualifiers,
//! Dublin Core) into typed, canonicalized annotation records.
//!
//! ## Architecture
//!
//! - **Terms** (`uri`, `curie`, `blank`, `term`): URI canonicalization, CURIE
//!   expansion/compaction, source-qualified blank node ids
//! - **Graph** (`graph`): triple graph abstraction, in-memory store, oxigraph-backed loading
//! - **Outcomes** (`outcome`): staged `Ok`/`Err` envelopes, no panics across boundaries
//! - **Extractors** (`extract`): singular, composite, process, energy differential, OPB frequency
//! - **Aggregation** (`aggregate`, `guard`): per-graph and per-archive results, parallel via rayon
//! - **Queries** (`query`): a SELECT/WHERE/OPTIONAL triple-pattern evaluator
//!
//! ## Library usage
//!
//! ```no_run
//! use semannot::aggregate::extract_graph;
//! use semannot::config::ExtractionConfig;
//! use semannot::graph::load::{RdfSyntax, load_graph};
//!
//! let bytes = std::fs::read("metadata.rdf").unwrap();
//! let graph = load_graph(&bytes, RdfSyntax::RdfXml, Some("metadata.rdf"))
//!     .into_result()
//!     .unwrap();
//! let config = ExtractionConfig::default().with_max_triples(250_000);
//! let annotations = extract_graph(&graph, Some("metadata.rdf"), &config);
//! println!("{}", serde_json::to_string_pretty(&annotations).unwrap());
//! ```

pub mod aggregate;
pub mod blank;
pub mod config;
pub mod curie;
pub mod error;
pub mod extract;
pub mod graph;
pub mod guard;
pub mod outcome;
pub mod query;
pub mod term;
pub mod uri;
pub mod vocab;
