//! Adapter from the `oxigraph` RDF parsers into a [`MemoryGraph`].
//!
//! Parsing itself is oxigraph's business. This module only picks the syntax,
//! classifies every parsed term into a [`RawNode`], and wraps the whole thing
//! at the `rdf-parse` stage boundary.

use std::path::Path;

use oxigraph::io::{RdfFormat, RdfParser};
use oxigraph::model::Term;

use crate::error::{GraphError, LoadError};
use crate::outcome::{ErrorStage, ExtractionOutcome, attempt};

use super::{MemoryGraph, RawNode};

/// Result type for loading operations.
pub type LoadResult<T> = std::result::Result<T, LoadError>;

/// RDF serializations a metadata document may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RdfSyntax {
    RdfXml,
    Turtle,
    NTriples,
    N3,
    JsonLd,
}

impl RdfSyntax {
    /// Guess the syntax from a file extension (without the dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "rdf" | "xml" | "owl" | "sbml" | "cellml" => Some(Self::RdfXml),
            "ttl" | "turtle" => Some(Self::Turtle),
            "nt" => Some(Self::NTriples),
            "n3" => Some(Self::N3),
            "jsonld" | "json" => Some(Self::JsonLd),
            _ => None,
        }
    }

    /// Guess the syntax from a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Resolve a MIME type as listed in an archive manifest.
    ///
    /// Parameters such as `; charset=utf-8` are ignored.
    pub fn from_media_type(media_type: &str) -> Option<Self> {
        let base = media_type.split(';').next().unwrap_or("").trim();
        match base.to_ascii_lowercase().as_str() {
            "application/rdf+xml" | "application/xml" | "text/xml" => Some(Self::RdfXml),
            "text/turtle" | "application/x-turtle" => Some(Self::Turtle),
            "application/n-triples" => Some(Self::NTriples),
            "text/n3" | "text/rdf+n3" => Some(Self::N3),
            "application/ld+json" => Some(Self::JsonLd),
            _ => None,
        }
    }

    /// Canonical media type.
    pub fn media_type(self) -> &'static str {
        match self {
            Self::RdfXml => "application/rdf+xml",
            Self::Turtle => "text/turtle",
            Self::NTriples => "application/n-triples",
            Self::N3 => "text/n3",
            Self::JsonLd => "application/ld+json",
        }
    }

    fn format(self) -> LoadResult<RdfFormat> {
        RdfFormat::from_media_type(self.media_type()).ok_or_else(|| LoadError::UnsupportedSyntax {
            syntax: self.media_type().to_string(),
        })
    }
}

impl std::str::FromStr for RdfSyntax {
    type Err = LoadError;

    /// Accepts a short name (`turtle`, `rdfxml`, ...), an extension, or a media type.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let syntax = match s.to_ascii_lowercase().as_str() {
            "rdfxml" | "rdf/xml" | "rdf-xml" => Some(Self::RdfXml),
            "ntriples" | "n-triples" => Some(Self::NTriples),
            "json-ld" => Some(Self::JsonLd),
            other => Self::from_extension(other).or_else(|| Self::from_media_type(other)),
        };
        syntax.ok_or_else(|| LoadError::UnsupportedSyntax {
            syntax: s.to_string(),
        })
    }
}

/// Parse `bytes` into an in-memory graph.
///
/// Blank node labels are kept as the parser reports them; quads in named
/// graphs are folded into one graph.
pub fn parse_graph(
    bytes: &[u8],
    syntax: RdfSyntax,
    base_iri: Option<&str>,
) -> LoadResult<MemoryGraph> {
    let mut parser = RdfParser::from_format(syntax.format()?);
    if let Some(base) = base_iri {
        parser = parser.with_base_iri(base).map_err(|e| LoadError::BaseIri {
            base: base.to_string(),
            message: e.to_string(),
        })?;
    }

    let mut graph = MemoryGraph::new();
    for quad in parser.for_reader(bytes) {
        let quad = quad.map_err(|e| LoadError::Syntax {
            message: e.to_string(),
        })?;
        let subject = raw_node(Term::from(quad.subject), "subject")?;
        let object = raw_node(quad.object, "object")?;
        graph.insert(subject, quad.predicate.into_string(), object)?;
    }
    tracing::debug!(
        syntax = syntax.media_type(),
        statements = graph.len(),
        "parsed RDF graph"
    );
    Ok(graph)
}

/// Parse a graph at the `rdf-parse` stage boundary.
///
/// `source` is used as the base IRI when it is absolute.
pub fn load_graph(
    bytes: &[u8],
    syntax: RdfSyntax,
    source: Option<&str>,
) -> ExtractionOutcome<MemoryGraph> {
    let base = source.filter(|s| s.contains("://"));
    attempt(ErrorStage::RdfParse, || parse_graph(bytes, syntax, base))
}

/// Classify an oxigraph term.
#[allow(unreachable_patterns)]
fn raw_node(term: Term, position: &'static str) -> Result<RawNode, GraphError> {
    match term {
        Term::NamedNode(node) => Ok(RawNode::iri(node.into_string())),
        Term::BlankNode(node) => Ok(RawNode::blank(node.into_string())),
        Term::Literal(literal) => Ok(RawNode::parsed_literal(
            literal.value(),
            literal.datatype().as_str(),
            literal.language(),
        )),
        other => Err(GraphError::UnsupportedTerm {
            position,
            term: other.to_string(),
        }),
    }
}
