//! Graph query facade: what the extraction core needs from a triple graph.
//!
//! The core never builds or serializes graphs itself. It only asks an
//! [`RdfGraph`] for subjects, objects of a (subject, predicate) pair, and the
//! full statement list. Node kinds are decided once, at this boundary, as a
//! [`RawNode`]; everything downstream matches on it exhaustively.
//!
//! - [`MemoryGraph`]: indexed in-memory implementation
//! - [`load`]: builds a `MemoryGraph` from RDF bytes via `oxigraph`

pub mod load;
pub mod memory;

pub use memory::MemoryGraph;

use serde::{Deserialize, Serialize};

use crate::error::GraphError;
use crate::vocab::{RDF_LANG_STRING, XSD_STRING};

/// Result type for graph operations.
pub type GraphResult<T> = std::result::Result<T, GraphError>;

/// A graph node as the backing graph reports it: classified, not yet normalized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum RawNode {
    Iri { iri: String },
    Blank { id: String },
    Literal {
        value: String,
        /// `None` for plain and language-tagged strings.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        datatype: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<String>,
    },
}

impl RawNode {
    pub fn iri(iri: impl Into<String>) -> Self {
        Self::Iri { iri: iri.into() }
    }

    pub fn blank(id: impl Into<String>) -> Self {
        Self::Blank { id: id.into() }
    }

    /// A plain literal with no datatype or language.
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
            datatype: None,
            language: None,
        }
    }

    pub fn typed_literal(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
            datatype: Some(datatype.into()),
            language: None,
        }
    }

    /// A literal as an RDF or SPARQL parser reports it. The implied
    /// `xsd:string` and `rdf:langString` datatypes are dropped and language
    /// tags are lower-cased.
    pub fn parsed_literal(
        value: impl Into<String>,
        datatype: &str,
        language: Option<&str>,
    ) -> Self {
        let datatype = (datatype != XSD_STRING && datatype != RDF_LANG_STRING)
            .then(|| datatype.to_string());
        Self::Literal {
            value: value.into(),
            datatype,
            language: language.map(str::to_ascii_lowercase),
        }
    }

    /// The raw string of the node: IRI, blank label, or lexical value.
    pub fn raw_str(&self) -> &str {
        match self {
            Self::Iri { iri } => iri,
            Self::Blank { id } => id,
            Self::Literal { value, .. } => value,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal { .. })
    }
}

impl std::fmt::Display for RawNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Iri { iri } => write!(f, "<{iri}>"),
            Self::Blank { id } => write!(f, "_:{id}"),
            Self::Literal {
                value,
                datatype,
                language,
            } => {
                write!(f, "{value:?}")?;
                if let Some(lang) = language {
                    write!(f, "@{lang}")?;
                } else if let Some(dt) = datatype {
                    write!(f, "^^<{dt}>")?;
                }
                Ok(())
            }
        }
    }
}

/// One subject-predicate-object statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Statement {
    pub subject: RawNode,
    pub predicate: String,
    pub object: RawNode,
}

/// A predicate named by namespace and local name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Predicate {
    pub namespace: &'static str,
    pub local: &'static str,
}

impl Predicate {
    pub const fn new(namespace: &'static str, local: &'static str) -> Self {
        Self { namespace, local }
    }

    /// Full predicate IRI.
    pub fn iri(&self) -> String {
        format!("{}{}", self.namespace, self.local)
    }

    /// Whether `iri` names this predicate.
    pub fn matches(&self, iri: &str) -> bool {
        iri.strip_prefix(self.namespace) == Some(self.local)
    }
}

/// The operations the extraction core requires from a triple graph.
///
/// Implementations report backend failures as [`GraphError`]; extractors catch
/// them at their boundary and never let them propagate further.
pub trait RdfGraph {
    /// Every distinct subject, in a stable order.
    fn subjects(&self) -> GraphResult<Vec<RawNode>>;

    /// Objects of statements matching `subject` and `predicate`, in statement order.
    fn objects(&self, subject: &RawNode, predicate: &Predicate) -> GraphResult<Vec<RawNode>>;

    /// Every statement, in a stable order.
    fn statements(&self) -> GraphResult<Vec<Statement>>;

    /// Total number of statements.
    fn statement_count(&self) -> GraphResult<usize>;
}

impl<G: RdfGraph + ?Sized> RdfGraph for &G {
    fn subjects(&self) -> GraphResult<Vec<RawNode>> {
        (**self).subjects()
    }

    fn objects(&self, subject: &RawNode, predicate: &Predicate) -> GraphResult<Vec<RawNode>> {
        (**self).objects(subject, predicate)
    }

    fn statements(&self) -> GraphResult<Vec<Statement>> {
        (**self).statements()
    }

    fn statement_count(&self) -> GraphResult<usize> {
        (**self).statement_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicate_matching() {
        let p = Predicate::new("http://example.org/", "p");
        assert!(p.matches("http://example.org/p"));
        assert!(!p.matches("http://example.org/pq"));
        assert!(!p.matches("http://other.org/p"));
        assert_eq!(p.iri(), "http://example.org/p");
    }

    #[test]
    fn raw_node_display() {
        assert_eq!(RawNode::iri("http://x").to_string(), "<http://x>");
        assert_eq!(RawNode::blank("b0").to_string(), "_:b0");
        assert_eq!(
            RawNode::typed_literal("2", "http://www.w3.org/2001/XMLSchema#int").to_string(),
            "\"2\"^^<http://www.w3.org/2001/XMLSchema#int>"
        );
    }

    #[test]
    fn parsed_literals_normalize_tags() {
        assert_eq!(
            RawNode::parsed_literal("glucose", RDF_LANG_STRING, Some("en-US")),
            RawNode::Literal {
                value: "glucose".into(),
                datatype: None,
                language: Some("en-us".into()),
            }
        );
        assert_eq!(
            RawNode::parsed_literal("x", XSD_STRING, None),
            RawNode::literal("x")
        );
    }
}
