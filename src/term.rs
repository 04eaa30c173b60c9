//! Normalized term model and provenance.
//!
//! A [`Term`] is what extractors emit: URIs are always canonical
//! ([`CanonicalUri`] can only be built through the canonicalizer) and blank
//! nodes are scoped to their source document.

use serde::{Deserialize, Serialize};

use crate::blank;
use crate::curie::CurieRegistry;
use crate::graph::RawNode;
use crate::uri;

/// A URI in canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String")]
pub struct CanonicalUri(String);

impl CanonicalUri {
    /// Canonicalize `raw`.
    pub fn new(raw: &str) -> Self {
        Self(uri::canonical(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }
}

impl From<String> for CanonicalUri {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

impl std::fmt::Display for CanonicalUri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A normalized graph node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Term {
    Uri {
        uri: CanonicalUri,
    },
    Literal {
        value: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        datatype: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<String>,
    },
    BlankNode {
        id: String,
    },
}

impl Term {
    /// A URI term, canonicalized.
    pub fn uri(raw: &str) -> Self {
        Self::Uri {
            uri: CanonicalUri::new(raw),
        }
    }

    pub fn literal(value: impl Into<String>, datatype: Option<String>) -> Self {
        Self::Literal {
            value: value.into(),
            datatype,
            language: None,
        }
    }

    /// Normalize a raw graph node from document `source`.
    pub fn from_raw(node: &RawNode, source: Option<&str>) -> Self {
        match node {
            RawNode::Iri { iri } => Self::uri(iri),
            RawNode::Blank { id } => Self::BlankNode {
                id: blank::normalize(source, id),
            },
            RawNode::Literal {
                value,
                datatype,
                language,
            } => Self::Literal {
                value: value.clone(),
                datatype: datatype.clone(),
                language: language.clone(),
            },
        }
    }

    /// Canonical URI, normalized blank id, or literal value.
    pub fn lexical(&self) -> &str {
        match self {
            Self::Uri { uri } => uri.as_str(),
            Self::Literal { value, .. } => value,
            Self::BlankNode { id } => id,
        }
    }

    /// The URI, when this term is one.
    pub fn as_uri(&self) -> Option<&CanonicalUri> {
        match self {
            Self::Uri { uri } => Some(uri),
            _ => None,
        }
    }

    /// Lexical form with URIs compacted to CURIEs where possible.
    pub fn compacted(&self, registry: &CurieRegistry) -> String {
        match self {
            Self::Uri { uri } => registry.compact(uri.as_str()),
            other => other.lexical().to_string(),
        }
    }
}

/// Where an extracted record came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Provenance {
    #[serde(default)]
    pub source: Option<String>,
}

impl Provenance {
    /// Provenance for a record read from `source`.
    pub fn new(source: Option<&str>) -> Self {
        Self {
            source: source.map(str::to_string),
        }
    }
}

/// Normalize a list of raw nodes from one source.
pub fn terms(nodes: &[RawNode], source: Option<&str>) -> Vec<Term> {
    nodes.iter().map(|n| Term::from_raw(n, source)).collect()
}
