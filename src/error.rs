//! Rich diagnostic error types for semannot.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes and help text. These errors never escape an extractor:
//! the boundary helper in [`crate::outcome`] turns them into stage-tagged
//! failures, using [`kind`](GraphError::kind) as the `cause_kind`.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for semannot library operations.
#[derive(Debug, Error, Diagnostic)]
pub enum SemannotError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

impl SemannotError {
    /// Stable kebab-case name of the underlying error, used as `cause_kind`.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Graph(e) => e.kind(),
            Self::Load(e) => e.kind(),
            Self::Query(e) => e.kind(),
            Self::Config(e) => e.kind(),
        }
    }
}

// ---------------------------------------------------------------------------
// Graph errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum GraphError {
    #[error("graph backend error: {message}")]
    #[diagnostic(
        code(semannot::graph::backend),
        help(
            "The underlying triple graph failed while answering a query. \
             The graph may be corrupted or only partially loaded."
        )
    )]
    Backend { message: String },

    #[error("unsupported term in {position} position: {term}")]
    #[diagnostic(
        code(semannot::graph::unsupported_term),
        help(
            "Only IRIs, blank nodes and literals are supported. Literal subjects \
             and RDF 1.2 triple terms cannot be represented."
        )
    )]
    UnsupportedTerm { position: &'static str, term: String },
}

impl GraphError {
    /// Stable kebab-case name of this error.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Backend { .. } => "graph-backend",
            Self::UnsupportedTerm { .. } => "unsupported-term",
        }
    }
}

// ---------------------------------------------------------------------------
// Load errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum LoadError {
    #[error("unsupported RDF syntax: \"{syntax}\"")]
    #[diagnostic(
        code(semannot::load::unsupported_syntax),
        help(
            "Supported syntaxes are RDF/XML, Turtle, N-Triples, N3 and JSON-LD. \
             Pass the syntax explicitly if the file extension is unusual."
        )
    )]
    UnsupportedSyntax { syntax: String },

    #[error("invalid base IRI \"{base}\": {message}")]
    #[diagnostic(
        code(semannot::load::base_iri),
        help("The base IRI must be an absolute IRI such as `http://example.org/model.xml`.")
    )]
    BaseIri { base: String, message: String },

    #[error("RDF syntax error: {message}")]
    #[diagnostic(
        code(semannot::load::syntax),
        help(
            "The document could not be parsed. Verify the file is valid RDF in the declared syntax."
        )
    )]
    Syntax { message: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Graph(#[from] GraphError),
}

impl LoadError {
    /// Stable kebab-case name of this error.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedSyntax { .. } => "unsupported-syntax",
            Self::BaseIri { .. } => "base-iri",
            Self::Syntax { .. } => "syntax",
            Self::Graph(e) => e.kind(),
        }
    }
}

// ---------------------------------------------------------------------------
// Query errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum QueryError {
    #[error("malformed query: {message}")]
    #[diagnostic(
        code(semannot::query::malformed),
        help(
            "Queries support `SELECT [DISTINCT] ?v ... WHERE {{ s p o . OPTIONAL {{ s p o }} }}` \
             with LIMIT/OFFSET, IRIs, registered CURIEs, variables and literals."
        )
    )]
    Malformed { message: String },

    #[error("projected variable ?{name} does not occur in any pattern")]
    #[diagnostic(
        code(semannot::query::unbound_projection),
        help("Every variable in the SELECT list must appear in a required or optional pattern.")
    )]
    UnboundProjection { name: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Graph(#[from] GraphError),
}

impl QueryError {
    /// Stable kebab-case name of this error.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Malformed { .. } => "malformed-query",
            Self::UnboundProjection { .. } => "unbound-projection",
            Self::Graph(e) => e.kind(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config: {path}")]
    #[diagnostic(
        code(semannot::config::read),
        help("Ensure the config file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {message}")]
    #[diagnostic(
        code(semannot::config::parse),
        help("Check the TOML syntax. Recognized keys are `max_triples` and `parse_timeout_ms`.")
    )]
    Parse { message: String },

    #[error("CURIE prefix \"{prefix}\" collides with a URI scheme")]
    #[diagnostic(
        code(semannot::config::reserved_prefix),
        help("The prefixes http, https, urn and file are reserved; choose another prefix.")
    )]
    ReservedPrefix { prefix: String },
}

impl ConfigError {
    /// Stable kebab-case name of this error.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Read { .. } => "config-read",
            Self::Parse { .. } => "config-parse",
            Self::ReservedPrefix { .. } => "reserved-prefix",
        }
    }
}

/// Convenience result type.
pub type SemannotResult<T> = std::result::Result<T, SemannotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_pass_through_wrappers() {
        let graph = GraphError::Backend {
            message: "boom".into(),
        };
        let err: SemannotError = QueryError::from(graph).into();
        assert_eq!(err.kind(), "graph-backend");
    }

    #[test]
    fn messages_render_fields() {
        let err = ConfigError::ReservedPrefix {
            prefix: "http".into(),
        };
        assert_eq!(
            err.to_string(),
            "CURIE prefix \"http\" collides with a URI scheme"
        );
    }
}
