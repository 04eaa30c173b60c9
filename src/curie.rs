//! CURIE registry: compact `prefix:local` names <-> full URIs.
//!
//! The registry is immutable once built. [`CurieRegistry::default_registry`]
//! covers the vocabularies found in biomodel annotations.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::error::ConfigError;
use crate::vocab;

/// Prefix tokens that are URI schemes and therefore never CURIE prefixes.
pub const SCHEME_TOKENS: &[&str] = &["http", "https", "urn", "file"];

const DEFAULT_PREFIXES: &[(&str, &str)] = &[
    ("rdf", vocab::RDF),
    ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
    ("owl", "http://www.w3.org/2002/07/owl#"),
    ("xsd", vocab::XSD),
    ("dc", vocab::DC_ELEMENTS),
    ("dcterms", vocab::DC_TERMS),
    ("foaf", "http://xmlns.com/foaf/0.1/"),
    ("vcard", "http://www.w3.org/2001/vcard-rdf/3.0#"),
    ("bqbiol", vocab::BQBIOL),
    ("bqmodel", vocab::BQMODEL),
    ("semsim", vocab::SEMSIM),
    ("opb", vocab::OPB),
    ("ro", vocab::RO),
    ("obo", vocab::OBO),
    ("GO", "http://purl.obolibrary.org/obo/GO_"),
    ("CHEBI", "http://purl.obolibrary.org/obo/CHEBI_"),
    ("FMA", "http://purl.obolibrary.org/obo/FMA_"),
    ("CL", "http://purl.obolibrary.org/obo/CL_"),
    ("UBERON", "http://purl.obolibrary.org/obo/UBERON_"),
    ("uniprot", "https://identifiers.org/uniprot/"),
    ("taxonomy", "https://identifiers.org/taxonomy/"),
    ("pubmed", "https://identifiers.org/pubmed/"),
    ("orcid", "https://orcid.org/"),
    ("sbo", "https://identifiers.org/SBO:"),
    ("ensembl", "https://identifiers.org/ensembl/"),
    ("kegg.compound", "https://identifiers.org/kegg.compound/"),
];

static DEFAULT: LazyLock<CurieRegistry> = LazyLock::new(|| {
    CurieRegistry::build(
        DEFAULT_PREFIXES
            .iter()
            .map(|(p, ns)| (p.to_string(), ns.to_string())),
    )
});

/// Bidirectional prefix <-> namespace mapping.
#[derive(Debug, Clone)]
pub struct CurieRegistry {
    by_prefix: HashMap<String, String>,
    /// (namespace, prefix), longest namespace first.
    by_namespace: Vec<(String, String)>,
}

impl CurieRegistry {
    /// Build a registry from `(prefix, namespace)` entries.
    ///
    /// Later entries for the same prefix replace earlier ones.
    pub fn new<I, P, N>(entries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (P, N)>,
        P: Into<String>,
        N: Into<String>,
    {
        let entries: Vec<(String, String)> = entries
            .into_iter()
            .map(|(p, n)| (p.into(), n.into()))
            .collect();
        if let Some((prefix, _)) = entries.iter().find(|(p, _)| is_scheme_token(p)) {
            return Err(ConfigError::ReservedPrefix {
                prefix: prefix.clone(),
            });
        }
        Ok(Self::build(entries))
    }

    fn build(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        let by_prefix: HashMap<String, String> = entries.into_iter().collect();
        let mut by_namespace: Vec<(String, String)> = by_prefix
            .iter()
            .map(|(p, ns)| (ns.clone(), p.clone()))
            .collect();
        // Longest namespace first; ties broken by prefix for a stable order.
        by_namespace.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.1.cmp(&b.1)));
        Self {
            by_prefix,
            by_namespace,
        }
    }

    /// The shared default registry.
    pub fn default_registry() -> &'static CurieRegistry {
        &DEFAULT
    }

    /// Namespace registered for `prefix`, if any.
    pub fn namespace(&self, prefix: &str) -> Option<&str> {
        self.by_prefix.get(prefix).map(String::as_str)
    }

    /// Registered `(prefix, namespace)` pairs, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.by_prefix
            .iter()
            .map(|(prefix, namespace)| (prefix.as_str(), namespace.as_str()))
    }

    /// Number of registered prefixes.
    pub fn len(&self) -> usize {
        self.by_prefix.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_prefix.is_empty()
    }

    /// Expand `prefix:local` to a full URI. Anything that is not a registered
    /// CURIE (absolute URIs, unknown prefixes, plain strings) is returned as is.
    pub fn expand(&self, curie: &str) -> String {
        self.try_expand(curie).unwrap_or_else(|| curie.to_string())
    }

    /// Like [`expand`](Self::expand) but `None` when no expansion applies.
    pub fn try_expand(&self, curie: &str) -> Option<String> {
        let (prefix, local) = curie.split_once(':')?;
        if is_scheme_token(prefix) {
            return None;
        }
        self.namespace(prefix).map(|ns| format!("{ns}{local}"))
    }

    /// Compact a URI using the longest matching registered namespace.
    pub fn compact(&self, uri: &str) -> String {
        for (namespace, prefix) in &self.by_namespace {
            if let Some(local) = uri.strip_prefix(namespace.as_str()) {
                return format!("{prefix}:{local}");
            }
        }
        uri.to_string()
    }
}

impl Default for CurieRegistry {
    fn default() -> Self {
        DEFAULT.clone()
    }
}

fn is_scheme_token(prefix: &str) -> bool {
    SCHEME_TOKENS
        .iter()
        .any(|scheme| scheme.eq_ignore_ascii_case(prefix))
}
