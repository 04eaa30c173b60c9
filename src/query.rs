//! SELECT evaluator for ad hoc extraction patterns.
//!
//! Query text is parsed by `spargebra`; the resulting algebra is narrowed to
//! the subset this evaluator runs:
//!
//! ```text
//! PREFIX ex: <http://example.org/>
//! SELECT DISTINCT ?process ?sink WHERE {
//!     ?process semsim:hasSourceParticipant ?src ;
//!              semsim:hasPhysicalProperty ?prop .
//!     OPTIONAL { ?process semsim:hasSinkParticipant ?sink }
//! } LIMIT 10
//! ```
//!
//! Basic graph patterns are joined with nested-loop semantics in order. An
//! OPTIONAL group extends a row when it matches and otherwise leaves its
//! variables unbound. Rows come out in discovery order. FILTER, UNION,
//! property paths, ORDER BY and the other SPARQL constructs are rejected as
//! malformed.

use std::collections::{BTreeMap, HashMap, HashSet};

use spargebra::algebra::GraphPattern;
use spargebra::term::{NamedNodePattern, TermPattern};
use spargebra::{Query, SparqlParser};

use crate::curie::CurieRegistry;
use crate::error::QueryError;
use crate::graph::{RawNode, RdfGraph};
use crate::outcome::{ErrorStage, ExtractionOutcome, attempt};
use crate::term::Term;
use crate::uri;

/// Result type for query operations.
pub type QueryResult<T> = std::result::Result<T, QueryError>;

/// One result row: projected variable -> value, `None` when unbound.
pub type Row = BTreeMap<String, Option<String>>;

/// Run a query against `graph` with the default CURIE registry.
pub fn select<G: RdfGraph + ?Sized>(graph: &G, query: &str) -> ExtractionOutcome<Vec<Row>> {
    select_from(graph, query, None, CurieRegistry::default_registry())
}

/// Run a query, normalizing blank nodes against `source`.
pub fn select_from<G: RdfGraph + ?Sized>(
    graph: &G,
    query: &str,
    source: Option<&str>,
    registry: &CurieRegistry,
) -> ExtractionOutcome<Vec<Row>> {
    attempt(ErrorStage::Sparql, || {
        SelectQuery::parse(query, registry)?.evaluate(graph, source)
    })
}

fn malformed(message: impl Into<String>) -> QueryError {
    QueryError::Malformed {
        message: message.into(),
    }
}

/// A variable or a fixed node in a triple pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternTerm {
    Var(String),
    /// Fixed node; IRIs are held in canonical form.
    Node(RawNode),
}

impl PatternTerm {
    pub fn var(name: impl Into<String>) -> Self {
        Self::Var(name.into())
    }

    /// A fixed IRI, canonicalized.
    pub fn iri(iri: &str) -> Self {
        Self::Node(RawNode::iri(uri::canonical(iri)))
    }

    fn var_name(&self) -> Option<&str> {
        match self {
            Self::Var(name) => Some(name),
            Self::Node(_) => None,
        }
    }

    /// Blank nodes become hidden `_:` variables.
    #[allow(unreachable_patterns)]
    fn from_algebra(term: TermPattern) -> QueryResult<Self> {
        match term {
            TermPattern::NamedNode(node) => Ok(Self::iri(node.as_str())),
            TermPattern::BlankNode(node) => Ok(Self::Var(format!("_:{}", node.as_str()))),
            TermPattern::Literal(literal) => Ok(Self::Node(RawNode::parsed_literal(
                literal.value(),
                literal.datatype().as_str(),
                literal.language(),
            ))),
            TermPattern::Variable(var) => Ok(Self::var(var.as_str())),
            other => Err(malformed(format!("unsupported term {other}"))),
        }
    }

    fn from_predicate(predicate: NamedNodePattern) -> Self {
        match predicate {
            NamedNodePattern::NamedNode(node) => Self::iri(node.as_str()),
            NamedNodePattern::Variable(var) => Self::var(var.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriplePattern {
    pub subject: PatternTerm,
    pub predicate: PatternTerm,
    pub object: PatternTerm,
}

impl TriplePattern {
    pub fn new(subject: PatternTerm, predicate: PatternTerm, object: PatternTerm) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }

    fn terms(&self) -> [&PatternTerm; 3] {
        [&self.subject, &self.predicate, &self.object]
    }

    fn from_algebra(pattern: spargebra::term::TriplePattern) -> QueryResult<Self> {
        if matches!(pattern.subject, TermPattern::Literal(_)) {
            return Err(malformed("a literal cannot be a subject"));
        }
        Ok(Self::new(
            PatternTerm::from_algebra(pattern.subject)?,
            PatternTerm::from_predicate(pattern.predicate),
            PatternTerm::from_algebra(pattern.object)?,
        ))
    }
}

/// The pattern tree of a WHERE clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupPattern {
    /// Triple patterns joined in order.
    Basic(Vec<TriplePattern>),
    Join(Box<GroupPattern>, Box<GroupPattern>),
    /// Rows of the left side, extended by the right side where it matches.
    Optional(Box<GroupPattern>, Box<GroupPattern>),
}

impl GroupPattern {
    fn from_algebra(pattern: GraphPattern) -> QueryResult<Self> {
        match pattern {
            GraphPattern::Bgp { patterns } => patterns
                .into_iter()
                .map(TriplePattern::from_algebra)
                .collect::<QueryResult<Vec<_>>>()
                .map(Self::Basic),
            GraphPattern::Join { left, right } => Ok(Self::Join(
                Box::new(Self::from_algebra(*left)?),
                Box::new(Self::from_algebra(*right)?),
            )),
            GraphPattern::LeftJoin {
                left,
                right,
                expression: None,
            } => Ok(Self::Optional(
                Box::new(Self::from_algebra(*left)?),
                Box::new(Self::from_algebra(*right)?),
            )),
            GraphPattern::LeftJoin { .. } => {
                Err(malformed("FILTER inside OPTIONAL is not supported"))
            }
            other => Err(unsupported(&other)),
        }
    }

    /// Triple patterns in textual order.
    pub fn triples(&self) -> Vec<&TriplePattern> {
        match self {
            Self::Basic(patterns) => patterns.iter().collect(),
            Self::Join(left, right) | Self::Optional(left, right) => {
                let mut triples = left.triples();
                triples.extend(right.triples());
                triples
            }
        }
    }
}

fn unsupported(pattern: &GraphPattern) -> QueryError {
    let construct = match pattern {
        GraphPattern::Filter { .. } => "FILTER",
        GraphPattern::Union { .. } => "UNION",
        GraphPattern::Minus { .. } => "MINUS",
        GraphPattern::Graph { .. } => "GRAPH",
        GraphPattern::Extend { .. } => "BIND and SELECT expressions",
        GraphPattern::Values { .. } => "VALUES",
        GraphPattern::OrderBy { .. } => "ORDER BY",
        GraphPattern::Group { .. } => "GROUP BY and aggregates",
        GraphPattern::Service { .. } => "SERVICE",
        GraphPattern::Path { .. } => "property paths",
        GraphPattern::Project { .. } => "sub-queries",
        _ => "this construct",
    };
    malformed(format!("{construct} is not supported"))
}

/// A parsed SELECT query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectQuery {
    pub projection: Vec<String>,
    pub pattern: GroupPattern,
    pub distinct: bool,
    pub offset: usize,
    pub limit: Option<usize>,
}

impl SelectQuery {
    /// Parse query text. CURIEs resolve against in-query `PREFIX`
    /// declarations first, then `registry`.
    pub fn parse(text: &str, registry: &CurieRegistry) -> QueryResult<Self> {
        let mut parser = SparqlParser::new();
        for (prefix, namespace) in registry.iter() {
            parser = parser
                .with_prefix(prefix, namespace)
                .map_err(|e| malformed(format!("prefix {prefix}: {e}")))?;
        }
        let query = parser
            .parse_query(text)
            .map_err(|e| malformed(e.to_string()))?;
        let Query::Select { pattern, .. } = query else {
            return Err(malformed("only SELECT queries are supported"));
        };
        let query = Self::from_algebra(pattern)?;
        query.validate()?;
        Ok(query)
    }

    /// Peel solution modifiers off the top of the algebra, outermost first.
    fn from_algebra(pattern: GraphPattern) -> QueryResult<Self> {
        let mut projection: Option<Vec<String>> = None;
        let mut distinct = false;
        let mut offset = 0;
        let mut limit = None;
        let mut current = pattern;
        loop {
            current = match current {
                GraphPattern::Slice {
                    inner,
                    start,
                    length,
                } if projection.is_none() => {
                    offset = start;
                    limit = length;
                    *inner
                }
                GraphPattern::Distinct { inner } | GraphPattern::Reduced { inner }
                    if projection.is_none() =>
                {
                    distinct = true;
                    *inner
                }
                GraphPattern::Project { inner, variables } if projection.is_none() => {
                    projection = Some(variables.iter().map(|v| v.as_str().to_string()).collect());
                    *inner
                }
                other => {
                    return Ok(Self {
                        projection: projection.unwrap_or_default(),
                        pattern: GroupPattern::from_algebra(other)?,
                        distinct,
                        offset,
                        limit,
                    });
                }
            };
        }
    }

    /// Variables in order of first appearance, blank-node placeholders excluded.
    pub fn variables(&self) -> Vec<String> {
        let mut vars: Vec<String> = Vec::new();
        for pattern in self.pattern.triples() {
            for name in pattern.terms().into_iter().filter_map(PatternTerm::var_name) {
                if !name.starts_with("_:") && !vars.iter().any(|v| v == name) {
                    vars.push(name.to_string());
                }
            }
        }
        vars
    }

    fn validate(&self) -> QueryResult<()> {
        let vars = self.variables();
        match self.projection.iter().find(|p| !vars.contains(p)) {
            Some(name) => Err(QueryError::UnboundProjection { name: name.clone() }),
            None => Ok(()),
        }
    }

    /// Evaluate against `graph`.
    pub fn evaluate<G: RdfGraph + ?Sized>(
        &self,
        graph: &G,
        source: Option<&str>,
    ) -> QueryResult<Vec<Row>> {
        self.validate()?;
        let index = TripleIndex::build(graph)?;
        let bindings = index.solve(&self.pattern, vec![Binding::new()]);

        let mut rows: Vec<Row> = bindings
            .iter()
            .map(|binding| self.project(binding, source))
            .collect();
        if self.distinct {
            let mut seen = HashSet::with_capacity(rows.len());
            rows.retain(|row| seen.insert(row.clone()));
        }
        Ok(rows
            .into_iter()
            .skip(self.offset)
            .take(self.limit.unwrap_or(usize::MAX))
            .collect())
    }

    fn project(&self, binding: &Binding, source: Option<&str>) -> Row {
        self.projection
            .iter()
            .map(|name| {
                let value = binding
                    .get(name)
                    .map(|node| Term::from_raw(node, source).lexical().to_string());
                (name.clone(), value)
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

type Binding = HashMap<String, RawNode>;

struct TripleIndex {
    triples: Vec<[RawNode; 3]>,
    by_subject: HashMap<RawNode, Vec<usize>>,
}

impl TripleIndex {
    fn build<G: RdfGraph + ?Sized>(graph: &G) -> QueryResult<Self> {
        let triples: Vec<[RawNode; 3]> = graph
            .statements()?
            .into_iter()
            .map(|st| [st.subject, RawNode::iri(st.predicate), st.object])
            .collect();
        let mut by_subject: HashMap<RawNode, Vec<usize>> = HashMap::new();
        for (idx, triple) in triples.iter().enumerate() {
            by_subject.entry(triple[0].clone()).or_default().push(idx);
        }
        Ok(Self {
            triples,
            by_subject,
        })
    }

    /// Every solution of `pattern` extending one of `input`.
    fn solve(&self, pattern: &GroupPattern, input: Vec<Binding>) -> Vec<Binding> {
        match pattern {
            GroupPattern::Basic(triples) => triples.iter().fold(input, |bindings, triple| {
                bindings
                    .iter()
                    .flat_map(|binding| self.matches(triple, binding))
                    .collect()
            }),
            GroupPattern::Join(left, right) => self.solve(right, self.solve(left, input)),
            GroupPattern::Optional(left, right) => self
                .solve(left, input)
                .into_iter()
                .flat_map(|binding| {
                    let extended = self.solve(right, vec![binding.clone()]);
                    if extended.is_empty() {
                        vec![binding]
                    } else {
                        extended
                    }
                })
                .collect(),
        }
    }

    /// Every extension of `binding` matching `pattern`, in statement order.
    fn matches(&self, pattern: &TriplePattern, binding: &Binding) -> Vec<Binding> {
        // A subject bound through a variable holds a raw graph node, so the
        // exact-match index applies.
        let bound_subject = pattern
            .subject
            .var_name()
            .and_then(|name| binding.get(name));
        let candidates: Box<dyn Iterator<Item = &[RawNode; 3]> + '_> = match bound_subject {
            Some(subject) => Box::new(
                self.by_subject
                    .get(subject)
                    .into_iter()
                    .flatten()
                    .map(|&idx| &self.triples[idx]),
            ),
            None => Box::new(self.triples.iter()),
        };
        candidates
            .filter_map(|triple| extend(binding, pattern, triple))
            .collect()
    }
}

fn extend(binding: &Binding, pattern: &TriplePattern, triple: &[RawNode; 3]) -> Option<Binding> {
    let pairs = pattern.terms().into_iter().zip(triple.iter());
    let fixed_ok = pairs.clone().all(|(term, value)| match term {
        PatternTerm::Node(node) => node_matches(node, value),
        PatternTerm::Var(_) => true,
    });
    if !fixed_ok {
        return None;
    }
    let mut out = binding.clone();
    for (term, value) in pairs {
        if let PatternTerm::Var(name) = term {
            match out.get(name) {
                Some(bound) if bound != value => return None,
                Some(_) => {}
                None => {
                    out.insert(name.clone(), value.clone());
                }
            }
        }
    }
    Some(out)
}

/// Fixed IRIs compare canonically; everything else compares exactly.
fn node_matches(pattern: &RawNode, value: &RawNode) -> bool {
    match (pattern, value) {
        (RawNode::Iri { iri: fixed }, RawNode::Iri { iri }) => *fixed == uri::canonical(iri),
        _ => pattern == value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::fixtures::{self, add, node};
    use crate::graph::{MemoryGraph, Predicate};
    use crate::vocab::{HAS_SINK_PARTICIPANT, HAS_SOURCE_PARTICIPANT, RDF_LANG_STRING, XSD};

    fn registry() -> &'static CurieRegistry {
        CurieRegistry::default_registry()
    }

    fn first_column(rows: &[Row], name: &str) -> Vec<Option<String>> {
        rows.iter().map(|r| r[name].clone()).collect()
    }

    #[test]
    fn parses_patterns_and_optionals() {
        let q = SelectQuery::parse(
            "SELECT ?p ?sink WHERE { ?p semsim:hasSourceParticipant ?src . \
             OPTIONAL { ?p semsim:hasSinkParticipant ?sink } }",
            registry(),
        )
        .unwrap();
        assert_eq!(q.projection, vec!["p", "sink"]);
        let GroupPattern::Optional(required, optional) = &q.pattern else {
            panic!("expected optional, got {:?}", q.pattern);
        };
        let GroupPattern::Basic(required) = required.as_ref() else {
            panic!("expected basic pattern");
        };
        assert_eq!(
            required[0].predicate,
            PatternTerm::iri("http://bime.uw.edu/semsim/hasSourceParticipant")
        );
        assert!(matches!(optional.as_ref(), GroupPattern::Basic(p) if p.len() == 1));
    }

    #[test]
    fn optional_leaves_nulls() {
        let graph = fixtures::semsim_graph();
        let rows = select(
            &graph,
            "SELECT ?p ?sink WHERE { ?p semsim:hasSourceParticipant ?src . \
             OPTIONAL { ?p semsim:hasSinkParticipant ?sink } }",
        )
        .into_result()
        .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0]["sink"].as_deref(),
            Some("http://example.org/model#sink1")
        );
        assert_eq!(rows[1]["p"].as_deref(), Some("http://example.org/model#leak"));
        assert_eq!(rows[1]["sink"], None);
    }

    #[test]
    fn each_optional_is_independent() {
        let graph = fixtures::semsim_graph();
        let rows = select(
            &graph,
            "SELECT ?p ?sink ?med WHERE { ?p semsim:hasSourceParticipant ?src . \
             OPTIONAL { ?p semsim:hasSinkParticipant ?sink } \
             OPTIONAL { ?p semsim:hasMediatorParticipant ?med . ?med bqbiol:is ?kind } }",
        )
        .into_result()
        .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0]["sink"].as_deref(),
            Some("http://example.org/model#sink1")
        );
        // enzyme1 carries no bqbiol:is, so the second group never matches.
        assert_eq!(first_column(&rows, "med"), vec![None, None]);
    }

    #[test]
    fn joins_across_patterns() {
        let graph = fixtures::semsim_graph();
        let rows = select(
            &graph,
            "SELECT ?c ?chem WHERE { ?c semsim:hasPhysicalEntity ?e . ?e bqbiol:is ?chem . }",
        )
        .into_result()
        .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0]["chem"].as_deref(),
            Some("https://identifiers.org/chebi/CHEBI:17234")
        );
    }

    #[test]
    fn predicate_object_lists() {
        let graph = fixtures::semsim_graph();
        let rows = select(
            &graph,
            "SELECT ?p ?sink WHERE { ?p semsim:hasSourceParticipant ?src ; \
             semsim:hasSinkParticipant ?sink , ?sink . }",
        )
        .into_result()
        .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["p"].as_deref(), Some("http://example.org/model#reaction1"));
    }

    #[test]
    fn fixed_iris_match_canonically() {
        let graph = fixtures::semsim_graph();
        let rows = select(
            &graph,
            "SELECT ?s WHERE { ?s semsim:hasPhysicalProperty opb:OPB_00340 }",
        )
        .into_result()
        .unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn star_projection_and_prefix_decl() {
        let mut graph = MemoryGraph::new();
        let p = Predicate::new("http://example.org/", "count");
        let integer = format!("{XSD}integer");
        add(&mut graph, node("a"), &p, RawNode::typed_literal("3", integer.as_str()));
        add(&mut graph, node("b"), &p, RawNode::typed_literal("4", integer.as_str()));
        let rows = select(
            &graph,
            "PREFIX ex: <http://example.org/>\nSELECT * WHERE { ?s ex:count 3 }",
        )
        .into_result()
        .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].keys().collect::<Vec<_>>(), vec!["s"]);
    }

    #[test]
    fn language_tags_match_case_insensitively() {
        let mut graph = MemoryGraph::new();
        let label = Predicate::new("http://example.org/", "label");
        add(
            &mut graph,
            node("s"),
            &label,
            RawNode::parsed_literal("glucose", RDF_LANG_STRING, Some("en-us")),
        );
        let rows = select(
            &graph,
            r#"SELECT ?s WHERE { ?s <http://example.org/label> "glucose"@EN-us }"#,
        )
        .into_result()
        .unwrap();
        assert_eq!(rows.len(), 1);

        let plain = select(&graph, r#"SELECT ?s WHERE { ?s ?p "glucose" }"#)
            .into_result()
            .unwrap();
        assert!(plain.is_empty());
    }

    #[test]
    fn blank_placeholders_join_but_are_hidden() {
        let graph = fixtures::semsim_graph();
        let q = SelectQuery::parse(
            "SELECT * WHERE { ?c semsim:hasPhysicalEntity _:e . _:e bqbiol:is ?chem }",
            registry(),
        )
        .unwrap();
        assert_eq!(q.projection, vec!["c", "chem"]);
        assert_eq!(q.evaluate(&graph, None).unwrap().len(), 1);
    }

    #[test]
    fn rows_follow_discovery_order() {
        let mut graph = MemoryGraph::new();
        for name in ["z", "a", "m"] {
            add(&mut graph, node(name), &HAS_SOURCE_PARTICIPANT, node("x"));
            add(&mut graph, node(name), &HAS_SINK_PARTICIPANT, node("y"));
        }
        let rows = select(
            &graph,
            "SELECT ?p WHERE { ?p semsim:hasSourceParticipant ?x . \
             ?p semsim:hasSinkParticipant ?y }",
        )
        .into_result()
        .unwrap();
        let order: Vec<_> = rows.iter().map(|r| r["p"].clone().unwrap()).collect();
        assert_eq!(
            order,
            vec![
                "http://example.org/model#z",
                "http://example.org/model#a",
                "http://example.org/model#m"
            ]
        );
    }

    #[test]
    fn distinct_and_slice() {
        let mut graph = MemoryGraph::new();
        for name in ["a", "b", "c"] {
            add(&mut graph, node(name), &HAS_SOURCE_PARTICIPANT, node("x"));
        }
        let distinct = select(
            &graph,
            "SELECT DISTINCT ?src WHERE { ?p semsim:hasSourceParticipant ?src }",
        )
        .into_result()
        .unwrap();
        assert_eq!(distinct.len(), 1);

        let page = select(
            &graph,
            "SELECT ?p WHERE { ?p semsim:hasSourceParticipant ?src } OFFSET 1 LIMIT 1",
        )
        .into_result()
        .unwrap();
        assert_eq!(
            first_column(&page, "p"),
            vec![Some("http://example.org/model#b".to_string())]
        );
    }

    #[test]
    fn repeated_variable_must_unify() {
        let mut graph = MemoryGraph::new();
        let p = Predicate::new("http://example.org/", "p");
        add(&mut graph, node("a"), &p, node("a"));
        add(&mut graph, node("a"), &p, node("b"));
        let rows = select(&graph, "SELECT ?x WHERE { ?x <http://example.org/p> ?x }")
            .into_result()
            .unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn malformed_queries_are_sparql_failures() {
        let graph = MemoryGraph::new();
        for bad in [
            "SELECT WHERE { ?s ?p ?o }",
            "SELECT ?s { ?s ?p }",
            "SELECT ?s WHERE { ?s ?p ?o ",
            "SELECT ?s WHERE { \"lit\" ?p ?o }",
            "SELECT ?s WHERE { ?s nope:x ?o }",
            "SELECT ?q WHERE { ?s ?p ?o }",
            "ASK { ?s ?p ?o }",
            "SELECT ?s WHERE { ?s ?p ?o FILTER(?o = 1) }",
            "SELECT ?s WHERE { { ?s ?p ?o } UNION { ?o ?p ?s } }",
            "SELECT ?s WHERE { ?s ?p ?o } ORDER BY ?s",
        ] {
            let outcome = select(&graph, bad);
            let failure = outcome.failure().unwrap_or_else(|| panic!("accepted {bad:?}"));
            assert_eq!(failure.stage, ErrorStage::Sparql);
        }
    }

    #[test]
    fn unsupported_constructs_are_named() {
        let err = SelectQuery::parse(
            "SELECT ?s WHERE { ?s ?p ?o OPTIONAL { ?s ?q ?v FILTER(?v > 2) } }",
            registry(),
        )
        .unwrap_err();
        assert!(matches!(&err, QueryError::Malformed { message } if message.contains("OPTIONAL")));

        let err = SelectQuery::parse("SELECT ?s WHERE { ?s <http://a.org/p>+ ?o }", registry())
            .unwrap_err();
        assert!(matches!(&err, QueryError::Malformed { message } if message.contains("path")));
    }
}
