//! In-memory triple graph with a subject index.

use std::collections::{HashMap, HashSet};

use crate::error::GraphError;

use super::{GraphResult, Predicate, RawNode, RdfGraph, Statement};

/// In-memory graph holding a set of statements.
///
/// Statements keep insertion order; subjects are reported in order of first
/// appearance. Inserting a statement that is already present is a no-op.
#[derive(Debug, Clone, Default)]
pub struct MemoryGraph {
    statements: Vec<Statement>,
    /// Membership check for set semantics.
    seen: HashSet<Statement>,
    /// Subject -> indices into `statements`.
    subject_index: HashMap<RawNode, Vec<usize>>,
    /// Subjects in order of first appearance.
    subject_order: Vec<RawNode>,
}

impl MemoryGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a statement. Returns `false` if it was already present.
    pub fn insert(
        &mut self,
        subject: RawNode,
        predicate: impl Into<String>,
        object: RawNode,
    ) -> GraphResult<bool> {
        if subject.is_literal() {
            return Err(GraphError::UnsupportedTerm {
                position: "subject",
                term: subject.to_string(),
            });
        }
        let statement = Statement {
            subject,
            predicate: predicate.into(),
            object,
        };
        if self.seen.contains(&statement) {
            return Ok(false);
        }
        let idx = self.statements.len();
        match self.subject_index.get_mut(&statement.subject) {
            Some(indices) => indices.push(idx),
            None => {
                self.subject_order.push(statement.subject.clone());
                self.subject_index
                    .insert(statement.subject.clone(), vec![idx]);
            }
        }
        self.seen.insert(statement.clone());
        self.statements.push(statement);
        Ok(true)
    }

    /// Number of statements.
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Borrow the statements without cloning.
    pub fn iter(&self) -> impl Iterator<Item = &Statement> {
        self.statements.iter()
    }

    fn statements_of<'a>(&'a self, subject: &RawNode) -> impl Iterator<Item = &'a Statement> {
        self.subject_index
            .get(subject)
            .into_iter()
            .flatten()
            .map(|&idx| &self.statements[idx])
    }
}

impl RdfGraph for MemoryGraph {
    fn subjects(&self) -> GraphResult<Vec<RawNode>> {
        Ok(self.subject_order.clone())
    }

    fn objects(&self, subject: &RawNode, predicate: &Predicate) -> GraphResult<Vec<RawNode>> {
        Ok(self
            .statements_of(subject)
            .filter(|st| predicate.matches(&st.predicate))
            .map(|st| st.object.clone())
            .collect())
    }

    fn statements(&self) -> GraphResult<Vec<Statement>> {
        Ok(self.statements.clone())
    }

    fn statement_count(&self) -> GraphResult<usize> {
        Ok(self.statements.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const P: Predicate = Predicate::new("http://example.org/", "p");

    #[test]
    fn insert_and_query() {
        let mut g = MemoryGraph::new();
        let s = RawNode::iri("http://example.org/s");
        assert!(g.insert(s.clone(), P.iri(), RawNode::iri("http://example.org/o1")).unwrap());
        assert!(g.insert(s.clone(), P.iri(), RawNode::literal("o2")).unwrap());
        g.insert(RawNode::blank("b0"), P.iri(), RawNode::literal("x"))
            .unwrap();

        assert_eq!(g.statement_count().unwrap(), 3);
        assert_eq!(g.subjects().unwrap(), vec![s.clone(), RawNode::blank("b0")]);
        assert_eq!(
            g.objects(&s, &P).unwrap(),
            vec![RawNode::iri("http://example.org/o1"), RawNode::literal("o2")]
        );
    }

    #[test]
    fn duplicates_ignored() {
        let mut g = MemoryGraph::new();
        let s = RawNode::iri("http://example.org/s");
        g.insert(s.clone(), P.iri(), RawNode::literal("x")).unwrap();
        assert!(!g.insert(s, P.iri(), RawNode::literal("x")).unwrap());
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn literal_subject_rejected() {
        let mut g = MemoryGraph::new();
        let err = g
            .insert(RawNode::literal("nope"), P.iri(), RawNode::literal("x"))
            .unwrap_err();
        assert!(matches!(err, GraphError::UnsupportedTerm { position: "subject", .. }));
        assert!(g.is_empty());
    }

    #[test]
    fn unknown_subject_has_no_objects() {
        let g = MemoryGraph::new();
        assert!(g.objects(&RawNode::blank("zz"), &P).unwrap().is_empty());
    }
}
