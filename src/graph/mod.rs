//! Relation graph module: graph construction and neighborhood traversal.
//!
//! Builds a directed graph of concept ids from (head, relation, tail)
//! triples and resolves 1-hop and 2-hop neighborhoods under directional
//! constraints.

mod builder;
mod traversal;

pub use builder::build_graph;
pub use traversal::{get_2hop_neighbors, get_neighbors, Mode};

use petgraph::graphmap::DiGraphMap;
use serde::{Deserialize, Serialize};

use crate::index::{ConceptId, RelationId};

/// Directed relation graph: concept-id nodes, one relation-id attribute per
/// ordered node pair.
///
/// `DiGraphMap` keeps exactly one edge per ordered pair, so inserting a
/// duplicate (head, tail) pair replaces the relation attribute. Built once
/// from a triple list and read-only for the lifetime of a query session.
pub type RelationGraph = DiGraphMap<ConceptId, RelationId>;

/// A single directed, labeled fact (head --relation--> tail).
///
/// Serialized as `{"s": head, "p": relation, "o": tail}`, the wire shape
/// produced by the candidate-triple-extraction adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triple {
    /// Head concept name, e.g. `Algebra`.
    #[serde(rename = "s")]
    pub head: String,
    /// Relation label, e.g. `Is-a-Prerequisite-of`.
    #[serde(rename = "p")]
    pub relation: String,
    /// Tail concept name, e.g. `Calculus`.
    #[serde(rename = "o")]
    pub tail: String,
}

impl Triple {
    /// Create a new triple.
    pub fn new(
        head: impl Into<String>,
        relation: impl Into<String>,
        tail: impl Into<String>,
    ) -> Self {
        Self {
            head: head.into(),
            relation: relation.into(),
            tail: tail.into(),
        }
    }
}
