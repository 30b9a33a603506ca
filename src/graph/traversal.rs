//! Neighborhood resolution over the relation graph.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use petgraph::Direction;

use crate::error::KgragError;
use crate::graph::RelationGraph;
use crate::index::{ConceptId, ConceptIndex};

/// Traversal direction selector for 1-hop neighborhood queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Union of successors and predecessors.
    Bidirectional,
    /// Successors only (edges starting at the concept).
    Outgoing,
    /// Predecessors only (edges ending at the concept).
    Ingoing,
}

impl FromStr for Mode {
    type Err = KgragError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bidirectional" => Ok(Mode::Bidirectional),
            "outgoing" => Ok(Mode::Outgoing),
            "ingoing" => Ok(Mode::Ingoing),
            other => Err(KgragError::InvalidMode(other.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Bidirectional => write!(f, "bidirectional"),
            Mode::Outgoing => write!(f, "outgoing"),
            Mode::Ingoing => write!(f, "ingoing"),
        }
    }
}

/// Collect the ids adjacent to `id` in the given petgraph direction.
fn adjacent_ids(graph: &RelationGraph, id: ConceptId, dir: Direction) -> HashSet<ConceptId> {
    graph.neighbors_directed(id, dir).collect()
}

/// Resolve a concept's id if it is both indexed and present in the graph.
///
/// Absence is a normal outcome for concepts with no captured relations, so
/// callers turn `None` into an empty result rather than an error.
fn resolve_node(
    graph: &RelationGraph,
    concept: &str,
    concepts: &ConceptIndex,
) -> Option<ConceptId> {
    let id = concepts.id(concept)?;
    if !graph.contains_node(id) {
        return None;
    }
    Some(id)
}

/// Map a set of concept ids back to their names.
fn to_names(ids: HashSet<ConceptId>, concepts: &ConceptIndex) -> Vec<String> {
    ids.into_iter()
        .filter_map(|id| concepts.name(id).map(str::to_string))
        .collect()
}

/// Get the 1-hop neighbors of a concept under the given mode.
///
/// Returns concept names in unspecified order with no duplicates; the
/// queried concept itself is never included (no self-loops assumed).
/// A concept absent from the index or the graph yields an empty list.
pub fn get_neighbors(
    graph: &RelationGraph,
    concept: &str,
    concepts: &ConceptIndex,
    mode: Mode,
) -> Vec<String> {
    let Some(id) = resolve_node(graph, concept, concepts) else {
        return Vec::new();
    };

    let neighbor_ids = match mode {
        Mode::Outgoing => adjacent_ids(graph, id, Direction::Outgoing),
        Mode::Ingoing => adjacent_ids(graph, id, Direction::Incoming),
        Mode::Bidirectional => {
            let mut ids = adjacent_ids(graph, id, Direction::Outgoing);
            ids.extend(graph.neighbors_directed(id, Direction::Incoming));
            ids
        }
    };

    to_names(neighbor_ids, concepts)
}

/// Get the strict ring-2 neighborhood of a concept.
///
/// Expands every bidirectional 1-hop neighbor by its own predecessors and
/// successors, then removes the original concept and the whole 1-hop set:
/// the result contains only concepts reachable in exactly two hops.
/// A concept absent from the index or the graph yields an empty list.
pub fn get_2hop_neighbors(
    graph: &RelationGraph,
    concept: &str,
    concepts: &ConceptIndex,
) -> Vec<String> {
    let Some(id) = resolve_node(graph, concept, concepts) else {
        return Vec::new();
    };

    let mut one_hop = adjacent_ids(graph, id, Direction::Outgoing);
    one_hop.extend(graph.neighbors_directed(id, Direction::Incoming));

    let mut two_hop = HashSet::new();
    for &neighbor in &one_hop {
        two_hop.extend(graph.neighbors_directed(neighbor, Direction::Outgoing));
        two_hop.extend(graph.neighbors_directed(neighbor, Direction::Incoming));
    }

    two_hop.remove(&id);
    for neighbor in &one_hop {
        two_hop.remove(neighbor);
    }

    to_names(two_hop, concepts)
}
