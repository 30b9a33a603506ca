//! Relation graph construction from a flat triple list.

use crate::error::{KgragError, Result};
use crate::graph::{RelationGraph, Triple};
use crate::index::{ConceptIndex, RelationIndex};

/// Build a directed relation graph from triples.
///
/// Every head and tail must be present in `concepts` and every relation in
/// `relations`, or the build fails immediately with `UnknownConcept` /
/// `UnknownRelation` and no partial graph is returned.
///
/// Known limitation: one edge per ordered (head, tail) pair. Inserting the
/// same pair again with a different relation silently overwrites the
/// earlier relation attribute.
pub fn build_graph(
    triples: &[Triple],
    concepts: &ConceptIndex,
    relations: &RelationIndex,
) -> Result<RelationGraph> {
    let mut graph = RelationGraph::new();

    for triple in triples {
        let head_id = concepts
            .id(&triple.head)
            .ok_or_else(|| KgragError::UnknownConcept(triple.head.clone()))?;
        let tail_id = concepts
            .id(&triple.tail)
            .ok_or_else(|| KgragError::UnknownConcept(triple.tail.clone()))?;
        let relation_id = relations
            .id(&triple.relation)
            .ok_or_else(|| KgragError::UnknownRelation(triple.relation.clone()))?;

        graph.add_edge(head_id, tail_id, relation_id);
    }

    log::debug!(
        "Built relation graph: {} nodes, {} edges from {} triples",
        graph.node_count(),
        graph.edge_count(),
        triples.len()
    );

    Ok(graph)
}
