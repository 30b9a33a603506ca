//! Triple verbalization: rendering relation triples into fixed-format text
//! lines for prompt injection.
//!
//! Output line format is `(<head>,<relation>,<tail>)` plus a newline, with
//! no escaping. Concept and relation names must not contain literal commas
//! or parentheses or downstream parsing breaks.

use crate::graph::{get_neighbors, Mode, RelationGraph, Triple};
use crate::index::ConceptIndex;

/// Sentinel emitted when a neighborhood query found nothing to verbalize.
const NO_RESULT: &str = "None";

/// Render one verbalized triple line.
fn triple_line(head: &str, relation: &str, tail: &str) -> String {
    format!("({},{},{})\n", head, relation, tail)
}

/// Verbalize a concept's 1-hop neighborhood from the relation graph.
///
/// Emits one `(<concept>,<relation_label>,<neighbor>)` line per neighbor
/// found under `mode`, concatenated in the resolver's order. The
/// caller-supplied `relation_label` is used uniformly for every line
/// regardless of the relation stored on each edge: the downstream consumer
/// expects one canonical relation phrase.
///
/// Returns the literal `"None"` when the concept has no neighbors under
/// `mode` (including concepts absent from the index or the graph).
pub fn verbalize_from_graph(
    graph: &RelationGraph,
    concept: &str,
    concepts: &ConceptIndex,
    relation_label: &str,
    mode: Mode,
) -> String {
    let neighbors = get_neighbors(graph, concept, concepts, mode);
    if neighbors.is_empty() {
        return NO_RESULT.to_string();
    }

    let mut out = String::new();
    for neighbor in &neighbors {
        out.push_str(&triple_line(concept, relation_label, neighbor));
    }
    out
}

/// Verbalize the triples that mention a concept, straight from a raw
/// triple list (no graph involved).
///
/// Each matching triple (concept equals head or tail) is rendered with its
/// own stored relation label, unlike the graph-based verbalizer's unified
/// label. Returns `"None"` for an empty input list; returns an empty
/// string when the list is non-empty but nothing matches. The asymmetry
/// between those two no-result encodings is long-standing observable
/// behavior that downstream consumers distinguish, so both are kept.
pub fn verbalize_from_triples(triples: &[Triple], concept: &str) -> String {
    if triples.is_empty() {
        return NO_RESULT.to_string();
    }

    let mut out = String::new();
    for triple in triples {
        if concept == triple.head || concept == triple.tail {
            out.push_str(&triple_line(&triple.head, &triple.relation, &triple.tail));
        }
    }
    out
}
