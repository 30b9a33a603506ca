//! Concept and relation indexes: compact integer ids for graph keys.
//!
//! The concept index is bidirectional (name↔id) and invariant-checked:
//! both directions are kept in one structure so they cannot drift apart.

use std::collections::HashMap;

use crate::error::{KgragError, Result};

/// Compact identifier for a concept (graph node key).
pub type ConceptId = u32;

/// Compact identifier for a relation (graph edge attribute).
pub type RelationId = u32;

/// Bidirectional concept name↔id mapping.
///
/// Invariant: `name_to_id` and `id_to_name` are exact inverses. Every
/// insertion is checked, so a lookup in either direction is authoritative.
#[derive(Debug, Clone, Default)]
pub struct ConceptIndex {
    name_to_id: HashMap<String, ConceptId>,
    id_to_name: HashMap<ConceptId, String>,
}

impl ConceptIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from (name, id) pairs
    ///
    /// Fails with `InvalidInput` if any name or id appears twice with a
    /// conflicting counterpart.
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, ConceptId)>,
    {
        let mut index = Self::new();
        for (name, id) in pairs {
            index.insert(name, id)?;
        }
        Ok(index)
    }

    /// Insert a (name, id) pair
    ///
    /// Re-inserting an identical pair is a no-op. A name already mapped to
    /// a different id, or an id already mapped to a different name, fails
    /// with `InvalidInput` and leaves the index unchanged.
    pub fn insert(&mut self, name: String, id: ConceptId) -> Result<()> {
        if let Some(&existing) = self.name_to_id.get(&name) {
            if existing == id {
                return Ok(());
            }
            return Err(KgragError::InvalidInput(format!(
                "concept '{}' already mapped to id {} (attempted {})",
                name, existing, id
            )));
        }
        if let Some(existing) = self.id_to_name.get(&id) {
            return Err(KgragError::InvalidInput(format!(
                "concept id {} already mapped to '{}' (attempted '{}')",
                id, existing, name
            )));
        }
        self.id_to_name.insert(id, name.clone());
        self.name_to_id.insert(name, id);
        Ok(())
    }

    /// Look up the id for a concept name
    pub fn id(&self, name: &str) -> Option<ConceptId> {
        self.name_to_id.get(name).copied()
    }

    /// Look up the name for a concept id
    pub fn name(&self, id: ConceptId) -> Option<&str> {
        self.id_to_name.get(&id).map(String::as_str)
    }

    /// Check whether a concept name is indexed
    pub fn contains(&self, name: &str) -> bool {
        self.name_to_id.contains_key(name)
    }

    /// Number of indexed concepts
    pub fn len(&self) -> usize {
        self.name_to_id.len()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.name_to_id.is_empty()
    }
}

/// Relation name→id mapping.
#[derive(Debug, Clone, Default)]
pub struct RelationIndex {
    name_to_id: HashMap<String, RelationId>,
}

impl RelationIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from (name, id) pairs
    ///
    /// Fails with `InvalidInput` if a name appears twice with different ids.
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, RelationId)>,
    {
        let mut index = Self::new();
        for (name, id) in pairs {
            index.insert(name, id)?;
        }
        Ok(index)
    }

    /// Insert a (name, id) pair; identical re-insertion is a no-op
    pub fn insert(&mut self, name: String, id: RelationId) -> Result<()> {
        if let Some(&existing) = self.name_to_id.get(&name) {
            if existing == id {
                return Ok(());
            }
            return Err(KgragError::InvalidInput(format!(
                "relation '{}' already mapped to id {} (attempted {})",
                name, existing, id
            )));
        }
        self.name_to_id.insert(name, id);
        Ok(())
    }

    /// Look up the id for a relation name
    pub fn id(&self, name: &str) -> Option<RelationId> {
        self.name_to_id.get(name).copied()
    }

    /// Number of indexed relations
    pub fn len(&self) -> usize {
        self.name_to_id.len()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.name_to_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concept_index_roundtrip() {
        let index = ConceptIndex::from_pairs(vec![
            ("Algebra".to_string(), 0),
            ("Calculus".to_string(), 1),
        ])
        .unwrap();
        assert_eq!(index.id("Algebra"), Some(0));
        assert_eq!(index.name(1), Some("Calculus"));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_concept_index_unknown_lookups() {
        let index = ConceptIndex::new();
        assert_eq!(index.id("Nowhere"), None);
        assert_eq!(index.name(42), None);
        assert!(!index.contains("Nowhere"));
        assert!(index.is_empty());
    }

    #[test]
    fn test_concept_index_rejects_conflicting_name() {
        let mut index = ConceptIndex::new();
        index.insert("Algebra".to_string(), 0).unwrap();
        let err = index.insert("Algebra".to_string(), 1).unwrap_err();
        assert!(matches!(err, KgragError::InvalidInput(_)));
        // Index unchanged after the failed insert
        assert_eq!(index.id("Algebra"), Some(0));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_concept_index_rejects_conflicting_id() {
        let mut index = ConceptIndex::new();
        index.insert("Algebra".to_string(), 0).unwrap();
        let err = index.insert("Calculus".to_string(), 0).unwrap_err();
        assert!(matches!(err, KgragError::InvalidInput(_)));
        assert_eq!(index.name(0), Some("Algebra"));
    }

    #[test]
    fn test_concept_index_idempotent_reinsert() {
        let mut index = ConceptIndex::new();
        index.insert("Algebra".to_string(), 0).unwrap();
        index.insert("Algebra".to_string(), 0).unwrap();
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_relation_index_basic() {
        let index = RelationIndex::from_pairs(vec![
            ("Is-a-Prerequisite-of".to_string(), 10),
            ("Is-Part-of".to_string(), 20),
        ])
        .unwrap();
        assert_eq!(index.id("Is-a-Prerequisite-of"), Some(10));
        assert_eq!(index.id("missing"), None);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_relation_index_rejects_conflict() {
        let mut index = RelationIndex::new();
        index.insert("r1".to_string(), 10).unwrap();
        assert!(index.insert("r1".to_string(), 20).is_err());
        assert_eq!(index.id("r1"), Some(10));
    }
}
