//! Triple ingestion: loading (head, relation, tail) triples from disk and
//! assigning compact ids for graph construction.
//!
//! Two on-disk formats, dispatched on file extension: `.json` files hold a
//! JSON array of `{s,p,o}` objects (the extraction adapter's wire shape);
//! everything else is parsed as TSV with one `head\trelation\ttail` line
//! per triple.

use std::path::Path;

use crate::error::{KgragError, Result};
use crate::graph::Triple;
use crate::index::{ConceptIndex, RelationIndex};

/// Load triples from a file, dispatching on its extension.
pub fn load_triples(path: &Path) -> Result<Vec<Triple>> {
    let content = std::fs::read_to_string(path).map_err(KgragError::Io)?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let triples = if extension == "json" {
        parse_json(&content, &path.display().to_string())?
    } else {
        parse_tsv(&content, &path.display().to_string())?
    };

    log::info!("Loaded {} triples from {}", triples.len(), path.display());
    Ok(triples)
}

/// Parse a JSON array of `{s,p,o}` objects.
fn parse_json(content: &str, path: &str) -> Result<Vec<Triple>> {
    serde_json::from_str(content)
        .map_err(|e| KgragError::Parse(format!("JSON parse error in {}: {}", path, e)))
}

/// Parse TSV content: one `head\trelation\ttail` per line.
///
/// Blank lines and lines starting with `#` are skipped. Any other line
/// without exactly three tab-separated fields fails with `Parse`.
fn parse_tsv(content: &str, path: &str) -> Result<Vec<Triple>> {
    let mut triples = Vec::new();

    for (line_no, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != 3 {
            return Err(KgragError::Parse(format!(
                "TSV parse error in {} line {}: expected 3 tab-separated fields, got {}",
                path,
                line_no + 1,
                fields.len()
            )));
        }

        triples.push(Triple::new(fields[0], fields[1], fields[2]));
    }

    Ok(triples)
}

/// Build concept and relation indexes from a triple list, assigning compact
/// ids in first-seen order (heads before tails within each triple).
pub fn build_indexes(triples: &[Triple]) -> Result<(ConceptIndex, RelationIndex)> {
    let mut concepts = ConceptIndex::new();
    let mut relations = RelationIndex::new();

    for triple in triples {
        for name in [&triple.head, &triple.tail] {
            if !concepts.contains(name) {
                let id = concepts.len() as u32;
                concepts.insert(name.clone(), id)?;
            }
        }
        if relations.id(&triple.relation).is_none() {
            let id = relations.len() as u32;
            relations.insert(triple.relation.clone(), id)?;
        }
    }

    log::debug!(
        "Indexed {} concepts and {} relations",
        concepts.len(),
        relations.len()
    );
    Ok((concepts, relations))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_tsv_basic() {
        let content = "A\tr1\tB\nB\tr2\tC\n";
        let triples = parse_tsv(content, "test.tsv").unwrap();
        assert_eq!(triples.len(), 2);
        assert_eq!(triples[0], Triple::new("A", "r1", "B"));
        assert_eq!(triples[1], Triple::new("B", "r2", "C"));
    }

    #[test]
    fn test_parse_tsv_skips_blanks_and_comments() {
        let content = "# curriculum triples\n\nA\tr1\tB\n\n# trailing comment\n";
        let triples = parse_tsv(content, "test.tsv").unwrap();
        assert_eq!(triples.len(), 1);
    }

    #[test]
    fn test_parse_tsv_wrong_arity() {
        let content = "A\tr1\tB\nA\tB\n";
        let err = parse_tsv(content, "test.tsv").unwrap_err();
        assert!(matches!(err, KgragError::Parse(_)));
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_load_triples_tsv_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("triples.tsv");
        fs::write(&path, "Algebra\tIs-a-Prerequisite-of\tCalculus\n").unwrap();

        let triples = load_triples(&path).unwrap();
        assert_eq!(triples.len(), 1);
        assert_eq!(triples[0].head, "Algebra");
        assert_eq!(triples[0].tail, "Calculus");
    }

    #[test]
    fn test_load_triples_json_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("triples.json");
        fs::write(
            &path,
            r#"[{"s":"A","p":"r1","o":"B"},{"s":"B","p":"r2","o":"C"}]"#,
        )
        .unwrap();

        let triples = load_triples(&path).unwrap();
        assert_eq!(triples.len(), 2);
        assert_eq!(triples[1], Triple::new("B", "r2", "C"));
    }

    #[test]
    fn test_load_triples_missing_file() {
        let err = load_triples(Path::new("nonexistent.tsv")).unwrap_err();
        assert!(matches!(err, KgragError::Io(_)));
    }

    #[test]
    fn test_load_triples_malformed_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("triples.json");
        fs::write(&path, "{not valid").unwrap();

        let err = load_triples(&path).unwrap_err();
        assert!(matches!(err, KgragError::Parse(_)));
    }

    #[test]
    fn test_build_indexes_first_seen_order() {
        let triples = vec![
            Triple::new("A", "r1", "B"),
            Triple::new("B", "r2", "C"),
            Triple::new("A", "r1", "C"),
        ];
        let (concepts, relations) = build_indexes(&triples).unwrap();

        assert_eq!(concepts.id("A"), Some(0));
        assert_eq!(concepts.id("B"), Some(1));
        assert_eq!(concepts.id("C"), Some(2));
        assert_eq!(concepts.name(2), Some("C"));
        assert_eq!(relations.id("r1"), Some(0));
        assert_eq!(relations.id("r2"), Some(1));
    }

    #[test]
    fn test_build_indexes_empty() {
        let (concepts, relations) = build_indexes(&[]).unwrap();
        assert!(concepts.is_empty());
        assert!(relations.is_empty());
    }
}
