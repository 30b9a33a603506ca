//! Candidate triple extraction: thin adapter around a third-party
//! chat-completion API.
//!
//! Contract: free-text prompt in; either a JSON-serialized list of
//! `{s,p,o}` objects or the literal string `"None"` out. The adapter never
//! raises across this boundary — internal failures degrade to `"None"`.

pub mod openai;

pub use openai::TripleExtractor;

use crate::error::{KgragError, Result};
use crate::graph::Triple;

/// Sentinel output when no structured triples were produced.
pub const NO_EXTRACTION: &str = "None";

/// Parse the extraction adapter's output into triples.
///
/// `"None"` means no triples and maps to an empty list. Anything else must
/// be a JSON array of `{s,p,o}` objects, or parsing fails with `Parse`.
pub fn parse_extraction_output(output: &str) -> Result<Vec<Triple>> {
    if output == NO_EXTRACTION {
        return Ok(Vec::new());
    }
    serde_json::from_str(output)
        .map_err(|e| KgragError::Parse(format!("Extraction output parse error: {}", e)))
}
