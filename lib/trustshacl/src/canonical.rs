//! JSON-LD to canonical N-Quads.
//!
//! The canonical form is the sorted, deduplicated list of N-Quads lines of the
//! document dataset, with blank nodes relabeled by [`Dataset::canonicalize`].
//! Two documents describing the same statements give the same text, whatever
//! their key order, array order or blank node labels.

use std::fmt;

use oxjsonld::JsonLdParser;
use oxrdf::Dataset;
use oxrdf::dataset::CanonicalizationAlgorithm;

use crate::context::ContextLoader;
use crate::error::CanonicalizationError;

/// Canonical N-Quads text, one statement per line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalQuads(String);

impl CanonicalQuads {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// The N-Quads lines, without their line terminator.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.0.lines()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CanonicalQuads {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalQuads {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Canonicalizes a serialized JSON-LD document.
///
/// This may block on HTTP if `contexts` allows remote loading.
///
/// ```
/// use trustshacl::{ContextLoader, canonicalize};
///
/// let document = br#"{
///     "@context": {"ex": "http://example.org/"},
///     "@id": "ex:alice",
///     "ex:name": "Alice"
/// }"#;
/// let quads = canonicalize(document, &ContextLoader::new())?;
/// assert_eq!(
///     quads.as_str(),
///     "<http://example.org/alice> <http://example.org/name> \"Alice\" .\n"
/// );
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
pub fn canonicalize(
    document: &[u8],
    contexts: &ContextLoader,
) -> Result<CanonicalQuads, CanonicalizationError> {
    let mut dataset = Dataset::new();
    for quad in JsonLdParser::new()
        .for_slice(document)
        .with_load_document_callback(contexts.callback())
    {
        dataset.insert(&quad?);
    }
    if dataset.is_empty() {
        return Err(CanonicalizationError::Empty);
    }
    Ok(canonicalize_dataset(dataset))
}

/// Canonicalizes an in-memory JSON document.
pub fn canonicalize_json(
    document: &serde_json::Value,
    contexts: &ContextLoader,
) -> Result<CanonicalQuads, CanonicalizationError> {
    canonicalize(&serde_json::to_vec(document)?, contexts)
}

/// Runs [`canonicalize`] on the blocking thread pool.
pub async fn canonicalize_in_background(
    document: Vec<u8>,
    contexts: ContextLoader,
) -> Result<CanonicalQuads, CanonicalizationError> {
    tokio::task::spawn_blocking(move || canonicalize(&document, &contexts)).await?
}

/// Serializes a dataset in canonical N-Quads.
pub fn canonicalize_dataset(mut dataset: Dataset) -> CanonicalQuads {
    dataset.canonicalize(CanonicalizationAlgorithm::Unstable);
    let mut lines = dataset
        .iter()
        .map(|quad| format!("{quad} ."))
        .collect::<Vec<_>>();
    lines.sort_unstable();
    lines.dedup();
    let mut text = String::with_capacity(lines.iter().map(|line| line.len() + 1).sum());
    for line in lines {
        text.push_str(&line);
        text.push('\n');
    }
    CanonicalQuads(text)
}

#[cfg(test)]
#[expect(clippy::panic_in_result_fn)]
mod tests {
    use super::*;
    use serde_json::json;

    fn person(name_first: bool, knows: [&str; 2]) -> serde_json::Value {
        let mut document = serde_json::Map::new();
        document.insert("@context".into(), json!({"ex": "http://example.org/"}));
        if name_first {
            document.insert("ex:name".into(), json!("Alice"));
            document.insert("@id".into(), json!("ex:alice"));
        } else {
            document.insert("@id".into(), json!("ex:alice"));
            document.insert("ex:name".into(), json!("Alice"));
        }
        document.insert(
            "ex:knows".into(),
            json!([{"ex:name": knows[0]}, {"ex:name": knows[1]}]),
        );
        serde_json::Value::Object(document)
    }

    #[test]
    fn test_key_and_array_order_do_not_matter() -> Result<(), CanonicalizationError> {
        let contexts = ContextLoader::new();
        let a = canonicalize_json(&person(true, ["Bob", "Carol"]), &contexts)?;
        let b = canonicalize_json(&person(false, ["Carol", "Bob"]), &contexts)?;
        assert_eq!(a, b);
        assert_eq!(a.lines().count(), 5);
        Ok(())
    }

    #[test]
    fn test_document_without_statements_is_rejected() {
        let result = canonicalize(
            br#"{"@context": {"ex": "http://example.org/"}}"#,
            &ContextLoader::new(),
        );
        assert!(matches!(result, Err(CanonicalizationError::Empty)));
    }

    #[test]
    fn test_unknown_context_is_a_syntax_error() {
        let result = canonicalize(
            br#"{"@context": "https://example.org/missing", "@id": "urn:a", "urn:p": "v"}"#,
            &ContextLoader::new(),
        );
        assert!(matches!(result, Err(CanonicalizationError::Syntax(_))));
    }

    #[test]
    fn test_malformed_json_is_a_syntax_error() {
        let result = canonicalize(b"{not json", &ContextLoader::new());
        assert!(matches!(result, Err(CanonicalizationError::Syntax(_))));
    }
}
