//! Type extraction and trust-framework membership.

use oxrdf::vocab::rdf;
use rustc_hash::FxHashSet;

use crate::vocab::{cred, sec};

/// Types that never need a registry shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeFilter {
    excluded: Vec<String>,
}

impl TypeFilter {
    /// A filter excluding nothing.
    pub fn empty() -> Self {
        Self {
            excluded: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_excluded(mut self, iri: impl Into<String>) -> Self {
        self.excluded.push(iri.into());
        self
    }

    pub fn is_excluded(&self, iri: &str) -> bool {
        self.excluded.iter().any(|excluded| excluded == iri)
    }
}

impl Default for TypeFilter {
    /// Excludes the presentation and credential envelopes and the JWS 2020 proof type.
    fn default() -> Self {
        Self::empty()
            .with_excluded(cred::VERIFIABLE_PRESENTATION.as_str())
            .with_excluded(cred::VERIFIABLE_CREDENTIAL.as_str())
            .with_excluded(sec::JSON_WEB_SIGNATURE_2020.as_str())
    }
}

/// Collects the objects of the `rdf:type` statements of canonical N-Quads text.
///
/// IRIs are returned without their angle brackets. Other objects are returned
/// as written, so they never match a trust framework type. Excluded types are
/// skipped. Order follows the input and duplicates are kept.
///
/// ```
/// use trustshacl::{TypeFilter, extract_types};
///
/// let quads = "<urn:a> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <https://example.org/tf#Member> .\n\
///              <urn:a> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <https://www.w3.org/2018/credentials#VerifiableCredential> _:g .\n";
/// assert_eq!(extract_types(quads, &TypeFilter::default()), ["https://example.org/tf#Member"]);
/// ```
pub fn extract_types(quads: &str, filter: &TypeFilter) -> Vec<String> {
    let predicate = rdf::TYPE.to_string();
    let mut types = Vec::new();
    for line in quads.lines() {
        let Some(rest) = skip_term(line.trim_start()) else {
            continue;
        };
        let Some(object) = rest.trim_start().strip_prefix(predicate.as_str()) else {
            continue;
        };
        let object = object.trim_start();
        let Some(after_object) = skip_term(object) else {
            continue;
        };
        let object = &object[..object.len() - after_object.len()];
        let object = object
            .strip_prefix('<')
            .and_then(|iri| iri.strip_suffix('>'))
            .unwrap_or(object);
        if !filter.is_excluded(object) {
            types.push(object.to_owned());
        }
    }
    types
}

/// Returns what follows the N-Quads term at the start of `text`.
fn skip_term(text: &str) -> Option<&str> {
    if text.starts_with('<') {
        return text.find('>').map(|end| &text[end + 1..]);
    }
    if let Some(literal) = text.strip_prefix('"') {
        let mut escaped = false;
        for (i, c) in literal.char_indices() {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => {
                    // Skip the language tag or datatype, if any.
                    let tail = &literal[i + 1..];
                    return Some(if let Some(datatype) = tail.strip_prefix("^^") {
                        skip_term(datatype)?
                    } else if tail.starts_with('@') {
                        tail.find(char::is_whitespace).map_or("", |end| &tail[end..])
                    } else {
                        tail
                    });
                }
                _ => (),
            }
        }
        return None;
    }
    let end = text.find(char::is_whitespace).unwrap_or(text.len());
    (end > 0).then(|| &text[end..])
}

/// Expands a short type name in the trust framework namespace.
pub fn qualify(namespace: &str, type_name: &str) -> String {
    format!("{namespace}{type_name}")
}

/// The extracted types that are not implemented by the trust framework.
///
/// Each type is listed once, in order of first appearance.
pub fn unregistered_types<S: AsRef<str>>(
    extracted: &[String],
    implemented: &[S],
    namespace: &str,
) -> Vec<String> {
    let registered = implemented
        .iter()
        .map(|name| qualify(namespace, name.as_ref()))
        .collect::<FxHashSet<_>>();
    let mut seen = FxHashSet::default();
    extracted
        .iter()
        .filter(|extracted| !registered.contains(*extracted) && seen.insert(*extracted))
        .cloned()
        .collect()
}

/// Whether a document is a trust framework member.
///
/// All extracted types must be implemented, and at least one must exist: a
/// document without any type is not a member.
///
/// ```
/// use trustshacl::is_member;
///
/// let ns = "https://example.org/tf#";
/// let member = vec![format!("{ns}Member")];
/// assert!(is_member(&member, &["Member"], ns));
/// assert!(!is_member(&[], &["Member"], ns));
/// ```
pub fn is_member<S: AsRef<str>>(
    extracted: &[String],
    implemented: &[S],
    namespace: &str,
) -> bool {
    !extracted.is_empty() && unregistered_types(extracted, implemented, namespace).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NS: &str = "https://example.org/tf#";
    const TYPE: &str = "<http://www.w3.org/1999/02/22-rdf-syntax-ns#type>";

    #[test]
    fn test_extracts_types_from_every_graph() {
        let quads = format!(
            "<urn:a> {TYPE} <{NS}LegalPerson> .\n\
             _:b0 {TYPE} <{NS}ServiceOffering> _:c14n0 .\n\
             <urn:a> <{NS}name> \"a {TYPE} b\" .\n"
        );
        assert_eq!(
            extract_types(&quads, &TypeFilter::default()),
            [format!("{NS}LegalPerson"), format!("{NS}ServiceOffering")]
        );
    }

    #[test]
    fn test_non_iri_types_fail_closed() {
        let quads = format!("<urn:a> {TYPE} \"Member\"@en .\n<urn:a> {TYPE} _:b1 .\n");
        let types = extract_types(&quads, &TypeFilter::default());
        assert_eq!(types, ["\"Member\"@en", "_:b1"]);
        assert!(!is_member(&types, &["Member"], NS));
    }

    #[test]
    fn test_membership_is_all_or_nothing() {
        let types = vec![format!("{NS}LegalPerson"), format!("{NS}Unknown")];
        assert!(!is_member(&types, &["LegalPerson"], NS));
        assert_eq!(
            unregistered_types(&types, &["LegalPerson"], NS),
            [format!("{NS}Unknown")]
        );
        assert!(is_member(&types, &["LegalPerson", "Unknown"], NS));
    }

    #[test]
    fn test_unregistered_types_are_listed_once() {
        let types = vec![
            format!("{NS}Unknown"),
            format!("{NS}LegalPerson"),
            format!("{NS}Other"),
            format!("{NS}Unknown"),
        ];
        assert_eq!(
            unregistered_types(&types, &["LegalPerson"], NS),
            [format!("{NS}Unknown"), format!("{NS}Other")]
        );
    }

    #[test]
    fn test_namespace_must_match_exactly() {
        let types = vec!["https://other.example/tf#LegalPerson".to_owned()];
        assert!(!is_member(&types, &["LegalPerson"], NS));
    }

    #[test]
    fn test_filter_can_be_emptied() {
        let quads = format!(
            "<urn:a> {TYPE} <https://www.w3.org/2018/credentials#VerifiablePresentation> .\n"
        );
        assert!(extract_types(&quads, &TypeFilter::default()).is_empty());
        assert_eq!(extract_types(&quads, &TypeFilter::empty()).len(), 1);
    }
}
