use serde::de::IgnoredAny;

use crate::graph::GraphFormat;

/// A shape document as served by the registry.
///
/// Registries serve shapes either as JSON-LD or as Turtle, without telling
/// which. [`classify`](Self::classify) decides by checking whether the text is
/// a JSON value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapePayload {
    JsonLd(String),
    Turtle(String),
}

impl ShapePayload {
    /// ```
    /// use trustshacl::ShapePayload;
    ///
    /// assert!(matches!(ShapePayload::classify(r#"{"@graph": []}"#), ShapePayload::JsonLd(_)));
    /// assert!(matches!(ShapePayload::classify("@prefix sh: <http://www.w3.org/ns/shacl#> ."), ShapePayload::Turtle(_)));
    /// ```
    pub fn classify(text: impl Into<String>) -> Self {
        let text = text.into();
        if serde_json::from_str::<IgnoredAny>(&text).is_ok() {
            Self::JsonLd(text)
        } else {
            Self::Turtle(text)
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::JsonLd(text) | Self::Turtle(text) => text,
        }
    }

    /// The syntax the graph store reads once the payload is prepared.
    ///
    /// JSON-LD payloads are canonicalized to N-Quads first.
    pub fn graph_format(&self) -> GraphFormat {
        match self {
            Self::JsonLd(_) => GraphFormat::NQuads,
            Self::Turtle(_) => GraphFormat::Turtle,
        }
    }
}
