//! Turning registry payloads into compiled shapes.

use oxrdf::{Dataset, Graph};
use tracing::debug;

use crate::canonical::{canonicalize_dataset, canonicalize_in_background};
use crate::context::ContextLoader;
use crate::error::ShapeLoadError;
use crate::graph::{self, GraphFormat};
use crate::payload::ShapePayload;
use crate::registry::Registry;
use crate::shacl::{ShaclError, ShaclParseError, ShaclValidator, ShapesGraph, ValidationReport};

/// The SHACL shapes of one trust framework type.
#[derive(Debug)]
pub struct ShapeGraph {
    type_name: String,
    dataset: Dataset,
    shapes: ShapesGraph,
}

impl ShapeGraph {
    pub fn new(type_name: impl Into<String>, dataset: Dataset, shapes: ShapesGraph) -> Self {
        Self {
            type_name: type_name.into(),
            dataset,
            shapes,
        }
    }

    /// Builds the shapes of `type_name` from already parsed shape statements.
    pub fn from_dataset(
        type_name: impl Into<String>,
        dataset: Dataset,
    ) -> Result<Self, ShaclParseError> {
        let shapes = ShapesGraph::from_graph(&graph::union_graph(&dataset))?;
        Ok(Self::new(type_name, dataset, shapes))
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The shape statements as loaded.
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn shapes(&self) -> &ShapesGraph {
        &self.shapes
    }

    /// The shape statements in canonical N-Quads.
    pub fn to_canonical_nquads(&self) -> String {
        canonicalize_dataset(self.dataset.clone()).into_string()
    }

    /// Validates `data` against these shapes.
    pub fn validate(&self, data: &Graph) -> Result<ValidationReport, ShaclError> {
        ShaclValidator::new(&self.shapes).validate(data)
    }
}

/// Fetches and compiles shapes from a registry.
pub struct ShapeLoader<'a, R> {
    registry: &'a R,
    contexts: &'a ContextLoader,
}

impl<'a, R: Registry> ShapeLoader<'a, R> {
    pub fn new(registry: &'a R, contexts: &'a ContextLoader) -> Self {
        Self { registry, contexts }
    }

    /// Fetches the shape of `type_name` and compiles it.
    ///
    /// JSON-LD payloads are canonicalized to N-Quads before parsing, Turtle
    /// payloads are parsed as is.
    pub async fn load(&self, type_name: &str) -> Result<ShapeGraph, ShapeLoadError> {
        let url = self.registry.shape_location(type_name);
        let payload = ShapePayload::classify(self.registry.fetch_shape(type_name).await?);
        debug!(type_name, url, format = %payload.graph_format(), "preparing shape");
        let dataset = match &payload {
            ShapePayload::JsonLd(document) => {
                let quads =
                    canonicalize_in_background(document.as_bytes().to_vec(), self.contexts.clone())
                        .await
                        .map_err(|source| ShapeLoadError::Canonicalization {
                            url: url.clone(),
                            source,
                        })?;
                graph::parse(quads.as_str(), GraphFormat::NQuads)
            }
            ShapePayload::Turtle(document) => graph::parse(document, GraphFormat::Turtle),
        }
        .map_err(|source| ShapeLoadError::Graph {
            url: url.clone(),
            source,
        })?;
        ShapeGraph::from_dataset(type_name, dataset)
            .map_err(|source| ShapeLoadError::Shapes { url, source })
    }
}

#[cfg(test)]
#[expect(clippy::panic_in_result_fn)]
mod tests {
    use super::*;
    use crate::registry::StaticRegistry;

    const TURTLE_SHAPE: &str = r#"
        @prefix sh: <http://www.w3.org/ns/shacl#> .
        @prefix tf: <https://example.org/tf#> .
        tf:MemberShape a sh:NodeShape ;
            sh:targetClass tf:Member ;
            sh:property [ sh:path tf:name ; sh:minCount 1 ] .
    "#;

    const JSON_LD_SHAPE: &str = r#"{
        "@context": {
            "sh": "http://www.w3.org/ns/shacl#",
            "tf": "https://example.org/tf#",
            "sh:targetClass": {"@type": "@id"},
            "sh:path": {"@type": "@id"}
        },
        "@id": "tf:MemberShape",
        "@type": "sh:NodeShape",
        "sh:targetClass": "tf:Member",
        "sh:property": {"sh:path": "tf:name", "sh:minCount": 1}
    }"#;

    #[tokio::test]
    async fn test_turtle_and_json_ld_shapes_compile_alike() -> Result<(), ShapeLoadError> {
        let registry = StaticRegistry::new(["Turtle", "JsonLd"])
            .with_shape("Turtle", TURTLE_SHAPE)
            .with_shape("JsonLd", JSON_LD_SHAPE);
        let contexts = ContextLoader::new();
        let loader = ShapeLoader::new(&registry, &contexts);
        let turtle = loader.load("Turtle").await?;
        let json_ld = loader.load("JsonLd").await?;
        assert_eq!(turtle.type_name(), "Turtle");
        assert_eq!(turtle.shapes().len(), 2);
        assert_eq!(json_ld.shapes().len(), 2);
        assert_eq!(turtle.to_canonical_nquads(), json_ld.to_canonical_nquads());
        Ok(())
    }

    #[tokio::test]
    async fn test_load_errors_carry_the_location() {
        let registry = StaticRegistry::new(["Broken", "Empty", "BadRegex"])
            .with_shape("Broken", "@prefix sh: <http://www.w3.org/ns/shacl#> . sh:a sh:b")
            .with_shape("Empty", "   ")
            .with_shape(
                "BadRegex",
                r#"@prefix sh: <http://www.w3.org/ns/shacl#> .
                   <urn:s> a sh:NodeShape ; sh:targetNode <urn:x> ; sh:pattern "(" ."#,
            );
        let contexts = ContextLoader::new();
        let loader = ShapeLoader::new(&registry, &contexts);
        let Err(broken) = loader.load("Broken").await else {
            panic!("truncated Turtle must not load");
        };
        assert!(matches!(broken, ShapeLoadError::Graph { .. }));
        assert_eq!(broken.url(), "static:shapes/Broken");
        assert!(!broken.is_infrastructure());
        assert!(matches!(
            loader.load("Empty").await,
            Err(ShapeLoadError::Graph { .. })
        ));
        assert!(matches!(
            loader.load("BadRegex").await,
            Err(ShapeLoadError::Shapes { .. })
        ));
        assert!(matches!(
            loader.load("Missing").await,
            Err(ShapeLoadError::Fetch { .. })
        ));
    }
}
