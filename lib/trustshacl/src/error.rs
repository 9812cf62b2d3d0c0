use std::io;

use oxjsonld::JsonLdSyntaxError;
use oxttl::TurtleSyntaxError;
use tokio::task::JoinError;

use crate::graph::GraphFormat;
use crate::shacl::ShaclParseError;

/// An error raised while turning a JSON-LD document into canonical N-Quads.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CanonicalizationError {
    /// The document is not valid JSON-LD, or one of its contexts could not be loaded.
    #[error(transparent)]
    Syntax(#[from] JsonLdSyntaxError),
    /// The document could not be serialized back to JSON.
    #[error("The document could not be serialized to JSON: {0}")]
    Serialization(#[from] serde_json::Error),
    /// The document does not produce any RDF statement.
    #[error("The document does not contain any RDF statement")]
    Empty,
    /// The background canonicalization task did not complete.
    #[error("The canonicalization task did not complete: {0}")]
    Interrupted(#[from] JoinError),
}

/// An error raised by the RDF parser of the graph store.
#[derive(Debug, thiserror::Error)]
#[error("Invalid {format} input: {source}")]
pub struct GraphParseError {
    format: GraphFormat,
    #[source]
    source: TurtleSyntaxError,
}

impl GraphParseError {
    pub(crate) fn new(format: GraphFormat, source: TurtleSyntaxError) -> Self {
        Self { format, source }
    }

    /// The format that failed to parse.
    pub fn format(&self) -> GraphFormat {
        self.format
    }
}

/// The parsed input contains no statement at all.
///
/// Validating against an empty graph would conform vacuously, so it is rejected instead.
#[derive(Debug, Clone, Copy, thiserror::Error)]
#[error("The graph is empty")]
pub struct EmptyGraphError;

/// An error raised while loading text into the graph store.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum GraphError {
    #[error(transparent)]
    Parse(#[from] GraphParseError),
    #[error(transparent)]
    Empty(#[from] EmptyGraphError),
}

/// The presentation uses a type the trust framework does not define.
#[derive(Debug, Clone, thiserror::Error)]
#[error("document contains a shape not defined in registry shapes")]
pub struct TrustFrameworkMismatchError {
    unregistered: Vec<String>,
}

impl TrustFrameworkMismatchError {
    pub(crate) fn new(unregistered: Vec<String>) -> Self {
        Self { unregistered }
    }

    /// The extracted types that are not in the implemented list.
    ///
    /// Empty when the document had no type at all.
    pub fn unregistered(&self) -> &[String] {
        &self.unregistered
    }
}

/// An error raised while fetching or preparing a shape from the registry.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ShapeLoadError {
    /// The type name cannot name a shape of the registry.
    #[error("{type_name:?} is not a valid type name for {url}")]
    InvalidTypeName { url: String, type_name: String },
    /// The registry could not be reached or answered with an error.
    #[error("Failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: io::Error,
    },
    /// The implemented type list is not a JSON array of strings.
    #[error("Invalid implemented type list returned by {url}: {source}")]
    InvalidImplementedList {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    /// A JSON-LD shape payload could not be canonicalized.
    #[error("Invalid JSON-LD shape returned by {url}: {source}")]
    Canonicalization {
        url: String,
        #[source]
        source: CanonicalizationError,
    },
    /// A shape payload could not be loaded into a graph.
    #[error("Invalid shape returned by {url}: {source}")]
    Graph {
        url: String,
        #[source]
        source: GraphError,
    },
    /// A shape graph does not describe valid SHACL shapes.
    #[error("Invalid SHACL shapes returned by {url}: {source}")]
    Shapes {
        url: String,
        #[source]
        source: ShaclParseError,
    },
}

impl ShapeLoadError {
    pub(crate) fn fetch(url: impl Into<String>, source: io::Error) -> Self {
        Self::Fetch {
            url: url.into(),
            source,
        }
    }

    /// The registry URL the failing payload came from.
    pub fn url(&self) -> &str {
        match self {
            Self::InvalidTypeName { url, .. }
            | Self::Fetch { url, .. }
            | Self::InvalidImplementedList { url, .. }
            | Self::Canonicalization { url, .. }
            | Self::Graph { url, .. }
            | Self::Shapes { url, .. } => url,
        }
    }

    /// Whether the registry itself failed, as opposed to one of its payloads.
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, Self::Fetch { .. } | Self::InvalidImplementedList { .. })
    }
}

/// An error that aborts a [`ShapeVerifier::verify_shape`](crate::ShapeVerifier::verify_shape) call.
///
/// Malformed input documents and shape payloads are not errors: they produce a
/// non-conforming [`ValidationResult`](crate::ValidationResult) instead.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum VerifyError {
    #[error(transparent)]
    TrustFrameworkMismatch(#[from] TrustFrameworkMismatchError),
    #[error(transparent)]
    ShapeLoad(#[from] ShapeLoadError),
}
