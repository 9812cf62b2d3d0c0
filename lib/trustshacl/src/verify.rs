//! The verification pipeline.

use std::fmt;
use std::sync::Arc;

use oxrdf::Term;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::cache::ShapeCache;
use crate::canonical::canonicalize_in_background;
use crate::context::ContextLoader;
use crate::error::{ShapeLoadError, TrustFrameworkMismatchError, VerifyError};
use crate::graph::{self, GraphFormat};
use crate::registry::Registry;
use crate::shacl::{PropertyPath, Severity, ValidationReport, Violation};
use crate::shape::{ShapeGraph, ShapeLoader};
use crate::types::{TypeFilter, extract_types, is_member, unregistered_types};

const DEFAULT_MESSAGE: &str = "does not conform with the given shape";

/// The verdict of a verification.
///
/// Serializes as `{"conforms": bool, "results": [..]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub conforms: bool,
    /// One explanation per violation, in report order.
    pub results: Vec<String>,
}

impl ValidationResult {
    /// A non-conforming verdict explaining why validation could not run.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            conforms: false,
            results: vec![message.into()],
        }
    }
}

impl From<&ValidationReport> for ValidationResult {
    fn from(report: &ValidationReport) -> Self {
        Self {
            conforms: report.conforms(),
            results: report
                .results()
                .iter()
                .filter(|result| result.severity == Severity::Violation)
                .map(format_violation)
                .collect(),
        }
    }
}

/// Renders a violation the way [`ValidationResult::results`] lists it.
///
/// ```
/// use oxrdf::NamedNode;
/// use trustshacl::format_violation;
/// use trustshacl::shacl::{PropertyPath, ShapeId, Violation};
/// use trustshacl::vocab::sh;
///
/// let shape = ShapeId::Named(NamedNode::new("ex:shape")?);
/// let detail = Violation::new(NamedNode::new("ex:1")?.into(), shape.clone(), sh::DATATYPE_CONSTRAINT_COMPONENT)
///     .with_path(Some(PropertyPath::predicate(NamedNode::new("ex:age")?)))
///     .with_message("must be integer");
/// let violation = Violation::new(NamedNode::new("ex:1")?.into(), shape, sh::NODE_CONSTRAINT_COMPONENT)
///     .with_path(Some(PropertyPath::predicate(NamedNode::new("ex:name")?)))
///     .with_details(vec![detail]);
/// assert_eq!(
///     format_violation(&violation),
///     "ERROR: ex:1 ex:name: does not conform with the given shape; DETAILS: ex:age: must be integer;"
/// );
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
pub fn format_violation(violation: &Violation) -> String {
    let mut text = format!("ERROR: {}", TermValue(&violation.focus_node));
    if let Some(path) = &violation.path {
        write_path(&mut text, path);
    }
    text.push_str(": ");
    text.push_str(violation.message.as_deref().unwrap_or(DEFAULT_MESSAGE));
    for detail in &violation.details {
        text.push_str("; DETAILS:");
        if let Some(path) = &detail.path {
            write_path(&mut text, path);
            text.push(':');
        }
        text.push(' ');
        text.push_str(detail.message.as_deref().unwrap_or(DEFAULT_MESSAGE));
        text.push(';');
    }
    text
}

fn write_path(text: &mut String, path: &PropertyPath) {
    text.push(' ');
    match path.as_predicate() {
        Some(predicate) => text.push_str(predicate.as_str()),
        None => text.push_str(&path.to_string()),
    }
}

/// Prints the lexical value of a term: IRIs without brackets, literals without quotes.
struct TermValue<'a>(&'a Term);

impl fmt::Display for TermValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Term::NamedNode(node) => f.write_str(node.as_str()),
            Term::Literal(literal) => f.write_str(literal.value()),
            term => write!(f, "{term}"),
        }
    }
}

/// The trust framework a [`ShapeVerifier`] enforces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifierConfig {
    namespace: String,
    type_filter: TypeFilter,
}

impl VerifierConfig {
    /// `namespace` prefixes the registry type names, e.g. `https://example.org/tf#`.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            type_filter: TypeFilter::default(),
        }
    }

    #[must_use]
    pub fn with_type_filter(mut self, type_filter: TypeFilter) -> Self {
        self.type_filter = type_filter;
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn type_filter(&self) -> &TypeFilter {
        &self.type_filter
    }
}

/// Checks presentations against the shapes of a trust framework registry.
///
/// Shapes are loaded lazily and kept in a [`ShapeCache`] that may be shared
/// between verifiers.
pub struct ShapeVerifier<R> {
    registry: R,
    config: VerifierConfig,
    contexts: ContextLoader,
    cache: Arc<ShapeCache>,
}

impl<R: Registry> ShapeVerifier<R> {
    pub fn new(registry: R, config: VerifierConfig) -> Self {
        Self {
            registry,
            config,
            contexts: ContextLoader::new(),
            cache: Arc::default(),
        }
    }

    #[must_use]
    pub fn with_context_loader(mut self, contexts: ContextLoader) -> Self {
        self.contexts = contexts;
        self
    }

    #[must_use]
    pub fn with_cache(mut self, cache: Arc<ShapeCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<ShapeCache> {
        &self.cache
    }

    /// Validates `document` against the shape of `type_name`.
    ///
    /// The document types must all be implemented by the trust framework,
    /// otherwise [`VerifyError::TrustFrameworkMismatch`] is returned. A registry
    /// that cannot be reached gives [`VerifyError::ShapeLoad`]. Every other
    /// failure, including a malformed document or shape, is reported as a
    /// non-conforming [`ValidationResult`].
    pub async fn verify_shape(
        &self,
        document: &serde_json::Value,
        type_name: &str,
    ) -> Result<ValidationResult, VerifyError> {
        let document = match serde_json::to_vec(document) {
            Ok(document) => document,
            Err(e) => return Ok(absorb(type_name, e)),
        };
        let quads = match canonicalize_in_background(document, self.contexts.clone()).await {
            Ok(quads) => quads,
            Err(e) => return Ok(absorb(type_name, e)),
        };

        let extracted = extract_types(quads.as_str(), self.config.type_filter());
        let implemented = self.registry.implemented_types().await?;
        if !is_member(&extracted, &implemented, self.config.namespace()) {
            let unregistered =
                unregistered_types(&extracted, &implemented, self.config.namespace());
            warn!(type_name, ?extracted, ?unregistered, "document is not a trust framework member");
            return Err(TrustFrameworkMismatchError::new(unregistered).into());
        }

        let dataset = match graph::parse(quads.as_str(), GraphFormat::NQuads) {
            Ok(dataset) => dataset,
            Err(e) => return Ok(absorb(type_name, e)),
        };
        let shape = match self.get_shacl_shape(type_name).await {
            Ok(shape) => shape,
            Err(e) if e.is_infrastructure() => return Err(e.into()),
            Err(e) => return Ok(absorb(type_name, e)),
        };
        let data = graph::union_graph(&dataset);
        let report = match tokio::task::spawn_blocking(move || shape.validate(&data)).await {
            Ok(Ok(report)) => report,
            Ok(Err(e)) => return Ok(absorb(type_name, e)),
            Err(e) => return Ok(absorb(type_name, e)),
        };
        let result = ValidationResult::from(&report);
        info!(
            type_name,
            conforms = result.conforms,
            violations = result.results.len(),
            "document validated"
        );
        Ok(result)
    }

    /// The compiled shape of `type_name`, loaded from the registry on first use.
    pub async fn get_shacl_shape(
        &self,
        type_name: &str,
    ) -> Result<Arc<ShapeGraph>, ShapeLoadError> {
        self.cache
            .get_or_load(type_name, || async {
                let shape = ShapeLoader::new(&self.registry, &self.contexts)
                    .load(type_name)
                    .await?;
                info!(type_name, shapes = shape.shapes().len(), "shape loaded");
                Ok(shape)
            })
            .await
    }
}

fn absorb(type_name: &str, e: impl std::error::Error) -> ValidationResult {
    error!(type_name, error = %e, "validation could not run");
    ValidationResult::failure(e.to_string())
}
