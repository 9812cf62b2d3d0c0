//! Error types raised while compiling shapes and validating data graphs.

use oxrdf::{NamedNode, Term};

/// Any failure of the SHACL engine.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ShaclError {
    /// The shapes graph could not be compiled.
    #[error(transparent)]
    Parse(#[from] ShaclParseError),
    /// The validation could not be completed.
    #[error(transparent)]
    Validation(#[from] ShaclValidationError),
}

/// A shapes graph that does not describe valid SHACL shapes.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ShaclParseError {
    /// A shape reference is not an IRI or a blank node.
    #[error("Invalid shape reference {shape}: {message}")]
    InvalidShape { shape: Term, message: String },

    /// A constraint parameter has a value of the wrong kind.
    #[error("Invalid value {actual} for {parameter} on shape {shape}: expected {expected}")]
    InvalidParameter {
        shape: Term,
        parameter: NamedNode,
        expected: &'static str,
        actual: Term,
    },

    /// A `sh:path` value is not a valid property path.
    #[error("Invalid property path on shape {shape}: {message}")]
    InvalidPropertyPath { shape: Term, message: String },

    /// An RDF list is cyclic or missing `rdf:first`/`rdf:rest`.
    #[error("Invalid RDF list on shape {shape}: {message}")]
    InvalidRdfList { shape: Term, message: String },

    /// A `sh:pattern` is not a valid regular expression.
    #[error("Invalid regex pattern '{pattern}': {message}")]
    InvalidRegex { pattern: String, message: String },
}

/// A validation that had to be aborted.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ShaclValidationError {
    /// Shapes reference each other deeper than the engine allows.
    #[error("Maximum recursion depth ({depth}) exceeded during validation")]
    MaxRecursionDepth { depth: usize },
}

impl ShaclParseError {
    pub(crate) fn invalid_shape(shape: impl Into<Term>, message: impl Into<String>) -> Self {
        Self::InvalidShape {
            shape: shape.into(),
            message: message.into(),
        }
    }

    pub(crate) fn invalid_parameter(
        shape: impl Into<Term>,
        parameter: impl Into<NamedNode>,
        expected: &'static str,
        actual: impl Into<Term>,
    ) -> Self {
        Self::InvalidParameter {
            shape: shape.into(),
            parameter: parameter.into(),
            expected,
            actual: actual.into(),
        }
    }

    pub(crate) fn invalid_property_path(
        shape: impl Into<Term>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidPropertyPath {
            shape: shape.into(),
            message: message.into(),
        }
    }

    pub(crate) fn invalid_rdf_list(shape: impl Into<Term>, message: impl Into<String>) -> Self {
        Self::InvalidRdfList {
            shape: shape.into(),
            message: message.into(),
        }
    }
}
