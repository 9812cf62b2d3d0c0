//! [Validation reports](https://www.w3.org/TR/shacl/#validation-report).

use std::fmt;

use oxrdf::vocab::{rdf, xsd};
use oxrdf::{BlankNode, Graph, Literal, NamedNode, NamedNodeRef, Term, Triple};

use super::model::ShapeId;
use super::path::PropertyPath;
use crate::vocab::sh;

/// Severity of a validation result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Severity {
    #[default]
    Violation,
    Warning,
    Info,
}

impl Severity {
    pub fn iri(self) -> NamedNodeRef<'static> {
        match self {
            Self::Violation => sh::VIOLATION,
            Self::Warning => sh::WARNING,
            Self::Info => sh::INFO,
        }
    }

    pub fn from_iri(iri: NamedNodeRef<'_>) -> Option<Self> {
        match iri {
            sh::VIOLATION => Some(Self::Violation),
            sh::WARNING => Some(Self::Warning),
            sh::INFO => Some(Self::Info),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Violation => "Violation",
            Self::Warning => "Warning",
            Self::Info => "Info",
        })
    }
}

/// One `sh:ValidationResult`.
///
/// `details` holds the results that made a nested shape fail, for `sh:node`,
/// `sh:and`, `sh:or` and `sh:xone`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub focus_node: Term,
    pub path: Option<PropertyPath>,
    pub value: Option<Term>,
    pub source_shape: ShapeId,
    pub component: NamedNode,
    pub message: Option<String>,
    pub severity: Severity,
    pub details: Vec<Violation>,
}

impl Violation {
    pub fn new(focus_node: Term, source_shape: ShapeId, component: impl Into<NamedNode>) -> Self {
        Self {
            focus_node,
            path: None,
            value: None,
            source_shape,
            component: component.into(),
            message: None,
            severity: Severity::Violation,
            details: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_path(mut self, path: Option<PropertyPath>) -> Self {
        self.path = path;
        self
    }

    #[must_use]
    pub fn with_value(mut self, value: Term) -> Self {
        self.value = Some(value);
        self
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    #[must_use]
    pub fn with_details(mut self, details: Vec<Violation>) -> Self {
        self.details = details;
        self
    }

    fn write_to(&self, graph: &mut Graph) -> BlankNode {
        let node = BlankNode::default();
        graph.insert(&Triple::new(node.clone(), rdf::TYPE, sh::VALIDATION_RESULT));
        graph.insert(&Triple::new(node.clone(), sh::FOCUS_NODE, self.focus_node.clone()));
        if let Some(path) = &self.path {
            let path = write_path(graph, path);
            graph.insert(&Triple::new(node.clone(), sh::RESULT_PATH, path));
        }
        if let Some(value) = &self.value {
            graph.insert(&Triple::new(node.clone(), sh::VALUE, value.clone()));
        }
        graph.insert(&Triple::new(node.clone(), sh::SOURCE_SHAPE, self.source_shape.to_term()));
        graph.insert(&Triple::new(
            node.clone(),
            sh::SOURCE_CONSTRAINT_COMPONENT,
            self.component.clone(),
        ));
        if let Some(message) = &self.message {
            graph.insert(&Triple::new(
                node.clone(),
                sh::RESULT_MESSAGE,
                Literal::new_simple_literal(message),
            ));
        }
        graph.insert(&Triple::new(node.clone(), sh::RESULT_SEVERITY, self.severity.iri()));
        for detail in &self.details {
            let detail = detail.write_to(graph);
            graph.insert(&Triple::new(node.clone(), sh::DETAIL, detail));
        }
        node
    }
}

/// The outcome of validating a data graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    results: Vec<Violation>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` unless a result has [`Severity::Violation`].
    pub fn conforms(&self) -> bool {
        !self
            .results
            .iter()
            .any(|r| r.severity == Severity::Violation)
    }

    /// Every result, warnings and infos included, in the order they were found.
    pub fn results(&self) -> &[Violation] {
        &self.results
    }

    /// Results with [`Severity::Violation`].
    pub fn violations(&self) -> impl Iterator<Item = &Violation> {
        self.results
            .iter()
            .filter(|r| r.severity == Severity::Violation)
    }

    pub fn push(&mut self, result: Violation) {
        self.results.push(result);
    }

    /// Serializes the report with the SHACL report vocabulary.
    pub fn to_graph(&self) -> Graph {
        let mut graph = Graph::new();
        let report = BlankNode::default();
        graph.insert(&Triple::new(report.clone(), rdf::TYPE, sh::VALIDATION_REPORT));
        graph.insert(&Triple::new(
            report.clone(),
            sh::CONFORMS,
            Literal::new_typed_literal(self.conforms().to_string(), xsd::BOOLEAN),
        ));
        for result in &self.results {
            let result = result.write_to(&mut graph);
            graph.insert(&Triple::new(report.clone(), sh::RESULT, result));
        }
        graph
    }
}

impl Extend<Violation> for ValidationReport {
    fn extend<T: IntoIterator<Item = Violation>>(&mut self, iter: T) {
        self.results.extend(iter);
    }
}

fn write_path(graph: &mut Graph, path: &PropertyPath) -> Term {
    let unary = match path {
        PropertyPath::Predicate(predicate) => return predicate.clone().into(),
        PropertyPath::Sequence(members) => return write_list(graph, members),
        PropertyPath::Alternative(members) => {
            let node = BlankNode::default();
            let list = write_list(graph, members);
            graph.insert(&Triple::new(node.clone(), sh::ALTERNATIVE_PATH, list));
            return node.into();
        }
        PropertyPath::Inverse(inner) => (sh::INVERSE_PATH, inner),
        PropertyPath::ZeroOrMore(inner) => (sh::ZERO_OR_MORE_PATH, inner),
        PropertyPath::OneOrMore(inner) => (sh::ONE_OR_MORE_PATH, inner),
        PropertyPath::ZeroOrOne(inner) => (sh::ZERO_OR_ONE_PATH, inner),
    };
    let (operator, inner) = unary;
    let node = BlankNode::default();
    let inner = write_path(graph, inner);
    graph.insert(&Triple::new(node.clone(), operator, inner));
    node.into()
}

fn write_list(graph: &mut Graph, members: &[PropertyPath]) -> Term {
    let mut head = Term::from(rdf::NIL.into_owned());
    for member in members.iter().rev() {
        let cell = BlankNode::default();
        let member = write_path(graph, member);
        graph.insert(&Triple::new(cell.clone(), rdf::FIRST, member));
        graph.insert(&Triple::new(cell.clone(), rdf::REST, head));
        head = cell.into();
    }
    head
}

#[cfg(test)]
mod tests {
    use super::*;

    fn violation(severity: Severity) -> Violation {
        Violation::new(
            NamedNode::new_unchecked("http://example.org/alice").into(),
            ShapeId::Named(NamedNode::new_unchecked("http://example.org/PersonShape")),
            sh::MIN_COUNT_CONSTRAINT_COMPONENT,
        )
        .with_path(Some(PropertyPath::predicate(NamedNode::new_unchecked(
            "http://example.org/name",
        ))))
        .with_severity(severity)
    }

    #[test]
    fn test_only_violations_break_conformance() {
        let mut report = ValidationReport::new();
        assert!(report.conforms());
        report.push(violation(Severity::Warning));
        assert!(report.conforms());
        report.push(violation(Severity::Violation));
        assert!(!report.conforms());
        assert_eq!(report.violations().count(), 1);
    }

    #[test]
    fn test_report_graph() {
        let mut report = ValidationReport::new();
        report.push(violation(Severity::Violation).with_details(vec![violation(Severity::Info)]));
        let graph = report.to_graph();
        assert_eq!(graph.triples_for_predicate(sh::RESULT).count(), 1);
        assert_eq!(graph.triples_for_predicate(sh::DETAIL).count(), 1);
        assert_eq!(
            graph
                .triples_for_predicate(sh::CONFORMS)
                .map(|t| t.object.to_string())
                .collect::<Vec<_>>(),
            vec!["\"false\"^^<http://www.w3.org/2001/XMLSchema#boolean>"]
        );
    }
}
