//! Shapes compiled out of a shapes graph.
//!
//! Shapes refer to each other by [`ShapeId`] only, so recursive shapes compile
//! without special handling. Recursion is bounded at validation time.

use std::fmt;

use oxrdf::vocab::{rdf, rdfs};
use oxrdf::{BlankNode, Graph, NamedNode, NamedNodeRef, NamedOrBlankNodeRef, Term, TermRef};
use rustc_hash::{FxHashMap, FxHashSet};

use super::constraint::Constraint;
use super::error::ShaclParseError;
use super::path::PropertyPath;
use super::report::Severity;
use crate::vocab::sh;

/// The node a shape is declared on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ShapeId {
    Named(NamedNode),
    Blank(BlankNode),
}

impl ShapeId {
    pub fn as_ref(&self) -> NamedOrBlankNodeRef<'_> {
        match self {
            Self::Named(node) => node.as_ref().into(),
            Self::Blank(node) => node.as_ref().into(),
        }
    }

    pub fn to_term(&self) -> Term {
        match self {
            Self::Named(node) => node.clone().into(),
            Self::Blank(node) => node.clone().into(),
        }
    }
}

impl From<NamedOrBlankNodeRef<'_>> for ShapeId {
    fn from(node: NamedOrBlankNodeRef<'_>) -> Self {
        match node {
            NamedOrBlankNodeRef::NamedNode(node) => Self::Named(node.into_owned()),
            NamedOrBlankNodeRef::BlankNode(node) => Self::Blank(node.into_owned()),
        }
    }
}

impl TryFrom<TermRef<'_>> for ShapeId {
    type Error = ShaclParseError;

    fn try_from(term: TermRef<'_>) -> Result<Self, Self::Error> {
        as_subject(term).map(Self::from).ok_or_else(|| {
            ShaclParseError::invalid_shape(term.into_owned(), "shapes must be IRIs or blank nodes")
        })
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(node) => write!(f, "{node}"),
            Self::Blank(node) => write!(f, "{node}"),
        }
    }
}

/// How a shape selects its focus nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Instances of the class or of any of its subclasses.
    ///
    /// Also used for shapes that are themselves an `rdfs:Class`.
    Class(NamedNode),
    Node(Term),
    SubjectsOf(NamedNode),
    ObjectsOf(NamedNode),
}

impl Target {
    fn collect(&self, data: &Graph, nodes: &mut Vec<Term>) {
        match self {
            Self::Class(class) => nodes.extend(instances_of(data, class.as_ref())),
            Self::Node(node) => nodes.push(node.clone()),
            Self::SubjectsOf(predicate) => nodes.extend(
                data.triples_for_predicate(predicate)
                    .map(|t| Term::from(t.subject.into_owned())),
            ),
            Self::ObjectsOf(predicate) => nodes.extend(
                data.triples_for_predicate(predicate)
                    .map(|t| t.object.into_owned()),
            ),
        }
    }
}

/// A node or property shape.
///
/// Property shapes are the ones with a [`path`](Self::path).
#[derive(Debug, Clone)]
pub struct Shape {
    pub id: ShapeId,
    pub path: Option<PropertyPath>,
    pub targets: Vec<Target>,
    pub constraints: Vec<Constraint>,
    pub severity: Severity,
    pub deactivated: bool,
    pub message: Option<String>,
}

impl Shape {
    fn parse(graph: &Graph, id: &ShapeId) -> Result<Self, ShaclParseError> {
        let node = id.as_ref();
        let term = id.to_term();

        let mut paths = graph.objects_for_subject_predicate(node, sh::PATH);
        let path = paths
            .next()
            .map(|path| PropertyPath::parse(graph, path, &term))
            .transpose()?;
        if paths.next().is_some() {
            return Err(ShaclParseError::invalid_property_path(
                term,
                "a shape has at most one sh:path",
            ));
        }

        let mut targets = Vec::new();
        for class in graph.objects_for_subject_predicate(node, sh::TARGET_CLASS) {
            targets.push(Target::Class(expect_iri(class, &term, sh::TARGET_CLASS)?));
        }
        for focus in graph.objects_for_subject_predicate(node, sh::TARGET_NODE) {
            targets.push(Target::Node(focus.into_owned()));
        }
        for predicate in graph.objects_for_subject_predicate(node, sh::TARGET_SUBJECTS_OF) {
            targets.push(Target::SubjectsOf(expect_iri(
                predicate,
                &term,
                sh::TARGET_SUBJECTS_OF,
            )?));
        }
        for predicate in graph.objects_for_subject_predicate(node, sh::TARGET_OBJECTS_OF) {
            targets.push(Target::ObjectsOf(expect_iri(
                predicate,
                &term,
                sh::TARGET_OBJECTS_OF,
            )?));
        }
        if let ShapeId::Named(iri) = id {
            if has_type(graph, node, rdfs::CLASS) {
                targets.push(Target::Class(iri.clone()));
            }
        }

        let severity = match object(graph, node, sh::SEVERITY) {
            None => Severity::Violation,
            Some(TermRef::NamedNode(iri)) => Severity::from_iri(iri).ok_or_else(|| {
                ShaclParseError::invalid_parameter(
                    term.clone(),
                    sh::SEVERITY,
                    "a severity",
                    iri.into_owned(),
                )
            })?,
            Some(other) => {
                return Err(ShaclParseError::invalid_parameter(
                    term,
                    sh::SEVERITY,
                    "a severity",
                    other.into_owned(),
                ));
            }
        };
        let deactivated = matches!(
            object(graph, node, sh::DEACTIVATED),
            Some(TermRef::Literal(value)) if value.value() == "true" || value.value() == "1"
        );
        let message = graph
            .objects_for_subject_predicate(node, sh::MESSAGE)
            .filter_map(|message| match message {
                TermRef::Literal(message) => Some(message),
                _ => None,
            })
            .min_by_key(|message| !matches!(message.language(), None | Some("en")))
            .map(|message| message.value().to_owned());

        Ok(Self {
            id: id.clone(),
            path,
            targets,
            constraints: Constraint::parse_all(graph, node)?,
            severity,
            deactivated,
            message,
        })
    }

    /// Nodes selected by the shape targets, without duplicates and in a stable order.
    pub fn focus_nodes(&self, data: &Graph) -> Vec<Term> {
        let mut nodes = Vec::new();
        for target in &self.targets {
            target.collect(data, &mut nodes);
        }
        nodes.sort_by_cached_key(ToString::to_string);
        nodes.dedup();
        nodes
    }

    pub fn is_property_shape(&self) -> bool {
        self.path.is_some()
    }
}

/// Every shape defined in a shapes graph, indexed by id.
#[derive(Debug, Clone, Default)]
pub struct ShapesGraph {
    shapes: FxHashMap<ShapeId, Shape>,
    order: Vec<ShapeId>,
}

impl ShapesGraph {
    /// Compiles the shapes of `graph`.
    ///
    /// Shapes are the instances of `sh:NodeShape` and `sh:PropertyShape`, the
    /// subjects of target and `sh:path` triples, and every shape those reference.
    pub fn from_graph(graph: &Graph) -> Result<Self, ShaclParseError> {
        let mut pending = Vec::new();
        for class in [sh::NODE_SHAPE, sh::PROPERTY_SHAPE, sh::SHAPE] {
            pending.extend(
                graph
                    .subjects_for_predicate_object(rdf::TYPE, class)
                    .map(ShapeId::from),
            );
        }
        for predicate in [
            sh::TARGET_CLASS,
            sh::TARGET_NODE,
            sh::TARGET_SUBJECTS_OF,
            sh::TARGET_OBJECTS_OF,
            sh::PATH,
        ] {
            pending.extend(
                graph
                    .triples_for_predicate(predicate)
                    .map(|t| ShapeId::from(t.subject)),
            );
        }
        pending.sort_by_cached_key(|id| std::cmp::Reverse(id.to_string()));

        let mut shapes = Self::default();
        while let Some(id) = pending.pop() {
            if shapes.shapes.contains_key(&id) {
                continue;
            }
            let shape = Shape::parse(graph, &id)?;
            for constraint in &shape.constraints {
                pending.extend(constraint.referenced_shapes().iter().rev().cloned());
            }
            shapes.order.push(id.clone());
            shapes.shapes.insert(id, shape);
        }
        Ok(shapes)
    }

    pub fn get(&self, id: &ShapeId) -> Option<&Shape> {
        self.shapes.get(id)
    }

    /// All shapes, in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.order.iter().filter_map(|id| self.shapes.get(id))
    }

    /// The shapes validation starts from.
    pub fn targeted(&self) -> impl Iterator<Item = &Shape> {
        self.iter().filter(|shape| !shape.targets.is_empty())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

pub(super) fn as_subject(term: TermRef<'_>) -> Option<NamedOrBlankNodeRef<'_>> {
    match term {
        TermRef::NamedNode(node) => Some(node.into()),
        TermRef::BlankNode(node) => Some(node.into()),
        _ => None,
    }
}

pub(super) fn object<'a, 'b>(
    graph: &'a Graph,
    subject: impl Into<NamedOrBlankNodeRef<'b>>,
    predicate: NamedNodeRef<'b>,
) -> Option<TermRef<'a>> {
    graph.object_for_subject_predicate(subject, predicate)
}

/// Members of the RDF list starting at `head`.
pub(super) fn read_list<'a>(
    graph: &'a Graph,
    head: TermRef<'a>,
    shape: &Term,
) -> Result<Vec<TermRef<'a>>, ShaclParseError> {
    let mut members = Vec::new();
    let mut visited = FxHashSet::default();
    let mut current = head;
    while current != TermRef::from(rdf::NIL) {
        let node = as_subject(current).ok_or_else(|| {
            ShaclParseError::invalid_rdf_list(
                shape.clone(),
                format!("{current} is not a list node"),
            )
        })?;
        if !visited.insert(node) {
            return Err(ShaclParseError::invalid_rdf_list(shape.clone(), "the list is cyclic"));
        }
        members.push(object(graph, node, rdf::FIRST).ok_or_else(|| {
            ShaclParseError::invalid_rdf_list(shape.clone(), format!("{node} has no rdf:first"))
        })?);
        current = object(graph, node, rdf::REST).ok_or_else(|| {
            ShaclParseError::invalid_rdf_list(shape.clone(), format!("{node} has no rdf:rest"))
        })?;
    }
    Ok(members)
}

/// Whether `term` is an instance of `class` or of one of its subclasses.
pub(super) fn is_instance_of(graph: &Graph, term: &Term, class: NamedNodeRef<'_>) -> bool {
    let Some(node) = as_subject(term.as_ref()) else {
        return false;
    };
    let mut pending: Vec<TermRef<'_>> = graph
        .objects_for_subject_predicate(node, rdf::TYPE)
        .collect();
    let mut visited = FxHashSet::default();
    while let Some(current) = pending.pop() {
        if current == TermRef::from(class) {
            return true;
        }
        if visited.insert(current) {
            if let Some(current) = as_subject(current) {
                pending.extend(graph.objects_for_subject_predicate(current, rdfs::SUB_CLASS_OF));
            }
        }
    }
    false
}

fn instances_of(graph: &Graph, class: NamedNodeRef<'_>) -> Vec<Term> {
    let mut classes = vec![TermRef::from(class)];
    let mut visited = FxHashSet::default();
    let mut instances = Vec::new();
    while let Some(current) = classes.pop() {
        if !visited.insert(current) {
            continue;
        }
        instances.extend(
            graph
                .subjects_for_predicate_object(rdf::TYPE, current)
                .map(|s| Term::from(s.into_owned())),
        );
        classes.extend(
            graph
                .subjects_for_predicate_object(rdfs::SUB_CLASS_OF, current)
                .map(TermRef::from),
        );
    }
    instances
}

fn has_type(graph: &Graph, node: NamedOrBlankNodeRef<'_>, class: NamedNodeRef<'_>) -> bool {
    graph
        .objects_for_subject_predicate(node, rdf::TYPE)
        .any(|t| t == TermRef::from(class))
}

fn expect_iri(
    term: TermRef<'_>,
    shape: &Term,
    parameter: NamedNodeRef<'_>,
) -> Result<NamedNode, ShaclParseError> {
    match term {
        TermRef::NamedNode(iri) => Ok(iri.into_owned()),
        other => Err(ShaclParseError::invalid_parameter(
            shape.clone(),
            parameter,
            "an IRI",
            other.into_owned(),
        )),
    }
}

#[cfg(test)]
#[expect(clippy::panic_in_result_fn)]
mod tests {
    use super::*;

    fn graph(turtle: &str) -> Result<Graph, oxttl::TurtleSyntaxError> {
        let mut graph = Graph::new();
        for triple in oxttl::TurtleParser::new().for_slice(turtle.as_bytes()) {
            graph.insert(&triple?);
        }
        Ok(graph)
    }

    const PREFIXES: &str = "@prefix sh: <http://www.w3.org/ns/shacl#> .\n\
        @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .\n\
        @prefix ex: <http://example.org/> .\n";

    #[test]
    fn test_referenced_shapes_are_compiled() -> Result<(), Box<dyn std::error::Error>> {
        let shapes = ShapesGraph::from_graph(&graph(&format!(
            "{PREFIXES}
            ex:Person a sh:NodeShape ; sh:targetClass ex:Person ;
                sh:property [ sh:path ex:address ; sh:node ex:Address ] .
            ex:Address sh:property [ sh:path ex:city ; sh:minCount 1 ] ."
        ))?)?;
        assert_eq!(shapes.len(), 4);
        assert_eq!(shapes.targeted().count(), 1);
        Ok(())
    }

    #[test]
    fn test_implicit_class_target() -> Result<(), Box<dyn std::error::Error>> {
        let shapes = ShapesGraph::from_graph(&graph(&format!(
            "{PREFIXES} ex:Person a rdfs:Class, sh:NodeShape ; sh:closed true ."
        ))?)?;
        let shape = shapes
            .get(&ShapeId::Named(NamedNode::new("http://example.org/Person")?))
            .ok_or("missing shape")?;
        assert_eq!(
            shape.targets,
            vec![Target::Class(NamedNode::new("http://example.org/Person")?)]
        );
        Ok(())
    }

    #[test]
    fn test_class_target_follows_subclasses() -> Result<(), Box<dyn std::error::Error>> {
        let data = graph(&format!(
            "{PREFIXES} ex:Student rdfs:subClassOf ex:Person . ex:bob a ex:Student . ex:alice a ex:Person ."
        ))?;
        let mut nodes = Vec::new();
        Target::Class(NamedNode::new("http://example.org/Person")?).collect(&data, &mut nodes);
        nodes.sort_by_cached_key(ToString::to_string);
        assert_eq!(
            nodes,
            vec![
                Term::from(NamedNode::new("http://example.org/alice")?),
                Term::from(NamedNode::new("http://example.org/bob")?),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_cyclic_list_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
        let data = graph(&format!(
            "{PREFIXES}
            @prefix rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .
            ex:shape a sh:NodeShape ; sh:in _:l . _:l rdf:first 1 ; rdf:rest _:l ."
        ))?;
        assert!(ShapesGraph::from_graph(&data).is_err());
        Ok(())
    }
}
