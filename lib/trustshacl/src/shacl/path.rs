//! [SHACL property paths](https://www.w3.org/TR/shacl/#property-paths).

use std::fmt;

use oxrdf::{Graph, NamedNode, Term, TermRef};
use rustc_hash::FxHashSet;

use super::error::ShaclParseError;
use super::model::{as_subject, object, read_list};
use crate::vocab::sh;

/// A property path, as found behind `sh:path`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyPath {
    Predicate(NamedNode),
    Sequence(Vec<PropertyPath>),
    Alternative(Vec<PropertyPath>),
    Inverse(Box<PropertyPath>),
    ZeroOrMore(Box<PropertyPath>),
    OneOrMore(Box<PropertyPath>),
    ZeroOrOne(Box<PropertyPath>),
}

impl PropertyPath {
    pub fn predicate(predicate: impl Into<NamedNode>) -> Self {
        Self::Predicate(predicate.into())
    }

    /// Reads the path rooted at `term` in a shapes graph.
    ///
    /// `shape` is only used to report errors.
    pub fn parse(graph: &Graph, term: TermRef<'_>, shape: &Term) -> Result<Self, ShaclParseError> {
        let node = match term {
            TermRef::NamedNode(node) => return Ok(Self::Predicate(node.into_owned())),
            TermRef::BlankNode(node) => node,
            _ => {
                return Err(ShaclParseError::invalid_property_path(
                    shape.clone(),
                    format!("{term} is not an IRI or a blank node"),
                ));
            }
        };
        let unary = [
            (sh::INVERSE_PATH, Self::Inverse as fn(Box<Self>) -> Self),
            (sh::ZERO_OR_MORE_PATH, Self::ZeroOrMore),
            (sh::ONE_OR_MORE_PATH, Self::OneOrMore),
            (sh::ZERO_OR_ONE_PATH, Self::ZeroOrOne),
        ];
        for (operator, build) in unary {
            if let Some(inner) = object(graph, node, operator) {
                return Ok(build(Box::new(Self::parse(graph, inner, shape)?)));
            }
        }
        if let Some(list) = object(graph, node, sh::ALTERNATIVE_PATH) {
            let members = Self::parse_list(graph, list, shape)?;
            if members.len() < 2 {
                return Err(ShaclParseError::invalid_property_path(
                    shape.clone(),
                    "sh:alternativePath needs at least two members",
                ));
            }
            return Ok(Self::Alternative(members));
        }
        let members = Self::parse_list(graph, term, shape)?;
        if members.len() < 2 {
            return Err(ShaclParseError::invalid_property_path(
                shape.clone(),
                format!("{term} is neither a path operator nor a sequence of paths"),
            ));
        }
        Ok(Self::Sequence(members))
    }

    fn parse_list(
        graph: &Graph,
        head: TermRef<'_>,
        shape: &Term,
    ) -> Result<Vec<Self>, ShaclParseError> {
        read_list(graph, head, shape)?
            .into_iter()
            .map(|member| Self::parse(graph, member, shape))
            .collect()
    }

    /// The predicate IRI if this path is a plain predicate.
    pub fn as_predicate(&self) -> Option<&NamedNode> {
        match self {
            Self::Predicate(p) => Some(p),
            _ => None,
        }
    }

    /// All nodes reachable from `focus` through the path, without duplicates.
    pub fn evaluate(&self, graph: &Graph, focus: TermRef<'_>) -> Vec<Term> {
        self.step(graph, vec![focus.into_owned()])
    }

    fn step(&self, graph: &Graph, start: Vec<Term>) -> Vec<Term> {
        match self {
            Self::Predicate(predicate) => {
                let mut reached = Reached::default();
                for node in &start {
                    if let Some(subject) = as_subject(node.as_ref()) {
                        for value in graph.objects_for_subject_predicate(subject, predicate) {
                            reached.push(value.into_owned());
                        }
                    }
                }
                reached.nodes
            }
            Self::Inverse(inner) => match inner.as_ref() {
                Self::Predicate(predicate) => {
                    let mut reached = Reached::default();
                    for node in &start {
                        for subject in graph.subjects_for_predicate_object(predicate, node) {
                            reached.push(subject.into_owned().into());
                        }
                    }
                    reached.nodes
                }
                inner => inner.inverted().step(graph, start),
            },
            Self::Sequence(members) => members
                .iter()
                .fold(start, |nodes, member| member.step(graph, nodes)),
            Self::Alternative(members) => {
                let mut reached = Reached::default();
                for member in members {
                    for node in member.step(graph, start.clone()) {
                        reached.push(node);
                    }
                }
                reached.nodes
            }
            Self::ZeroOrOne(inner) => {
                let mut reached = Reached::default();
                for node in start.iter().cloned().chain(inner.step(graph, start.clone())) {
                    reached.push(node);
                }
                reached.nodes
            }
            Self::ZeroOrMore(inner) => inner.closure(graph, start, true),
            Self::OneOrMore(inner) => inner.closure(graph, start, false),
        }
    }

    /// Transitive closure of `self`, breadth first.
    fn closure(&self, graph: &Graph, start: Vec<Term>, reflexive: bool) -> Vec<Term> {
        let mut reached = Reached::default();
        let mut frontier = if reflexive {
            start.into_iter().filter(|node| reached.push(node.clone())).collect()
        } else {
            start
        };
        while !frontier.is_empty() {
            frontier = self
                .step(graph, frontier)
                .into_iter()
                .filter(|node| reached.push(node.clone()))
                .collect();
        }
        reached.nodes
    }

    /// Pushes inversions down to the predicate leaves.
    fn inverted(&self) -> Self {
        match self {
            Self::Predicate(_) => Self::Inverse(Box::new(self.clone())),
            Self::Inverse(inner) => inner.as_ref().clone(),
            Self::Sequence(members) => {
                Self::Sequence(members.iter().rev().map(Self::inverted).collect())
            }
            Self::Alternative(members) => {
                Self::Alternative(members.iter().map(Self::inverted).collect())
            }
            Self::ZeroOrMore(inner) => Self::ZeroOrMore(Box::new(inner.inverted())),
            Self::OneOrMore(inner) => Self::OneOrMore(Box::new(inner.inverted())),
            Self::ZeroOrOne(inner) => Self::ZeroOrOne(Box::new(inner.inverted())),
        }
    }
}

/// Insertion-ordered set of path values.
#[derive(Default)]
struct Reached {
    seen: FxHashSet<Term>,
    nodes: Vec<Term>,
}

impl Reached {
    fn push(&mut self, node: Term) -> bool {
        if self.seen.insert(node.clone()) {
            self.nodes.push(node);
            true
        } else {
            false
        }
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(
            f: &mut fmt::Formatter<'_>,
            members: &[PropertyPath],
            separator: &str,
        ) -> fmt::Result {
            f.write_str("(")?;
            for (i, member) in members.iter().enumerate() {
                if i > 0 {
                    f.write_str(separator)?;
                }
                write!(f, "{member}")?;
            }
            f.write_str(")")
        }

        match self {
            Self::Predicate(p) => write!(f, "{p}"),
            Self::Sequence(members) => join(f, members, " / "),
            Self::Alternative(members) => join(f, members, " | "),
            Self::Inverse(inner) => write!(f, "^{inner}"),
            Self::ZeroOrMore(inner) => write!(f, "{inner}*"),
            Self::OneOrMore(inner) => write!(f, "{inner}+"),
            Self::ZeroOrOne(inner) => write!(f, "{inner}?"),
        }
    }
}

#[cfg(test)]
#[expect(clippy::panic_in_result_fn)]
mod tests {
    use super::*;
    use oxrdf::Triple;

    fn ex(local: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://example.org/{local}"))
    }

    fn chain() -> Graph {
        // a -knows-> b -knows-> c, c -name-> "C"
        let mut graph = Graph::new();
        graph.insert(&Triple::new(ex("a"), ex("knows"), ex("b")));
        graph.insert(&Triple::new(ex("b"), ex("knows"), ex("c")));
        graph.insert(&Triple::new(ex("c"), ex("name"), oxrdf::Literal::from("C")));
        graph
    }

    #[test]
    fn test_predicate_and_inverse() {
        let graph = chain();
        let knows = PropertyPath::predicate(ex("knows"));
        assert_eq!(knows.evaluate(&graph, ex("a").as_ref().into()), vec![Term::from(ex("b"))]);
        let inverse = PropertyPath::Inverse(Box::new(knows));
        assert_eq!(inverse.evaluate(&graph, ex("b").as_ref().into()), vec![Term::from(ex("a"))]);
    }

    #[test]
    fn test_closures_do_not_loop() {
        let mut graph = chain();
        graph.insert(&Triple::new(ex("c"), ex("knows"), ex("a")));
        let knows = Box::new(PropertyPath::predicate(ex("knows")));
        let star =
            PropertyPath::ZeroOrMore(knows.clone()).evaluate(&graph, ex("a").as_ref().into());
        assert_eq!(star.len(), 3);
        let plus = PropertyPath::OneOrMore(knows).evaluate(&graph, ex("a").as_ref().into());
        assert_eq!(plus.len(), 3);
    }

    #[test]
    fn test_inverse_of_sequence() {
        let graph = chain();
        let path = PropertyPath::Inverse(Box::new(PropertyPath::Sequence(vec![
            PropertyPath::predicate(ex("knows")),
            PropertyPath::predicate(ex("name")),
        ])));
        let literal = oxrdf::Literal::from("C");
        assert_eq!(
            path.evaluate(&graph, literal.as_ref().into()),
            vec![Term::from(ex("b"))]
        );
    }

    #[test]
    fn test_parse_sequence_from_turtle() -> Result<(), Box<dyn std::error::Error>> {
        let turtle = r#"
            @prefix sh: <http://www.w3.org/ns/shacl#> .
            @prefix ex: <http://example.org/> .
            ex:shape sh:path ( ex:knows [ sh:zeroOrOnePath ex:name ] ) .
        "#;
        let mut graph = Graph::new();
        for triple in oxttl::TurtleParser::new().for_slice(turtle.as_bytes()) {
            graph.insert(&triple?);
        }
        let shape = Term::from(ex("shape"));
        let head = graph
            .object_for_subject_predicate(ex("shape").as_ref(), sh::PATH)
            .ok_or("missing sh:path")?;
        let path = PropertyPath::parse(&graph, head, &shape)?;
        assert_eq!(
            path,
            PropertyPath::Sequence(vec![
                PropertyPath::predicate(ex("knows")),
                PropertyPath::ZeroOrOne(Box::new(PropertyPath::predicate(ex("name")))),
            ])
        );
        Ok(())
    }
}
