//! SHACL Core constraint components and the value checks that need no graph access.

use std::cmp::Ordering;

use oxrdf::vocab::{rdf, xsd};
use oxrdf::{Graph, Literal, NamedNode, NamedNodeRef, NamedOrBlankNodeRef, Term, TermRef};
use regex::{Regex, RegexBuilder};

use super::error::ShaclParseError;
use super::model::{ShapeId, read_list};
use crate::vocab::sh;

/// A single constraint declared on a shape.
#[derive(Debug, Clone)]
pub enum Constraint {
    Class(NamedNode),
    Datatype(NamedNode),
    NodeKind(NodeKind),
    MinCount(usize),
    MaxCount(usize),
    MinExclusive(Literal),
    MinInclusive(Literal),
    MaxExclusive(Literal),
    MaxInclusive(Literal),
    MinLength(usize),
    MaxLength(usize),
    Pattern(Pattern),
    LanguageIn(Vec<String>),
    UniqueLang,
    Equals(NamedNode),
    Disjoint(NamedNode),
    LessThan(NamedNode),
    LessThanOrEquals(NamedNode),
    Not(ShapeId),
    And(Vec<ShapeId>),
    Or(Vec<ShapeId>),
    Xone(Vec<ShapeId>),
    Node(ShapeId),
    Property(ShapeId),
    HasValue(Term),
    In(Vec<Term>),
    Closed { ignored_properties: Vec<NamedNode> },
}

/// The six node kinds of `sh:nodeKind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Iri,
    Literal,
    BlankNode,
    BlankNodeOrIri,
    BlankNodeOrLiteral,
    IriOrLiteral,
}

/// A compiled `sh:pattern` with its optional `sh:flags`.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Constraint {
    /// The `sh:sourceConstraintComponent` reported for violations of this constraint.
    pub fn component(&self) -> NamedNodeRef<'static> {
        match self {
            Self::Class(_) => sh::CLASS_CONSTRAINT_COMPONENT,
            Self::Datatype(_) => sh::DATATYPE_CONSTRAINT_COMPONENT,
            Self::NodeKind(_) => sh::NODE_KIND_CONSTRAINT_COMPONENT,
            Self::MinCount(_) => sh::MIN_COUNT_CONSTRAINT_COMPONENT,
            Self::MaxCount(_) => sh::MAX_COUNT_CONSTRAINT_COMPONENT,
            Self::MinExclusive(_) => sh::MIN_EXCLUSIVE_CONSTRAINT_COMPONENT,
            Self::MinInclusive(_) => sh::MIN_INCLUSIVE_CONSTRAINT_COMPONENT,
            Self::MaxExclusive(_) => sh::MAX_EXCLUSIVE_CONSTRAINT_COMPONENT,
            Self::MaxInclusive(_) => sh::MAX_INCLUSIVE_CONSTRAINT_COMPONENT,
            Self::MinLength(_) => sh::MIN_LENGTH_CONSTRAINT_COMPONENT,
            Self::MaxLength(_) => sh::MAX_LENGTH_CONSTRAINT_COMPONENT,
            Self::Pattern(_) => sh::PATTERN_CONSTRAINT_COMPONENT,
            Self::LanguageIn(_) => sh::LANGUAGE_IN_CONSTRAINT_COMPONENT,
            Self::UniqueLang => sh::UNIQUE_LANG_CONSTRAINT_COMPONENT,
            Self::Equals(_) => sh::EQUALS_CONSTRAINT_COMPONENT,
            Self::Disjoint(_) => sh::DISJOINT_CONSTRAINT_COMPONENT,
            Self::LessThan(_) => sh::LESS_THAN_CONSTRAINT_COMPONENT,
            Self::LessThanOrEquals(_) => sh::LESS_THAN_OR_EQUALS_CONSTRAINT_COMPONENT,
            Self::Not(_) => sh::NOT_CONSTRAINT_COMPONENT,
            Self::And(_) => sh::AND_CONSTRAINT_COMPONENT,
            Self::Or(_) => sh::OR_CONSTRAINT_COMPONENT,
            Self::Xone(_) => sh::XONE_CONSTRAINT_COMPONENT,
            Self::Node(_) => sh::NODE_CONSTRAINT_COMPONENT,
            Self::Property(_) => sh::PROPERTY_CONSTRAINT_COMPONENT,
            Self::HasValue(_) => sh::HAS_VALUE_CONSTRAINT_COMPONENT,
            Self::In(_) => sh::IN_CONSTRAINT_COMPONENT,
            Self::Closed { .. } => sh::CLOSED_CONSTRAINT_COMPONENT,
        }
    }

    /// Shapes this constraint points to.
    pub fn referenced_shapes(&self) -> &[ShapeId] {
        match self {
            Self::Not(shape) | Self::Node(shape) | Self::Property(shape) => {
                std::slice::from_ref(shape)
            }
            Self::And(shapes) | Self::Or(shapes) | Self::Xone(shapes) => shapes,
            _ => &[],
        }
    }

    /// Reads every constraint declared directly on `shape`.
    pub(super) fn parse_all(
        graph: &Graph,
        shape: NamedOrBlankNodeRef<'_>,
    ) -> Result<Vec<Self>, ShaclParseError> {
        let reader = ParameterReader { graph, shape };
        let mut constraints = Vec::new();

        for class in reader.iris(sh::CLASS)? {
            constraints.push(Self::Class(class));
        }
        for datatype in reader.iris(sh::DATATYPE)? {
            constraints.push(Self::Datatype(datatype));
        }
        for kind in reader.iris(sh::NODE_KIND)? {
            let kind = NodeKind::from_iri(kind.as_ref()).ok_or_else(|| {
                reader.invalid(sh::NODE_KIND, "a sh:NodeKind", kind.as_ref())
            })?;
            constraints.push(Self::NodeKind(kind));
        }
        for count in reader.integers(sh::MIN_COUNT)? {
            constraints.push(Self::MinCount(count));
        }
        for count in reader.integers(sh::MAX_COUNT)? {
            constraints.push(Self::MaxCount(count));
        }
        let bounds = [
            (sh::MIN_EXCLUSIVE, Self::MinExclusive as fn(Literal) -> Self),
            (sh::MIN_INCLUSIVE, Self::MinInclusive),
            (sh::MAX_EXCLUSIVE, Self::MaxExclusive),
            (sh::MAX_INCLUSIVE, Self::MaxInclusive),
        ];
        for (parameter, build) in bounds {
            for bound in reader.literals(parameter)? {
                constraints.push(build(bound));
            }
        }
        for length in reader.integers(sh::MIN_LENGTH)? {
            constraints.push(Self::MinLength(length));
        }
        for length in reader.integers(sh::MAX_LENGTH)? {
            constraints.push(Self::MaxLength(length));
        }
        let flags = reader.literals(sh::FLAGS)?.into_iter().next();
        for pattern in reader.literals(sh::PATTERN)? {
            constraints.push(Self::Pattern(Pattern::new(
                pattern.value(),
                flags.as_ref().map(Literal::value),
            )?));
        }
        for list in reader.values(sh::LANGUAGE_IN) {
            let tags = read_list(graph, list, &reader.shape_term())?
                .into_iter()
                .map(|tag| match tag {
                    TermRef::Literal(tag) => Ok(tag.value().to_owned()),
                    other => Err(reader.invalid(sh::LANGUAGE_IN, "a list of literals", other)),
                })
                .collect::<Result<_, _>>()?;
            constraints.push(Self::LanguageIn(tags));
        }
        if reader.flag(sh::UNIQUE_LANG)? {
            constraints.push(Self::UniqueLang);
        }
        let pairs = [
            (sh::EQUALS, Self::Equals as fn(NamedNode) -> Self),
            (sh::DISJOINT, Self::Disjoint),
            (sh::LESS_THAN, Self::LessThan),
            (sh::LESS_THAN_OR_EQUALS, Self::LessThanOrEquals),
        ];
        for (parameter, build) in pairs {
            for property in reader.iris(parameter)? {
                constraints.push(build(property));
            }
        }
        for shape in reader.shapes(sh::NOT)? {
            constraints.push(Self::Not(shape));
        }
        let lists = [
            (sh::AND, Self::And as fn(Vec<ShapeId>) -> Self),
            (sh::OR, Self::Or),
            (sh::XONE, Self::Xone),
        ];
        for (parameter, build) in lists {
            for list in reader.values(parameter) {
                let shapes = read_list(graph, list, &reader.shape_term())?
                    .into_iter()
                    .map(|member| {
                        ShapeId::try_from(member)
                            .map_err(|_| reader.invalid(parameter, "a list of shapes", member))
                    })
                    .collect::<Result<_, _>>()?;
                constraints.push(build(shapes));
            }
        }
        for shape in reader.shapes(sh::NODE)? {
            constraints.push(Self::Node(shape));
        }
        for shape in reader.shapes(sh::PROPERTY)? {
            constraints.push(Self::Property(shape));
        }
        for value in reader.values(sh::HAS_VALUE) {
            constraints.push(Self::HasValue(value.into_owned()));
        }
        for list in reader.values(sh::IN) {
            let members = read_list(graph, list, &reader.shape_term())?;
            constraints.push(Self::In(
                members.into_iter().map(TermRef::into_owned).collect(),
            ));
        }
        if reader.flag(sh::CLOSED)? {
            let mut ignored_properties = Vec::new();
            for list in reader.values(sh::IGNORED_PROPERTIES) {
                for member in read_list(graph, list, &reader.shape_term())? {
                    match member {
                        TermRef::NamedNode(property) => {
                            ignored_properties.push(property.into_owned());
                        }
                        other => {
                            return Err(reader.invalid(
                                sh::IGNORED_PROPERTIES,
                                "a list of IRIs",
                                other,
                            ));
                        }
                    }
                }
            }
            constraints.push(Self::Closed { ignored_properties });
        }
        Ok(constraints)
    }
}

/// Typed access to the parameters of one shape.
struct ParameterReader<'a> {
    graph: &'a Graph,
    shape: NamedOrBlankNodeRef<'a>,
}

impl<'a> ParameterReader<'a> {
    fn shape_term(&self) -> Term {
        self.shape.into_owned().into()
    }

    fn invalid<'b>(
        &self,
        parameter: NamedNodeRef<'_>,
        expected: &'static str,
        actual: impl Into<TermRef<'b>>,
    ) -> ShaclParseError {
        ShaclParseError::invalid_parameter(
            self.shape_term(),
            parameter,
            expected,
            actual.into().into_owned(),
        )
    }

    fn values(&self, parameter: NamedNodeRef<'_>) -> Vec<TermRef<'a>> {
        self.graph
            .objects_for_subject_predicate(self.shape, parameter)
            .collect()
    }

    fn iris(&self, parameter: NamedNodeRef<'_>) -> Result<Vec<NamedNode>, ShaclParseError> {
        self.values(parameter)
            .into_iter()
            .map(|value| match value {
                TermRef::NamedNode(iri) => Ok(iri.into_owned()),
                other => Err(self.invalid(parameter, "an IRI", other)),
            })
            .collect()
    }

    fn literals(&self, parameter: NamedNodeRef<'_>) -> Result<Vec<Literal>, ShaclParseError> {
        self.values(parameter)
            .into_iter()
            .map(|value| match value {
                TermRef::Literal(literal) => Ok(literal.into_owned()),
                other => Err(self.invalid(parameter, "a literal", other)),
            })
            .collect()
    }

    fn integers(&self, parameter: NamedNodeRef<'_>) -> Result<Vec<usize>, ShaclParseError> {
        self.values(parameter)
            .into_iter()
            .map(|value| match value {
                TermRef::Literal(literal) => literal
                    .value()
                    .parse()
                    .map_err(|_| self.invalid(parameter, "a non-negative integer", value)),
                other => Err(self.invalid(parameter, "a non-negative integer", other)),
            })
            .collect()
    }

    fn flag(&self, parameter: NamedNodeRef<'_>) -> Result<bool, ShaclParseError> {
        let mut enabled = false;
        for value in self.values(parameter) {
            match value {
                TermRef::Literal(literal) if matches!(literal.value(), "true" | "1") => {
                    enabled = true;
                }
                TermRef::Literal(literal) if matches!(literal.value(), "false" | "0") => {}
                other => return Err(self.invalid(parameter, "a boolean", other)),
            }
        }
        Ok(enabled)
    }

    fn shapes(&self, parameter: NamedNodeRef<'_>) -> Result<Vec<ShapeId>, ShaclParseError> {
        self.values(parameter)
            .into_iter()
            .map(|value| {
                ShapeId::try_from(value).map_err(|_| self.invalid(parameter, "a shape", value))
            })
            .collect()
    }
}

impl NodeKind {
    fn from_iri(iri: NamedNodeRef<'_>) -> Option<Self> {
        Some(match iri {
            sh::IRI => Self::Iri,
            sh::LITERAL => Self::Literal,
            sh::BLANK_NODE => Self::BlankNode,
            sh::BLANK_NODE_OR_IRI => Self::BlankNodeOrIri,
            sh::BLANK_NODE_OR_LITERAL => Self::BlankNodeOrLiteral,
            sh::IRI_OR_LITERAL => Self::IriOrLiteral,
            _ => return None,
        })
    }

    pub fn matches(self, term: &Term) -> bool {
        match term {
            Term::NamedNode(_) => {
                matches!(self, Self::Iri | Self::BlankNodeOrIri | Self::IriOrLiteral)
            }
            Term::BlankNode(_) => {
                matches!(self, Self::BlankNode | Self::BlankNodeOrIri | Self::BlankNodeOrLiteral)
            }
            Term::Literal(_) => {
                matches!(self, Self::Literal | Self::BlankNodeOrLiteral | Self::IriOrLiteral)
            }
            #[cfg(feature = "rdf-12")]
            Term::Triple(_) => false,
        }
    }
}

impl Pattern {
    /// Compiles `source` with the XPath-style `flags` SHACL allows.
    pub fn new(source: &str, flags: Option<&str>) -> Result<Self, ShaclParseError> {
        let mut builder = RegexBuilder::new(source);
        for flag in flags.unwrap_or_default().chars() {
            match flag {
                'i' => builder.case_insensitive(true),
                'm' => builder.multi_line(true),
                's' => builder.dot_matches_new_line(true),
                'x' => builder.ignore_whitespace(true),
                other => {
                    return Err(ShaclParseError::InvalidRegex {
                        pattern: source.to_owned(),
                        message: format!("unsupported flag '{other}'"),
                    });
                }
            };
        }
        let regex = builder.build().map_err(|e| ShaclParseError::InvalidRegex {
            pattern: source.to_owned(),
            message: e.to_string(),
        })?;
        Ok(Self {
            source: source.to_owned(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// The string a node is matched against by `sh:pattern` and the length constraints.
pub fn lexical_form(term: &Term) -> &str {
    match term {
        Term::NamedNode(node) => node.as_str(),
        Term::BlankNode(node) => node.as_str(),
        Term::Literal(literal) => literal.value(),
        #[cfg(feature = "rdf-12")]
        Term::Triple(_) => "",
    }
}

/// Whether `literal` has `datatype` and a lexical form valid for it.
pub fn has_datatype(literal: &Literal, datatype: &NamedNode) -> bool {
    if literal.datatype() != datatype.as_ref() {
        return false;
    }
    let value = literal.value();
    match literal.datatype() {
        xsd::BOOLEAN => matches!(value, "true" | "false" | "1" | "0"),
        xsd::DECIMAL => !value.contains(['e', 'E']) && value.parse::<f64>().is_ok(),
        xsd::DOUBLE | xsd::FLOAT => {
            matches!(value, "INF" | "-INF" | "NaN") || value.parse::<f64>().is_ok()
        }
        dt if is_integer_type(dt) => value.parse::<i128>().is_ok(),
        rdf::LANG_STRING => literal.language().is_some(),
        _ => true,
    }
}

/// Orders two terms for the range and `sh:lessThan` constraints.
///
/// Numbers compare by value, other literals only against the same datatype.
pub fn compare(left: &Term, right: &Term) -> Option<Ordering> {
    let (Term::Literal(left), Term::Literal(right)) = (left, right) else {
        return None;
    };
    if is_numeric_type(left.datatype()) && is_numeric_type(right.datatype()) {
        let left = left.value().parse::<f64>().ok()?;
        let right = right.value().parse::<f64>().ok()?;
        return left.partial_cmp(&right);
    }
    if left.datatype() == right.datatype() && left.language() == right.language() {
        return Some(left.value().cmp(right.value()));
    }
    None
}

fn is_numeric_type(datatype: NamedNodeRef<'_>) -> bool {
    matches!(datatype, xsd::DECIMAL | xsd::DOUBLE | xsd::FLOAT) || is_integer_type(datatype)
}

fn is_integer_type(datatype: NamedNodeRef<'_>) -> bool {
    matches!(
        datatype,
        xsd::INTEGER
            | xsd::INT
            | xsd::LONG
            | xsd::SHORT
            | xsd::BYTE
            | xsd::NON_NEGATIVE_INTEGER
            | xsd::NON_POSITIVE_INTEGER
            | xsd::POSITIVE_INTEGER
            | xsd::NEGATIVE_INTEGER
            | xsd::UNSIGNED_LONG
            | xsd::UNSIGNED_INT
            | xsd::UNSIGNED_SHORT
            | xsd::UNSIGNED_BYTE
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_comparison_across_types() {
        let integer = Term::from(Literal::new_typed_literal("10", xsd::INTEGER));
        let decimal = Term::from(Literal::new_typed_literal("9.5", xsd::DECIMAL));
        assert_eq!(compare(&integer, &decimal), Some(Ordering::Greater));
        let text = Term::from(Literal::new_simple_literal("10"));
        assert_eq!(compare(&integer, &text), None);
    }

    #[test]
    fn test_ill_typed_literal_fails_datatype() {
        let integer = xsd::INTEGER.into_owned();
        assert!(has_datatype(&Literal::new_typed_literal("42", xsd::INTEGER), &integer));
        assert!(!has_datatype(&Literal::new_typed_literal("4.2", xsd::INTEGER), &integer));
        assert!(!has_datatype(&Literal::new_simple_literal("42"), &integer));
    }

    #[test]
    fn test_pattern_flags() {
        let Ok(pattern) = Pattern::new("^abc$", Some("i")) else {
            panic!("pattern should compile");
        };
        assert!(pattern.is_match("ABC"));
        assert!(Pattern::new("(", None).is_err());
        assert!(Pattern::new("a", Some("q")).is_err());
    }
}
