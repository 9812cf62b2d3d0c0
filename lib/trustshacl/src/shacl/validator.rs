//! Evaluation of compiled shapes against a data graph.

use std::cmp::Ordering;

use oxrdf::{Graph, NamedNode, Term};

use super::constraint::{Constraint, compare, has_datatype, lexical_form};
use super::error::{ShaclError, ShaclValidationError};
use super::model::{Shape, ShapeId, ShapesGraph, as_subject, is_instance_of};
use super::path::PropertyPath;
use super::report::{ValidationReport, Violation};

/// Nesting allowed through `sh:node`, `sh:property` and the logical constraints.
const MAX_DEPTH: usize = 64;

/// Validates data graphs against a [`ShapesGraph`].
///
/// ```
/// use oxrdf::Graph;
/// use trustshacl::shacl::{ShaclValidator, ShapesGraph};
///
/// let shapes = ShapesGraph::default();
/// let report = ShaclValidator::new(&shapes).validate(&Graph::new())?;
/// assert!(report.conforms());
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ShaclValidator<'a> {
    shapes: &'a ShapesGraph,
}

impl<'a> ShaclValidator<'a> {
    pub fn new(shapes: &'a ShapesGraph) -> Self {
        Self { shapes }
    }

    /// Validates every focus node of every targeted shape.
    ///
    /// Results come shape by shape, in shape discovery order, then focus node by focus node.
    pub fn validate(&self, data: &Graph) -> Result<ValidationReport, ShaclError> {
        let mut report = ValidationReport::new();
        for shape in self.shapes.targeted() {
            if shape.deactivated {
                continue;
            }
            for focus in shape.focus_nodes(data) {
                report.extend(self.validate_node(data, &focus, shape, 0)?);
            }
        }
        Ok(report)
    }

    fn validate_node(
        &self,
        data: &Graph,
        focus: &Term,
        shape: &Shape,
        depth: usize,
    ) -> Result<Vec<Violation>, ShaclValidationError> {
        if depth > MAX_DEPTH {
            return Err(ShaclValidationError::MaxRecursionDepth { depth: MAX_DEPTH });
        }
        if shape.deactivated {
            return Ok(Vec::new());
        }
        let values = match &shape.path {
            Some(path) => path.evaluate(data, focus.as_ref()),
            None => vec![focus.clone()],
        };
        let mut results = Vec::new();
        for constraint in &shape.constraints {
            Check {
                validator: *self,
                data,
                focus,
                shape,
                constraint,
                depth,
            }
            .run(&values, &mut results)?;
        }
        Ok(results)
    }

    /// Results of validating `node` against the shape `id`. Empty when it conforms.
    fn nested(
        &self,
        data: &Graph,
        node: &Term,
        id: &ShapeId,
        depth: usize,
    ) -> Result<Vec<Violation>, ShaclValidationError> {
        match self.shapes.get(id) {
            Some(shape) => self.validate_node(data, node, shape, depth + 1),
            None => Ok(Vec::new()),
        }
    }
}

/// One constraint evaluated for one focus node.
struct Check<'a> {
    validator: ShaclValidator<'a>,
    data: &'a Graph,
    focus: &'a Term,
    shape: &'a Shape,
    constraint: &'a Constraint,
    depth: usize,
}

impl Check<'_> {
    fn violation(&self, value: Option<&Term>, message: impl Into<String>) -> Violation {
        let violation = Violation::new(
            self.focus.clone(),
            self.shape.id.clone(),
            self.constraint.component(),
        )
        .with_path(self.shape.path.clone())
        .with_severity(self.shape.severity)
        .with_message(self.shape.message.clone().unwrap_or_else(|| message.into()));
        match value {
            Some(value) => violation.with_value(value.clone()),
            None => violation,
        }
    }

    /// Reports every value rejected by `accept`.
    fn each(
        &self,
        values: &[Term],
        results: &mut Vec<Violation>,
        accept: impl Fn(&Term) -> bool,
        message: impl Fn(&Term) -> String,
    ) {
        for value in values {
            if !accept(value) {
                results.push(self.violation(Some(value), message(value)));
            }
        }
    }

    fn nested(&self, node: &Term, id: &ShapeId) -> Result<Vec<Violation>, ShaclValidationError> {
        self.validator.nested(self.data, node, id, self.depth)
    }

    /// Values of `predicate` on the focus node, for the property pair constraints.
    fn pair_values(&self, predicate: &NamedNode) -> Vec<Term> {
        PropertyPath::predicate(predicate.clone()).evaluate(self.data, self.focus.as_ref())
    }

    fn run(
        &self,
        values: &[Term],
        results: &mut Vec<Violation>,
    ) -> Result<(), ShaclValidationError> {
        match self.constraint {
            Constraint::Class(class) => self.each(
                values,
                results,
                |value| is_instance_of(self.data, value, class.as_ref()),
                |_| format!("Value is not an instance of {class}"),
            ),
            Constraint::Datatype(datatype) => self.each(
                values,
                results,
                |value| matches!(value, Term::Literal(literal) if has_datatype(literal, datatype)),
                |_| format!("Value is not a valid literal of datatype {datatype}"),
            ),
            Constraint::NodeKind(kind) => self.each(
                values,
                results,
                |value| kind.matches(value),
                |_| format!("Value does not have node kind {kind:?}"),
            ),
            Constraint::MinCount(min) => {
                if values.len() < *min {
                    results.push(self.violation(None, format!("Less than {min} values")));
                }
            }
            Constraint::MaxCount(max) => {
                if values.len() > *max {
                    results.push(self.violation(None, format!("More than {max} values")));
                }
            }
            Constraint::MinExclusive(bound) => {
                let bound = Term::from(bound.clone());
                self.each(
                    values,
                    results,
                    |value| compare(value, &bound) == Some(Ordering::Greater),
                    |_| format!("Value is not greater than {bound}"),
                );
            }
            Constraint::MinInclusive(bound) => {
                let bound = Term::from(bound.clone());
                self.each(
                    values,
                    results,
                    |value| {
                        matches!(compare(value, &bound), Some(Ordering::Greater | Ordering::Equal))
                    },
                    |_| format!("Value is not greater than or equal to {bound}"),
                );
            }
            Constraint::MaxExclusive(bound) => {
                let bound = Term::from(bound.clone());
                self.each(
                    values,
                    results,
                    |value| compare(value, &bound) == Some(Ordering::Less),
                    |_| format!("Value is not less than {bound}"),
                );
            }
            Constraint::MaxInclusive(bound) => {
                let bound = Term::from(bound.clone());
                self.each(
                    values,
                    results,
                    |value| {
                        matches!(
                            compare(value, &bound),
                            Some(Ordering::Less | Ordering::Equal)
                        )
                    },
                    |_| format!("Value is not less than or equal to {bound}"),
                );
            }
            Constraint::MinLength(min) => self.each(
                values,
                results,
                |value| {
                    !matches!(value, Term::BlankNode(_))
                        && lexical_form(value).chars().count() >= *min
                },
                |_| format!("Value has less than {min} characters"),
            ),
            Constraint::MaxLength(max) => self.each(
                values,
                results,
                |value| {
                    !matches!(value, Term::BlankNode(_))
                        && lexical_form(value).chars().count() <= *max
                },
                |_| format!("Value has more than {max} characters"),
            ),
            Constraint::Pattern(pattern) => self.each(
                values,
                results,
                |value| {
                    !matches!(value, Term::BlankNode(_)) && pattern.is_match(lexical_form(value))
                },
                |_| format!("Value does not match pattern \"{}\"", pattern.as_str()),
            ),
            Constraint::LanguageIn(tags) => self.each(
                values,
                results,
                |value| match value {
                    Term::Literal(literal) => literal
                        .language()
                        .is_some_and(|language| tags.iter().any(|tag| lang_matches(language, tag))),
                    _ => false,
                },
                |_| format!("Language does not match any of {}", tags.join(", ")),
            ),
            Constraint::UniqueLang => {
                let mut languages: Vec<String> = values
                    .iter()
                    .filter_map(|value| match value {
                        Term::Literal(literal) => literal.language().map(str::to_ascii_lowercase),
                        _ => None,
                    })
                    .collect();
                languages.sort_unstable();
                let mut duplicates: Vec<&String> = languages
                    .windows(2)
                    .filter(|pair| pair[0] == pair[1])
                    .map(|pair| &pair[0])
                    .collect();
                duplicates.dedup();
                for language in duplicates {
                    results.push(self.violation(
                        None,
                        format!("Language \"{language}\" used more than once"),
                    ));
                }
            }
            Constraint::Equals(predicate) => {
                let others = self.pair_values(predicate);
                self.each(values, results, |value| others.contains(value), |_| {
                    format!("Value is not a value of {predicate}")
                });
                self.each(&others, results, |other| values.contains(other), |_| {
                    format!("Value of {predicate} is missing")
                });
            }
            Constraint::Disjoint(predicate) => {
                let others = self.pair_values(predicate);
                self.each(values, results, |value| !others.contains(value), |_| {
                    format!("Value is also a value of {predicate}")
                });
            }
            Constraint::LessThan(predicate) => {
                let others = self.pair_values(predicate);
                self.each(
                    values,
                    results,
                    |value| {
                        others
                            .iter()
                            .all(|other| compare(value, other) == Some(Ordering::Less))
                    },
                    |_| format!("Value is not less than the values of {predicate}"),
                );
            }
            Constraint::LessThanOrEquals(predicate) => {
                let others = self.pair_values(predicate);
                self.each(
                    values,
                    results,
                    |value| {
                        others.iter().all(|other| {
                            matches!(compare(value, other), Some(Ordering::Less | Ordering::Equal))
                        })
                    },
                    |_| format!("Value is not less than or equal to the values of {predicate}"),
                );
            }
            Constraint::Not(id) => {
                for value in values {
                    if self.nested(value, id)?.is_empty() {
                        results.push(
                            self.violation(Some(value), format!("Value conforms to shape {id}")),
                        );
                    }
                }
            }
            Constraint::And(ids) => {
                for value in values {
                    let mut details = Vec::new();
                    for id in ids {
                        details.extend(self.nested(value, id)?);
                    }
                    if !details.is_empty() {
                        results.push(
                            self.violation(Some(value), "Value does not conform to every shape")
                                .with_details(details),
                        );
                    }
                }
            }
            Constraint::Or(ids) => {
                for value in values {
                    let mut details = Vec::new();
                    let mut conforms = false;
                    for id in ids {
                        let nested = self.nested(value, id)?;
                        if nested.is_empty() {
                            conforms = true;
                            break;
                        }
                        details.extend(nested);
                    }
                    if !conforms {
                        results.push(
                            self.violation(Some(value), "Value does not conform to any shape")
                                .with_details(details),
                        );
                    }
                }
            }
            Constraint::Xone(ids) => {
                for value in values {
                    let mut conforming = 0;
                    let mut details = Vec::new();
                    for id in ids {
                        let nested = self.nested(value, id)?;
                        if nested.is_empty() {
                            conforming += 1;
                        } else {
                            details.extend(nested);
                        }
                    }
                    if conforming != 1 {
                        let violation = self.violation(
                            Some(value),
                            format!("Value conforms to {conforming} shapes instead of exactly one"),
                        );
                        results.push(if conforming == 0 {
                            violation.with_details(details)
                        } else {
                            violation
                        });
                    }
                }
            }
            Constraint::Node(id) => {
                for value in values {
                    let details = self.nested(value, id)?;
                    if !details.is_empty() {
                        results.push(
                            self.violation(
                                Some(value),
                                format!("Value does not conform to shape {id}"),
                            )
                            .with_details(details),
                        );
                    }
                }
            }
            Constraint::Property(id) => {
                for value in values {
                    results.extend(self.nested(value, id)?);
                }
            }
            Constraint::HasValue(expected) => {
                if !values.contains(expected) {
                    results.push(
                        self.violation(None, format!("Missing expected value {expected}")),
                    );
                }
            }
            Constraint::In(allowed) => self.each(
                values,
                results,
                |value| allowed.contains(value),
                |_| "Value is not in the allowed list".to_owned(),
            ),
            Constraint::Closed { ignored_properties } => {
                let allowed: Vec<&NamedNode> = self
                    .shape
                    .constraints
                    .iter()
                    .filter_map(|constraint| match constraint {
                        Constraint::Property(id) => self.validator.shapes.get(id),
                        _ => None,
                    })
                    .filter_map(|property| property.path.as_ref()?.as_predicate())
                    .chain(ignored_properties)
                    .collect();
                for value in values {
                    let Some(subject) = as_subject(value.as_ref()) else {
                        continue;
                    };
                    for triple in self.data.triples_for_subject(subject) {
                        if allowed.iter().any(|p| **p == triple.predicate) {
                            continue;
                        }
                        let predicate = triple.predicate.into_owned();
                        results.push(
                            self.violation(
                                Some(&triple.object.into_owned()),
                                format!("Predicate {predicate} is not allowed (closed shape)"),
                            )
                            .with_path(Some(PropertyPath::Predicate(predicate))),
                        );
                    }
                }
            }
        }
        Ok(())
    }
}

/// Basic language range matching, as in SPARQL `langMatches`.
fn lang_matches(language: &str, range: &str) -> bool {
    if range == "*" {
        return !language.is_empty();
    }
    language.eq_ignore_ascii_case(range)
        || (language.len() > range.len()
            && language.as_bytes()[range.len()] == b'-'
            && language[..range.len()].eq_ignore_ascii_case(range))
}
