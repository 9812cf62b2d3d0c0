//! Loading RDF text into in-memory graphs.

use std::fmt;

use oxrdf::{Dataset, Graph, GraphNameRef, TripleRef};
use oxttl::{NQuadsParser, TurtleParser};

use crate::error::{EmptyGraphError, GraphError, GraphParseError};

/// The RDF syntaxes the graph store reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphFormat {
    /// [N-Quads](https://www.w3.org/TR/n-quads/), as produced by canonicalization.
    NQuads,
    /// [Turtle](https://www.w3.org/TR/turtle/), as served by shape registries.
    Turtle,
}

impl GraphFormat {
    pub fn name(self) -> &'static str {
        match self {
            Self::NQuads => "N-Quads",
            Self::Turtle => "Turtle",
        }
    }

    pub fn media_type(self) -> &'static str {
        match self {
            Self::NQuads => "application/n-quads",
            Self::Turtle => "text/turtle",
        }
    }
}

impl fmt::Display for GraphFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses `text` into a dataset.
///
/// Turtle triples land in the default graph. Blank input, and input without
/// any statement, is rejected with [`EmptyGraphError`].
///
/// ```
/// use trustshacl::{GraphFormat, parse_graph};
///
/// let dataset = parse_graph("<http://example.org/s> <http://example.org/p> \"o\" .", GraphFormat::NQuads)?;
/// assert_eq!(dataset.len(), 1);
/// assert!(parse_graph("  \n", GraphFormat::Turtle).is_err());
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
pub fn parse(text: &str, format: GraphFormat) -> Result<Dataset, GraphError> {
    if text.trim().is_empty() {
        return Err(EmptyGraphError.into());
    }
    let mut dataset = Dataset::new();
    match format {
        GraphFormat::NQuads => {
            for quad in NQuadsParser::new().for_slice(text.as_bytes()) {
                dataset.insert(&quad.map_err(|e| GraphParseError::new(format, e))?);
            }
        }
        GraphFormat::Turtle => {
            for triple in TurtleParser::new().for_slice(text.as_bytes()) {
                let triple = triple.map_err(|e| GraphParseError::new(format, e))?;
                dataset.insert(triple.as_ref().in_graph(GraphNameRef::DefaultGraph));
            }
        }
    }
    if dataset.is_empty() {
        return Err(EmptyGraphError.into());
    }
    Ok(dataset)
}

/// Merges every graph of `dataset` into a single graph.
///
/// Verifiable credentials and proofs live in named graphs of the presentation
/// dataset, so validation runs on this union.
pub fn union_graph(dataset: &Dataset) -> Graph {
    let mut graph = Graph::new();
    for quad in dataset {
        graph.insert(TripleRef::new(quad.subject, quad.predicate, quad.object));
    }
    graph
}

#[cfg(test)]
#[expect(clippy::panic_in_result_fn)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_inputs_are_rejected() {
        for format in [GraphFormat::NQuads, GraphFormat::Turtle] {
            assert!(matches!(parse("", format), Err(GraphError::Empty(_))));
            assert!(matches!(parse(" \n\t", format), Err(GraphError::Empty(_))));
        }
        assert!(matches!(
            parse("@prefix ex: <http://example.org/> .", GraphFormat::Turtle),
            Err(GraphError::Empty(_))
        ));
        assert!(matches!(
            parse("# only a comment\n", GraphFormat::NQuads),
            Err(GraphError::Empty(_))
        ));
    }

    #[test]
    fn test_syntax_errors_name_the_format() {
        let Err(GraphError::Parse(error)) = parse("<a> <b>", GraphFormat::NQuads) else {
            panic!("expected a parse error");
        };
        assert_eq!(error.format(), GraphFormat::NQuads);
        assert!(error.to_string().starts_with("Invalid N-Quads input"));
    }

    #[test]
    fn test_union_merges_named_graphs() -> Result<(), GraphError> {
        let dataset = parse(
            "<http://example.org/a> <http://example.org/p> <http://example.org/b> <http://example.org/g1> .\n\
             <http://example.org/a> <http://example.org/p> <http://example.org/b> <http://example.org/g2> .\n\
             _:c <http://example.org/p> \"x\" .",
            GraphFormat::NQuads,
        )?;
        assert_eq!(dataset.len(), 3);
        assert_eq!(union_graph(&dataset).len(), 2);
        Ok(())
    }

    #[test]
    fn test_turtle_goes_to_default_graph() -> Result<(), GraphError> {
        let dataset = parse(
            "@prefix ex: <http://example.org/> . ex:a ex:p ex:b, ex:c .",
            GraphFormat::Turtle,
        )?;
        assert_eq!(dataset.len(), 2);
        assert!(dataset.iter().all(|quad| quad.graph_name.is_default_graph()));
        Ok(())
    }
}
