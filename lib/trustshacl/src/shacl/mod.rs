//! A [SHACL Core](https://www.w3.org/TR/shacl/) validator working on [`oxrdf`] graphs.
//!
//! SPARQL-based constraints and `sh:qualifiedValueShape` are not supported.
//!
//! ```
//! use oxrdf::Graph;
//! use oxttl::TurtleParser;
//! use trustshacl::shacl::{ShaclValidator, ShapesGraph};
//!
//! let shapes = r#"
//!     @prefix sh: <http://www.w3.org/ns/shacl#> .
//!     @prefix ex: <http://example.org/> .
//!     ex:PersonShape a sh:NodeShape ;
//!         sh:targetClass ex:Person ;
//!         sh:property [ sh:path ex:name ; sh:minCount 1 ] .
//! "#;
//! let data = r#"
//!     @prefix ex: <http://example.org/> .
//!     ex:alice a ex:Person .
//! "#;
//!
//! let mut shapes_graph = Graph::new();
//! for triple in TurtleParser::new().for_slice(shapes.as_bytes()) {
//!     shapes_graph.insert(&triple?);
//! }
//! let mut data_graph = Graph::new();
//! for triple in TurtleParser::new().for_slice(data.as_bytes()) {
//!     data_graph.insert(&triple?);
//! }
//!
//! let shapes = ShapesGraph::from_graph(&shapes_graph)?;
//! let report = ShaclValidator::new(&shapes).validate(&data_graph)?;
//! assert!(!report.conforms());
//! # Result::<_, Box<dyn std::error::Error>>::Ok(())
//! ```

mod constraint;
mod error;
mod model;
mod path;
mod report;
mod validator;

pub use crate::shacl::constraint::{Constraint, NodeKind, Pattern};
pub use crate::shacl::error::{ShaclError, ShaclParseError, ShaclValidationError};
pub use crate::shacl::model::{Shape, ShapeId, ShapesGraph, Target};
pub use crate::shacl::path::PropertyPath;
pub use crate::shacl::report::{Severity, ValidationReport, Violation};
pub use crate::shacl::validator::ShaclValidator;
