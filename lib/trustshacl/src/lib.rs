#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod cache;
mod canonical;
mod context;
mod error;
mod graph;
mod http;
mod payload;
mod registry;
pub mod shacl;
mod shape;
mod types;
mod verify;
pub mod vocab;

pub use crate::cache::ShapeCache;
pub use crate::canonical::{
    CanonicalQuads, canonicalize, canonicalize_dataset, canonicalize_in_background,
    canonicalize_json,
};
pub use crate::context::ContextLoader;
pub use crate::error::{
    CanonicalizationError, EmptyGraphError, GraphError, GraphParseError, ShapeLoadError,
    TrustFrameworkMismatchError, VerifyError,
};
pub use crate::graph::{GraphFormat, parse as parse_graph, union_graph};
pub use crate::payload::ShapePayload;
pub use crate::registry::{HttpRegistry, Registry, StaticRegistry};
pub use crate::shape::{ShapeGraph, ShapeLoader};
pub use crate::types::{TypeFilter, extract_types, is_member, qualify, unregistered_types};
pub use crate::verify::{ShapeVerifier, ValidationResult, VerifierConfig, format_violation};
