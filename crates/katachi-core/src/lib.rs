//! # katachi-core
//!
//! RDF data model and graph loading for the katachi SHACL validator:
//! - typed terms and triples (model)
//! - indexed in-memory graph store (graph)
//! - serialization sniffing and file loading (syntax)
//! - Turtle parsing via sophia (turtle)
//! - JSON-LD expansion to triples (jsonld)

pub mod graph;
pub mod jsonld;
pub mod model;
pub mod syntax;
pub mod turtle;

pub use graph::GraphStore;
pub use model::{Iri, Literal, Term, Triple};
pub use syntax::RdfSyntax;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("turtle parse error: {0}")]
    Turtle(String),

    #[error("json-ld error: {0}")]
    JsonLd(String),

    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot parse as json-ld ({jsonld}) nor as turtle ({turtle})")]
    UnknownSyntax { jsonld: String, turtle: String },
}
