//! SHACL Core validation
//!
//! This crate provides:
//! - shapes-graph loading from an RDF graph (loader)
//! - constraint validation (validator)
//! - validation reports with text rendering (report)

pub mod loader;
pub mod report;
pub mod validator;
pub mod vocab;

// Re-exports
pub use loader::{NodeShape, PropertyPath, PropertyShape, Shape, ShapesGraph, Target};
pub use report::{Severity, ValidationReport, ValidationResult};
pub use validator::{ValidationConfig, Validator};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShaclError {
    #[error("invalid shape {shape}: {reason}")]
    InvalidShape { shape: String, reason: String },

    #[error("invalid sh:pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("unsupported property path on shape {0}")]
    UnsupportedPath(String),
}
