//! # katachi CLI
//!
//! Validates a JSON-LD or Turtle data graph against one or more Turtle
//! SHACL shape files, with RDFS inference applied to the data graph.

pub mod commands;

pub use commands::*;
