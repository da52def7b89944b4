//! Validation report

use katachi_core::model::{Iri, Term};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result severity, mirroring sh:Violation / sh:Warning / sh:Info
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Violation,
    Warning,
    Info,
}

impl Severity {
    pub fn iri(&self) -> &'static str {
        match self {
            Severity::Violation => crate::vocab::SEVERITY_VIOLATION,
            Severity::Warning => crate::vocab::SEVERITY_WARNING,
            Severity::Info => crate::vocab::SEVERITY_INFO,
        }
    }

    /// Short curie-style name used in the text report
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Violation => "sh:Violation",
            Severity::Warning => "sh:Warning",
            Severity::Info => "sh:Info",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub focus_node: Term,
    pub result_path: Option<Iri>,
    pub value: Option<Term>,
    pub source_shape: Option<Term>,
    /// IRI of the violated constraint component
    pub constraint_component: Iri,
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub conforms: bool,
    pub results: Vec<ValidationResult>,
}

impl ValidationReport {
    pub fn conforming() -> Self {
        Self {
            conforms: true,
            results: Vec::new(),
        }
    }

    pub fn violation_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.severity == Severity::Violation)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.severity == Severity::Warning)
            .count()
    }

    pub fn info_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.severity == Severity::Info)
            .count()
    }

    /// Human-readable rendering, printed to stdout by the CLI
    pub fn to_text(&self) -> String {
        let mut out = String::from("Validation Report\n");
        out.push_str(&format!(
            "Conforms: {}\n",
            if self.conforms { "True" } else { "False" }
        ));
        if self.results.is_empty() {
            return out;
        }
        out.push_str(&format!("Results ({}):\n", self.results.len()));
        for result in &self.results {
            out.push_str(&result.to_text());
        }
        out
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}

impl ValidationResult {
    /// Short name of the constraint component, e.g. "MinCountConstraintComponent"
    pub fn component_name(&self) -> &str {
        self.constraint_component
            .as_str()
            .rsplit('#')
            .next()
            .unwrap_or_else(|| self.constraint_component.as_str())
    }

    pub fn to_text(&self) -> String {
        let kind = match self.severity {
            Severity::Violation => "Constraint Violation",
            Severity::Warning => "Constraint Warning",
            Severity::Info => "Constraint Info",
        };
        let mut out = format!(
            "{} in {} ({}):\n",
            kind,
            self.component_name(),
            self.constraint_component
        );
        out.push_str(&format!("\tSeverity: {}\n", self.severity.label()));
        if let Some(shape) = &self.source_shape {
            out.push_str(&format!("\tSource Shape: {}\n", shape));
        }
        out.push_str(&format!("\tFocus Node: {}\n", self.focus_node));
        if let Some(path) = &self.result_path {
            out.push_str(&format!("\tResult Path: {}\n", path));
        }
        if let Some(value) = &self.value {
            out.push_str(&format!("\tValue Node: {}\n", value));
        }
        out.push_str(&format!("\tMessage: {}\n", self.message));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab;

    fn sample_result(severity: Severity) -> ValidationResult {
        ValidationResult {
            focus_node: Term::iri("http://example.org/bob"),
            result_path: Some(Iri::new("http://example.org/name")),
            value: None,
            source_shape: Some(Term::iri("http://example.org/PersonShape")),
            constraint_component: Iri::new(vocab::MIN_COUNT_COMPONENT),
            severity,
            message: "Expected at least 1 value, found 0".to_string(),
        }
    }

    #[test]
    fn text_names_the_constraint() {
        let report = ValidationReport {
            conforms: false,
            results: vec![sample_result(Severity::Violation)],
        };
        let text = report.to_text();
        assert!(text.contains("Conforms: False"));
        assert!(text.contains("MinCountConstraintComponent"));
        assert!(text.contains("Focus Node: http://example.org/bob"));
        assert!(text.contains("Result Path: http://example.org/name"));
    }

    #[test]
    fn conforming_report_is_short() {
        let report = ValidationReport::conforming();
        assert_eq!(report.to_text(), "Validation Report\nConforms: True\n");
    }

    #[test]
    fn severity_counts() {
        let report = ValidationReport {
            conforms: false,
            results: vec![
                sample_result(Severity::Violation),
                sample_result(Severity::Warning),
                sample_result(Severity::Warning),
                sample_result(Severity::Info),
            ],
        };
        assert_eq!(report.violation_count(), 1);
        assert_eq!(report.warning_count(), 2);
        assert_eq!(report.info_count(), 1);
    }
}
