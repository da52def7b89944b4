//! SHACL constraint validation

use crate::loader::{
    Constraint, NodeKind, NodeShape, PropertyPath, PropertyShape, Shape, ShapesGraph, Target,
};
use crate::report::{Severity, ValidationReport, ValidationResult};
use crate::vocab;
use crate::ShaclError;
use katachi_core::model::{rdf, Iri, Literal, Term};
use katachi_core::GraphStore;
use regex::Regex;
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Validation configuration.
///
/// `allow_infos` / `allow_warnings` control whether info- and warning-level
/// results count against conformance; they always appear in the report.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationConfig {
    /// Stop after the first violation-level result
    pub abort_on_first: bool,
    pub allow_infos: bool,
    pub allow_warnings: bool,
}

pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate a data graph against a shapes graph
    pub fn validate(
        &self,
        shapes: &ShapesGraph,
        data: &GraphStore,
    ) -> Result<ValidationReport, ShaclError> {
        let mut results = Vec::new();

        'shapes: for shape in shapes.shapes.values() {
            match shape {
                Shape::Node(node_shape) => {
                    for focus in target_nodes(&node_shape.targets, data) {
                        self.validate_node(node_shape, &focus, shapes, data, &mut results)?;
                        if self.aborted(&results) {
                            break 'shapes;
                        }
                    }
                }
                Shape::Property(property_shape) => {
                    // Standalone targets on a property shape are honoured too
                    for focus in target_nodes(&property_shape.targets, data) {
                        self.validate_property(property_shape, &focus, data, &mut results)?;
                        if self.aborted(&results) {
                            break 'shapes;
                        }
                    }
                }
            }
        }

        let conforms = !results.iter().any(|r: &ValidationResult| match r.severity {
            Severity::Violation => true,
            Severity::Warning => !self.config.allow_warnings,
            Severity::Info => !self.config.allow_infos,
        });

        Ok(ValidationReport { conforms, results })
    }

    fn aborted(&self, results: &[ValidationResult]) -> bool {
        self.config.abort_on_first
            && results.iter().any(|r| r.severity == Severity::Violation)
    }

    fn validate_node(
        &self,
        shape: &NodeShape,
        focus: &Term,
        shapes: &ShapesGraph,
        data: &GraphStore,
        results: &mut Vec<ValidationResult>,
    ) -> Result<(), ShaclError> {
        // Node-level constraints apply to the focus node itself
        let focus_values = [focus.clone()];
        for constraint in &shape.constraints {
            check_constraint(
                constraint,
                focus,
                None,
                &focus_values,
                data,
                &shape.id,
                shape.severity.unwrap_or(Severity::Violation),
                shape.message.as_deref(),
                results,
            )?;
        }

        for property_id in &shape.property_shapes {
            if let Some(Shape::Property(property_shape)) = shapes.get(property_id) {
                self.validate_property(property_shape, focus, data, results)?;
            }
        }
        Ok(())
    }

    fn validate_property(
        &self,
        shape: &PropertyShape,
        focus: &Term,
        data: &GraphStore,
        results: &mut Vec<ValidationResult>,
    ) -> Result<(), ShaclError> {
        let values = path_values(&shape.path, focus, data);
        let severity = shape.severity.unwrap_or(Severity::Violation);
        let path = match &shape.path {
            PropertyPath::Predicate(iri) | PropertyPath::Inverse(iri) => Some(iri.clone()),
        };

        for constraint in &shape.constraints {
            check_constraint(
                constraint,
                focus,
                path.as_ref(),
                &values,
                data,
                &shape.id,
                severity,
                shape.message.as_deref(),
                results,
            )?;
        }
        Ok(())
    }
}

/// Resolve the target declarations of a shape to focus nodes
fn target_nodes(targets: &[Target], data: &GraphStore) -> Vec<Term> {
    let rdf_type = Iri::new(rdf::TYPE);
    // BTreeSet keeps report order stable across runs
    let mut nodes = BTreeSet::new();

    for target in targets {
        match target {
            Target::Class(class) => {
                for subject in data.subjects_with(&rdf_type, &Term::Iri(class.clone())) {
                    nodes.insert(subject.clone());
                }
            }
            Target::Node(node) => {
                nodes.insert(node.clone());
            }
            Target::SubjectsOf(predicate) => {
                for subject in data.subjects_of(predicate) {
                    nodes.insert(subject.clone());
                }
            }
            Target::ObjectsOf(predicate) => {
                for object in data.objects_of(predicate) {
                    nodes.insert(object.clone());
                }
            }
        }
    }

    nodes.into_iter().collect()
}

/// Value nodes reached from the focus node along the path
fn path_values(path: &PropertyPath, focus: &Term, data: &GraphStore) -> Vec<Term> {
    match path {
        PropertyPath::Predicate(predicate) => data
            .objects(focus, predicate)
            .into_iter()
            .cloned()
            .collect(),
        PropertyPath::Inverse(predicate) => data
            .subjects_with(predicate, focus)
            .into_iter()
            .cloned()
            .collect(),
    }
}

#[allow(clippy::too_many_arguments)]
fn check_constraint(
    constraint: &Constraint,
    focus: &Term,
    path: Option<&Iri>,
    values: &[Term],
    data: &GraphStore,
    source_shape: &Term,
    severity: Severity,
    custom_message: Option<&str>,
    results: &mut Vec<ValidationResult>,
) -> Result<(), ShaclError> {
    let mut push = |component: &str, value: Option<&Term>, message: String| {
        results.push(ValidationResult {
            focus_node: focus.clone(),
            result_path: path.cloned(),
            value: value.cloned(),
            source_shape: Some(source_shape.clone()),
            constraint_component: Iri::new(component),
            severity,
            message: custom_message.map(|m| m.to_string()).unwrap_or(message),
        });
    };

    match constraint {
        Constraint::MinCount(min) => {
            if (values.len() as u64) < *min {
                push(
                    vocab::MIN_COUNT_COMPONENT,
                    None,
                    format!("Expected at least {} values, found {}", min, values.len()),
                );
            }
        }
        Constraint::MaxCount(max) => {
            if (values.len() as u64) > *max {
                push(
                    vocab::MAX_COUNT_COMPONENT,
                    None,
                    format!("Expected at most {} values, found {}", max, values.len()),
                );
            }
        }
        Constraint::Datatype(expected) => {
            for value in values {
                let ok = value
                    .as_literal()
                    .map(|lit| lit.datatype_or_default() == expected.as_str())
                    .unwrap_or(false);
                if !ok {
                    push(
                        vocab::DATATYPE_COMPONENT,
                        Some(value),
                        format!("Value {} does not have datatype {}", value, expected),
                    );
                }
            }
        }
        Constraint::Class(expected) => {
            for value in values {
                // RDFS closure is applied to the data graph beforehand, so a
                // direct type lookup covers subclasses as well
                let ok = !value.is_literal()
                    && data.contains(value, &Iri::new(rdf::TYPE), &Term::Iri(expected.clone()));
                if !ok {
                    push(
                        vocab::CLASS_COMPONENT,
                        Some(value),
                        format!("Value {} is not an instance of {}", value, expected),
                    );
                }
            }
        }
        Constraint::NodeKind(kind) => {
            for value in values {
                let ok = match kind {
                    NodeKind::BlankNode => value.is_blank(),
                    NodeKind::Iri => value.is_iri(),
                    NodeKind::Literal => value.is_literal(),
                    NodeKind::BlankNodeOrIri => value.is_blank() || value.is_iri(),
                    NodeKind::BlankNodeOrLiteral => value.is_blank() || value.is_literal(),
                    NodeKind::IriOrLiteral => value.is_iri() || value.is_literal(),
                };
                if !ok {
                    push(
                        vocab::NODE_KIND_COMPONENT,
                        Some(value),
                        format!("Value {} does not have node kind {:?}", value, kind),
                    );
                }
            }
        }
        Constraint::Pattern { pattern, flags } => {
            let regex = compile_pattern(pattern, flags.as_deref())?;
            for value in values {
                // Blank nodes never match sh:pattern
                if value.is_blank() || !regex.is_match(value.lexical()) {
                    push(
                        vocab::PATTERN_COMPONENT,
                        Some(value),
                        format!("Value {} does not match pattern '{}'", value, pattern),
                    );
                }
            }
        }
        Constraint::MinLength(min) => {
            for value in values {
                let length = value.lexical().chars().count() as u64;
                if value.is_blank() || length < *min {
                    push(
                        vocab::MIN_LENGTH_COMPONENT,
                        Some(value),
                        format!("Value {} has length {}, minimum is {}", value, length, min),
                    );
                }
            }
        }
        Constraint::MaxLength(max) => {
            for value in values {
                let length = value.lexical().chars().count() as u64;
                if value.is_blank() || length > *max {
                    push(
                        vocab::MAX_LENGTH_COMPONENT,
                        Some(value),
                        format!("Value {} has length {}, maximum is {}", value, length, max),
                    );
                }
            }
        }
        Constraint::MinInclusive(bound) => {
            range_check(values, bound, vocab::MIN_INCLUSIVE_COMPONENT, &mut push, |o| {
                o != Ordering::Less
            });
        }
        Constraint::MaxInclusive(bound) => {
            range_check(values, bound, vocab::MAX_INCLUSIVE_COMPONENT, &mut push, |o| {
                o != Ordering::Greater
            });
        }
        Constraint::MinExclusive(bound) => {
            range_check(values, bound, vocab::MIN_EXCLUSIVE_COMPONENT, &mut push, |o| {
                o == Ordering::Greater
            });
        }
        Constraint::MaxExclusive(bound) => {
            range_check(values, bound, vocab::MAX_EXCLUSIVE_COMPONENT, &mut push, |o| {
                o == Ordering::Less
            });
        }
        Constraint::HasValue(expected) => {
            if !values.contains(expected) {
                push(
                    vocab::HAS_VALUE_COMPONENT,
                    None,
                    format!("Required value {} is missing", expected),
                );
            }
        }
        Constraint::In(allowed) => {
            for value in values {
                if !allowed.contains(value) {
                    push(
                        vocab::IN_COMPONENT,
                        Some(value),
                        format!("Value {} is not among the allowed values", value),
                    );
                }
            }
        }
    }
    Ok(())
}

/// Compare each value against a bound; values that cannot be compared violate
fn range_check<F, P>(values: &[Term], bound: &Literal, component: &str, push: &mut F, pass: P)
where
    F: FnMut(&str, Option<&Term>, String),
    P: Fn(Ordering) -> bool,
{
    for value in values {
        let ok = value
            .as_literal()
            .and_then(|lit| compare_literals(lit, bound))
            .map(&pass)
            .unwrap_or(false);
        if !ok {
            push(
                component,
                Some(value),
                format!("Value {} is out of range (bound {})", value, bound),
            );
        }
    }
}

/// Value-space comparison. Supported value spaces: the xsd numeric types
/// (compared as numbers) and xsd:date / xsd:dateTime / xsd:time (compared
/// lexically; their canonical forms order like their values). Everything
/// else is incomparable.
fn compare_literals(a: &Literal, b: &Literal) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (numeric_value(a), numeric_value(b)) {
        return x.partial_cmp(&y);
    }
    let datatype = a.datatype_or_default();
    if datatype == b.datatype_or_default() && is_temporal_datatype(datatype) {
        return Some(a.value.cmp(&b.value));
    }
    None
}

fn numeric_value(lit: &Literal) -> Option<f64> {
    if is_numeric_datatype(lit.datatype_or_default()) {
        lit.value.parse::<f64>().ok()
    } else {
        None
    }
}

fn is_numeric_datatype(datatype: &str) -> bool {
    matches!(
        datatype.strip_prefix("http://www.w3.org/2001/XMLSchema#"),
        Some(
            "integer" | "decimal" | "double" | "float" | "long" | "int" | "short" | "byte"
                | "unsignedLong" | "unsignedInt" | "unsignedShort" | "unsignedByte"
                | "nonNegativeInteger" | "nonPositiveInteger" | "positiveInteger"
                | "negativeInteger"
        )
    )
}

fn is_temporal_datatype(datatype: &str) -> bool {
    matches!(
        datatype.strip_prefix("http://www.w3.org/2001/XMLSchema#"),
        Some("date" | "dateTime" | "time")
    )
}

/// Translate sh:flags into an inline regex flag group
fn compile_pattern(pattern: &str, flags: Option<&str>) -> Result<Regex, ShaclError> {
    let source = match flags {
        Some(flags) if !flags.is_empty() => {
            for flag in flags.chars() {
                if !matches!(flag, 'i' | 'm' | 's' | 'x') {
                    return Err(ShaclError::InvalidPattern {
                        pattern: pattern.to_string(),
                        reason: format!("unsupported flag '{}'", flag),
                    });
                }
            }
            format!("(?{}){}", flags, pattern)
        }
        _ => pattern.to_string(),
    };
    Regex::new(&source).map_err(|e| ShaclError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use katachi_core::turtle;

    const SHAPES: &str = r#"
        @prefix sh: <http://www.w3.org/ns/shacl#> .
        @prefix ex: <http://example.org/> .
        @prefix xsd: <http://www.w3.org/2001/XMLSchema#> .

        ex:PersonShape
            a sh:NodeShape ;
            sh:targetClass ex:Person ;
            sh:property [
                sh:path ex:name ;
                sh:minCount 1 ;
                sh:datatype xsd:string ;
            ] ;
            sh:property [
                sh:path ex:age ;
                sh:maxCount 1 ;
                sh:minInclusive 0 ;
                sh:maxInclusive 150 ;
            ] .
    "#;

    fn validate_turtle(data: &str) -> ValidationReport {
        let shapes_store = turtle::parse_str(SHAPES).unwrap();
        let shapes = ShapesGraph::from_store(&shapes_store).unwrap();
        let data = turtle::parse_str(data).unwrap();
        let validator = Validator::new(ValidationConfig {
            abort_on_first: false,
            allow_infos: true,
            allow_warnings: true,
        });
        validator.validate(&shapes, &data).unwrap()
    }

    #[test]
    fn conforming_person() {
        let report = validate_turtle(
            r#"
            @prefix ex: <http://example.org/> .
            ex:alice a ex:Person ; ex:name "Alice" ; ex:age 30 .
        "#,
        );
        assert!(report.conforms, "unexpected results: {}", report.to_text());
    }

    #[test]
    fn missing_name_violates_min_count() {
        let report = validate_turtle(
            r#"
            @prefix ex: <http://example.org/> .
            ex:bob a ex:Person ; ex:age 44 .
        "#,
        );
        assert!(!report.conforms);
        assert_eq!(report.violation_count(), 1);
        let result = &report.results[0];
        assert_eq!(
            result.constraint_component,
            Iri::new(vocab::MIN_COUNT_COMPONENT)
        );
        assert_eq!(result.focus_node, Term::iri("http://example.org/bob"));
        assert_eq!(
            result.result_path,
            Some(Iri::new("http://example.org/name"))
        );
    }

    #[test]
    fn age_out_of_range() {
        let report = validate_turtle(
            r#"
            @prefix ex: <http://example.org/> .
            ex:old a ex:Person ; ex:name "Old" ; ex:age 200 .
        "#,
        );
        assert!(!report.conforms);
        assert!(report
            .results
            .iter()
            .any(|r| r.constraint_component == Iri::new(vocab::MAX_INCLUSIVE_COMPONENT)));
    }

    #[test]
    fn wrong_datatype_is_reported_per_value() {
        let report = validate_turtle(
            r#"
            @prefix ex: <http://example.org/> .
            ex:x a ex:Person ; ex:name 42 .
        "#,
        );
        assert!(!report.conforms);
        let result = report
            .results
            .iter()
            .find(|r| r.constraint_component == Iri::new(vocab::DATATYPE_COMPONENT))
            .unwrap();
        assert!(result.value.is_some());
    }

    #[test]
    fn untargeted_nodes_are_ignored() {
        let report = validate_turtle(
            r#"
            @prefix ex: <http://example.org/> .
            ex:thing a ex:Robot ; ex:age 9000 .
        "#,
        );
        assert!(report.conforms);
        assert!(report.results.is_empty());
    }

    #[test]
    fn warnings_do_not_break_conformance_when_allowed() {
        let shapes_src = r#"
            @prefix sh: <http://www.w3.org/ns/shacl#> .
            @prefix ex: <http://example.org/> .
            ex:S a sh:NodeShape ;
                sh:targetClass ex:T ;
                sh:property [
                    sh:path ex:p ;
                    sh:minCount 1 ;
                    sh:severity sh:Warning ;
                ] .
        "#;
        let data_src = r#"
            @prefix ex: <http://example.org/> .
            ex:i a ex:T .
        "#;
        let shapes_store = turtle::parse_str(shapes_src).unwrap();
        let shapes = ShapesGraph::from_store(&shapes_store).unwrap();
        let data = turtle::parse_str(data_src).unwrap();

        let lenient = Validator::new(ValidationConfig {
            abort_on_first: false,
            allow_infos: true,
            allow_warnings: true,
        });
        let report = lenient.validate(&shapes, &data).unwrap();
        assert!(report.conforms);
        assert_eq!(report.warning_count(), 1);

        let strict = Validator::new(ValidationConfig::default());
        let report = strict.validate(&shapes, &data).unwrap();
        assert!(!report.conforms);
    }

    #[test]
    fn pattern_and_node_kind() {
        let shapes_src = r#"
            @prefix sh: <http://www.w3.org/ns/shacl#> .
            @prefix ex: <http://example.org/> .
            ex:S a sh:NodeShape ;
                sh:targetSubjectsOf ex:code ;
                sh:property [
                    sh:path ex:code ;
                    sh:pattern "^[A-Z]{3}$" ;
                    sh:nodeKind sh:Literal ;
                ] .
        "#;
        let data_src = r#"
            @prefix ex: <http://example.org/> .
            ex:a ex:code "ABC" .
            ex:b ex:code "nope" .
        "#;
        let shapes_store = turtle::parse_str(shapes_src).unwrap();
        let shapes = ShapesGraph::from_store(&shapes_store).unwrap();
        let data = turtle::parse_str(data_src).unwrap();
        let report = Validator::new(ValidationConfig::default())
            .validate(&shapes, &data)
            .unwrap();
        assert!(!report.conforms);
        assert_eq!(report.violation_count(), 1);
        assert_eq!(report.results[0].focus_node, Term::iri("http://example.org/b"));
    }

    #[test]
    fn date_bounds_compare_by_value_space() {
        let shapes_src = r#"
            @prefix sh: <http://www.w3.org/ns/shacl#> .
            @prefix ex: <http://example.org/> .
            @prefix xsd: <http://www.w3.org/2001/XMLSchema#> .
            ex:S a sh:NodeShape ;
                sh:targetSubjectsOf ex:born ;
                sh:property [
                    sh:path ex:born ;
                    sh:minInclusive "1900-01-01"^^xsd:date ;
                ] .
        "#;
        let data_src = r#"
            @prefix ex: <http://example.org/> .
            @prefix xsd: <http://www.w3.org/2001/XMLSchema#> .
            ex:ok ex:born "1990-05-01"^^xsd:date .
            ex:early ex:born "1850-01-01"^^xsd:date .
            ex:odd ex:born "long ago" .
        "#;
        let shapes_store = turtle::parse_str(shapes_src).unwrap();
        let shapes = ShapesGraph::from_store(&shapes_store).unwrap();
        let data = turtle::parse_str(data_src).unwrap();
        let report = Validator::new(ValidationConfig::default())
            .validate(&shapes, &data)
            .unwrap();

        // Dates before the bound and incomparable strings both violate
        assert!(!report.conforms);
        assert_eq!(report.violation_count(), 2);
        let focus: Vec<_> = report.results.iter().map(|r| &r.focus_node).collect();
        assert!(focus.contains(&&Term::iri("http://example.org/early")));
        assert!(focus.contains(&&Term::iri("http://example.org/odd")));
    }

    #[test]
    fn case_insensitive_pattern_flag() {
        let regex = compile_pattern("abc", Some("i")).unwrap();
        assert!(regex.is_match("xAbCy"));
        assert!(compile_pattern("abc", Some("q")).is_err());
        assert!(compile_pattern("(unclosed", None).is_err());
    }

    #[test]
    fn abort_on_first_stops_early() {
        let report = {
            let shapes_store = turtle::parse_str(SHAPES).unwrap();
            let shapes = ShapesGraph::from_store(&shapes_store).unwrap();
            let data = turtle::parse_str(
                r#"
                @prefix ex: <http://example.org/> .
                ex:a a ex:Person .
                ex:b a ex:Person .
            "#,
            )
            .unwrap();
            Validator::new(ValidationConfig {
                abort_on_first: true,
                ..Default::default()
            })
            .validate(&shapes, &data)
            .unwrap()
        };
        assert!(!report.conforms);
        assert_eq!(report.violation_count(), 1);
    }
}
