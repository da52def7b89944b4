//! Shapes-graph loading

use crate::report::Severity;
use crate::vocab;
use crate::ShaclError;
use katachi_core::model::{rdf, Iri, Literal, Term};
use katachi_core::GraphStore;
use std::collections::{BTreeMap, BTreeSet};

/// Parsed shapes graph: shape id -> definition, with deterministic order
#[derive(Debug, Clone, Default)]
pub struct ShapesGraph {
    pub shapes: BTreeMap<Term, Shape>,
}

#[derive(Debug, Clone)]
pub enum Shape {
    Node(NodeShape),
    Property(PropertyShape),
}

#[derive(Debug, Clone)]
pub struct NodeShape {
    pub id: Term,
    pub targets: Vec<Target>,
    pub constraints: Vec<Constraint>,
    /// Referenced property shape ids (objects of sh:property)
    pub property_shapes: Vec<Term>,
    pub severity: Option<Severity>,
    pub message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PropertyShape {
    pub id: Term,
    pub path: PropertyPath,
    /// Targets directly attached to the property shape, usually empty
    pub targets: Vec<Target>,
    pub constraints: Vec<Constraint>,
    pub severity: Option<Severity>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Class(Iri),
    Node(Term),
    SubjectsOf(Iri),
    ObjectsOf(Iri),
}

/// Direct and inverse predicate paths; complex paths are out of scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyPath {
    Predicate(Iri),
    Inverse(Iri),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    BlankNode,
    Iri,
    Literal,
    BlankNodeOrIri,
    BlankNodeOrLiteral,
    IriOrLiteral,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    MinCount(u64),
    MaxCount(u64),
    Datatype(Iri),
    Class(Iri),
    NodeKind(NodeKind),
    Pattern {
        pattern: String,
        flags: Option<String>,
    },
    MinLength(u64),
    MaxLength(u64),
    MinInclusive(Literal),
    MaxInclusive(Literal),
    MinExclusive(Literal),
    MaxExclusive(Literal),
    HasValue(Term),
    In(Vec<Term>),
}

impl ShapesGraph {
    pub fn get(&self, id: &Term) -> Option<&Shape> {
        self.shapes.get(id)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Extract shape definitions from a shapes graph.
    ///
    /// Node shapes are recognized by an explicit `sh:NodeShape` type, by a
    /// target declaration, or by carrying `sh:property`. Property shapes are
    /// the objects of `sh:property` and must carry `sh:path`. Unrecognized
    /// constraint components are ignored.
    pub fn from_store(store: &GraphStore) -> Result<ShapesGraph, ShaclError> {
        let mut shapes = BTreeMap::new();

        let rdf_type = Iri::new(rdf::TYPE);
        let sh_property = Iri::new(vocab::PROPERTY);

        // Candidate node shapes, deduplicated and ordered
        let mut candidates: BTreeSet<Term> = BTreeSet::new();
        for subject in store.subjects_with(&rdf_type, &Term::iri(vocab::NODE_SHAPE)) {
            candidates.insert(subject.clone());
        }
        for predicate in [
            vocab::TARGET_CLASS,
            vocab::TARGET_NODE,
            vocab::TARGET_SUBJECTS_OF,
            vocab::TARGET_OBJECTS_OF,
        ] {
            for subject in store.subjects_of(&Iri::new(predicate)) {
                candidates.insert(subject.clone());
            }
        }
        for subject in store.subjects_of(&sh_property) {
            candidates.insert(subject.clone());
        }

        // Property shapes referenced via sh:property are not node shapes,
        // even when they declare their own targets
        let property_shape_ids: BTreeSet<Term> = store
            .objects_of(&sh_property)
            .into_iter()
            .cloned()
            .collect();

        for id in candidates {
            if property_shape_ids.contains(&id) {
                continue;
            }
            let shape = load_node_shape(store, &id)?;
            shapes.insert(id, Shape::Node(shape));
        }

        for id in property_shape_ids {
            let shape = load_property_shape(store, &id)?;
            shapes.insert(id.clone(), Shape::Property(shape));
        }

        Ok(ShapesGraph { shapes })
    }
}

fn load_node_shape(store: &GraphStore, id: &Term) -> Result<NodeShape, ShaclError> {
    Ok(NodeShape {
        id: id.clone(),
        targets: load_targets(store, id)?,
        constraints: load_constraints(store, id)?,
        property_shapes: store
            .objects(id, &Iri::new(vocab::PROPERTY))
            .into_iter()
            .cloned()
            .collect(),
        severity: load_severity(store, id)?,
        message: load_message(store, id),
    })
}

fn load_property_shape(store: &GraphStore, id: &Term) -> Result<PropertyShape, ShaclError> {
    let path_term =
        unique_object(store, id, vocab::PATH)?.ok_or_else(|| ShaclError::InvalidShape {
            shape: id.to_string(),
            reason: "property shape without sh:path".to_string(),
        })?;

    let path = match path_term {
        Term::Iri(iri) => PropertyPath::Predicate(iri.clone()),
        Term::Blank(_) => {
            // Only sh:inversePath is supported among blank-node paths
            match unique_object(store, path_term, vocab::INVERSE_PATH)? {
                Some(Term::Iri(iri)) => PropertyPath::Inverse(iri.clone()),
                _ => return Err(ShaclError::UnsupportedPath(id.to_string())),
            }
        }
        Term::Literal(_) => {
            return Err(ShaclError::InvalidShape {
                shape: id.to_string(),
                reason: "sh:path must not be a literal".to_string(),
            })
        }
    };

    Ok(PropertyShape {
        id: id.clone(),
        path,
        targets: load_targets(store, id)?,
        constraints: load_constraints(store, id)?,
        severity: load_severity(store, id)?,
        message: load_message(store, id),
    })
}

fn load_targets(store: &GraphStore, id: &Term) -> Result<Vec<Target>, ShaclError> {
    let mut targets = Vec::new();
    for object in store.objects(id, &Iri::new(vocab::TARGET_CLASS)) {
        let iri = expect_iri(id, object, "sh:targetClass")?;
        targets.push(Target::Class(iri));
    }
    for object in store.objects(id, &Iri::new(vocab::TARGET_NODE)) {
        targets.push(Target::Node(object.clone()));
    }
    for object in store.objects(id, &Iri::new(vocab::TARGET_SUBJECTS_OF)) {
        let iri = expect_iri(id, object, "sh:targetSubjectsOf")?;
        targets.push(Target::SubjectsOf(iri));
    }
    for object in store.objects(id, &Iri::new(vocab::TARGET_OBJECTS_OF)) {
        let iri = expect_iri(id, object, "sh:targetObjectsOf")?;
        targets.push(Target::ObjectsOf(iri));
    }
    Ok(targets)
}

fn load_constraints(store: &GraphStore, id: &Term) -> Result<Vec<Constraint>, ShaclError> {
    let mut constraints = Vec::new();

    if let Some(n) = load_count(store, id, vocab::MIN_COUNT)? {
        constraints.push(Constraint::MinCount(n));
    }
    if let Some(n) = load_count(store, id, vocab::MAX_COUNT)? {
        constraints.push(Constraint::MaxCount(n));
    }
    if let Some(object) = unique_object(store, id, vocab::DATATYPE)? {
        constraints.push(Constraint::Datatype(expect_iri(id, object, "sh:datatype")?));
    }
    for object in store.objects(id, &Iri::new(vocab::CLASS)) {
        constraints.push(Constraint::Class(expect_iri(id, object, "sh:class")?));
    }
    if let Some(object) = unique_object(store, id, vocab::NODE_KIND)? {
        constraints.push(Constraint::NodeKind(parse_node_kind(id, object)?));
    }
    if let Some(object) = unique_object(store, id, vocab::PATTERN)? {
        let pattern = expect_literal(id, object, "sh:pattern")?.value.clone();
        let flags = unique_object(store, id, vocab::FLAGS)?
            .and_then(|t| t.as_literal())
            .map(|l| l.value.clone());
        constraints.push(Constraint::Pattern { pattern, flags });
    }
    if let Some(n) = load_count(store, id, vocab::MIN_LENGTH)? {
        constraints.push(Constraint::MinLength(n));
    }
    if let Some(n) = load_count(store, id, vocab::MAX_LENGTH)? {
        constraints.push(Constraint::MaxLength(n));
    }
    for (predicate, build) in [
        (vocab::MIN_INCLUSIVE, Constraint::MinInclusive as fn(Literal) -> Constraint),
        (vocab::MAX_INCLUSIVE, Constraint::MaxInclusive),
        (vocab::MIN_EXCLUSIVE, Constraint::MinExclusive),
        (vocab::MAX_EXCLUSIVE, Constraint::MaxExclusive),
    ] {
        if let Some(object) = unique_object(store, id, predicate)? {
            let literal = expect_literal(id, object, predicate)?;
            constraints.push(build(literal.clone()));
        }
    }
    for object in store.objects(id, &Iri::new(vocab::HAS_VALUE)) {
        constraints.push(Constraint::HasValue(object.clone()));
    }
    if let Some(head) = unique_object(store, id, vocab::IN)? {
        constraints.push(Constraint::In(collect_list(store, head)));
    }

    Ok(constraints)
}

fn load_count(store: &GraphStore, id: &Term, predicate: &str) -> Result<Option<u64>, ShaclError> {
    match unique_object(store, id, predicate)? {
        Some(object) => {
            let literal = expect_literal(id, object, predicate)?;
            let n = literal
                .value
                .parse::<u64>()
                .map_err(|_| ShaclError::InvalidShape {
                    shape: id.to_string(),
                    reason: format!("{} must be a non-negative integer, got '{}'", predicate, literal.value),
                })?;
            Ok(Some(n))
        }
        None => Ok(None),
    }
}

fn load_severity(store: &GraphStore, id: &Term) -> Result<Option<Severity>, ShaclError> {
    match unique_object(store, id, vocab::SEVERITY)? {
        Some(Term::Iri(iri)) => match iri.as_str() {
            vocab::SEVERITY_VIOLATION => Ok(Some(Severity::Violation)),
            vocab::SEVERITY_WARNING => Ok(Some(Severity::Warning)),
            vocab::SEVERITY_INFO => Ok(Some(Severity::Info)),
            other => Err(ShaclError::InvalidShape {
                shape: id.to_string(),
                reason: format!("unknown sh:severity {}", other),
            }),
        },
        Some(_) => Err(ShaclError::InvalidShape {
            shape: id.to_string(),
            reason: "sh:severity must be an IRI".to_string(),
        }),
        None => Ok(None),
    }
}

fn load_message(store: &GraphStore, id: &Term) -> Option<String> {
    // sh:message may be repeated (typically one per language); the first wins
    store
        .objects(id, &Iri::new(vocab::MESSAGE))
        .into_iter()
        .find_map(|t| t.as_literal())
        .map(|l| l.value.clone())
}

/// Single-valued shape parameter: at most one object, else the shape is invalid
fn unique_object<'a>(
    store: &'a GraphStore,
    id: &Term,
    predicate: &str,
) -> Result<Option<&'a Term>, ShaclError> {
    let mut objects = store.objects(id, &Iri::new(predicate));
    if objects.len() > 1 {
        return Err(ShaclError::InvalidShape {
            shape: id.to_string(),
            reason: format!("<{}> declared more than once", predicate),
        });
    }
    Ok(objects.pop())
}

fn parse_node_kind(id: &Term, object: &Term) -> Result<NodeKind, ShaclError> {
    let iri = expect_iri(id, object, "sh:nodeKind")?;
    match iri.as_str() {
        vocab::NODE_KIND_BLANK => Ok(NodeKind::BlankNode),
        vocab::NODE_KIND_IRI => Ok(NodeKind::Iri),
        vocab::NODE_KIND_LITERAL => Ok(NodeKind::Literal),
        vocab::NODE_KIND_BLANK_OR_IRI => Ok(NodeKind::BlankNodeOrIri),
        vocab::NODE_KIND_BLANK_OR_LITERAL => Ok(NodeKind::BlankNodeOrLiteral),
        vocab::NODE_KIND_IRI_OR_LITERAL => Ok(NodeKind::IriOrLiteral),
        other => Err(ShaclError::InvalidShape {
            shape: id.to_string(),
            reason: format!("unknown sh:nodeKind {}", other),
        }),
    }
}

/// Walk an rdf:first/rdf:rest list, tolerating malformed tails
fn collect_list(store: &GraphStore, head: &Term) -> Vec<Term> {
    let first = Iri::new(rdf::FIRST);
    let rest = Iri::new(rdf::REST);
    let nil = Term::iri(rdf::NIL);

    let mut values = Vec::new();
    let mut cursor = head.clone();
    // Guard against cycles
    let mut steps = 0;
    while cursor != nil && steps < 10_000 {
        match store.object(&cursor, &first) {
            Some(value) => values.push(value.clone()),
            None => break,
        }
        match store.object(&cursor, &rest) {
            Some(next) => cursor = next.clone(),
            None => break,
        }
        steps += 1;
    }
    values
}

fn expect_iri(id: &Term, object: &Term, what: &str) -> Result<Iri, ShaclError> {
    object.as_iri().cloned().ok_or_else(|| ShaclError::InvalidShape {
        shape: id.to_string(),
        reason: format!("{} must be an IRI, got {}", what, object),
    })
}

fn expect_literal<'a>(id: &Term, object: &'a Term, what: &str) -> Result<&'a Literal, ShaclError> {
    object.as_literal().ok_or_else(|| ShaclError::InvalidShape {
        shape: id.to_string(),
        reason: format!("{} must be a literal, got {}", what, object),
    })
}
