//! SHACL vocabulary IRIs

pub const NODE_SHAPE: &str = "http://www.w3.org/ns/shacl#NodeShape";
pub const PROPERTY_SHAPE: &str = "http://www.w3.org/ns/shacl#PropertyShape";

pub const TARGET_CLASS: &str = "http://www.w3.org/ns/shacl#targetClass";
pub const TARGET_NODE: &str = "http://www.w3.org/ns/shacl#targetNode";
pub const TARGET_SUBJECTS_OF: &str = "http://www.w3.org/ns/shacl#targetSubjectsOf";
pub const TARGET_OBJECTS_OF: &str = "http://www.w3.org/ns/shacl#targetObjectsOf";

pub const PROPERTY: &str = "http://www.w3.org/ns/shacl#property";
pub const PATH: &str = "http://www.w3.org/ns/shacl#path";
pub const INVERSE_PATH: &str = "http://www.w3.org/ns/shacl#inversePath";

pub const MIN_COUNT: &str = "http://www.w3.org/ns/shacl#minCount";
pub const MAX_COUNT: &str = "http://www.w3.org/ns/shacl#maxCount";
pub const DATATYPE: &str = "http://www.w3.org/ns/shacl#datatype";
pub const CLASS: &str = "http://www.w3.org/ns/shacl#class";
pub const NODE_KIND: &str = "http://www.w3.org/ns/shacl#nodeKind";
pub const PATTERN: &str = "http://www.w3.org/ns/shacl#pattern";
pub const FLAGS: &str = "http://www.w3.org/ns/shacl#flags";
pub const MIN_LENGTH: &str = "http://www.w3.org/ns/shacl#minLength";
pub const MAX_LENGTH: &str = "http://www.w3.org/ns/shacl#maxLength";
pub const MIN_INCLUSIVE: &str = "http://www.w3.org/ns/shacl#minInclusive";
pub const MAX_INCLUSIVE: &str = "http://www.w3.org/ns/shacl#maxInclusive";
pub const MIN_EXCLUSIVE: &str = "http://www.w3.org/ns/shacl#minExclusive";
pub const MAX_EXCLUSIVE: &str = "http://www.w3.org/ns/shacl#maxExclusive";
pub const HAS_VALUE: &str = "http://www.w3.org/ns/shacl#hasValue";
pub const IN: &str = "http://www.w3.org/ns/shacl#in";

pub const SEVERITY: &str = "http://www.w3.org/ns/shacl#severity";
pub const MESSAGE: &str = "http://www.w3.org/ns/shacl#message";

pub const SEVERITY_VIOLATION: &str = "http://www.w3.org/ns/shacl#Violation";
pub const SEVERITY_WARNING: &str = "http://www.w3.org/ns/shacl#Warning";
pub const SEVERITY_INFO: &str = "http://www.w3.org/ns/shacl#Info";

pub const NODE_KIND_BLANK: &str = "http://www.w3.org/ns/shacl#BlankNode";
pub const NODE_KIND_IRI: &str = "http://www.w3.org/ns/shacl#IRI";
pub const NODE_KIND_LITERAL: &str = "http://www.w3.org/ns/shacl#Literal";
pub const NODE_KIND_BLANK_OR_IRI: &str = "http://www.w3.org/ns/shacl#BlankNodeOrIRI";
pub const NODE_KIND_BLANK_OR_LITERAL: &str = "http://www.w3.org/ns/shacl#BlankNodeOrLiteral";
pub const NODE_KIND_IRI_OR_LITERAL: &str = "http://www.w3.org/ns/shacl#IRIOrLiteral";

pub const MIN_COUNT_COMPONENT: &str = "http://www.w3.org/ns/shacl#MinCountConstraintComponent";
pub const MAX_COUNT_COMPONENT: &str = "http://www.w3.org/ns/shacl#MaxCountConstraintComponent";
pub const DATATYPE_COMPONENT: &str = "http://www.w3.org/ns/shacl#DatatypeConstraintComponent";
pub const CLASS_COMPONENT: &str = "http://www.w3.org/ns/shacl#ClassConstraintComponent";
pub const NODE_KIND_COMPONENT: &str = "http://www.w3.org/ns/shacl#NodeKindConstraintComponent";
pub const PATTERN_COMPONENT: &str = "http://www.w3.org/ns/shacl#PatternConstraintComponent";
pub const MIN_LENGTH_COMPONENT: &str = "http://www.w3.org/ns/shacl#MinLengthConstraintComponent";
pub const MAX_LENGTH_COMPONENT: &str = "http://www.w3.org/ns/shacl#MaxLengthConstraintComponent";
pub const MIN_INCLUSIVE_COMPONENT: &str =
    "http://www.w3.org/ns/shacl#MinInclusiveConstraintComponent";
pub const MAX_INCLUSIVE_COMPONENT: &str =
    "http://www.w3.org/ns/shacl#MaxInclusiveConstraintComponent";
pub const MIN_EXCLUSIVE_COMPONENT: &str =
    "http://www.w3.org/ns/shacl#MinExclusiveConstraintComponent";
pub const MAX_EXCLUSIVE_COMPONENT: &str =
    "http://www.w3.org/ns/shacl#MaxExclusiveConstraintComponent";
pub const HAS_VALUE_COMPONENT: &str = "http://www.w3.org/ns/shacl#HasValueConstraintComponent";
pub const IN_COMPONENT: &str = "http://www.w3.org/ns/shacl#InConstraintComponent";
