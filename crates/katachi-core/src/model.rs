//! RDF term and triple model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Frequently used RDF vocabulary IRIs
pub mod rdf {
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    pub const FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
    pub const REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
    pub const NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";
    pub const LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";
}

/// XML Schema datatype IRIs used for literal typing
pub mod xsd {
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    pub const DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
    pub const DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
}

/// IRI wrapper for type safety
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Iri(pub String);

impl Iri {
    pub fn new<S: Into<String>>(s: S) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Iri {
    fn from(s: &str) -> Self {
        Iri::new(s)
    }
}

/// RDF literal: lexical form plus optional datatype and language tag
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Literal {
    pub value: String,
    pub datatype: Option<String>,
    pub language: Option<String>,
}

impl Literal {
    /// Plain string literal (xsd:string, as RDF 1.1 mandates)
    pub fn string<S: Into<String>>(value: S) -> Self {
        Self {
            value: value.into(),
            datatype: Some(xsd::STRING.to_string()),
            language: None,
        }
    }

    pub fn typed<S: Into<String>, D: Into<String>>(value: S, datatype: D) -> Self {
        Self {
            value: value.into(),
            datatype: Some(datatype.into()),
            language: None,
        }
    }

    pub fn lang_tagged<S: Into<String>, L: Into<String>>(value: S, language: L) -> Self {
        Self {
            value: value.into(),
            datatype: Some(rdf::LANG_STRING.to_string()),
            language: Some(language.into()),
        }
    }

    /// Datatype IRI, defaulting per RDF 1.1 when absent
    pub fn datatype_or_default(&self) -> &str {
        match &self.datatype {
            Some(dt) => dt,
            None if self.language.is_some() => rdf::LANG_STRING,
            None => xsd::STRING,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.value)?;
        if let Some(lang) = &self.language {
            write!(f, "@{}", lang)?;
        } else if let Some(dt) = &self.datatype {
            if dt != xsd::STRING {
                write!(f, "^^<{}>", dt)?;
            }
        }
        Ok(())
    }
}

/// RDF term: IRI, blank node or literal
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Term {
    Iri(Iri),
    Blank(String),
    Literal(Literal),
}

impl Term {
    pub fn iri<S: Into<String>>(s: S) -> Self {
        Term::Iri(Iri::new(s))
    }

    pub fn blank<S: Into<String>>(s: S) -> Self {
        Term::Blank(s.into())
    }

    pub fn string<S: Into<String>>(s: S) -> Self {
        Term::Literal(Literal::string(s))
    }

    pub fn as_iri(&self) -> Option<&Iri> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    pub fn is_iri(&self) -> bool {
        matches!(self, Term::Iri(_))
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Term::Blank(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal(_))
    }

    /// Lexical text of the term: IRI string, blank label or literal value
    pub fn lexical(&self) -> &str {
        match self {
            Term::Iri(iri) => iri.as_str(),
            Term::Blank(id) => id,
            Term::Literal(lit) => &lit.value,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "{}", iri),
            Term::Blank(id) => write!(f, "_:{}", id),
            Term::Literal(lit) => write!(f, "{}", lit),
        }
    }
}

/// RDF triple with a typed subject/object and an IRI predicate
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Triple {
    pub subject: Term,
    pub predicate: Iri,
    pub object: Term,
}

impl Triple {
    pub fn new(subject: Term, predicate: Iri, object: Term) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}> {}", self.subject, self.predicate, self.object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_datatype_defaults() {
        let plain = Literal {
            value: "x".to_string(),
            datatype: None,
            language: None,
        };
        assert_eq!(plain.datatype_or_default(), xsd::STRING);

        let tagged = Literal {
            value: "x".to_string(),
            datatype: None,
            language: Some("en".to_string()),
        };
        assert_eq!(tagged.datatype_or_default(), rdf::LANG_STRING);
    }

    #[test]
    fn term_display() {
        assert_eq!(Term::iri("http://example.org/a").to_string(), "http://example.org/a");
        assert_eq!(Term::blank("b0").to_string(), "_:b0");
        assert_eq!(Term::string("hi").to_string(), "\"hi\"");
        assert_eq!(
            Term::Literal(Literal::typed("5", xsd::INTEGER)).to_string(),
            "\"5\"^^<http://www.w3.org/2001/XMLSchema#integer>"
        );
    }

    #[test]
    fn triple_equality() {
        let a = Triple::new(Term::iri("s"), Iri::new("p"), Term::string("o"));
        let b = Triple::new(Term::iri("s"), Iri::new("p"), Term::string("o"));
        let c = Triple::new(Term::iri("s"), Iri::new("p"), Term::string("other"));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
