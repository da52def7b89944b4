//! Turtle parsing via sophia

use crate::graph::GraphStore;
use crate::model::{Iri, Literal, Term, Triple};
use crate::CoreError;
use sophia::api::source::TripleSource;
use sophia::api::term::Term as SophiaTerm;
use sophia::api::triple::Triple as SophiaTriple;
use sophia::turtle::parser::turtle;

/// Parse a Turtle document into a graph store
pub fn parse_str(src: &str) -> Result<GraphStore, CoreError> {
    let mut store = GraphStore::new();
    turtle::parse_str(src)
        .for_each_triple(|t| {
            let subject = convert_term(t.s());
            let object = convert_term(t.o());
            // Turtle predicates are always IRIs
            let predicate = match convert_term(t.p()) {
                Term::Iri(iri) => iri,
                _ => return,
            };
            store.insert(Triple::new(subject, predicate, object));
        })
        .map_err(|e| CoreError::Turtle(e.to_string()))?;
    Ok(store)
}

fn convert_term<T: SophiaTerm>(term: T) -> Term {
    if let Some(iri) = term.iri() {
        Term::Iri(Iri::new(iri.as_str()))
    } else if let Some(id) = term.bnode_id() {
        Term::Blank(id.as_str().to_string())
    } else {
        let value = term
            .lexical_form()
            .map(|l| l.to_string())
            .unwrap_or_default();
        let language = term.language_tag().map(|t| t.as_str().to_string());
        let datatype = term.datatype().map(|d| d.as_str().to_string());
        Term::Literal(Literal {
            value,
            datatype,
            language,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{rdf, xsd};

    #[test]
    fn parses_prefixed_triples() {
        let src = r#"
            @prefix ex: <http://example.org/> .
            @prefix rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .
            ex:alice rdf:type ex:Person ;
                ex:name "Alice" ;
                ex:age 30 .
        "#;
        let store = parse_str(src).unwrap();
        assert_eq!(store.len(), 3);

        let alice = Term::iri("http://example.org/alice");
        assert!(store.contains(
            &alice,
            &Iri::new(rdf::TYPE),
            &Term::iri("http://example.org/Person")
        ));

        let names = store.objects(&alice, &Iri::new("http://example.org/name"));
        assert_eq!(names, vec![&Term::string("Alice")]);

        let ages = store.objects(&alice, &Iri::new("http://example.org/age"));
        assert_eq!(ages, vec![&Term::Literal(Literal::typed("30", xsd::INTEGER))]);
    }

    #[test]
    fn parses_language_tags() {
        let src = r#"<http://example.org/a> <http://example.org/label> "hei"@no ."#;
        let store = parse_str(src).unwrap();
        let labels = store.objects(
            &Term::iri("http://example.org/a"),
            &Iri::new("http://example.org/label"),
        );
        assert_eq!(labels.len(), 1);
        let lit = labels[0].as_literal().unwrap();
        assert_eq!(lit.value, "hei");
        assert_eq!(lit.language.as_deref(), Some("no"));
    }

    #[test]
    fn rejects_malformed_input() {
        let err = parse_str("this is not turtle at all {").unwrap_err();
        assert!(matches!(err, CoreError::Turtle(_)));
    }
}
