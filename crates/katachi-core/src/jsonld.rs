//! JSON-LD to triple conversion
//!
//! Implements the expansion subset needed for data-graph loading:
//! `@context` (`@vocab`, `@base`, prefix and term definitions), `@id`,
//! `@type`, `@graph`, `@value` literals, `@list`, nested node objects and
//! arrays. Remote contexts are not fetched.

use crate::graph::GraphStore;
use crate::model::{rdf, xsd, Iri, Literal, Term, Triple};
use crate::CoreError;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Parse a JSON-LD document into a graph store
pub fn parse_str(src: &str) -> Result<GraphStore, CoreError> {
    let doc: Value = serde_json::from_str(src)?;
    let mut store = GraphStore::new();
    let mut expander = Expander::default();
    expander.expand_document(&doc, &Context::default(), &mut store)?;
    Ok(store)
}

/// Term definition from an `@context`
#[derive(Debug, Clone, Default)]
struct TermDef {
    id: String,
    /// `@type` coercion: "@id" or a datatype IRI
    type_: Option<String>,
}

/// Parsed `@context`
#[derive(Debug, Clone, Default)]
struct Context {
    vocab: Option<String>,
    base: Option<String>,
    terms: HashMap<String, TermDef>,
}

impl Context {
    /// Merge the `@context` entry of a node object into a copy of this context
    fn extended(&self, value: &Value) -> Result<Context, CoreError> {
        let mut ctx = self.clone();
        ctx.merge(value)?;
        Ok(ctx)
    }

    fn merge(&mut self, value: &Value) -> Result<(), CoreError> {
        match value {
            Value::Array(entries) => {
                for entry in entries {
                    self.merge(entry)?;
                }
            }
            Value::Object(map) => {
                // First pass: raw definitions
                let mut raw: HashMap<String, TermDef> = HashMap::new();
                for (key, val) in map {
                    match key.as_str() {
                        "@vocab" => {
                            self.vocab = val.as_str().map(|s| s.to_string());
                        }
                        "@base" => {
                            self.base = val.as_str().map(|s| s.to_string());
                        }
                        _ => {
                            let def = TermDef::parse(key, val)?;
                            raw.insert(key.clone(), def);
                        }
                    }
                }
                // Second pass: resolve compact IRIs in term definitions
                // against both previously known and newly declared prefixes
                let resolved: HashMap<String, TermDef> = raw
                    .iter()
                    .map(|(key, def)| {
                        let mut def = def.clone();
                        def.id = resolve_compact(&def.id, &raw, &self.terms, 0);
                        if let Some(t) = &def.type_ {
                            if t != "@id" {
                                def.type_ = Some(resolve_compact(t, &raw, &self.terms, 0));
                            }
                        }
                        (key.clone(), def)
                    })
                    .collect();
                self.terms.extend(resolved);
            }
            Value::Null => {
                self.vocab = None;
                self.base = None;
                self.terms.clear();
            }
            _ => {
                return Err(CoreError::JsonLd(format!(
                    "unsupported @context value: {}",
                    value
                )))
            }
        }
        Ok(())
    }

    /// Expand a name to an IRI. `vocab` selects `@vocab` (properties and
    /// types) over `@base` (`@id` references) as the default namespace.
    fn expand_iri(&self, name: &str, vocab: bool) -> String {
        // Exact term match first
        if let Some(def) = self.terms.get(name) {
            return def.id.clone();
        }
        // Compact IRI (prefix:suffix)
        if let Some((prefix, suffix)) = name.split_once(':') {
            if prefix == "_" {
                return name.to_string();
            }
            if let Some(def) = self.terms.get(prefix) {
                return format!("{}{}", def.id, suffix);
            }
            // Looks like an absolute IRI
            return name.to_string();
        }
        // Default namespace
        let default = if vocab {
            self.vocab.as_ref()
        } else {
            self.base.as_ref()
        };
        match default {
            Some(ns) => format!("{}{}", ns, name),
            None => name.to_string(),
        }
    }

    fn term_def(&self, name: &str) -> Option<&TermDef> {
        self.terms.get(name)
    }
}

impl TermDef {
    fn parse(key: &str, value: &Value) -> Result<TermDef, CoreError> {
        match value {
            Value::String(id) => Ok(TermDef {
                id: id.clone(),
                type_: None,
            }),
            Value::Object(map) => {
                let id = map
                    .get("@id")
                    .and_then(|v| v.as_str())
                    .unwrap_or(key)
                    .to_string();
                let type_ = map
                    .get("@type")
                    .and_then(|v| v.as_str())
                    .map(|s| s.to_string());
                Ok(TermDef { id, type_ })
            }
            _ => Err(CoreError::JsonLd(format!(
                "invalid term definition for '{}'",
                key
            ))),
        }
    }
}

/// Resolve a possibly-compact IRI against term definitions, following
/// prefix chains up to a fixed depth.
fn resolve_compact(
    name: &str,
    new_terms: &HashMap<String, TermDef>,
    old_terms: &HashMap<String, TermDef>,
    depth: usize,
) -> String {
    if depth >= 8 {
        return name.to_string();
    }
    if let Some((prefix, suffix)) = name.split_once(':') {
        if prefix == "_" {
            return name.to_string();
        }
        let def = new_terms.get(prefix).or_else(|| old_terms.get(prefix));
        if let Some(def) = def {
            let expanded = resolve_compact(&def.id, new_terms, old_terms, depth + 1);
            return format!("{}{}", expanded, suffix);
        }
    }
    name.to_string()
}

/// Walks a JSON-LD document emitting triples; allocates blank node ids
#[derive(Debug, Default)]
struct Expander {
    blank_counter: usize,
}

impl Expander {
    fn fresh_blank(&mut self) -> Term {
        let id = format!("jb{}", self.blank_counter);
        self.blank_counter += 1;
        Term::Blank(id)
    }

    fn expand_document(
        &mut self,
        doc: &Value,
        ctx: &Context,
        store: &mut GraphStore,
    ) -> Result<(), CoreError> {
        match doc {
            Value::Array(nodes) => {
                for node in nodes {
                    self.expand_document(node, ctx, store)?;
                }
                Ok(())
            }
            Value::Object(map) => {
                let ctx = match map.get("@context") {
                    Some(value) => ctx.extended(value)?,
                    None => ctx.clone(),
                };
                if let Some(graph) = map.get("@graph") {
                    match graph {
                        Value::Array(nodes) => {
                            for node in nodes {
                                self.expand_document(node, &ctx, store)?;
                            }
                        }
                        Value::Object(_) => self.expand_document(graph, &ctx, store)?,
                        _ => {
                            return Err(CoreError::JsonLd(
                                "@graph must be a node object or array".to_string(),
                            ))
                        }
                    }
                    // A document may carry both @graph and top-level keys;
                    // only @context/@graph wrappers are common, so other
                    // keys alongside @graph are expanded as a node as well.
                    if map.keys().any(|k| k != "@context" && k != "@graph") {
                        self.expand_node(map, &ctx, store)?;
                    }
                    Ok(())
                } else {
                    self.expand_node(map, &ctx, store)?;
                    Ok(())
                }
            }
            _ => Err(CoreError::JsonLd(
                "top-level JSON-LD value must be an object or array".to_string(),
            )),
        }
    }

    /// Expand one node object, emit its triples, and return its subject term
    fn expand_node(
        &mut self,
        map: &Map<String, Value>,
        ctx: &Context,
        store: &mut GraphStore,
    ) -> Result<Term, CoreError> {
        let ctx = match map.get("@context") {
            Some(value) => ctx.extended(value)?,
            None => ctx.clone(),
        };

        let subject = match map.get("@id").and_then(|v| v.as_str()) {
            Some(id) => make_node_term(&ctx.expand_iri(id, false)),
            None => self.fresh_blank(),
        };

        for (key, value) in map {
            match key.as_str() {
                "@context" | "@id" | "@graph" => continue,
                "@type" => {
                    for item in as_array(value) {
                        if let Some(name) = item.as_str() {
                            store.insert(Triple::new(
                                subject.clone(),
                                Iri::new(rdf::TYPE),
                                Term::iri(ctx.expand_iri(name, true)),
                            ));
                        }
                    }
                }
                _ => {
                    let expanded = ctx.expand_iri(key, true);
                    // Terms that do not expand to an IRI are dropped,
                    // matching standard JSON-LD expansion
                    if !expanded.contains(':') {
                        continue;
                    }
                    let predicate = Iri::new(expanded);
                    let coercion = ctx.term_def(key).and_then(|d| d.type_.clone());
                    for item in as_array(value) {
                        let object = self.expand_value(item, &ctx, coercion.as_deref(), store)?;
                        store.insert(Triple::new(subject.clone(), predicate.clone(), object));
                    }
                }
            }
        }

        Ok(subject)
    }

    /// Expand a property value into an object term, emitting any nested triples
    fn expand_value(
        &mut self,
        value: &Value,
        ctx: &Context,
        coercion: Option<&str>,
        store: &mut GraphStore,
    ) -> Result<Term, CoreError> {
        match value {
            Value::Object(map) if map.contains_key("@value") => {
                expand_value_object(map, ctx)
            }
            Value::Object(map) if map.contains_key("@list") => {
                let items = map
                    .get("@list")
                    .map(as_array)
                    .unwrap_or_default();
                self.expand_list(&items, ctx, coercion, store)
            }
            Value::Object(map) => {
                // Nested node object
                self.expand_node(map, ctx, store)
            }
            Value::String(s) => {
                if coercion == Some("@id") {
                    Ok(make_node_term(&ctx.expand_iri(s, false)))
                } else if let Some(dt) = coercion {
                    Ok(Term::Literal(Literal::typed(s.clone(), dt)))
                } else {
                    Ok(Term::string(s.clone()))
                }
            }
            Value::Bool(b) => Ok(Term::Literal(Literal::typed(b.to_string(), xsd::BOOLEAN))),
            Value::Number(n) => {
                if n.is_i64() || n.is_u64() {
                    Ok(Term::Literal(Literal::typed(n.to_string(), xsd::INTEGER)))
                } else {
                    Ok(Term::Literal(Literal::typed(n.to_string(), xsd::DOUBLE)))
                }
            }
            Value::Null => Err(CoreError::JsonLd("null is not a valid value".to_string())),
            Value::Array(_) => Err(CoreError::JsonLd(
                "nested arrays are not valid JSON-LD".to_string(),
            )),
        }
    }

    /// Emit rdf:first/rdf:rest triples for a list and return its head
    fn expand_list(
        &mut self,
        items: &[&Value],
        ctx: &Context,
        coercion: Option<&str>,
        store: &mut GraphStore,
    ) -> Result<Term, CoreError> {
        let mut head = Term::iri(rdf::NIL);
        for item in items.iter().rev() {
            let object = self.expand_value(item, ctx, coercion, store)?;
            let cell = self.fresh_blank();
            store.insert(Triple::new(cell.clone(), Iri::new(rdf::FIRST), object));
            store.insert(Triple::new(cell.clone(), Iri::new(rdf::REST), head));
            head = cell;
        }
        Ok(head)
    }
}

/// `{"@value": ...}` objects
fn expand_value_object(map: &Map<String, Value>, ctx: &Context) -> Result<Term, CoreError> {
    let value = map
        .get("@value")
        .ok_or_else(|| CoreError::JsonLd("missing @value".to_string()))?;
    let language = map.get("@language").and_then(|v| v.as_str());
    let datatype = map
        .get("@type")
        .and_then(|v| v.as_str())
        .map(|dt| ctx.expand_iri(dt, true));

    let literal = match value {
        Value::String(s) => {
            if let Some(lang) = language {
                Literal::lang_tagged(s.clone(), lang)
            } else if let Some(dt) = datatype {
                Literal::typed(s.clone(), dt)
            } else {
                Literal::string(s.clone())
            }
        }
        Value::Bool(b) => Literal::typed(b.to_string(), datatype.unwrap_or_else(|| xsd::BOOLEAN.to_string())),
        Value::Number(n) => {
            let default = if n.is_i64() || n.is_u64() {
                xsd::INTEGER
            } else {
                xsd::DOUBLE
            };
            Literal::typed(n.to_string(), datatype.unwrap_or_else(|| default.to_string()))
        }
        _ => {
            return Err(CoreError::JsonLd(format!(
                "unsupported @value: {}",
                value
            )))
        }
    };
    Ok(Term::Literal(literal))
}

/// An expanded `@id` string is either a blank node reference or an IRI
fn make_node_term(expanded: &str) -> Term {
    match expanded.strip_prefix("_:") {
        Some(id) => Term::Blank(id.to_string()),
        None => Term::iri(expanded),
    }
}

fn as_array(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_vocab_and_id() {
        let src = r#"{
            "@context": {"@vocab": "http://example.org/"},
            "@id": "http://example.org/alice",
            "@type": "Person",
            "name": "Alice"
        }"#;
        let store = parse_str(src).unwrap();
        let alice = Term::iri("http://example.org/alice");
        assert!(store.contains(
            &alice,
            &Iri::new(rdf::TYPE),
            &Term::iri("http://example.org/Person")
        ));
        assert!(store.contains(
            &alice,
            &Iri::new("http://example.org/name"),
            &Term::string("Alice")
        ));
    }

    #[test]
    fn expands_prefixes_and_graph() {
        let src = r#"{
            "@context": {
                "ex": "http://example.org/",
                "name": {"@id": "ex:name"},
                "knows": {"@id": "ex:knows", "@type": "@id"}
            },
            "@graph": [
                {"@id": "ex:a", "name": "A", "knows": "ex:b"},
                {"@id": "ex:b", "name": "B"}
            ]
        }"#;
        let store = parse_str(src).unwrap();
        assert!(store.contains(
            &Term::iri("http://example.org/a"),
            &Iri::new("http://example.org/knows"),
            &Term::iri("http://example.org/b")
        ));
        assert!(store.contains(
            &Term::iri("http://example.org/b"),
            &Iri::new("http://example.org/name"),
            &Term::string("B")
        ));
    }

    #[test]
    fn typed_and_tagged_values() {
        let src = r#"{
            "@context": {"@vocab": "http://example.org/"},
            "@id": "http://example.org/x",
            "age": 30,
            "height": 1.75,
            "label": {"@value": "hei", "@language": "no"},
            "born": {"@value": "1990-01-01", "@type": "http://www.w3.org/2001/XMLSchema#date"}
        }"#;
        let store = parse_str(src).unwrap();
        let x = Term::iri("http://example.org/x");
        assert!(store.contains(
            &x,
            &Iri::new("http://example.org/age"),
            &Term::Literal(Literal::typed("30", xsd::INTEGER))
        ));
        assert!(store.contains(
            &x,
            &Iri::new("http://example.org/height"),
            &Term::Literal(Literal::typed("1.75", xsd::DOUBLE))
        ));
        assert!(store.contains(
            &x,
            &Iri::new("http://example.org/label"),
            &Term::Literal(Literal::lang_tagged("hei", "no"))
        ));
        assert!(store.contains(
            &x,
            &Iri::new("http://example.org/born"),
            &Term::Literal(Literal::typed(
                "1990-01-01",
                "http://www.w3.org/2001/XMLSchema#date"
            ))
        ));
    }

    #[test]
    fn nested_nodes_become_blank_subjects() {
        let src = r#"{
            "@context": {"@vocab": "http://example.org/"},
            "@id": "http://example.org/x",
            "address": {"city": "Oslo"}
        }"#;
        let store = parse_str(src).unwrap();
        let x = Term::iri("http://example.org/x");
        let addresses = store.objects(&x, &Iri::new("http://example.org/address"));
        assert_eq!(addresses.len(), 1);
        assert!(addresses[0].is_blank());
        let city = store.objects(addresses[0], &Iri::new("http://example.org/city"));
        assert_eq!(city, vec![&Term::string("Oslo")]);
    }

    #[test]
    fn lists_expand_to_rdf_lists() {
        let src = r#"{
            "@context": {"@vocab": "http://example.org/"},
            "@id": "http://example.org/x",
            "items": {"@list": ["a", "b"]}
        }"#;
        let store = parse_str(src).unwrap();
        let x = Term::iri("http://example.org/x");
        let heads = store.objects(&x, &Iri::new("http://example.org/items"));
        assert_eq!(heads.len(), 1);
        let first = store.objects(heads[0], &Iri::new(rdf::FIRST));
        assert_eq!(first, vec![&Term::string("a")]);
    }

    #[test]
    fn rejects_non_json() {
        assert!(matches!(parse_str("@prefix ex: ."), Err(CoreError::Json(_))));
    }
}
