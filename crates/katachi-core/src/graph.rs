//! Indexed in-memory graph store

use crate::model::{Iri, Term, Triple};
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};

/// In-memory RDF graph with indexing for fast pattern queries.
///
/// Triples are deduplicated on insert, so merging overlapping graphs
/// yields their triple-wise union.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    triples: Vec<Triple>,
    seen: HashSet<Triple>,
    /// Subject index: subject -> triple indices
    subject_index: HashMap<Term, SmallVec<[usize; 8]>>,
    /// Predicate index: predicate -> triple indices
    predicate_index: HashMap<Iri, SmallVec<[usize; 8]>>,
    /// Object index: object -> triple indices
    object_index: HashMap<Term, SmallVec<[usize; 8]>>,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a triple; duplicates are ignored. Returns true if inserted.
    pub fn insert(&mut self, triple: Triple) -> bool {
        if !self.seen.insert(triple.clone()) {
            return false;
        }
        let index = self.triples.len();
        self.subject_index
            .entry(triple.subject.clone())
            .or_default()
            .push(index);
        self.predicate_index
            .entry(triple.predicate.clone())
            .or_default()
            .push(index);
        self.object_index
            .entry(triple.object.clone())
            .or_default()
            .push(index);
        self.triples.push(triple);
        true
    }

    /// Merge all triples of another store into this one
    pub fn merge(&mut self, other: GraphStore) {
        for triple in other.triples {
            self.insert(triple);
        }
    }

    /// Relabel every blank node with the given prefix.
    ///
    /// Blank node labels are scoped to the document they were parsed from;
    /// prefixing keeps those scopes apart when graphs from separate files
    /// are merged.
    pub fn with_blank_prefix(self, prefix: &str) -> GraphStore {
        let rename = |term: Term| match term {
            Term::Blank(id) => Term::Blank(format!("{}{}", prefix, id)),
            other => other,
        };
        let mut store = GraphStore::new();
        for triple in self.triples {
            store.insert(Triple::new(
                rename(triple.subject),
                triple.predicate,
                rename(triple.object),
            ));
        }
        store
    }

    pub fn extend<I: IntoIterator<Item = Triple>>(&mut self, triples: I) {
        for triple in triples {
            self.insert(triple);
        }
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Find triples matching a pattern, using the most selective index
    pub fn find(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Iri>,
        object: Option<&Term>,
    ) -> Vec<&Triple> {
        let candidates: SmallVec<[usize; 8]> = match (subject, predicate, object) {
            (Some(s), Some(p), Some(o)) => self.intersect(
                self.intersect(
                    self.subject_index.get(s).map(|v| v.as_slice()).unwrap_or(&[]),
                    self.predicate_index.get(p).map(|v| v.as_slice()).unwrap_or(&[]),
                )
                .as_slice(),
                self.object_index.get(o).map(|v| v.as_slice()).unwrap_or(&[]),
            ),
            (Some(s), Some(p), None) => self.intersect(
                self.subject_index.get(s).map(|v| v.as_slice()).unwrap_or(&[]),
                self.predicate_index.get(p).map(|v| v.as_slice()).unwrap_or(&[]),
            ),
            (Some(s), None, Some(o)) => self.intersect(
                self.subject_index.get(s).map(|v| v.as_slice()).unwrap_or(&[]),
                self.object_index.get(o).map(|v| v.as_slice()).unwrap_or(&[]),
            ),
            (None, Some(p), Some(o)) => self.intersect(
                self.predicate_index.get(p).map(|v| v.as_slice()).unwrap_or(&[]),
                self.object_index.get(o).map(|v| v.as_slice()).unwrap_or(&[]),
            ),
            (Some(s), None, None) => self.subject_index.get(s).cloned().unwrap_or_default(),
            (None, Some(p), None) => self.predicate_index.get(p).cloned().unwrap_or_default(),
            (None, None, Some(o)) => self.object_index.get(o).cloned().unwrap_or_default(),
            (None, None, None) => (0..self.triples.len()).collect(),
        };

        candidates
            .iter()
            .filter_map(|&i| self.triples.get(i))
            .collect()
    }

    /// True if the exact triple is present
    pub fn contains(&self, subject: &Term, predicate: &Iri, object: &Term) -> bool {
        let triple = Triple {
            subject: subject.clone(),
            predicate: predicate.clone(),
            object: object.clone(),
        };
        self.seen.contains(&triple)
    }

    /// Objects of all (subject, predicate, _) triples
    pub fn objects(&self, subject: &Term, predicate: &Iri) -> Vec<&Term> {
        self.find(Some(subject), Some(predicate), None)
            .into_iter()
            .map(|t| &t.object)
            .collect()
    }

    /// The single object of (subject, predicate, _), if exactly one exists
    pub fn object(&self, subject: &Term, predicate: &Iri) -> Option<&Term> {
        let mut objects = self.objects(subject, predicate);
        if objects.len() == 1 {
            objects.pop()
        } else {
            None
        }
    }

    /// Subjects of all (_, predicate, object) triples
    pub fn subjects_with(&self, predicate: &Iri, object: &Term) -> Vec<&Term> {
        self.find(None, Some(predicate), Some(object))
            .into_iter()
            .map(|t| &t.subject)
            .collect()
    }

    /// Subjects of any triple with the given predicate
    pub fn subjects_of(&self, predicate: &Iri) -> Vec<&Term> {
        self.find(None, Some(predicate), None)
            .into_iter()
            .map(|t| &t.subject)
            .collect()
    }

    /// Objects of any triple with the given predicate
    pub fn objects_of(&self, predicate: &Iri) -> Vec<&Term> {
        self.find(None, Some(predicate), None)
            .into_iter()
            .map(|t| &t.object)
            .collect()
    }

    /// Intersect two index vectors; indices are pushed in increasing order
    fn intersect(&self, a: &[usize], b: &[usize]) -> SmallVec<[usize; 8]> {
        let mut result = SmallVec::new();
        let mut i = 0;
        let mut j = 0;
        while i < a.len() && j < b.len() {
            match a[i].cmp(&b[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    result.push(a[i]);
                    i += 1;
                    j += 1;
                }
            }
        }
        result
    }
}

impl IntoIterator for GraphStore {
    type Item = Triple;
    type IntoIter = std::vec::IntoIter<Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::rdf;

    fn triple(s: &str, p: &str, o: &str) -> Triple {
        Triple::new(Term::iri(s), Iri::new(p), Term::iri(o))
    }

    #[test]
    fn insert_deduplicates() {
        let mut store = GraphStore::new();
        assert!(store.insert(triple("s", "p", "o")));
        assert!(!store.insert(triple("s", "p", "o")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn find_by_pattern() {
        let mut store = GraphStore::new();
        store.insert(triple("a", rdf::TYPE, "Person"));
        store.insert(triple("b", rdf::TYPE, "Person"));
        store.insert(triple("a", "knows", "b"));

        let typed = store.find(None, Some(&Iri::new(rdf::TYPE)), None);
        assert_eq!(typed.len(), 2);

        let a_knows = store.find(Some(&Term::iri("a")), Some(&Iri::new("knows")), None);
        assert_eq!(a_knows.len(), 1);
        assert_eq!(a_knows[0].object, Term::iri("b"));

        assert!(store.contains(&Term::iri("a"), &Iri::new("knows"), &Term::iri("b")));
        assert!(!store.contains(&Term::iri("b"), &Iri::new("knows"), &Term::iri("a")));
    }

    #[test]
    fn merge_is_union() {
        let mut left = GraphStore::new();
        left.insert(triple("a", "p", "b"));
        left.insert(triple("a", "p", "c"));

        let mut right = GraphStore::new();
        right.insert(triple("a", "p", "c"));
        right.insert(triple("d", "p", "e"));

        left.merge(right);
        assert_eq!(left.len(), 3);
    }

    #[test]
    fn blank_prefix_keeps_documents_apart() {
        // Two documents reusing the same blank label must not be conflated
        let mut first = GraphStore::new();
        first.insert(Triple::new(Term::blank("b0"), Iri::new("p"), Term::iri("x")));
        let mut second = GraphStore::new();
        second.insert(Triple::new(Term::blank("b0"), Iri::new("p"), Term::iri("y")));

        let mut merged = GraphStore::new();
        merged.merge(first.with_blank_prefix("f0-"));
        merged.merge(second.with_blank_prefix("f1-"));

        assert_eq!(merged.len(), 2);
        let subjects = merged.subjects_of(&Iri::new("p"));
        assert_eq!(subjects.len(), 2);
        assert!(subjects.contains(&&Term::blank("f0-b0")));
        assert!(subjects.contains(&&Term::blank("f1-b0")));
    }

    #[test]
    fn objects_and_subjects() {
        let mut store = GraphStore::new();
        store.insert(triple("a", "p", "b"));
        store.insert(triple("a", "p", "c"));
        store.insert(triple("x", "q", "b"));

        let objects = store.objects(&Term::iri("a"), &Iri::new("p"));
        assert_eq!(objects.len(), 2);

        let subjects = store.subjects_with(&Iri::new("p"), &Term::iri("c"));
        assert_eq!(subjects, vec![&Term::iri("a")]);

        assert_eq!(store.object(&Term::iri("x"), &Iri::new("q")), Some(&Term::iri("b")));
        assert_eq!(store.object(&Term::iri("a"), &Iri::new("p")), None);
    }
}
