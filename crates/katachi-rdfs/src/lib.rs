//! RDFS (RDF Schema) inference
//!
//! Implements the RDFS entailment rules needed before SHACL validation:
//! - transitive closure of rdfs:subClassOf and rdfs:subPropertyOf
//! - property assertion propagation along the property hierarchy
//! - rdf:type inference from rdfs:domain and rdfs:range
//! - rdf:type propagation along the class hierarchy

use katachi_core::model::{rdf, Iri, Term, Triple};
use katachi_core::GraphStore;
use std::collections::{HashMap, HashSet};

/// RDFS vocabulary IRIs
pub mod vocabulary {
    pub const RDFS_SUBCLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";
    pub const RDFS_SUBPROPERTY_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subPropertyOf";
    pub const RDFS_DOMAIN: &str = "http://www.w3.org/2000/01/rdf-schema#domain";
    pub const RDFS_RANGE: &str = "http://www.w3.org/2000/01/rdf-schema#range";
}

/// RDFS inference engine
#[derive(Debug, Default)]
pub struct RdfsReasoner {
    /// Class hierarchy: subclass -> superclasses
    class_hierarchy: HashMap<Iri, HashSet<Iri>>,
    /// Property hierarchy: subproperty -> superproperties
    property_hierarchy: HashMap<Iri, HashSet<Iri>>,
    /// Domain constraints: property -> classes
    domain_constraints: HashMap<Iri, HashSet<Iri>>,
    /// Range constraints: property -> classes
    range_constraints: HashMap<Iri, HashSet<Iri>>,
    /// Inferred triples
    inferred: HashSet<Triple>,
}

impl RdfsReasoner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the RDFS schema triples from the store and compute the closure.
    ///
    /// Property assertions are propagated (rdfs7) before domain/range typing
    /// so that a superproperty's domain also types subjects of its
    /// subproperties.
    pub fn compute_closure(&mut self, store: &GraphStore) -> Vec<Triple> {
        self.load_schema(store);
        self.close_hierarchies();
        self.infer_property_assertions(store);
        self.infer_types(store);
        self.inferred.iter().cloned().collect()
    }

    pub fn inferred(&self) -> &HashSet<Triple> {
        &self.inferred
    }

    pub fn class_hierarchy(&self) -> &HashMap<Iri, HashSet<Iri>> {
        &self.class_hierarchy
    }

    fn load_schema(&mut self, store: &GraphStore) {
        for triple in store.iter() {
            let predicate = triple.predicate.as_str();
            if predicate == vocabulary::RDFS_SUBCLASS_OF
                || predicate == vocabulary::RDFS_SUBPROPERTY_OF
                || predicate == vocabulary::RDFS_DOMAIN
                || predicate == vocabulary::RDFS_RANGE
            {
                // Blank-node classes (OWL restriction style) and literal
                // objects carry no entailments here; skip them
                let (Term::Iri(subject), Term::Iri(object)) = (&triple.subject, &triple.object)
                else {
                    continue;
                };
                let target = match predicate {
                    vocabulary::RDFS_SUBCLASS_OF => &mut self.class_hierarchy,
                    vocabulary::RDFS_SUBPROPERTY_OF => &mut self.property_hierarchy,
                    vocabulary::RDFS_DOMAIN => &mut self.domain_constraints,
                    _ => &mut self.range_constraints,
                };
                target
                    .entry(subject.clone())
                    .or_default()
                    .insert(object.clone());
            }
        }
    }

    /// Transitive closure of both hierarchies
    fn close_hierarchies(&mut self) {
        close_hierarchy(&mut self.class_hierarchy);
        close_hierarchy(&mut self.property_hierarchy);

        for (child, parents) in &self.class_hierarchy {
            for parent in parents {
                if child != parent {
                    self.inferred.insert(Triple::new(
                        Term::Iri(child.clone()),
                        Iri::new(vocabulary::RDFS_SUBCLASS_OF),
                        Term::Iri(parent.clone()),
                    ));
                }
            }
        }
        for (child, parents) in &self.property_hierarchy {
            for parent in parents {
                if child != parent {
                    self.inferred.insert(Triple::new(
                        Term::Iri(child.clone()),
                        Iri::new(vocabulary::RDFS_SUBPROPERTY_OF),
                        Term::Iri(parent.clone()),
                    ));
                }
            }
        }
    }

    /// Rule rdfs7: (s p o), p rdfs:subPropertyOf q  =>  (s q o)
    fn infer_property_assertions(&mut self, store: &GraphStore) {
        for triple in store.iter() {
            if let Some(superproperties) = self.property_hierarchy.get(&triple.predicate) {
                for superproperty in superproperties {
                    if superproperty != &triple.predicate {
                        self.inferred.insert(Triple::new(
                            triple.subject.clone(),
                            superproperty.clone(),
                            triple.object.clone(),
                        ));
                    }
                }
            }
        }
    }

    /// rdf:type inference (rules rdfs2, rdfs3, rdfs9), over both asserted
    /// and previously inferred property assertions
    fn infer_types(&mut self, store: &GraphStore) {
        let rdf_type = Iri::new(rdf::TYPE);

        let assertions: Vec<Triple> = store
            .iter()
            .cloned()
            .chain(self.inferred.iter().cloned())
            .collect();
        for triple in &assertions {
            // Domain: (s p o), p rdfs:domain C  =>  s rdf:type C
            if let Some(classes) = self.domain_constraints.get(&triple.predicate) {
                for class in classes {
                    self.inferred.insert(Triple::new(
                        triple.subject.clone(),
                        rdf_type.clone(),
                        Term::Iri(class.clone()),
                    ));
                }
            }
            // Range: (s p o), p rdfs:range C  =>  o rdf:type C
            if let Some(classes) = self.range_constraints.get(&triple.predicate) {
                if !triple.object.is_literal() {
                    for class in classes {
                        self.inferred.insert(Triple::new(
                            triple.object.clone(),
                            rdf_type.clone(),
                            Term::Iri(class.clone()),
                        ));
                    }
                }
            }
        }

        // Subclass: (x rdf:type A), A rdfs:subClassOf B  =>  x rdf:type B.
        // Applies to asserted and just-inferred types alike.
        let mut pending: Vec<Triple> = store
            .find(None, Some(&rdf_type), None)
            .into_iter()
            .cloned()
            .chain(
                self.inferred
                    .iter()
                    .filter(|t| t.predicate == rdf_type)
                    .cloned(),
            )
            .collect();
        let mut propagated = Vec::new();
        for triple in pending.drain(..) {
            if let Term::Iri(class) = &triple.object {
                if let Some(superclasses) = self.class_hierarchy.get(class) {
                    for superclass in superclasses {
                        propagated.push(Triple::new(
                            triple.subject.clone(),
                            rdf_type.clone(),
                            Term::Iri(superclass.clone()),
                        ));
                    }
                }
            }
        }
        self.inferred.extend(propagated);
    }
}

/// Fixpoint transitive closure of a parent map
fn close_hierarchy(hierarchy: &mut HashMap<Iri, HashSet<Iri>>) {
    let mut changed = true;
    while changed {
        changed = false;
        let snapshot = hierarchy.clone();
        for (child, parents) in snapshot.iter() {
            let mut all = hierarchy.get(child).cloned().unwrap_or_default();
            for parent in parents {
                if let Some(grandparents) = snapshot.get(parent) {
                    for grandparent in grandparents {
                        if all.insert(grandparent.clone()) {
                            changed = true;
                        }
                    }
                }
            }
            hierarchy.insert(child.clone(), all);
        }
    }
}

/// Compute the RDFS closure of the store and insert the inferred triples.
///
/// Returns the number of newly added triples.
pub fn expand(store: &mut GraphStore) -> usize {
    let before = store.len();
    let mut reasoner = RdfsReasoner::new();
    let inferred = reasoner.compute_closure(store);
    store.extend(inferred);
    store.len() - before
}
