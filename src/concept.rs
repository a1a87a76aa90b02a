// Concepts form the type model that frames are typed against. The hierarchy
// is built once and then shared read-only, so it hands out plain ids and
// keeps the ancestor closure of every concept precomputed.

use core::hash::BuildHasherDefault;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use seahash::SeaHasher;

use crate::error::{Result, SubsumeError};

// ------------- Concept -------------
pub type ConceptId = u64;

pub type IdHasher = BuildHasherDefault<SeaHasher>;

pub const ROOT: ConceptId = 0;
pub const ROOT_NAME: &str = "Thing";

#[derive(Debug, PartialEq, Eq)]
pub struct Concept {
    concept: ConceptId,
    name: String,
    parents: Vec<ConceptId>,
}

impl Concept {
    pub fn concept(&self) -> ConceptId {
        self.concept
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn parents(&self) -> &[ConceptId] {
        &self.parents
    }
}
impl fmt::Display for Concept {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}#{}", self.name, self.concept)
    }
}

// ------------- Hierarchy -------------
/// A subsumption hierarchy of concepts.
///
/// Concepts may have several parents, but parents must exist before their
/// children are created, which keeps the hierarchy acyclic by construction.
/// `subsumes(a, b)` holds when `a == b` or `a` is an ancestor of `b`.
#[derive(Debug)]
pub struct Hierarchy {
    kept: HashMap<String, Arc<Concept>>,
    lookup: HashMap<ConceptId, Arc<Concept>, IdHasher>,
    // reflexive-transitive closure of the parent relation
    ancestors: HashMap<ConceptId, HashSet<ConceptId, IdHasher>, IdHasher>,
    next: ConceptId,
}

impl Hierarchy {
    pub fn new() -> Self {
        let mut hierarchy = Self {
            kept: HashMap::new(),
            lookup: HashMap::default(),
            ancestors: HashMap::default(),
            next: ROOT,
        };
        hierarchy.keep(ROOT_NAME.to_owned(), Vec::new());
        hierarchy
    }

    fn keep(&mut self, name: String, parents: Vec<ConceptId>) -> ConceptId {
        let concept = self.next;
        self.next += 1;
        let mut closure = HashSet::<ConceptId, IdHasher>::default();
        closure.insert(concept);
        for parent in &parents {
            if let Some(above) = self.ancestors.get(parent) {
                closure.extend(above.iter().copied());
            }
        }
        let kept = Arc::new(Concept {
            concept,
            name: name.clone(),
            parents,
        });
        self.ancestors.insert(concept, closure);
        self.lookup.insert(concept, Arc::clone(&kept));
        self.kept.insert(name, kept);
        concept
    }

    /// Creates a concept below the given parents, or returns the existing id
    /// when a concept of that name was already created with the same parents.
    /// An empty parent list places the concept directly below the root.
    pub fn create_concept(&mut self, name: &str, parents: &[ConceptId]) -> Result<ConceptId> {
        let mut parents: Vec<ConceptId> = if parents.is_empty() {
            vec![ROOT]
        } else {
            parents.to_vec()
        };
        parents.sort_unstable();
        parents.dedup();
        if let Some(unknown) = parents.iter().find(|p| !self.lookup.contains_key(p)) {
            return Err(SubsumeError::UnknownConcept(format!(
                "parent #{unknown} of `{name}`"
            )));
        }
        if let Some(existing) = self.kept.get(name) {
            if existing.parents == parents || name == ROOT_NAME {
                return Ok(existing.concept);
            }
            return Err(SubsumeError::InvalidFrame(format!(
                "concept `{name}` already exists with different parents"
            )));
        }
        let concept = self.keep(name.to_owned(), parents);
        tracing::debug!(concept, name, "concept created");
        Ok(concept)
    }

    pub fn root(&self) -> ConceptId {
        ROOT
    }
    pub fn id(&self, name: &str) -> Result<ConceptId> {
        self.kept
            .get(name)
            .map(|c| c.concept)
            .ok_or_else(|| SubsumeError::UnknownConcept(name.to_owned()))
    }
    pub fn concept(&self, concept: ConceptId) -> Option<Arc<Concept>> {
        self.lookup.get(&concept).map(Arc::clone)
    }
    pub fn name(&self, concept: ConceptId) -> &str {
        self.lookup
            .get(&concept)
            .map(|c| c.name.as_str())
            .unwrap_or("?")
    }

    /// True when `general` is `specific` or one of its ancestors. Unknown ids
    /// subsume nothing and are subsumed by nothing.
    pub fn subsumes(&self, general: ConceptId, specific: ConceptId) -> bool {
        self.ancestors
            .get(&specific)
            .is_some_and(|above| above.contains(&general))
    }

    /// Every concept subsumed by `general`, including itself.
    pub fn descendants(&self, general: ConceptId) -> Vec<ConceptId> {
        let mut below: Vec<ConceptId> = self
            .ancestors
            .iter()
            .filter(|(_, above)| above.contains(&general))
            .map(|(concept, _)| *concept)
            .collect();
        below.sort_unstable();
        below
    }

    pub fn len(&self) -> usize {
        self.kept.len()
    }
}

impl Default for Hierarchy {
    fn default() -> Self {
        Self::new()
    }
}
