use std::collections::HashMap;
use std::sync::Arc;

// candidate sets per concept are kept as bitmaps so they can be unioned cheaply
use roaring::RoaringTreemap;
use tracing::{debug, trace};

use crate::concept::{ConceptId, Hierarchy, IdHasher};
use crate::error::{Result, SubsumeError};
use crate::frame::{Frame, Function, Value};
use crate::result::{Identity, MatchResult};

/// The contract every matcher offers to the surrounding store, so that a
/// customised matcher can stand in wherever a plain one is expected.
pub trait Matcher {
    /// Stores an assertion under `identity`, taking ownership of it.
    fn add(&mut self, instance: Frame, identity: Identity) -> Result<()>;
    /// Forgets `identity`; unknown identities are ignored.
    fn remove(&mut self, identity: &Identity) -> Result<()>;
    /// Identities of every stored instance the query subsumes.
    fn match_query(&self, query: &Frame) -> Result<MatchResult>;
    /// The same test applied directly to an in-memory pair.
    fn matches(&self, query: &Frame, instance: &Frame) -> Result<bool>;
    /// Whether instances of `concept` belong to this matcher.
    fn handles_type(&self, concept: ConceptId) -> bool;
}

// ------------- Subsumption -------------
/// Structural subsumption of `instance` by `query`.
///
/// The query concept must subsume the instance concept, and every value of
/// every populated query slot must subsume at least one value of the
/// instance's slot with the same name. Empty query slots constrain nothing.
pub fn frame_subsumes(model: &Hierarchy, query: &Frame, instance: &Frame) -> bool {
    if !model.subsumes(query.concept(), instance.concept()) {
        return false;
    }
    query.slots().iter().filter(|s| !s.is_empty()).all(|slot| {
        let candidates = instance.values(slot.name());
        slot.values().iter().all(|general| {
            candidates
                .iter()
                .any(|specific| value_subsumes(model, general, specific))
        })
    })
}

pub fn value_subsumes(model: &Hierarchy, general: &Value, specific: &Value) -> bool {
    match (general, specific) {
        (Value::Concept(g), Value::Concept(s)) => model.subsumes(*g, *s),
        (Value::Number(g), Value::Number(s)) => g.contains(s),
        (Value::Frame(g), Value::Frame(s)) => frame_subsumes(model, g, s),
        _ => false,
    }
}

// ------------- StructuralMatcher -------------
/// Baseline matcher using nothing but frame subsumption.
pub struct StructuralMatcher {
    model: Arc<Hierarchy>,
    root: ConceptId,
    kept: HashMap<u64, (Identity, Frame), IdHasher>,
    // insertion order of the kept identifiers
    order: Vec<u64>,
    // owns lookups from concept to the instances typed by it
    concept_to_instances: HashMap<ConceptId, RoaringTreemap, IdHasher>,
}

impl StructuralMatcher {
    pub fn new(model: Arc<Hierarchy>, root: ConceptId) -> Self {
        Self {
            model,
            root,
            kept: HashMap::default(),
            order: Vec::new(),
            concept_to_instances: HashMap::default(),
        }
    }
    pub fn model(&self) -> &Arc<Hierarchy> {
        &self.model
    }
    pub fn len(&self) -> usize {
        self.kept.len()
    }
    pub fn is_empty(&self) -> bool {
        self.kept.is_empty()
    }

    fn candidates(&self, query: &Frame) -> RoaringTreemap {
        let mut candidates = RoaringTreemap::new();
        for concept in self.model.descendants(query.concept()) {
            if let Some(instances) = self.concept_to_instances.get(&concept) {
                candidates |= instances;
            }
        }
        candidates
    }

    fn forget(&mut self, id: u64) -> bool {
        match self.kept.remove(&id) {
            Some((_, frame)) => {
                if let Some(instances) = self.concept_to_instances.get_mut(&frame.concept()) {
                    instances.remove(id);
                }
                self.order.retain(|kept| *kept != id);
                true
            }
            None => false,
        }
    }
}

impl Matcher for StructuralMatcher {
    fn add(&mut self, instance: Frame, identity: Identity) -> Result<()> {
        if instance.function() != Function::Assertion {
            return Err(SubsumeError::InvalidFrame(format!(
                "{identity} is a query, only assertions can be stored"
            )));
        }
        if !self.handles_type(instance.concept()) {
            return Err(SubsumeError::InvalidFrame(format!(
                "{identity} has type `{}` outside `{}`",
                self.model.name(instance.concept()),
                self.model.name(self.root)
            )));
        }
        let id = identity.id();
        self.forget(id);
        self.concept_to_instances
            .entry(instance.concept())
            .or_default()
            .insert(id);
        self.order.push(id);
        debug!(%identity, "instance added");
        self.kept.insert(id, (identity, instance));
        Ok(())
    }

    fn remove(&mut self, identity: &Identity) -> Result<()> {
        if self.forget(identity.id()) {
            debug!(%identity, "instance removed");
        }
        Ok(())
    }

    fn match_query(&self, query: &Frame) -> Result<MatchResult> {
        let candidates = self.candidates(query);
        let mut matched = Vec::new();
        for id in &self.order {
            if !candidates.contains(*id) {
                continue;
            }
            if let Some((identity, instance)) = self.kept.get(id) {
                if frame_subsumes(&self.model, query, instance) {
                    matched.push(identity.clone());
                }
            }
        }
        trace!(candidates = candidates.len(), matched = matched.len(), "structural match");
        Ok(MatchResult::Unranked(matched))
    }

    fn matches(&self, query: &Frame, instance: &Frame) -> Result<bool> {
        Ok(frame_subsumes(&self.model, query, instance))
    }

    fn handles_type(&self, concept: ConceptId) -> bool {
        self.model.subsumes(self.root, concept)
    }
}
