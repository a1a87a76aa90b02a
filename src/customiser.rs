use std::sync::Arc;

use tracing::{debug, trace};

use crate::concept::{ConceptId, Hierarchy};
use crate::error::{Result, SubsumeError};
use crate::filter::filter;
use crate::frame::Frame;
use crate::result::MatchResult;
use crate::store::Store;
use crate::structural::Matcher;

// ------------- StoreBinding -------------
/// The store a customiser acquires once the pipeline is initialised.
#[derive(Default)]
pub struct StoreBinding {
    store: Option<Arc<dyn Store>>,
}

impl StoreBinding {
    pub fn bind(&mut self, store: Arc<dyn Store>, owner: &str) -> Result<()> {
        if self.store.is_some() {
            return Err(SubsumeError::AlreadyInitialised(owner.to_owned()));
        }
        self.store = Some(store);
        Ok(())
    }
    pub fn get(&self, owner: &str) -> Result<&dyn Store> {
        self.store
            .as_deref()
            .ok_or_else(|| SubsumeError::NotInitialised(format!("{owner} has no store")))
    }
    pub fn is_bound(&self) -> bool {
        self.store.is_some()
    }
}

// ------------- Customiser -------------
/// A pre/post-processing unit around the structural matcher, bound to the
/// one concept type whose instances it understands.
///
/// `pre_process` clears the fields the customisation reasons about, so the
/// structural matcher does not misread them. `process_matches` and
/// `passes_matches_filter` then receive the original query, which still
/// carries those fields, and must agree with each other: an instance passes
/// iff it would survive `process_matches` on its own.
///
/// Both also receive the core matcher. Sub-frames are compared with its
/// `matches`, never with a subsumption test of the customiser's own.
pub trait Customiser {
    fn name(&self) -> &str;
    fn matching_type(&self) -> ConceptId;

    /// Type-specific part of the handling test; the chain has already
    /// checked that the frame's type is below `matching_type`.
    fn handles(&self, frame: &Frame) -> bool;

    fn pre_process(&self, frame: &Frame) -> Result<Frame>;

    fn passes_matches_filter(
        &self,
        core: &dyn Matcher,
        query: &Frame,
        instance: &Frame,
    ) -> Result<bool>;

    fn binding(&self) -> &StoreBinding;
    fn binding_mut(&mut self) -> &mut StoreBinding;

    fn initialise(&mut self, store: Arc<dyn Store>) -> Result<()> {
        let owner = self.name().to_owned();
        self.binding_mut().bind(store, &owner)
    }

    fn store(&self) -> Result<&dyn Store> {
        self.binding().get(self.name())
    }

    fn process_matches(
        &self,
        core: &dyn Matcher,
        query: &Frame,
        raw: MatchResult,
    ) -> Result<MatchResult> {
        filter(raw, self.store()?, |instance| {
            self.passes_matches_filter(core, query, instance)
        })
    }
}

// ------------- CustomiserChain -------------
struct Entry {
    matching_type: ConceptId,
    customiser: Box<dyn Customiser>,
}

/// Customisers in registration order. Every stage walks them in that order.
pub struct CustomiserChain {
    model: Arc<Hierarchy>,
    entries: Vec<Entry>,
}

impl CustomiserChain {
    pub fn new(model: Arc<Hierarchy>) -> Self {
        Self {
            model,
            entries: Vec::new(),
        }
    }

    pub fn register<C: Customiser + 'static>(self, customiser: C) -> Self {
        self.register_boxed(Box::new(customiser))
    }

    pub fn register_boxed(mut self, customiser: Box<dyn Customiser>) -> Self {
        debug!(
            customiser = customiser.name(),
            matching_type = self.model.name(customiser.matching_type()),
            position = self.entries.len(),
            "customiser registered"
        );
        self.entries.push(Entry {
            matching_type: customiser.matching_type(),
            customiser,
        });
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.customiser.name()).collect()
    }

    fn handles(&self, entry: &Entry, frame: &Frame) -> bool {
        self.model.subsumes(entry.matching_type, frame.concept()) && entry.customiser.handles(frame)
    }

    fn handling<'a>(&'a self, frame: &'a Frame) -> impl Iterator<Item = &'a dyn Customiser> + 'a {
        self.entries
            .iter()
            .filter(move |entry| self.handles(entry, frame))
            .map(|entry| entry.customiser.as_ref())
    }

    pub(crate) fn initialise(&mut self, store: Arc<dyn Store>) -> Result<()> {
        for entry in self.entries.iter_mut() {
            entry.customiser.initialise(Arc::clone(&store))?;
        }
        Ok(())
    }

    /// Each handling customiser transforms the output of the previous one.
    pub fn pre_process(&self, frame: &Frame) -> Result<Frame> {
        let mut processed = frame.clone();
        for entry in &self.entries {
            if self.handles(entry, &processed) {
                trace!(customiser = entry.customiser.name(), "pre-processing");
                processed = entry.customiser.pre_process(&processed)?;
            }
        }
        Ok(processed)
    }

    /// Threads the result through every customiser handling the query.
    pub fn process_matches(
        &self,
        core: &dyn Matcher,
        query: &Frame,
        raw: MatchResult,
    ) -> Result<MatchResult> {
        let mut result = raw;
        for customiser in self.handling(query) {
            let before = result.len();
            result = customiser.process_matches(core, query, result)?;
            trace!(
                customiser = customiser.name(),
                before,
                after = result.len(),
                "processed matches"
            );
        }
        Ok(result)
    }

    pub fn passes_matches_filter(
        &self,
        core: &dyn Matcher,
        query: &Frame,
        instance: &Frame,
    ) -> Result<bool> {
        for customiser in self.handling(query) {
            if !customiser.passes_matches_filter(core, query, instance)? {
                trace!(customiser = customiser.name(), "rejected instance");
                return Ok(false);
            }
        }
        Ok(true)
    }
}
