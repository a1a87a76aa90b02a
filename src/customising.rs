// The customising matcher has two states. Instances added while the store is
// still being built are buffered by a `MatcherBuilder`; initialising consumes
// the builder, replays the buffer through the pipeline and yields the
// `CustomisingMatcher`, which is the only state that can answer queries.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::concept::{ConceptId, IdHasher};
use crate::customiser::CustomiserChain;
use crate::error::Result;
use crate::frame::Frame;
use crate::result::{Identity, MatchResult};
use crate::store::Store;
use crate::structural::Matcher;

// ------------- MatcherBuilder -------------
pub struct MatcherBuilder<M: Matcher> {
    core: M,
    pending: Vec<(Identity, Frame)>,
    // identity id to its position in `pending`
    positions: HashMap<u64, usize, IdHasher>,
}

impl<M: Matcher> MatcherBuilder<M> {
    pub fn new(core: M) -> Self {
        Self {
            core,
            pending: Vec::new(),
            positions: HashMap::default(),
        }
    }

    /// Buffers an instance until initialisation. A later add for the same
    /// identity replaces the buffered instance.
    pub fn add(&mut self, instance: Frame, identity: Identity) {
        match self.positions.get(&identity.id()) {
            Some(&position) => self.pending[position] = (identity, instance),
            None => {
                self.positions.insert(identity.id(), self.pending.len());
                self.pending.push((identity, instance));
            }
        }
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn handles_type(&self, concept: ConceptId) -> bool {
        self.core.handles_type(concept)
    }

    /// Binds the store into every customiser and replays the buffered adds
    /// through the full pipeline.
    pub fn initialise(
        self,
        store: Arc<dyn Store>,
        mut chain: CustomiserChain,
    ) -> Result<CustomisingMatcher<M>> {
        chain.initialise(store)?;
        let mut matcher = CustomisingMatcher {
            core: self.core,
            chain,
        };
        let replayed = self.pending.len();
        for (identity, instance) in self.pending {
            matcher.add(instance, identity)?;
        }
        debug!(replayed, customisers = matcher.chain.len(), "matcher initialised");
        Ok(matcher)
    }
}

// ------------- CustomisingMatcher -------------
/// A core matcher wrapped by a customiser chain, offering the same contract.
/// Customisation only narrows what the core matcher accepts.
pub struct CustomisingMatcher<M: Matcher> {
    core: M,
    chain: CustomiserChain,
}

impl<M: Matcher> CustomisingMatcher<M> {
    pub fn core(&self) -> &M {
        &self.core
    }
    pub fn chain(&self) -> &CustomiserChain {
        &self.chain
    }
}

impl<M: Matcher> Matcher for CustomisingMatcher<M> {
    fn add(&mut self, instance: Frame, identity: Identity) -> Result<()> {
        let processed = self.chain.pre_process(&instance)?;
        self.core.add(processed, identity)
    }

    fn remove(&mut self, identity: &Identity) -> Result<()> {
        self.core.remove(identity)
    }

    fn match_query(&self, query: &Frame) -> Result<MatchResult> {
        let processed = self.chain.pre_process(query)?;
        let raw = self.core.match_query(&processed)?;
        trace!(raw = raw.len(), "core matches");
        // customisers need the fields pre-processing stripped
        self.chain.process_matches(&self.core, query, raw)
    }

    fn matches(&self, query: &Frame, instance: &Frame) -> Result<bool> {
        let processed_query = self.chain.pre_process(query)?;
        let processed_instance = self.chain.pre_process(instance)?;
        if self.core.matches(&processed_query, &processed_instance)? {
            self.chain.passes_matches_filter(&self.core, query, instance)
        } else {
            Ok(false)
        }
    }

    fn handles_type(&self, concept: ConceptId) -> bool {
        self.core.handles_type(concept)
    }
}
