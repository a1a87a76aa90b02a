use std::sync::Arc;

use crate::concept::{ConceptId, Hierarchy};
use crate::customiser::{Customiser, StoreBinding};
use crate::error::{Result, SubsumeError};
use crate::frame::{Frame, SlotPath};
use crate::result::MatchResult;
use crate::structural::Matcher;

/// Orders matches by how many optional query criteria they meet.
///
/// The optional criteria never exclude anything: they are stripped before
/// the structural match, and afterwards every candidate scores one point per
/// optional value that subsumes its ranking section.
pub struct Ranker {
    model: Arc<Hierarchy>,
    matching_type: ConceptId,
    optional: SlotPath,
    ranking: SlotPath,
    binding: StoreBinding,
}

impl Ranker {
    pub fn new(
        model: Arc<Hierarchy>,
        matching_type: ConceptId,
        optional: SlotPath,
        ranking: SlotPath,
    ) -> Self {
        Self {
            model,
            matching_type,
            optional,
            ranking,
            binding: StoreBinding::default(),
        }
    }

    // one single-field query per optional value, typed by the root so that
    // only the field itself is compared
    fn probes(&self, optional: &Frame) -> Result<Vec<Frame>> {
        let mut probes = Vec::new();
        for slot in optional.slots() {
            for value in slot.values() {
                probes.push(Frame::query(self.model.root()).with(slot.name(), value.clone())?);
            }
        }
        Ok(probes)
    }
}

impl Customiser for Ranker {
    fn name(&self) -> &str {
        "ranker"
    }
    fn matching_type(&self) -> ConceptId {
        self.matching_type
    }

    // ill-typed criteria are handled so that pre_process reports them
    fn handles(&self, frame: &Frame) -> bool {
        frame.is_query()
            && match frame.frame_at(&self.optional) {
                Ok(Some(optional)) => optional.slots().iter().any(|s| !s.is_empty()),
                Ok(None) => false,
                Err(_) => true,
            }
    }

    fn pre_process(&self, frame: &Frame) -> Result<Frame> {
        frame.frame_at(&self.optional)?;
        let mut processed = frame.clone();
        processed.clear_at(&self.optional);
        Ok(processed)
    }

    fn process_matches(
        &self,
        core: &dyn Matcher,
        query: &Frame,
        raw: MatchResult,
    ) -> Result<MatchResult> {
        let Some(optional) = query.frame_at(&self.optional)? else {
            return Ok(raw);
        };
        let probes = self.probes(optional)?;
        let store = self.store()?;
        let mut scores = Vec::with_capacity(raw.len());
        for identity in raw.into_identities() {
            let stored = store.resolve(&identity)?;
            let mut score: i64 = 0;
            if let Some(section) = stored.frame_at(&self.ranking)? {
                for probe in &probes {
                    if core.matches(probe, section)? {
                        score += 1;
                    }
                }
            }
            scores.push((identity, score));
        }
        Ok(MatchResult::ranked(scores))
    }

    fn passes_matches_filter(
        &self,
        _core: &dyn Matcher,
        _query: &Frame,
        _instance: &Frame,
    ) -> Result<bool> {
        Err(SubsumeError::Unsupported(
            "ranker has no pairwise filter, ranking needs the whole match set".into(),
        ))
    }

    fn binding(&self) -> &StoreBinding {
        &self.binding
    }
    fn binding_mut(&mut self) -> &mut StoreBinding {
        &mut self.binding
    }
}
