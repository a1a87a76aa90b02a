use crate::concept::ConceptId;
use crate::customiser::{Customiser, StoreBinding};
use crate::error::Result;
use crate::frame::{Frame, SlotPath};
use crate::structural::Matcher;

/// Reverses subsumption for one embedded section: the instance's section
/// must be at least as general as the query's.
pub struct SectionInverter {
    matching_type: ConceptId,
    section: SlotPath,
    binding: StoreBinding,
}

impl SectionInverter {
    pub fn new(matching_type: ConceptId, section: SlotPath) -> Self {
        Self {
            matching_type,
            section,
            binding: StoreBinding::default(),
        }
    }
}

impl Customiser for SectionInverter {
    fn name(&self) -> &str {
        "section-inverter"
    }
    fn matching_type(&self) -> ConceptId {
        self.matching_type
    }

    // a value of the wrong kind is handled too, so pre_process can reject it
    fn handles(&self, frame: &Frame) -> bool {
        !frame.values_at(&self.section).is_empty()
    }

    fn pre_process(&self, frame: &Frame) -> Result<Frame> {
        frame.frame_at(&self.section)?;
        let mut processed = frame.clone();
        processed.clear_at(&self.section);
        Ok(processed)
    }

    // an instance without the section accepts anything
    fn passes_matches_filter(
        &self,
        core: &dyn Matcher,
        query: &Frame,
        instance: &Frame,
    ) -> Result<bool> {
        let Some(required) = instance.frame_at(&self.section)? else {
            return Ok(true);
        };
        match query.frame_at(&self.section)? {
            Some(offered) => core.matches(&required.to_query(), &offered.to_assertion()),
            None => Ok(true),
        }
    }

    fn binding(&self) -> &StoreBinding {
        &self.binding
    }
    fn binding_mut(&mut self) -> &mut StoreBinding {
        &mut self.binding
    }
}
