use crate::concept::ConceptId;
use crate::customiser::{Customiser, StoreBinding};
use crate::error::Result;
use crate::frame::{Frame, SlotPath};
use crate::structural::Matcher;

/// Matches one numeric field by interval overlap instead of containment.
pub struct RangeOverlapper {
    matching_type: ConceptId,
    field: SlotPath,
    binding: StoreBinding,
}

impl RangeOverlapper {
    pub fn new(matching_type: ConceptId, field: SlotPath) -> Self {
        Self {
            matching_type,
            field,
            binding: StoreBinding::default(),
        }
    }
}

impl Customiser for RangeOverlapper {
    fn name(&self) -> &str {
        "range-overlapper"
    }
    fn matching_type(&self) -> ConceptId {
        self.matching_type
    }

    fn handles(&self, frame: &Frame) -> bool {
        !frame.values_at(&self.field).is_empty()
    }

    fn pre_process(&self, frame: &Frame) -> Result<Frame> {
        let mut processed = frame.clone();
        processed.clear_at(&self.field);
        Ok(processed)
    }

    // an instance without the field has nothing to overlap with
    fn passes_matches_filter(
        &self,
        _core: &dyn Matcher,
        query: &Frame,
        instance: &Frame,
    ) -> Result<bool> {
        let Some(wanted) = query.number_at(&self.field)? else {
            return Ok(true);
        };
        match instance.number_at(&self.field)? {
            Some(offered) => Ok(wanted.overlaps(&offered)),
            None => Ok(false),
        }
    }

    fn binding(&self) -> &StoreBinding {
        &self.binding
    }
    fn binding_mut(&mut self) -> &mut StoreBinding {
        &mut self.binding
    }
}
