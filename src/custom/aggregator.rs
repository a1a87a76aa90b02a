use crate::concept::ConceptId;
use crate::customiser::{Customiser, StoreBinding};
use crate::error::{Result, SubsumeError};
use crate::filter::filter;
use crate::frame::{Frame, Range, SlotPath, Value};
use crate::result::MatchResult;
use crate::structural::Matcher;

/// Matches a repeated array of targets by the sum of their quantities.
///
/// Each target carries descriptive slots plus one numeric value slot. For a
/// query target the candidate's targets with matching descriptions are
/// summed, and the sum must fall inside the query target's range. Every
/// query target must be satisfied.
pub struct Aggregator {
    matching_type: ConceptId,
    targets: SlotPath,
    value: String,
    binding: StoreBinding,
}

// query target with its value cleared, paired with the range asked for
struct Requirement {
    description: Frame,
    range: Range,
}

impl Aggregator {
    pub fn new(matching_type: ConceptId, targets: SlotPath, value: &str) -> Self {
        Self {
            matching_type,
            targets,
            value: value.to_owned(),
            binding: StoreBinding::default(),
        }
    }

    fn is_active(&self, target: &Frame) -> bool {
        target.has_values(&self.value)
            && target
                .slots()
                .iter()
                .any(|s| s.name() != self.value && !s.is_empty())
    }

    fn targets<'f>(&self, frame: &'f Frame) -> Result<Vec<&'f Frame>> {
        frame
            .values_at(&self.targets)
            .iter()
            .map(|v| {
                v.as_frame().ok_or_else(|| {
                    let message = format!("target slot `{}` must hold frames", self.targets);
                    SubsumeError::Invariant(message)
                })
            })
            .collect()
    }

    fn value_of(&self, target: &Frame) -> Result<Option<Range>> {
        match target.values(&self.value).first() {
            None => Ok(None),
            Some(Value::Number(range)) => Ok(Some(*range)),
            Some(_) => Err(SubsumeError::Invariant(format!(
                "aggregated slot `{}` must hold a number",
                self.value
            ))),
        }
    }

    fn description(&self, target: &Frame) -> Frame {
        let mut description = target.clone();
        description.clear(&self.value);
        description
    }

    fn requirements(&self, query: &Frame) -> Result<Vec<Requirement>> {
        let mut requirements = Vec::new();
        for target in self.targets(query)? {
            if !self.is_active(target) {
                continue;
            }
            if let Some(range) = self.value_of(target)? {
                requirements.push(Requirement {
                    description: self.description(target),
                    range,
                });
            }
        }
        Ok(requirements)
    }

    /// Sum of the values of the instance targets that `core` matches against
    /// `description`.
    pub fn aggregate(
        &self,
        core: &dyn Matcher,
        description: &Frame,
        instance: &Frame,
    ) -> Result<Range> {
        let mut total = Range::exactly(0);
        for target in self.targets(instance)? {
            let Some(value) = self.value_of(target)? else {
                continue;
            };
            if core.matches(description, &self.description(target))? {
                total = total + value;
            }
        }
        Ok(total)
    }

    fn satisfies(
        &self,
        core: &dyn Matcher,
        requirements: &[Requirement],
        instance: &Frame,
    ) -> Result<bool> {
        for requirement in requirements {
            let total = self.aggregate(core, &requirement.description, instance)?;
            if !requirement.range.contains(&total) {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl Customiser for Aggregator {
    fn name(&self) -> &str {
        "aggregator"
    }
    fn matching_type(&self) -> ConceptId {
        self.matching_type
    }

    fn handles(&self, frame: &Frame) -> bool {
        frame
            .values_at(&self.targets)
            .iter()
            .filter_map(Value::as_frame)
            .any(|t| self.is_active(t))
    }

    fn pre_process(&self, frame: &Frame) -> Result<Frame> {
        let mut processed = frame.clone();
        if let Some(slot) = processed.slot_at_mut(&self.targets) {
            for value in slot.values_mut() {
                if let Value::Frame(target) = value {
                    if self.is_active(target) {
                        target.clear(&self.value);
                    }
                }
            }
        }
        Ok(processed)
    }

    fn passes_matches_filter(
        &self,
        core: &dyn Matcher,
        query: &Frame,
        instance: &Frame,
    ) -> Result<bool> {
        self.satisfies(core, &self.requirements(query)?, instance)
    }

    fn process_matches(
        &self,
        core: &dyn Matcher,
        query: &Frame,
        raw: MatchResult,
    ) -> Result<MatchResult> {
        // capture the requirements once for all candidates
        let requirements = self.requirements(query)?;
        filter(raw, self.store()?, |instance| {
            self.satisfies(core, &requirements, instance)
        })
    }

    fn binding(&self) -> &StoreBinding {
        &self.binding
    }
    fn binding_mut(&mut self) -> &mut StoreBinding {
        &mut self.binding
    }
}
