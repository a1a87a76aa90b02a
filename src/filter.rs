use crate::error::Result;
use crate::frame::Frame;
use crate::result::{Identity, MatchResult, RankGroup};
use crate::store::Store;

/// Keeps the identities whose stored frame satisfies `predicate`.
///
/// Unranked results keep their order. Ranked results are filtered group by
/// group, keeping every group's score and position; a group left without
/// identities is dropped. The predicate always sees the frame resolved from
/// `store`, never a query-time copy, and its first error aborts the filter.
pub fn filter<F>(result: MatchResult, store: &dyn Store, mut predicate: F) -> Result<MatchResult>
where
    F: FnMut(&Frame) -> Result<bool>,
{
    let mut keep = |identities: Vec<Identity>| -> Result<Vec<Identity>> {
        let mut kept = Vec::with_capacity(identities.len());
        for identity in identities {
            let stored = store.resolve(&identity)?;
            if predicate(&stored)? {
                kept.push(identity);
            }
        }
        Ok(kept)
    };
    match result {
        MatchResult::Unranked(identities) => Ok(MatchResult::Unranked(keep(identities)?)),
        MatchResult::Ranked(groups) => {
            let mut filtered = Vec::with_capacity(groups.len());
            for group in groups {
                let score = group.score();
                let kept = keep(group.identities().to_vec())?;
                if !kept.is_empty() {
                    filtered.push(RankGroup::new(score, kept));
                }
            }
            Ok(MatchResult::Ranked(filtered))
        }
    }
}
