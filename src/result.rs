use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ------------- Identity -------------
/// A stable reference to one stored instance.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    id: u64,
    label: String,
}

impl Identity {
    pub fn new(id: u64, label: &str) -> Self {
        Self {
            id,
            label: label.to_owned(),
        }
    }
    pub fn id(&self) -> u64 {
        self.id
    }
    pub fn label(&self) -> &str {
        &self.label
    }
}
// Display label first, the identifier breaks ties between equal labels.
impl Ord for Identity {
    fn cmp(&self, other: &Self) -> Ordering {
        (&self.label, self.id).cmp(&(&other.label, other.id))
    }
}
impl PartialOrd for Identity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}#{}", self.label, self.id)
    }
}

// ------------- RankGroup -------------
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankGroup {
    score: i64,
    identities: Vec<Identity>,
}

impl RankGroup {
    pub fn new(score: i64, identities: Vec<Identity>) -> Self {
        Self { score, identities }
    }
    pub fn score(&self) -> i64 {
        self.score
    }
    pub fn identities(&self) -> &[Identity] {
        &self.identities
    }
}

// ------------- MatchResult -------------
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "matches", rename_all = "lowercase")]
pub enum MatchResult {
    /// Identities in store order.
    Unranked(Vec<Identity>),
    /// Groups of equally scored identities, highest score first.
    Ranked(Vec<RankGroup>),
}

impl MatchResult {
    pub fn empty() -> Self {
        MatchResult::Unranked(Vec::new())
    }

    /// Builds the ranked form of a set of scored identities.
    ///
    /// Identities are grouped by score, groups are ordered by descending
    /// score and each group is sorted by label and then by identifier, so the
    /// outcome is a total order whatever order the scores arrive in.
    pub fn ranked<I>(scores: I) -> Self
    where
        I: IntoIterator<Item = (Identity, i64)>,
    {
        let mut by_score: BTreeMap<i64, Vec<Identity>> = BTreeMap::new();
        for (identity, score) in scores {
            by_score.entry(score).or_default().push(identity);
        }
        let groups = by_score
            .into_iter()
            .rev()
            .map(|(score, mut identities)| {
                identities.sort();
                RankGroup::new(score, identities)
            })
            .collect();
        MatchResult::Ranked(groups)
    }

    pub fn is_ranked(&self) -> bool {
        matches!(self, MatchResult::Ranked(_))
    }

    pub fn groups(&self) -> Option<&[RankGroup]> {
        match self {
            MatchResult::Ranked(groups) => Some(groups),
            MatchResult::Unranked(_) => None,
        }
    }

    /// All identities in result order, flattening rank groups.
    pub fn identities(&self) -> Vec<&Identity> {
        match self {
            MatchResult::Unranked(identities) => identities.iter().collect(),
            MatchResult::Ranked(groups) => {
                groups.iter().flat_map(|g| g.identities.iter()).collect()
            }
        }
    }

    pub fn into_identities(self) -> Vec<Identity> {
        match self {
            MatchResult::Unranked(identities) => identities,
            MatchResult::Ranked(groups) => groups.into_iter().flat_map(|g| g.identities).collect(),
        }
    }

    /// Flattened `(identity, score)` pairs; unranked results score zero.
    pub fn scores(&self) -> Vec<(Identity, i64)> {
        match self {
            MatchResult::Unranked(identities) => {
                identities.iter().map(|i| (i.clone(), 0)).collect()
            }
            MatchResult::Ranked(groups) => groups
                .iter()
                .flat_map(|g| g.identities.iter().map(|i| (i.clone(), g.score)))
                .collect(),
        }
    }

    pub fn contains(&self, identity: &Identity) -> bool {
        self.identities().contains(&identity)
    }

    pub fn len(&self) -> usize {
        match self {
            MatchResult::Unranked(identities) => identities.len(),
            MatchResult::Ranked(groups) => groups.iter().map(|g| g.identities.len()).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MatchResult {
    fn default() -> Self {
        Self::empty()
    }
}
