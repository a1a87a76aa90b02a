mod common;

use std::sync::Arc;

use common::{Fixture, concept, fixture, path, structural};
use subsume::concept::ConceptId;
use subsume::custom::{Ranker, SectionInverter};
use subsume::customiser::CustomiserChain;
use subsume::customising::{CustomisingMatcher, MatcherBuilder};
use subsume::error::Result;
use subsume::frame::Frame;
use subsume::result::{Identity, MatchResult, RankGroup};
use subsume::store::FrameKeeper;
use subsume::structural::{Matcher, StructuralMatcher};

/// Stores and retrieves like the structural matcher, but a pair only matches
/// when both frames are identical.
struct ExactMatcher {
    inner: StructuralMatcher,
}

impl Matcher for ExactMatcher {
    fn add(&mut self, instance: Frame, identity: Identity) -> Result<()> {
        self.inner.add(instance, identity)
    }
    fn remove(&mut self, identity: &Identity) -> Result<()> {
        self.inner.remove(identity)
    }
    fn match_query(&self, query: &Frame) -> Result<MatchResult> {
        self.inner.match_query(query)
    }
    fn matches(&self, query: &Frame, instance: &Frame) -> Result<bool> {
        Ok(query.to_query() == instance.to_query())
    }
    fn handles_type(&self, concept: ConceptId) -> bool {
        self.inner.handles_type(concept)
    }
}

fn initialise<M: Matcher>(
    core: M,
    chain: CustomiserChain,
    instances: Vec<(Identity, Frame)>,
) -> CustomisingMatcher<M> {
    let store = Arc::new(FrameKeeper::new());
    let mut builder = MatcherBuilder::new(core);
    for (identity, frame) in instances {
        store.keep(identity.clone(), frame.clone()).unwrap();
        builder.add(frame, identity);
    }
    builder.initialise(store, chain).unwrap()
}

fn job(f: &Fixture, level: ConceptId) -> Frame {
    let requires = Frame::assertion(f.security).with("clearance", concept(level)).unwrap();
    Frame::assertion(f.job).with("requires", requires).unwrap()
}

fn jobs(f: &Fixture) -> Vec<(Identity, Frame)> {
    vec![
        (Identity::new(1, "secret"), job(f, f.secret)),
        (Identity::new(2, "top"), job(f, f.top_secret)),
        (Identity::new(3, "open"), Frame::assertion(f.job)),
    ]
}

fn labels(result: &MatchResult) -> Vec<&str> {
    result.identities().iter().map(|i| i.label()).collect()
}

#[test]
fn inversion_defers_to_the_core_matcher() {
    let f = fixture();
    let chain = || {
        CustomiserChain::new(f.model.clone())
            .register(SectionInverter::new(f.job, path("requires")))
    };
    let offers = Frame::query(f.security).with("clearance", concept(f.top_secret)).unwrap();
    let applicant = Frame::query(f.job).with("requires", offers).unwrap();

    let plain = initialise(structural(&f), chain(), jobs(&f));
    assert_eq!(labels(&plain.match_query(&applicant).unwrap()), vec!["secret", "top", "open"]);

    let exact = initialise(ExactMatcher { inner: structural(&f) }, chain(), jobs(&f));
    let found = exact.match_query(&applicant).unwrap();
    assert_eq!(labels(&found), vec!["top", "open"], "only an identical requirement is met");
    assert!(!exact.matches(&applicant, &job(&f, f.secret)).unwrap());
    assert!(exact.matches(&applicant, &job(&f, f.top_secret)).unwrap());
}

#[test]
fn ranking_defers_to_the_core_matcher() {
    let f = fixture();
    let person = |language| {
        let profile = Frame::assertion(f.profile).with("language", concept(language)).unwrap();
        Frame::assertion(f.person).with("profile", profile).unwrap()
    };
    let people = vec![
        (Identity::new(1, "rust"), person(f.rust)),
        (Identity::new(2, "go"), person(f.go)),
    ];
    let chain = CustomiserChain::new(f.model.clone()).register(Ranker::new(
        f.model.clone(),
        f.person,
        path("preferences"),
        path("profile"),
    ));
    let exact = initialise(ExactMatcher { inner: structural(&f) }, chain, people);

    let preferences = Frame::query(f.profile).with("language", concept(f.rust)).unwrap();
    let query = Frame::query(f.person).with("preferences", preferences).unwrap();
    // no single-field criterion is identical to a whole profile
    assert_eq!(
        exact.match_query(&query).unwrap(),
        MatchResult::Ranked(vec![RankGroup::new(
            0,
            vec![Identity::new(2, "go"), Identity::new(1, "rust")]
        )])
    );
}
