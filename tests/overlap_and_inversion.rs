mod common;

use std::sync::Arc;

use common::{Fixture, concept, fixture, path, pipeline, structural};
use subsume::SubsumeError;
use subsume::custom::{RangeOverlapper, SectionInverter};
use subsume::customiser::{Customiser, CustomiserChain};
use subsume::customising::MatcherBuilder;
use subsume::frame::{Frame, Range};
use subsume::result::Identity;
use subsume::store::FrameKeeper;
use subsume::structural::Matcher;

// ------------- range overlap -------------
fn overlapper(f: &Fixture) -> RangeOverlapper {
    RangeOverlapper::new(f.booking, path("window"))
}

fn booking(f: &Fixture, min: i64, max: i64) -> Frame {
    Frame::assertion(f.booking)
        .with("window", Range::new(min, max).unwrap())
        .unwrap()
}

#[test]
fn overlapping_windows_match() {
    let f = fixture();
    let chain = CustomiserChain::new(f.model.clone()).register(overlapper(&f));
    let instances = vec![
        (Identity::new(1, "overlapping"), booking(&f, 6, 10)),
        (Identity::new(2, "touching"), booking(&f, 7, 7)),
        (Identity::new(3, "disjoint"), booking(&f, 8, 12)),
        (Identity::new(4, "open"), Frame::assertion(f.booking)),
    ];
    let (_store, matcher) = pipeline(&f, chain, instances);
    let query = booking(&f, 3, 7).to_query();
    let found = matcher.match_query(&query).unwrap();
    let labels: Vec<&str> = found.identities().iter().map(|i| i.label()).collect();
    assert_eq!(labels, vec!["overlapping", "touching"]);
}

#[test]
fn overlap_is_symmetric_and_reflexive() {
    let f = fixture();
    let o = overlapper(&f);
    let core = structural(&f);
    let windows = [(0, 4), (3, 7), (5, 9), (8, 8), (-3, -1)];
    for &(a, b) in &windows {
        let x = booking(&f, a, b);
        assert!(
            o.passes_matches_filter(&core, &x.to_query(), &x).unwrap(),
            "[{a},{b}] overlaps itself"
        );
        for &(c, d) in &windows {
            let y = booking(&f, c, d);
            assert_eq!(
                o.passes_matches_filter(&core, &x.to_query(), &y).unwrap(),
                o.passes_matches_filter(&core, &y.to_query(), &x).unwrap(),
                "[{a},{b}] vs [{c},{d}]"
            );
        }
    }
}

#[test]
fn overlap_needs_numbers() {
    let f = fixture();
    let o = overlapper(&f);
    let core = structural(&f);
    let wrong = Frame::assertion(f.booking).with("window", concept(f.red)).unwrap();
    let err = o
        .passes_matches_filter(&core, &booking(&f, 1, 2).to_query(), &wrong)
        .unwrap_err();
    assert!(matches!(err, SubsumeError::Invariant(_)));
    assert!(o.passes_matches_filter(&core, &Frame::query(f.booking), &wrong).unwrap());
}

#[test]
fn stripping_the_window_is_idempotent() {
    let f = fixture();
    let o = overlapper(&f);
    let query = booking(&f, 3, 7).to_query();
    assert!(o.handles(&query));
    let once = o.pre_process(&query).unwrap();
    assert_eq!(o.pre_process(&once).unwrap(), once);
    assert!(!o.handles(&once));
}

// ------------- section inversion -------------
fn inverter(f: &Fixture) -> SectionInverter {
    SectionInverter::new(f.job, path("requires"))
}

fn job(f: &Fixture, level: u64) -> Frame {
    let requires = Frame::assertion(f.security)
        .with("clearance", concept(level))
        .unwrap();
    Frame::assertion(f.job).with("requires", requires).unwrap()
}

fn applicant(f: &Fixture, level: u64) -> Frame {
    let offers = Frame::query(f.security).with("clearance", concept(level)).unwrap();
    Frame::query(f.job).with("requires", offers).unwrap()
}

#[test]
fn instance_section_must_subsume_the_query_section() {
    let f = fixture();
    let chain = CustomiserChain::new(f.model.clone()).register(inverter(&f));
    let instances = vec![
        (Identity::new(1, "secret"), job(&f, f.secret)),
        (Identity::new(2, "top"), job(&f, f.top_secret)),
        (Identity::new(3, "open"), Frame::assertion(f.job)),
    ];
    let (_store, matcher) = pipeline(&f, chain, instances);

    let cleared = matcher.match_query(&applicant(&f, f.top_secret)).unwrap();
    assert_eq!(cleared.len(), 3);
    let partly = matcher.match_query(&applicant(&f, f.secret)).unwrap();
    let labels: Vec<&str> = partly.identities().iter().map(|i| i.label()).collect();
    assert_eq!(labels, vec!["secret", "open"]);
}

#[test]
fn absent_sections_accept_anything() {
    let f = fixture();
    let i = inverter(&f);
    let core = structural(&f);
    let open = Frame::assertion(f.job);
    assert!(i.passes_matches_filter(&core, &applicant(&f, f.clearance), &open).unwrap());
    let top = job(&f, f.top_secret);
    assert!(i.passes_matches_filter(&core, &Frame::query(f.job), &top).unwrap());
}

#[test]
fn inversion_pre_processing_is_idempotent() {
    let f = fixture();
    let i = inverter(&f);
    let query = applicant(&f, f.secret);
    let once = i.pre_process(&query).unwrap();
    assert_eq!(i.pre_process(&once).unwrap(), once);
    assert!(!i.handles(&once));
    assert!(i.handles(&job(&f, f.secret)));
}

#[test]
fn a_non_frame_section_is_rejected() {
    let f = fixture();
    let i = inverter(&f);
    let broken = Frame::assertion(f.job).with("requires", concept(f.secret)).unwrap();
    assert!(i.handles(&broken));
    assert!(matches!(i.pre_process(&broken), Err(SubsumeError::Invariant(_))));

    let store = Arc::new(FrameKeeper::new());
    let mut builder = MatcherBuilder::new(structural(&f));
    builder.add(broken, Identity::new(1, "broken"));
    let chain = CustomiserChain::new(f.model.clone()).register(inverter(&f));
    let err = builder.initialise(store, chain).err().unwrap();
    assert!(matches!(err, SubsumeError::Invariant(_)));
}

#[test]
fn overlap_is_reflexive_through_the_pipeline() {
    let f = fixture();
    let chain = CustomiserChain::new(f.model.clone()).register(overlapper(&f));
    let (_store, matcher) = pipeline(&f, chain, Vec::new());
    for (a, b) in [(0, 4), (3, 7), (8, 8), (-3, -1)] {
        let x = booking(&f, a, b);
        assert!(matcher.matches(&x.to_query(), &x).unwrap(), "[{a},{b}] matches itself");
    }
}
