#![allow(dead_code)]

use std::sync::Arc;

use subsume::concept::{ConceptId, Hierarchy};
use subsume::customiser::CustomiserChain;
use subsume::customising::{CustomisingMatcher, MatcherBuilder};
use subsume::frame::{Frame, SlotPath, Value};
use subsume::result::Identity;
use subsume::store::FrameKeeper;
use subsume::structural::StructuralMatcher;

pub struct Fixture {
    pub model: Arc<Hierarchy>,
    pub vehicle: ConceptId,
    pub car: ConceptId,
    pub colour: ConceptId,
    pub red: ConceptId,
    pub activity: ConceptId,
    pub design: ConceptId,
    pub build: ConceptId,
    pub task: ConceptId,
    pub project: ConceptId,
    pub booking: ConceptId,
    pub language: ConceptId,
    pub rust: ConceptId,
    pub go: ConceptId,
    pub tool: ConceptId,
    pub git: ConceptId,
    pub vim: ConceptId,
    pub profile: ConceptId,
    pub person: ConceptId,
    pub clearance: ConceptId,
    pub secret: ConceptId,
    pub top_secret: ConceptId,
    pub security: ConceptId,
    pub job: ConceptId,
}

pub fn fixture() -> Fixture {
    let mut h = Hierarchy::new();
    let vehicle = h.create_concept("Vehicle", &[]).unwrap();
    let car = h.create_concept("Car", &[vehicle]).unwrap();
    let colour = h.create_concept("Colour", &[]).unwrap();
    let red = h.create_concept("Red", &[colour]).unwrap();
    let activity = h.create_concept("Activity", &[]).unwrap();
    let design = h.create_concept("Design", &[activity]).unwrap();
    let build = h.create_concept("Build", &[activity]).unwrap();
    let task = h.create_concept("Task", &[]).unwrap();
    let project = h.create_concept("Project", &[]).unwrap();
    let booking = h.create_concept("Booking", &[]).unwrap();
    let language = h.create_concept("Language", &[]).unwrap();
    let rust = h.create_concept("Rust", &[language]).unwrap();
    let go = h.create_concept("Go", &[language]).unwrap();
    let tool = h.create_concept("Tool", &[]).unwrap();
    let git = h.create_concept("Git", &[tool]).unwrap();
    let vim = h.create_concept("Vim", &[tool]).unwrap();
    let profile = h.create_concept("Profile", &[]).unwrap();
    let person = h.create_concept("Person", &[]).unwrap();
    let clearance = h.create_concept("Clearance", &[]).unwrap();
    let secret = h.create_concept("Secret", &[clearance]).unwrap();
    let top_secret = h.create_concept("TopSecret", &[secret]).unwrap();
    let security = h.create_concept("Security", &[]).unwrap();
    let job = h.create_concept("Job", &[]).unwrap();
    Fixture {
        model: Arc::new(h),
        vehicle,
        car,
        colour,
        red,
        activity,
        design,
        build,
        task,
        project,
        booking,
        language,
        rust,
        go,
        tool,
        git,
        vim,
        profile,
        person,
        clearance,
        secret,
        top_secret,
        security,
        job,
    }
}

pub fn path(s: &str) -> SlotPath {
    s.parse().unwrap()
}

pub fn concept(c: ConceptId) -> Value {
    Value::Concept(c)
}

// ------------- project / task frames -------------
pub fn task(f: &Fixture, category: ConceptId, duration: i64) -> Frame {
    Frame::assertion(f.task)
        .with("category", concept(category))
        .unwrap()
        .with("duration", duration)
        .unwrap()
}

pub fn project(f: &Fixture, tasks: Vec<Frame>) -> Frame {
    let mut frame = Frame::assertion(f.project);
    for t in tasks {
        frame.add("tasks", t).unwrap();
    }
    frame
}

// ------------- pipeline -------------
pub fn structural(f: &Fixture) -> StructuralMatcher {
    StructuralMatcher::new(Arc::clone(&f.model), f.model.root())
}

/// Keeps every instance in a fresh store and initialises a customising
/// matcher over them with the given chain.
pub fn pipeline(
    f: &Fixture,
    chain: CustomiserChain,
    instances: Vec<(Identity, Frame)>,
) -> (Arc<FrameKeeper>, CustomisingMatcher<StructuralMatcher>) {
    let store = Arc::new(FrameKeeper::new());
    let mut builder = MatcherBuilder::new(structural(f));
    for (identity, frame) in instances {
        store.keep(identity.clone(), frame.clone()).unwrap();
        builder.add(frame, identity);
    }
    let matcher = builder.initialise(store.clone(), chain).unwrap();
    (store, matcher)
}
