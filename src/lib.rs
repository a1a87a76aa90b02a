//! Subsume – customisable subsumption matching over frame-based instance models.
//!
//! Instances are *frames*: typed slot-value graphs whose types live in a
//! concept hierarchy. A frame is either an assertion (a stored fact) or a
//! query (a search pattern), and a query matches an assertion when it
//! *subsumes* it, i.e. when the assertion is at least as specific as the query
//! in type and in every slot the query constrains.
//!
//! Plain subsumption is not always the right notion of a match, so the
//! structural matcher can be wrapped by an ordered chain of *customisers*.
//! Each customiser strips the fields it understands before the structural
//! match and applies its own semantics to the raw matches afterwards.
//!
//! ## Modules
//! * [`concept`] – Concepts and the [`concept::Hierarchy`] answering subsumption.
//! * [`frame`] – [`frame::Frame`]s, slots, values, cardinalities, ranges and slot paths.
//! * [`result`] – [`result::Identity`] and the ranked / unranked [`result::MatchResult`].
//! * [`store`] – The [`store::Store`] lookup and the in-memory [`store::FrameKeeper`].
//! * [`filter`] – Turns a per-instance predicate into a result transformation.
//! * [`structural`] – The [`structural::Matcher`] contract and the baseline
//!   [`structural::StructuralMatcher`].
//! * [`customiser`] – The [`customiser::Customiser`] contract and the
//!   [`customiser::CustomiserChain`].
//! * [`customising`] – [`customising::MatcherBuilder`], which buffers instances
//!   until the store exists, and the [`customising::CustomisingMatcher`] it
//!   turns into.
//! * [`custom`] – Aggregation, range overlap, optional-criteria ranking and
//!   section inversion.
//! * [`settings`] – Configuration of logging and of the customiser chain.
//!
//! ## Ranking
//! Ranked results group identities by integer score, highest first. Within a
//! group identities are ordered by label and then by identifier, so equal
//! scores and even equal labels still give one deterministic order.
//!
//! ## Quick Start
//! ```
//! use std::sync::Arc;
//! use subsume::concept::Hierarchy;
//! use subsume::customiser::CustomiserChain;
//! use subsume::customising::MatcherBuilder;
//! use subsume::frame::Frame;
//! use subsume::result::Identity;
//! use subsume::store::FrameKeeper;
//! use subsume::structural::{Matcher, StructuralMatcher};
//!
//! let mut hierarchy = Hierarchy::new();
//! let vehicle = hierarchy.create_concept("Vehicle", &[]).unwrap();
//! let car = hierarchy.create_concept("Car", &[vehicle]).unwrap();
//! let model = Arc::new(hierarchy);
//!
//! let store = Arc::new(FrameKeeper::new());
//! let mut builder = MatcherBuilder::new(StructuralMatcher::new(Arc::clone(&model), model.root()));
//! let beetle = Identity::new(1, "beetle");
//! store.keep(beetle.clone(), Frame::assertion(car)).unwrap();
//! builder.add(Frame::assertion(car), beetle.clone());
//!
//! let matcher = builder.initialise(store, CustomiserChain::new(Arc::clone(&model))).unwrap();
//! let found = matcher.match_query(&Frame::query(vehicle)).unwrap();
//! assert!(found.contains(&beetle));
//! ```

pub mod concept;
pub mod custom;
pub mod customiser;
pub mod customising;
pub mod error;
pub mod filter;
pub mod frame;
pub mod result;
pub mod settings;
pub mod store;
pub mod structural;

pub use error::{Result, SubsumeError};
