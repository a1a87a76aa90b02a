//! Concrete customisers. Each one owns a slot path it reasons about, clears
//! it before structural matching and applies its own semantics afterwards.

pub mod aggregator;
pub mod inverter;
pub mod overlap;
pub mod ranker;

pub use aggregator::Aggregator;
pub use inverter::SectionInverter;
pub use overlap::RangeOverlapper;
pub use ranker::Ranker;
