//! fgc - the pluggable collector seam (spec.md §9: "Heap objects are
//! owned by the collector and reachable from the root set"; §1 lists
//! the GC as an out-of-scope collaborator, "only stubs").
//!
//! This is a deliberate trim of the teacher's concurrent generational
//! mark-compact collector (`gc.rs`, `heap/`, `marker/`, `relocate/`,
//! `barrier/`) down to the one contract `pseu-rt` actually needs: a
//! place to put heap objects that hands out stable references. The
//! only implementation, [`BumpCollector`], never reclaims — per
//! SPEC_FULL.md §8 this is intentional, not a placeholder to fill in
//! later; a real collector is a distinct, out-of-scope component.

mod bump;
mod collector;

pub use bump::BumpCollector;
pub use collector::{Collector, GcRef};
