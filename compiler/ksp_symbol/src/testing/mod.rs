//! Test support: a name-based [`MockResolver`], a [`RecordingTracker`] and
//! fixtures that assemble small programs.
//!
//! Downstream processors can use these to unit-test against the model
//! without a real compiler front end.

pub mod fixture;
mod mocks;

pub use fixture::{Fixture, Program};
pub use mocks::{Lookup, MockResolver, RecordingTracker};
