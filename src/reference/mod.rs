//! Reference data abstraction
//!
//! Transcript models and the sequence-lookup capability.

pub mod mock;
pub mod provider;
pub mod transcript;

pub use mock::MockProvider;
pub use provider::ReferenceProvider;
pub use transcript::{Interval, TranscriptModel, TranscriptModelBuilder};
