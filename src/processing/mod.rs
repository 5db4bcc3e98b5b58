//! Text condensation pipeline: cleaning, chunking, two-pass summarization, and study notes.

pub mod chunking;
pub mod normalize;
pub mod reduce;
mod service;
pub mod study;
pub mod types;

pub use reduce::ChunkSummarizer;
pub use service::{StudyApi, StudyService};
pub use study::StudyNotes;
pub use types::{PipelineError, PipelineSettings, StudyError, has_error_prefix};
