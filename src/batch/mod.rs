//! Child batch production.
//!
//! - [`ChildBatchProcessor`] — Generate, filter, persist and rank children of one parent
//! - [`LengthThreshold`] — Which children are worth persisting

mod processor;
mod threshold;

pub use processor::ChildBatchProcessor;
pub use threshold::LengthThreshold;
