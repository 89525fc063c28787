//! Tour mutation operators.
//!
//! - [`reverse_segment`] — The 2-opt move on a tour
//! - [`TwoOptMutator`] — Random 2-opt children of a stored route

mod two_opt;

pub use two_opt::{reverse_segment, TwoOptMutator};
