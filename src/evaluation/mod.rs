//! Tour evaluation.
//!
//! [`tour_length`] is the single definition of tour cost used throughout the
//! crate.

mod length;

pub use length::{tour_length, TourEvaluator};
