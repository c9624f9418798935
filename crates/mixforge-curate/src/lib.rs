//! Track curation: mood classification, sequencing and prompt synthesis.
//!
//! Everything in this crate is a pure function over track metadata; the
//! pipeline crate wires the results into asset fetching and rendering.

pub mod classifier;
pub mod prompt;
pub mod sequence;

pub use classifier::classify;
pub use prompt::synthesize_prompt;
pub use sequence::order_for_flow;
