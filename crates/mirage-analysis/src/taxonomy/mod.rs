//! Taxonomy classification and explanation.

pub mod classifier;
pub mod explainer;
