//! Ensemble decision model.
//!
//! A bagged forest of CART decision trees with randomized feature subsets
//! per split and class-balanced sample weighting. Training is fully seeded;
//! inference is deterministic.

pub mod forest;
pub mod tree;

pub use forest::{RandomForest, TrainParams};
pub use tree::DecisionTree;
