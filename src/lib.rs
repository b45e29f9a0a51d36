//!
//! # ID3 decision tree learning
//!
//! `id3-trees` provides a pure Rust implementation of binary decision tree
//! learning for classification, using the ID3 information-gain heuristic
//! adapted to continuous attributes via threshold splits.
//!
//! # The big picture
//!
//! Decision trees are a non-parametric supervised learning method. The goal
//! is to create a model that predicts a boolean target by learning simple
//! decision rules inferred from the data features: at every internal node a
//! single feature is compared against a threshold, and observations are
//! routed left or right until a leaf carrying a prediction is reached.
//!
//! Trees are grown by exhaustive threshold search: at each node, every
//! feature and every eligible split position is scored by the conditional
//! entropy of the label given the split, and the strictly best split is
//! adopted. Nodes where no split improves on the unsplit entropy become
//! majority-vote leaves, which is the only stopping rule applied.
//!
//! # Current state
//!
//! `id3-trees` currently provides an [implementation](DecisionTree) of
//! single-tree fitting for binary classification, with an opt-in `serde`
//! feature for model (de)serialization.
//!

pub mod dataset;
mod decision_tree;
pub mod error;
mod param_guard;
pub mod traits;

// Re-export all core decision tree functionality
pub use decision_tree::*;

pub use dataset::{Float, Sample};
pub use error::{Error, Result};
pub use param_guard::ParamGuard;
pub use traits::{Fit, Predict};
