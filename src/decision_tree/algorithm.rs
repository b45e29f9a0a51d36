//! ID3 decision trees over continuous features
//!
use std::cmp::Ordering;
use std::collections::HashSet;

use ndarray::{Array1, ArrayBase, Data, Ix1, Ix2};

use super::DecisionTreeValidParams;
use super::NodeIter;
use crate::dataset::{Float, Sample};
use crate::error::{Error, Result};
use crate::traits::{Fit, Predict};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// A node in the decision tree
///
/// Every node is either a leaf carrying a prediction or a split carrying a
/// feature index, a threshold and exactly two children. Observations are
/// routed to the left child when `features[feature_idx] < split_value` and
/// to the right child otherwise.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub enum TreeNode<F> {
    /// A terminal node predicting a label
    Leaf { prediction: bool },
    /// An internal node routing observations by a threshold test
    Split {
        feature_idx: usize,
        split_value: F,
        left: Box<TreeNode<F>>,
        right: Box<TreeNode<F>>,
    },
}

impl<F: Float> TreeNode<F> {
    /// Returns true if the node has no children
    pub fn is_leaf(&self) -> bool {
        matches!(self, TreeNode::Leaf { .. })
    }

    /// Returns `Some(prediction)` for leaf nodes and `None` for split nodes.
    pub fn prediction(&self) -> Option<bool> {
        match self {
            TreeNode::Leaf { prediction } => Some(*prediction),
            TreeNode::Split { .. } => None,
        }
    }

    /// Returns the split (feature index, threshold) for split nodes and
    /// `None` for leaf nodes.
    pub fn split(&self) -> Option<(usize, F)> {
        match self {
            TreeNode::Leaf { .. } => None,
            TreeNode::Split {
                feature_idx,
                split_value,
                ..
            } => Some((*feature_idx, *split_value)),
        }
    }

    /// Returns the children of the node, first left then right; empty for
    /// leaf nodes
    pub fn children(&self) -> Vec<&TreeNode<F>> {
        match self {
            TreeNode::Leaf { .. } => Vec::new(),
            TreeNode::Split { left, right, .. } => vec![left, right],
        }
    }

    /// Total number of nodes in the subtree rooted at this node
    pub fn num_nodes(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 1,
            TreeNode::Split { left, right, .. } => 1 + left.num_nodes() + right.num_nodes(),
        }
    }

    /// Longest root-to-leaf edge count of the subtree rooted at this node;
    /// a single leaf has depth 0
    pub fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 0,
            TreeNode::Split { left, right, .. } => 1 + usize::max(left.depth(), right.depth()),
        }
    }
}

/// A fitted decision tree model for binary classification.
///
/// ### Structure
///
/// A decision tree is a binary tree where:
/// * each split node holds a feature index and a threshold such that all
///   observations with `feature < threshold` fall in the left subtree while
///   the others fall in the right subtree;
/// * each leaf node carries a boolean prediction.
///
/// ### Algorithm
///
/// Trees are grown recursively with the ID3 heuristic adapted to continuous
/// attributes. At every node the builder searches all features and all
/// eligible threshold positions for the split minimizing the conditional
/// entropy of the label, and adopts it only when it is strictly below the
/// entropy of the unsplit node. When no split qualifies, the node becomes a
/// leaf predicting the majority label; when all labels agree, the leaf is
/// emitted without any search. This stopping rule is the sole
/// generalization control, there is no pruning step.
///
/// ### Predictions
///
/// To predict the label of an observation the tree is traversed from the
/// root, choosing the left or right child at each split according to the
/// threshold test, until a leaf is reached.
///
/// ### Example
///
/// ```rust
/// use id3_trees::{DecisionTree, Fit, Sample};
/// use ndarray::array;
///
/// let samples = Sample::from_records(
///     &array![[1.0], [2.0], [3.0], [4.0]],
///     &[false, false, true, true],
/// ).unwrap();
///
/// let tree = DecisionTree::params().fit(&samples).unwrap();
///
/// assert_eq!(tree.num_nodes(), 3);
/// assert_eq!(tree.depth(), 1);
/// ```
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTree<F> {
    root: TreeNode<F>,
    num_features: usize,
}

impl<F: Float> Fit<[Sample<F>]> for DecisionTreeValidParams<F> {
    type Object = DecisionTree<F>;

    /// Fit a decision tree on a non-empty slice of labeled samples.
    fn fit(&self, samples: &[Sample<F>]) -> Result<Self::Object> {
        let first = samples.first().ok_or(Error::EmptySampleSet)?;
        let num_features = self.num_features().unwrap_or_else(|| first.num_features());

        if let Some(sample) = samples.iter().find(|s| s.num_features() != num_features) {
            return Err(Error::FeatureLenMismatch {
                expected: num_features,
                found: sample.num_features(),
            });
        }

        // every recursion level sorts and partitions its own private
        // collection of references, the input order is left untouched
        let mut working: Vec<&Sample<F>> = samples.iter().collect();
        let root = split_node(&mut working, num_features);

        Ok(DecisionTree { root, num_features })
    }
}

impl<F: Float> Fit<Vec<Sample<F>>> for DecisionTreeValidParams<F> {
    type Object = DecisionTree<F>;

    fn fit(&self, samples: &Vec<Sample<F>>) -> Result<Self::Object> {
        <Self as Fit<[Sample<F>]>>::fit(self, samples)
    }
}

impl<F: Float, D: Data<Elem = F>> Predict<&ArrayBase<D, Ix2>, Array1<bool>> for DecisionTree<F> {
    /// Make predictions for each row of a matrix of features `x`.
    fn predict(&self, x: &ArrayBase<D, Ix2>) -> Array1<bool> {
        x.rows()
            .into_iter()
            .map(|row| make_prediction(&row, &self.root))
            .collect()
    }
}

impl<F: Float> DecisionTree<F> {
    /// Create a node iterator in level-order (BFT)
    pub fn iter_nodes(&self) -> NodeIter<F> {
        NodeIter::new(vec![&self.root])
    }

    /// Return the distinct feature indices used by splits of this tree, in
    /// ascending order
    pub fn features(&self) -> Vec<usize> {
        let fitted_features: HashSet<usize> = self
            .iter_nodes()
            .filter_map(|node| node.split())
            .map(|(feature_idx, _)| feature_idx)
            .collect();

        let mut fitted_features = fitted_features.into_iter().collect::<Vec<_>>();
        fitted_features.sort_unstable();
        fitted_features
    }

    /// Return root node of the tree
    pub fn root_node(&self) -> &TreeNode<F> {
        &self.root
    }

    /// Return the number of features the tree was fitted on
    pub fn num_features(&self) -> usize {
        self.num_features
    }

    /// Return the total number of nodes in the tree
    pub fn num_nodes(&self) -> usize {
        self.root.num_nodes()
    }

    /// Return the number of leaves in the tree
    pub fn num_leaves(&self) -> usize {
        self.iter_nodes().filter(|node| node.is_leaf()).count()
    }

    /// Return the longest root-to-leaf edge count; a tree consisting of a
    /// single leaf has depth 0
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Classify a single sample by routing it to a leaf
    pub fn predict_sample(&self, sample: &Sample<F>) -> bool {
        make_prediction(&sample.features(), &self.root)
    }
}

/// Classify the observation `x` recursively using the tree node `node`.
fn make_prediction<F: Float>(x: &ArrayBase<impl Data<Elem = F>, Ix1>, node: &TreeNode<F>) -> bool {
    match node {
        TreeNode::Leaf { prediction } => *prediction,
        TreeNode::Split {
            feature_idx,
            split_value,
            left,
            right,
        } => {
            if x[*feature_idx] < *split_value {
                make_prediction(x, left)
            } else {
                make_prediction(x, right)
            }
        }
    }
}

/// Recursively grows the tree for the given working sample set.
///
/// The slice is sorted in place once per candidate feature; partitions are
/// fresh vectors owned by the recursive calls.
fn split_node<F: Float>(samples: &mut [&Sample<F>], num_features: usize) -> TreeNode<F> {
    let total = samples.len();
    let num_positive = samples.iter().filter(|s| s.label()).count();

    // exact-purity short circuit, no search needed
    if num_positive == total {
        return TreeNode::Leaf { prediction: true };
    }
    if num_positive == 0 {
        return TreeNode::Leaf { prediction: false };
    }

    let positive_rate = num_positive as f64 / total as f64;
    let parent_entropy = entropy(positive_rate);

    // a candidate split is adopted only when its conditional entropy is
    // strictly below the best seen so far, starting from the entropy of the
    // unsplit node; ties keep the first-found candidate
    let mut min_entropy = parent_entropy;
    let mut best: Option<(usize, F)> = None;

    for feature_idx in 0..num_features {
        sort_by_feature(samples, feature_idx);

        // Three kinds of eligible thresholds, with B/M labels on sorted
        // values:
        //
        //   1) plain boundary         | 1.1 B | 1.1 B || 1.2 M | 1.2 M |
        //   2) before a mixed run     | 1.1 B || 1.2 B | 1.2 M | 1.3 M |
        //   3) after a mixed run      | 1.1 B | 1.2 B | 1.2 M || 1.3 M |
        //
        // (1) and (2) occasionally coincide; double-testing the same
        // boundary is harmless since only strict improvements are adopted.

        let mut prev_label = samples[0].label();
        let mut prev_value = samples[0].feature(feature_idx);

        // positives among the samples strictly left of the scan position
        let mut left_positive = samples[0].label() as usize;

        // length of the current run of equal values, and whether the
        // previous sample belonged to a label-mixed run
        let mut value_streak = 0;
        let mut prev_mixed_value = false;

        // index 0 can never be a threshold
        for i in 1..total {
            let sample = samples[i];
            let value = sample.feature(feature_idx);

            let repeat_value = value == prev_value;
            if repeat_value {
                value_streak += 1;
            } else {
                value_streak = 0;
            }

            if sample.label() != prev_label || (!repeat_value && prev_mixed_value) {
                if repeat_value {
                    prev_mixed_value = true;
                }

                // never split inside a run of equal values: pull the
                // boundary back to the start of the run
                let left_total = i - value_streak;
                let right_total = total - left_total;

                // the negatives-first tie-break keeps the prefix count
                // valid: any samples between the run start and the scan
                // position are negative
                let left_pos = left_positive;
                let right_pos = num_positive - left_pos;

                // a boundary pulled back to index 0 is no split at all
                if left_total > 0 {
                    let p_left = left_total as f64 / total as f64;
                    let p_right = right_total as f64 / total as f64;
                    let pd_left = left_pos as f64 / left_total as f64;
                    let pd_right = right_pos as f64 / right_total as f64;

                    let cond_entropy = p_left * entropy(pd_left) + p_right * entropy(pd_right);

                    if cond_entropy < min_entropy {
                        min_entropy = cond_entropy;
                        best = Some((feature_idx, value));
                    }
                }
            }

            if sample.label() {
                left_positive += 1;
            }
            prev_label = sample.label();
            prev_value = value;
            if !repeat_value {
                prev_mixed_value = false;
            }
        }
    }

    let (feature_idx, split_value) = match best {
        Some(best) => best,
        // no split strictly improves on the unsplit entropy, stop here with
        // a majority vote
        None => {
            return TreeNode::Leaf {
                prediction: positive_rate >= 0.5,
            }
        }
    };

    let (mut left, mut right): (Vec<&Sample<F>>, Vec<&Sample<F>>) = samples
        .iter()
        .copied()
        .partition(|s| s.feature(feature_idx) < split_value);

    // eligibility only fires at true label/value boundaries, so both
    // partitions shrink the sample set
    debug_assert!(!left.is_empty() && !right.is_empty());

    TreeNode::Split {
        feature_idx,
        split_value,
        left: Box::new(split_node(&mut left, num_features)),
        right: Box::new(split_node(&mut right, num_features)),
    }
}

/// Sorts samples by the value of the feature at `feature_idx`, placing
/// negative labels first among equal values.
fn sort_by_feature<F: Float>(samples: &mut [&Sample<F>], feature_idx: usize) {
    samples.sort_by(|a, b| {
        a.feature(feature_idx)
            .partial_cmp(&b.feature(feature_idx))
            .unwrap_or(Ordering::Greater)
            .then_with(|| a.label().cmp(&b.label()))
    });
}

/// Binary entropy, in base 2, of a label distribution characterized by the
/// proportion `p`; exactly zero for pure distributions.
fn entropy(p: f64) -> f64 {
    if p == 0.0 || p == 1.0 {
        0.0
    } else {
        -(p * p.log2() + (1.0 - p) * (1.0 - p).log2())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array1};

    use crate::param_guard::ParamGuard;

    /// Builds single-feature samples from parallel value/label lists.
    fn samples_1d(values: &[f64], labels: &[bool]) -> Vec<Sample<f64>> {
        values
            .iter()
            .zip(labels.iter())
            .map(|(&v, &l)| Sample::new(Array1::from(vec![v]), l))
            .collect()
    }

    #[test]
    fn entropy_of_pure_distributions_is_zero() {
        assert_eq!(entropy(0.0), 0.0);
        assert_eq!(entropy(1.0), 0.0);
    }

    #[test]
    fn entropy_example() {
        // maximal uncertainty at p = 0.5
        assert_abs_diff_eq!(entropy(0.5), 1.0, epsilon = 1e-12);

        // -0.75*log2(0.75) - 0.25*log2(0.25) = 0.81127812
        assert_abs_diff_eq!(entropy(0.25), 0.81127812, epsilon = 1e-5);
        assert_abs_diff_eq!(entropy(0.75), 0.81127812, epsilon = 1e-5);
    }

    #[test]
    fn empty_sample_set_is_rejected() {
        let samples: Vec<Sample<f64>> = Vec::new();
        let res = DecisionTree::params().fit(&samples);

        assert_eq!(res.unwrap_err(), Error::EmptySampleSet);
    }

    #[test]
    fn pure_sample_set_becomes_single_leaf() {
        for &label in &[false, true] {
            let samples = samples_1d(&[3.0, 1.0, 2.0], &[label; 3]);
            let tree = DecisionTree::params().fit(&samples).unwrap();

            assert_eq!(tree.root_node().prediction(), Some(label));
            assert_eq!(tree.num_nodes(), 1);
            assert_eq!(tree.num_leaves(), 1);
            assert_eq!(tree.depth(), 0);
        }
    }

    #[test]
    fn clean_boundary_single_feature() {
        let samples = samples_1d(&[1.0, 2.0, 3.0, 4.0], &[false, false, true, true]);
        let tree = DecisionTree::params().fit(&samples).unwrap();

        // the boundary between 2.0 and 3.0 separates the labels perfectly;
        // the threshold is the first value on the right side
        assert_eq!(tree.root_node().split(), Some((0, 3.0)));

        match tree.root_node() {
            TreeNode::Split { left, right, .. } => {
                assert_eq!(left.prediction(), Some(false));
                assert_eq!(right.prediction(), Some(true));
            }
            TreeNode::Leaf { .. } => panic!("expected a split at the root"),
        }

        assert_eq!(tree.num_nodes(), 3);
        assert_eq!(tree.num_leaves(), 2);
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.features(), vec![0]);

        for sample in &samples {
            assert_eq!(tree.predict_sample(sample), sample.label());
        }
    }

    #[test]
    fn indistinguishable_samples_become_majority_leaf() {
        // all feature vectors equal, labels mixed: no split can improve on
        // the unsplit entropy
        let minority_true = samples_1d(&[1.0; 4], &[false, false, false, true]);
        let tree = DecisionTree::params().fit(&minority_true).unwrap();
        assert_eq!(tree.root_node().prediction(), Some(false));
        assert_eq!(tree.num_nodes(), 1);

        // an exact tie votes positive
        let tied = samples_1d(&[1.0; 4], &[false, false, true, true]);
        let tree = DecisionTree::params().fit(&tied).unwrap();
        assert_eq!(tree.root_node().prediction(), Some(true));
        assert_eq!(tree.num_nodes(), 1);
    }

    #[test]
    fn mixed_value_run_boundaries() {
        // a label transition inside the run of equal 1.2 values: the
        // boundary before the run and the boundary after it are both
        // eligible, the before-run boundary wins the tie by being found
        // first
        let samples = samples_1d(&[1.1, 1.2, 1.2, 1.3], &[false, false, true, true]);
        let tree = DecisionTree::params().fit(&samples).unwrap();

        assert_eq!(tree.root_node().split(), Some((0, 1.2)));

        match tree.root_node() {
            TreeNode::Split { left, right, .. } => {
                assert_eq!(left.prediction(), Some(false));
                // the right side still mixes labels at 1.2 and splits once
                // more; the equal-valued pair can no longer be separated
                // and votes positive
                assert_eq!(right.split(), Some((0, 1.3)));
                for child in right.children() {
                    assert_eq!(child.prediction(), Some(true));
                }
            }
            TreeNode::Leaf { .. } => panic!("expected a split at the root"),
        }

        assert_eq!(tree.num_nodes(), 5);
        assert_eq!(tree.num_leaves(), 3);
        assert_eq!(tree.depth(), 2);
    }

    #[test]
    fn refitting_is_deterministic() {
        let samples = samples_1d(
            &[0.4, 0.7, 0.7, 0.1, 0.9, 0.2, 0.4, 0.6],
            &[false, true, false, false, true, true, false, true],
        );

        let first = DecisionTree::params().fit(&samples).unwrap();
        let second = DecisionTree::params().fit(&samples).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn feature_length_mismatch_is_rejected() {
        let mut samples = samples_1d(&[1.0, 2.0], &[false, true]);
        samples.push(Sample::new(array![3.0, 4.0], true));

        let res = DecisionTree::params().fit(&samples);
        assert_eq!(
            res.unwrap_err(),
            Error::FeatureLenMismatch {
                expected: 1,
                found: 2
            }
        );

        // an explicit feature count overrides the inferred one
        let res = DecisionTree::params()
            .num_features(Some(2))
            .fit(&samples);
        assert_eq!(
            res.unwrap_err(),
            Error::FeatureLenMismatch {
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn zero_features_is_an_invalid_parameter() {
        let res = DecisionTree::<f64>::params().num_features(Some(0)).check();
        assert!(matches!(res, Err(Error::Parameters(_))));
    }

    #[test]
    fn batch_prediction_routes_every_row() {
        let records = array![[1.0], [2.0], [3.0], [4.0]];
        let targets = [false, false, true, true];
        let samples = Sample::from_records(&records, &targets).unwrap();

        let tree = DecisionTree::params().fit(&samples).unwrap();
        let predictions = tree.predict(&records);

        assert_eq!(predictions, Array1::from(targets.to_vec()));
    }

    #[test]
    fn multi_feature_split_prefers_informative_feature() {
        // feature 0 is constant, feature 1 separates the labels
        let records = array![[5.0, 1.0], [5.0, 2.0], [5.0, 3.0], [5.0, 4.0]];
        let targets = [true, true, false, false];
        let samples = Sample::from_records(&records, &targets).unwrap();

        let tree = DecisionTree::params().fit(&samples).unwrap();

        assert_eq!(tree.root_node().split(), Some((1, 3.0)));
        assert_eq!(tree.features(), vec![1]);
        assert_eq!(tree.num_features(), 2);
        assert_eq!(tree.predict(&records), Array1::from(targets.to_vec()));
    }
}
