use std::marker::PhantomData;

use crate::dataset::Float;
use crate::error::{Error, Result};
use crate::param_guard::ParamGuard;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use super::DecisionTree;

/// The set of hyperparameters that can be specified for fitting a
/// [decision tree](struct.DecisionTree.html).
///
/// ### Example
///
/// ```rust
/// use id3_trees::{DecisionTree, Fit, Sample};
/// use ndarray::array;
///
/// let samples = Sample::from_records(
///     &array![[1.0, 0.5], [2.0, 0.5]],
///     &[false, true],
/// ).unwrap();
///
/// // Require two features per sample instead of inferring the count
/// let tree = DecisionTree::params()
///     .num_features(Some(2))
///     .fit(&samples)
///     .unwrap();
///
/// assert_eq!(tree.num_features(), 2);
/// ```
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug)]
pub struct DecisionTreeValidParams<F> {
    num_features: Option<usize>,

    float_marker: PhantomData<F>,
}

impl<F: Float> DecisionTreeValidParams<F> {
    /// The expected feature vector length, `None` when inferred from the
    /// first sample
    pub fn num_features(&self) -> Option<usize> {
        self.num_features
    }
}

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug)]
pub struct DecisionTreeParams<F>(DecisionTreeValidParams<F>);

impl<F: Float> DecisionTreeParams<F> {
    pub fn new() -> Self {
        Self(DecisionTreeValidParams {
            num_features: None,
            float_marker: PhantomData,
        })
    }

    /// Sets the expected length of every sample's feature vector.
    ///
    /// With `None` the length is inferred from the first sample handed to
    /// the builder. Either way, fitting fails on any sample whose feature
    /// vector disagrees with the expected length.
    pub fn num_features(mut self, num_features: Option<usize>) -> Self {
        self.0.num_features = num_features;
        self
    }
}

impl<F: Float> Default for DecisionTreeParams<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float> DecisionTree<F> {
    /// Defaults are provided if the optional parameters are not specified:
    /// * `num_features = None` (inferred from the first sample)
    // Violates the convention that new should return a value of type `Self`
    #[allow(clippy::new_ret_no_self)]
    pub fn params() -> DecisionTreeParams<F> {
        DecisionTreeParams::new()
    }
}

impl<F: Float> ParamGuard for DecisionTreeParams<F> {
    type Checked = DecisionTreeValidParams<F>;
    type Error = Error;

    fn check_ref(&self) -> Result<&Self::Checked> {
        if self.0.num_features == Some(0) {
            Err(Error::Parameters(
                "at least one feature is required to grow a tree".to_string(),
            ))
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}
