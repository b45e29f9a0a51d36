//! Samples
//!
//! This module implements the labeled sample struct consumed by the tree
//! builder, together with the floating point trait bound used throughout
//! the crate.
use ndarray::{Array1, ArrayBase, ArrayView1, Data, Ix2, NdFloat};
use num_traits::FromPrimitive;

use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// Floating point numbers
///
/// This trait bound multiplexes the most common assumptions made about
/// floating point numbers and implements them for 32bit and 64bit floats.
/// Feature values are of this type.
pub trait Float: NdFloat + FromPrimitive + Default {}

impl Float for f32 {}
impl Float for f64 {}

/// A single labeled observation
///
/// A sample pairs a fixed-length vector of continuous feature values with a
/// boolean ground-truth label. Samples are immutable once constructed; the
/// tree builder only reads and reorders them.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct Sample<F> {
    features: Array1<F>,
    label: bool,
}

impl<F: Float> Sample<F> {
    pub fn new(features: Array1<F>, label: bool) -> Self {
        Sample { features, label }
    }

    /// Builds one sample per row of `records`, paired elementwise with
    /// `targets`.
    ///
    /// Fails when the number of rows and targets disagree.
    pub fn from_records<D: Data<Elem = F>>(
        records: &ArrayBase<D, Ix2>,
        targets: &[bool],
    ) -> Result<Vec<Self>> {
        if records.nrows() != targets.len() {
            return Err(Error::RecordsTargetsMismatch {
                records: records.nrows(),
                targets: targets.len(),
            });
        }

        Ok(records
            .rows()
            .into_iter()
            .zip(targets.iter())
            .map(|(row, &label)| Sample::new(row.to_owned(), label))
            .collect())
    }

    /// The ground-truth label of this sample
    pub fn label(&self) -> bool {
        self.label
    }

    /// A view of the full feature vector
    pub fn features(&self) -> ArrayView1<F> {
        self.features.view()
    }

    /// The value of the feature at index `idx`
    ///
    /// ### Panics
    ///
    /// If `idx` is out of bounds
    pub fn feature(&self, idx: usize) -> F {
        self.features[idx]
    }

    /// The length of the feature vector
    pub fn num_features(&self) -> usize {
        self.features.len()
    }
}
