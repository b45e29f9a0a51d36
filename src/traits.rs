//! Provide traits for the scopes of an algorithm: fitting and prediction
use crate::error::Result;

/// Fit a model from a training set
pub trait Fit<D: ?Sized> {
    type Object;

    fn fit(&self, data: &D) -> Result<Self::Object>;
}

/// Predict targets for a set of observations
pub trait Predict<D, T> {
    fn predict(&self, x: D) -> T;
}
