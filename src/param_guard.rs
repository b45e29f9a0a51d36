use crate::error::{Error, Result};
use crate::traits::Fit;

/// A set of hyperparameters whose values have not been checked for validity.
/// A reference to the checked hyperparameters can only be obtained after
/// checking has completed. If the `Fit` trait has been implemented on the
/// checked hyperparameters, it is also implemented on the unchecked
/// hyperparameters with the checking step done automatically.
///
/// The hyperparameter validation done in `check_ref()` and `check()` should
/// be identical.
pub trait ParamGuard {
    /// The checked hyperparameters
    type Checked;
    /// Error type resulting from failed hyperparameter checking
    type Error: std::error::Error;

    /// Checks the hyperparameters and returns a reference to the checked
    /// hyperparameters if successful
    fn check_ref(&self) -> std::result::Result<&Self::Checked, Self::Error>;

    /// Checks the hyperparameters and returns the checked hyperparameters if
    /// successful
    fn check(self) -> std::result::Result<Self::Checked, Self::Error>;

    /// Calls `check()` and unwraps the result
    fn check_unwrap(self) -> Self::Checked
    where
        Self: Sized,
    {
        self.check().unwrap()
    }
}

/// Performs the checking step and calls `fit` on the checked hyperparameters.
/// If checking failed, the checking error is converted and returned.
impl<D: ?Sized, P: ParamGuard> Fit<D> for P
where
    P::Checked: Fit<D>,
    Error: From<P::Error>,
{
    type Object = <P::Checked as Fit<D>>::Object;

    fn fit(&self, data: &D) -> Result<Self::Object> {
        let checked = self.check_ref()?;
        checked.fit(data)
    }
}
