// Copyright 2022 Lucas Javaudin
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// https://creativecommons.org/licenses/by-nc-nd/4.0/legalcode

//! Discrete choice between a finite number of alternatives described by their exponentiated
//! utilities.
mod deterministic_choice;
mod logit;
mod transform;

pub use self::deterministic_choice::DeterministicChoiceModel;
pub use self::logit::LogitModel;
pub use self::transform::{clamped_exp, gamma, is_available, EPSILON, MAX_UTILITY, MIN_UTILITY};

use anyhow::{anyhow, bail, Result};
use num_traits::Float;
use serde::{Deserialize, Serialize};

/// A choice model between a finite number of alternatives.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub enum ChoiceModel<T> {
    /// Choose the available alternative with the largest exponentiated utility.
    Deterministic(DeterministicChoiceModel),
    /// Choose an available alternative using Logit probabilities.
    Logit(LogitModel<T>),
}

impl<T: Float> ChoiceModel<T> {
    /// Returns the index of the chosen alternative, given the exponentiated utilities of the
    /// alternatives.
    pub fn get_choice(&self, exp_utilities: &[T]) -> Result<usize> {
        match self {
            Self::Deterministic(model) => model.get_choice(exp_utilities),
            Self::Logit(model) => model.get_choice(exp_utilities),
        }
    }
}

/// Returns the availability threshold in the desired type.
pub(crate) fn epsilon<T: Float>() -> Result<T> {
    T::from(EPSILON).ok_or_else(|| anyhow!("Cannot convert {:?} to Float", EPSILON))
}

/// Returns the sum of the exponentiated utilities of the available alternatives.
///
/// Returns an error if the slice is empty or if it contains a negative or non-finite value.
///
/// # Example
///
/// ```
/// use choice::exp_utility_sum;
/// assert_eq!(exp_utility_sum(&[3.0f64, 0.0, 1.0]).unwrap(), 4.0);
/// assert!(exp_utility_sum::<f64>(&[]).is_err());
/// assert!(exp_utility_sum(&[1.0, f64::NAN]).is_err());
/// ```
pub fn exp_utility_sum<T: Float>(exp_utilities: &[T]) -> Result<T> {
    if exp_utilities.is_empty() {
        bail!("Cannot compute choice from an empty slice of values");
    }
    if exp_utilities
        .iter()
        .any(|&v| !v.is_finite() || v < T::zero())
    {
        bail!(
            "Found an invalid exponentiated utility (negative or non-finite): {:?}",
            exp_utilities
                .iter()
                .map(|v| v.to_f64())
                .collect::<Vec<_>>()
        );
    }
    let eps = epsilon()?;
    Ok(exp_utilities
        .iter()
        .filter(|&&v| v >= eps)
        .fold(T::zero(), |sum, &v| sum + v))
}

/// Returns the log-sum of the exponentiated utilities, i.e., the expected maximum utility of the
/// choice (up to a constant).
///
/// Returns `None` if no alternative is available.
///
/// # Example
///
/// ```
/// use choice::logsum;
/// assert_eq!(logsum(&[1.0f64, 0.0]).unwrap(), Some(0.0));
/// assert_eq!(logsum(&[0.0f64, 0.0]).unwrap(), None);
/// ```
pub fn logsum<T: Float>(exp_utilities: &[T]) -> Result<Option<T>> {
    let sum = exp_utility_sum(exp_utilities)?;
    if sum < epsilon()? {
        Ok(None)
    } else {
        Ok(Some(sum.ln()))
    }
}
