// Copyright 2022 Lucas Javaudin
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// https://creativecommons.org/licenses/by-nc-nd/4.0/legalcode

use anyhow::{anyhow, Result};
use num_traits::Float;
use serde::{Deserialize, Serialize};

use crate::{epsilon, exp_utility_sum};

/// A discrete Logit model.
///
/// The alternatives are given by their exponentiated utilities, so the scale of the error terms
/// is already included in the values.
///
/// # Example
///
/// ```
/// use choice::LogitModel;
///
/// // The probabilities are `[0.75, 0.25]`.
/// let model = LogitModel::new(0.9f64);
/// assert_eq!(model.get_choice(&[3.0, 1.0]).unwrap(), 1);
/// let model = LogitModel::new(0.5f64);
/// assert_eq!(model.get_choice(&[3.0, 1.0]).unwrap(), 0);
/// // Unavailable alternatives are never chosen.
/// let model = LogitModel::new(0.0f64);
/// assert_eq!(model.get_choice(&[0.0, 2.0]).unwrap(), 1);
/// ```
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LogitModel<T> {
    /// Uniform random number between 0.0 and 1.0 for inversion sampling.
    u: T,
}

impl<T: Float> LogitModel<T> {
    /// Initializes a Logit model.
    ///
    /// The value of `u` must be such that `0.0 <= u < 1.0`.
    pub fn new(u: T) -> Self {
        LogitModel { u }
    }

    /// Returns the index of the alternative chosen given a slice of exponentiated utilities.
    ///
    /// The available alternatives are visited in order. The probability of each alternative is
    /// subtracted from `u` and the first alternative making the remainder negative is chosen.
    /// When rounding errors leave a non-negative remainder after all alternatives were visited,
    /// the last available alternative is chosen.
    ///
    /// Returns an Error if
    ///
    /// - The slice is empty.
    ///
    /// - Invalid values where found (e.g., NAN, infinity or negative values).
    ///
    /// - No alternative is available.
    pub fn get_choice(&self, exp_utilities: &[T]) -> Result<usize> {
        let eps = epsilon()?;
        let sum = exp_utility_sum(exp_utilities)?;
        if sum < eps {
            return Err(anyhow!("Cannot choose when no alternative is available"));
        }
        let mut remainder = self.u;
        let mut last_available = None;
        for (i, &exp_u) in exp_utilities.iter().enumerate() {
            if exp_u < eps {
                continue;
            }
            last_available = Some(i);
            remainder = remainder - exp_u / sum;
            if remainder < T::zero() {
                return Ok(i);
            }
        }
        last_available.ok_or_else(|| anyhow!("Cannot choose when no alternative is available"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logit_choice_test() {
        let values = [3.0, 1.0];
        assert_eq!(LogitModel::new(0.0).get_choice(&values).unwrap(), 0);
        assert_eq!(LogitModel::new(0.74).get_choice(&values).unwrap(), 0);
        assert_eq!(LogitModel::new(0.76).get_choice(&values).unwrap(), 1);
        assert_eq!(LogitModel::new(0.9).get_choice(&values).unwrap(), 1);
    }

    #[test]
    fn skip_unavailable_test() {
        let values = [0.0, 1.0, 0.0, 1.0, 0.0];
        assert_eq!(LogitModel::new(0.2).get_choice(&values).unwrap(), 1);
        assert_eq!(LogitModel::new(0.7).get_choice(&values).unwrap(), 3);
    }

    #[test]
    fn fallback_to_last_available_test() {
        // With `u` equal to 1.0, the remainder never becomes negative.
        let values = [1.0, 1.0, 0.0];
        assert_eq!(LogitModel::new(1.0).get_choice(&values).unwrap(), 1);
    }

    #[test]
    fn invalid_values_test() {
        let model = LogitModel::new(0.5f64);
        assert!(model.get_choice(&[]).is_err());
        assert!(model.get_choice(&[0.0, 0.0]).is_err());
        assert!(model.get_choice(&[1.0, f64::INFINITY]).is_err());
        assert!(model.get_choice(&[1.0, -1.0]).is_err());
    }
}
