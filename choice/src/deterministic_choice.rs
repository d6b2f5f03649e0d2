// Copyright 2022 Lucas Javaudin
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// https://creativecommons.org/licenses/by-nc-nd/4.0/legalcode

use anyhow::{anyhow, Result};
use num_traits::Float;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{epsilon, exp_utility_sum};

/// A deterministic choice model between a finite number of alternatives.
///
/// The chosen alternative is the available alternative with the largest exponentiated utility.
/// In case of tie, the first alternative is chosen.
///
/// # Example
///
/// ```
/// use choice::DeterministicChoiceModel;
/// let model = DeterministicChoiceModel::default();
/// assert_eq!(model.get_choice(&[1.0f64, 2.0]).unwrap(), 1);
/// assert_eq!(model.get_choice(&[2.0f64, 2.0, 0.0]).unwrap(), 0);
/// ```
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[schemars(title = "Deterministic choice model")]
#[schemars(description = "Choose the alternative with the largest value.")]
pub struct DeterministicChoiceModel;

impl DeterministicChoiceModel {
    /// Returns the index of the available alternative with the largest exponentiated utility.
    ///
    /// Returns an Error if the slice is empty, contains invalid values or if no alternative is
    /// available.
    pub fn get_choice<T: Float>(&self, exp_utilities: &[T]) -> Result<usize> {
        let eps = epsilon()?;
        exp_utility_sum(exp_utilities)?;
        let mut best: Option<(usize, T)> = None;
        for (i, &exp_u) in exp_utilities.iter().enumerate() {
            if exp_u < eps {
                continue;
            }
            if best.map_or(true, |(_, best_u)| exp_u > best_u) {
                best = Some((i, exp_u));
            }
        }
        best.map(|(i, _)| i)
            .ok_or_else(|| anyhow!("Cannot choose when no alternative is available"))
    }
}
