// Copyright 2022 Lucas Javaudin
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// https://creativecommons.org/licenses/by-nc-nd/4.0/legalcode

//! Transformations applied to utility values before they are combined.

/// Smallest utility value used when exponentiating utilities.
pub const MIN_UTILITY: f64 = -80.0;

/// Largest utility value used when exponentiating utilities.
pub const MAX_UTILITY: f64 = 80.0;

/// Exponentiated utilities below this threshold are considered as zero, i.e., the corresponding
/// alternative is unavailable.
///
/// The threshold is smaller than `exp(MIN_UTILITY)` so that an alternative with a finite utility
/// is never discarded.
pub const EPSILON: f64 = 1e-40;

/// Blends a linear and a logarithmic transformation of `x`.
///
/// Returns `g * x + (1 - g) * ln(max(x, 1))`.
/// With `g = 1`, the transformation is linear. With `g = 0`, the marginal impact of `x` is
/// diminishing.
///
/// # Example
///
/// ```
/// use choice::gamma;
/// assert_eq!(gamma(20.0, 1.0), 20.0);
/// assert_eq!(gamma(0.0, 0.0), 0.0);
/// assert!((gamma(std::f64::consts::E, 0.0) - 1.0).abs() < 1e-12);
/// ```
pub fn gamma(x: f64, g: f64) -> f64 {
    g * x + (1.0 - g) * x.max(1.0).ln()
}

/// Exponential of a utility value, clamped to `[exp(MIN_UTILITY), exp(MAX_UTILITY)]`.
///
/// The sum of many clamped exponentials cannot overflow.
///
/// # Example
///
/// ```
/// use choice::{clamped_exp, MAX_UTILITY};
/// assert_eq!(clamped_exp(0.0), 1.0);
/// assert_eq!(clamped_exp(1000.0), MAX_UTILITY.exp());
/// ```
pub fn clamped_exp(u: f64) -> f64 {
    if u > MAX_UTILITY {
        MAX_UTILITY.exp()
    } else if u < MIN_UTILITY {
        MIN_UTILITY.exp()
    } else {
        u.exp()
    }
}

/// Returns `true` if the exponentiated utility represents an available alternative.
pub fn is_available(exp_utility: f64) -> bool {
    exp_utility >= EPSILON
}
