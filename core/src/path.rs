// Copyright 2022 Lucas Javaudin
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// https://creativecommons.org/licenses/by-nc-nd/4.0/legalcode

//! Results of the evaluation of path types.
use choice::{clamped_exp, MIN_UTILITY};
use enum_as_inner::EnumAsInner;
use schemars::JsonSchema;
use serde_derive::{Deserialize, Serialize};

use crate::facilities::{NodeId, StopAreaKey};
use crate::mode::{AccessMode, PathType};
use crate::request::RequestId;

/// Time, distance, cost and utility of an access or egress leg.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct LegSummary {
    pub mode: Option<AccessMode>,
    pub time: f64,
    pub distance: f64,
    pub cost: f64,
    pub utility: f64,
}

/// Attributes of the best path found for one path type.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct PathTypeCandidate {
    /// Total travel time, in minutes.
    pub time: f64,
    pub distance: f64,
    pub cost: f64,
    pub utility: f64,
    /// Clamped exponential of the utility.
    pub exp_utility: f64,
    pub walk_time: f64,
    pub walk_distance: f64,
    pub bike_time: f64,
    pub bike_distance: f64,
    pub bike_cost: f64,
    pub transit_time: f64,
    pub transit_distance: f64,
    pub transit_cost: f64,
    pub transit_utility: f64,
    pub origin_access: LegSummary,
    pub destination_egress: LegSummary,
    pub park_and_ride_node: Option<NodeId>,
    pub origin_stop_area: Option<StopAreaKey>,
    pub destination_stop_area: Option<StopAreaKey>,
}

impl Default for PathTypeCandidate {
    fn default() -> Self {
        PathTypeCandidate {
            time: 0.0,
            distance: 0.0,
            cost: 0.0,
            utility: 0.0,
            exp_utility: 0.0,
            walk_time: 0.0,
            walk_distance: 0.0,
            bike_time: 0.0,
            bike_distance: 0.0,
            bike_cost: 0.0,
            transit_time: 0.0,
            transit_distance: 0.0,
            transit_cost: 0.0,
            transit_utility: MIN_UTILITY,
            origin_access: Default::default(),
            destination_egress: Default::default(),
            park_and_ride_node: None,
            origin_stop_area: None,
            destination_stop_area: None,
        }
    }
}

impl PathTypeCandidate {
    /// Creates a candidate with the given totals.
    pub fn new(time: f64, distance: f64, cost: f64, utility: f64) -> Self {
        PathTypeCandidate {
            time,
            distance,
            cost,
            utility,
            exp_utility: clamped_exp(utility),
            ..Default::default()
        }
    }

    /// Sets the utility and the exponential utility of the candidate.
    pub fn set_utility(&mut self, utility: f64) {
        self.utility = utility;
        self.exp_utility = clamped_exp(utility);
    }

    /// Returns `true` if the candidate is available.
    pub fn is_available(&self) -> bool {
        choice::is_available(self.exp_utility)
    }
}

/// The path chosen for a travel request.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct ChosenPath {
    pub path_type: PathType,
    /// Generalized-time logsum over the available path types, in minutes.
    pub logsum: f64,
    /// Generalized time of the chosen path, in minutes.
    pub generalized_time_chosen: f64,
    /// Generalized time of the transit part of the chosen path, in minutes.
    pub transit_generalized_time: f64,
    /// Number of available path types.
    pub available_path_types: usize,
    /// Attributes of the chosen path.
    #[serde(flatten)]
    pub path: PathTypeCandidate,
}

/// Outcome of the evaluation of a travel request.
#[derive(Clone, Debug, PartialEq, EnumAsInner, Deserialize, Serialize, JsonSchema)]
#[serde(tag = "type", content = "value")]
pub enum EvaluationResult {
    /// At least one path type is available.
    Available(ChosenPath),
    /// No path type is available.
    Unavailable,
    /// The mode cannot be evaluated with the current configuration.
    Unsupported(String),
}

/// Evaluation result of a travel request, with the request id.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
pub struct RequestResult {
    pub request_id: RequestId,
    pub result: EvaluationResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_test() {
        let candidate = PathTypeCandidate::default();
        assert!(!candidate.is_available());
        assert_eq!(candidate.transit_utility, MIN_UTILITY);
        let mut candidate = PathTypeCandidate::new(20.0, 10.0, 5.0, -1.5);
        assert!(candidate.is_available());
        assert!((candidate.exp_utility - (-1.5f64).exp()).abs() < 1e-12);
        candidate.set_utility(-200.0);
        assert_eq!(candidate.exp_utility, (-80f64).exp());
        assert!(candidate.is_available());
    }

    #[test]
    fn result_serialization_test() {
        let result = EvaluationResult::Unsupported("reason".to_owned());
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"type":"Unsupported","value":"reason"}"#);
        assert!(!result.is_available());
        assert!(EvaluationResult::Unavailable.is_unavailable());
    }
}
