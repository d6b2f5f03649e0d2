// Copyright 2022 Lucas Javaudin
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// https://creativecommons.org/licenses/by-nc-nd/4.0/legalcode

//! Inputs shared by the path evaluators during the evaluation of one trip.
use crate::impedance::{ImpedanceLookup, Point, SkimQuery, SkimValue};
use crate::mode::{PathType, SkimMode};
use crate::parameters::Parameters;
use crate::request::Trip;

/// Parameters, impedance data and trip of one evaluation.
#[derive(Clone, Copy)]
pub struct EvaluationContext<'a> {
    pub parameters: &'a Parameters,
    pub impedance: &'a dyn ImpedanceLookup,
    pub trip: Trip<'a>,
}

impl<'a> EvaluationContext<'a> {
    pub fn new(
        parameters: &'a Parameters,
        impedance: &'a dyn ImpedanceLookup,
        trip: Trip<'a>,
    ) -> Self {
        EvaluationContext {
            parameters,
            impedance,
            trip,
        }
    }

    /// Returns the upper time limit of available paths (doubled for round trips).
    pub fn time_limit(&self) -> f64 {
        self.parameters.available_path_upper_time_limit * self.trip.round_trip_factor()
    }

    /// Returns the path-choice scale factor.
    pub fn scale(&self) -> f64 {
        self.parameters.path_choice_scale_factor
    }

    /// Returns a query for the outbound leg of a path.
    pub fn outbound_query<'q>(
        &self,
        variable: &'q str,
        mode: SkimMode,
        path_type: PathType,
        origin: Point,
        destination: Point,
    ) -> SkimQuery<'q> {
        SkimQuery::new(
            variable,
            mode,
            path_type,
            self.trip.value_of_time(),
            self.trip.outbound_time(),
            origin,
            destination,
        )
    }

    /// Returns the queries of the outbound leg and, for round trips, of the return leg.
    pub fn leg_queries<'q>(&self, outbound: SkimQuery<'q>) -> [Option<SkimQuery<'q>>; 2] {
        [
            Some(outbound),
            self.trip.return_time().map(|t| outbound.reversed(t)),
        ]
    }

    /// Returns the sum of a skim variable over the outbound and return legs.
    pub fn round_trip_value(&self, outbound: SkimQuery) -> f64 {
        self.leg_queries(outbound)
            .into_iter()
            .flatten()
            .map(|q| self.impedance.value(&q))
            .sum()
    }

    pub fn get(&self, query: &SkimQuery) -> SkimValue {
        self.impedance.get(query)
    }
}
