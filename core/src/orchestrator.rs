// Copyright 2022 Lucas Javaudin
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// https://creativecommons.org/licenses/by-nc-nd/4.0/legalcode

//! Evaluation of all the path types of a travel request and choice of a path type.
use anyhow::{bail, Context, Result};
use choice::{ChoiceModel, DeterministicChoiceModel, LogitModel, EPSILON};
use log::debug;
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;
use rayon::prelude::*;

use crate::access_egress::StopAreaSearch;
use crate::auto::{auto_path, auto_skim_mode};
use crate::context::EvaluationContext;
use crate::facilities::Facilities;
use crate::impedance::{ImpedanceLookup, MICROZONE_DISTANCE};
use crate::location::{Location, Parcels};
use crate::mode::{AccessMode, AutoMode, Mode, PathType, Route, SkimMode};
use crate::parameters::Parameters;
use crate::path::{ChosenPath, EvaluationResult, PathTypeCandidate, RequestResult};
use crate::progress_bar::EvaluationProgressBar;
use crate::request::{TravelRequest, Trip};
use crate::shadow_price::ShadowPriceView;
use crate::transit::zonal_transit_path;
use crate::walk_bike::walk_bike_path;

/// Source of uniform random numbers.
pub trait RandomSource {
    /// Returns a random number in `[0, 1)`.
    fn uniform01(&mut self) -> f64;
}

impl<R: Rng> RandomSource for R {
    fn uniform01(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Evaluator selected for a travel request.
enum Evaluator<'a> {
    WalkBike(SkimMode),
    Auto(AutoMode),
    StopArea(Box<StopAreaSearch<'a>>),
    ZonalTransit,
}

/// Evaluates the path types of travel requests.
#[derive(Clone, Copy)]
pub struct PathTypeOrchestrator<'a> {
    parameters: &'a Parameters,
    impedance: &'a dyn ImpedanceLookup,
    parcels: &'a Parcels,
    facilities: &'a Facilities,
    shadow_prices: ShadowPriceView<'a>,
}

impl<'a> PathTypeOrchestrator<'a> {
    pub fn new(
        parameters: &'a Parameters,
        impedance: &'a dyn ImpedanceLookup,
        parcels: &'a Parcels,
        facilities: &'a Facilities,
        shadow_prices: ShadowPriceView<'a>,
    ) -> Self {
        PathTypeOrchestrator {
            parameters,
            impedance,
            parcels,
            facilities,
            shadow_prices,
        }
    }

    /// Evaluates every path type of the request's mode and chooses one of them.
    ///
    /// Returns an error if an endpoint is unknown or if the logsum cannot be computed.
    pub fn evaluate<R: RandomSource + ?Sized>(
        &self,
        request: &TravelRequest,
        rng: &mut R,
    ) -> Result<EvaluationResult> {
        let origin = request
            .origin
            .resolve(self.parcels)
            .with_context(|| format!("Invalid origin for request {}", request.id))?;
        let destination = request
            .destination
            .resolve(self.parcels)
            .with_context(|| format!("Invalid destination for request {}", request.id))?;
        let mut trip = Trip::new(request, origin, destination);
        match &self.parameters.distance_cost_adjustment {
            Some(adjustment) if trip.has_parcels() => {
                let ctx = EvaluationContext::new(self.parameters, self.impedance, trip);
                let query = ctx.outbound_query(
                    MICROZONE_DISTANCE,
                    SkimMode::Walk,
                    PathType::FullNetwork,
                    origin.into(),
                    destination.into(),
                );
                let km = self.impedance.value(&query) / 1000.0;
                trip.cost_coefficient *= adjustment.multiplier(request.purpose, km);
            }
            _ => {}
        }
        let ctx = EvaluationContext::new(self.parameters, self.impedance, trip);

        let (skim_mode, evaluator) = match self.evaluator(ctx, request.mode) {
            Ok(selected) => selected,
            Err(reason) => return Ok(EvaluationResult::Unsupported(reason)),
        };

        let mut candidates: Vec<(PathType, PathTypeCandidate)> = Vec::new();
        for path_type in PathType::ALL {
            if !self.impedance.is_actual_combination(skim_mode, path_type) {
                continue;
            }
            if let Some(candidate) = self.evaluate_path_type(ctx, &evaluator, path_type) {
                candidates.push((path_type, candidate));
            }
        }
        self.choose(ctx, candidates, rng)
    }

    /// Selects the evaluator of the mode, or returns the reason why the mode is not supported.
    fn evaluator<'r>(
        &self,
        ctx: EvaluationContext<'r>,
        mode: Mode,
    ) -> Result<(SkimMode, Evaluator<'r>), String>
    where
        'a: 'r,
    {
        match mode.route() {
            Route::WalkBike(skim_mode) => Ok((skim_mode, Evaluator::WalkBike(skim_mode))),
            Route::Auto(auto_mode) => {
                Ok((auto_skim_mode(&ctx, auto_mode), Evaluator::Auto(auto_mode)))
            }
            Route::StopAreaTransit {
                skim_mode,
                access,
                egress,
            } => {
                let uses_share = access == AccessMode::PaidRideShare
                    || egress == AccessMode::PaidRideShare;
                if uses_share && !self.parameters.transit.share_mode_available_for_transit {
                    return Err(format!(
                        "Paid ride-share is not available as access or egress mode ({mode})"
                    ));
                }
                match (ctx.trip.origin, ctx.trip.destination) {
                    (Location::Parcel(o), Location::Parcel(d)) => {
                        let search = StopAreaSearch::new(
                            ctx,
                            self.parcels,
                            self.facilities,
                            self.shadow_prices,
                            skim_mode,
                            access,
                            egress,
                            o,
                            d,
                        );
                        Ok((skim_mode, Evaluator::StopArea(Box::new(search))))
                    }
                    _ if mode == Mode::Transit => Ok((skim_mode, Evaluator::ZonalTransit)),
                    _ => Err(format!("Mode {mode} requires parcel origin and destination")),
                }
            }
        }
    }

    fn evaluate_path_type(
        &self,
        ctx: EvaluationContext,
        evaluator: &Evaluator,
        path_type: PathType,
    ) -> Option<PathTypeCandidate> {
        let trip = ctx.trip;
        let candidate = match evaluator {
            Evaluator::WalkBike(skim_mode) => {
                let path =
                    walk_bike_path(&ctx, *skim_mode, path_type, trip.origin, trip.destination)?;
                let mut candidate =
                    PathTypeCandidate::new(path.time, path.distance, 0.0, path.utility);
                if *skim_mode == SkimMode::Walk {
                    candidate.walk_time = path.time;
                    candidate.walk_distance = path.distance;
                } else {
                    candidate.bike_time = path.time;
                    candidate.bike_distance = path.distance;
                }
                candidate
            }
            Evaluator::Auto(auto_mode) => {
                if *auto_mode == AutoMode::Sov
                    && (trip.request.age < self.parameters.auto.minimum_driving_age
                        || trip.request.household_vehicles == 0)
                {
                    return None;
                }
                let path = auto_path(&ctx, *auto_mode, path_type, trip.origin, trip.destination)?;
                let mut candidate =
                    PathTypeCandidate::new(path.time, path.distance, path.cost, path.utility);
                let parking_cost = self.destination_parking_cost(ctx, *auto_mode);
                if parking_cost > 0.0 {
                    let share = match auto_mode {
                        AutoMode::HovDriver | AutoMode::HovPassenger => *self
                            .parameters
                            .auto
                            .hov_cost_share
                            .get(trip.request.purpose.cost_share_purpose()),
                        _ => 1.0,
                    };
                    candidate.cost += parking_cost;
                    candidate.set_utility(
                        path.utility
                            + ctx.scale() * trip.cost_coefficient * share * parking_cost,
                    );
                }
                candidate
            }
            Evaluator::StopArea(search) => search.best_path(path_type)?,
            Evaluator::ZonalTransit => {
                let path = zonal_transit_path(
                    &ctx,
                    SkimMode::Transit,
                    path_type,
                    trip.origin.zone(),
                    trip.destination.zone(),
                )?;
                let mut candidate =
                    PathTypeCandidate::new(path.time, path.distance, path.cost, path.utility);
                candidate.transit_time = path.time;
                candidate.transit_cost = path.cost;
                candidate.transit_utility = path.utility;
                candidate
            }
        };
        Some(candidate)
    }

    /// Returns the parking cost at the destination parcel of a direct auto trip.
    fn destination_parking_cost(&self, ctx: EvaluationContext, mode: AutoMode) -> f64 {
        let pays_parking = match mode {
            AutoMode::Sov | AutoMode::HovDriver => true,
            AutoMode::HovPassenger => self.parameters.auto.hov_passengers_incur_costs,
            AutoMode::PaidRideShare => false,
        };
        match ctx.trip.destination.parcel() {
            Some(parcel) if pays_parking => {
                let hours = match ctx.trip.return_time() {
                    Some(t) => ((t - ctx.trip.outbound_time()) / 60) as f64,
                    None => 1.0,
                };
                parcel.parking_hourly_price * hours.max(0.0)
            }
            _ => 0.0,
        }
    }

    /// Reduces the available candidates to a chosen path and a logsum.
    fn choose<R: RandomSource + ?Sized>(
        &self,
        ctx: EvaluationContext,
        candidates: Vec<(PathType, PathTypeCandidate)>,
        rng: &mut R,
    ) -> Result<EvaluationResult> {
        let candidates: Vec<_> = candidates
            .into_iter()
            .filter(|(_, c)| !(c.exp_utility < EPSILON))
            .collect();
        let utility_sum: f64 = candidates.iter().map(|(_, c)| c.exp_utility).sum();
        if utility_sum < EPSILON {
            return Ok(EvaluationResult::Unavailable);
        }
        let logsum = utility_sum.ln();
        let tour_time_coefficient = ctx.scale() * ctx.trip.time_coefficient;
        let generalized_logsum = logsum / tour_time_coefficient;
        if utility_sum.is_nan()
            || logsum.is_nan()
            || tour_time_coefficient.is_nan()
            || generalized_logsum.is_nan()
        {
            bail!(
                "Value is NaN for utilitySum: {utility_sum}, logsum: {logsum}, \
                tourTimeCoefficient: {tour_time_coefficient} (request {})",
                ctx.trip.request.id
            );
        }
        let exp_utilities: Vec<f64> = candidates.iter().map(|(_, c)| c.exp_utility).collect();
        let draw = ctx.trip.request.random_choice
            && candidates.len() > 1
            && !self.parameters.is_in_estimation_mode;
        let model = if draw {
            ChoiceModel::Logit(LogitModel::new(rng.uniform01()))
        } else {
            ChoiceModel::Deterministic(DeterministicChoiceModel)
        };
        let index = model.get_choice(&exp_utilities)?;
        let available_path_types = candidates.len();
        let Some((path_type, path)) = candidates.into_iter().nth(index) else {
            bail!("Invalid choice index: {index}");
        };
        Ok(EvaluationResult::Available(ChosenPath {
            path_type,
            logsum: generalized_logsum,
            generalized_time_chosen: path.utility / tour_time_coefficient,
            transit_generalized_time: path.transit_utility / tour_time_coefficient,
            available_path_types,
            path,
        }))
    }

    /// Evaluates a batch of requests in parallel.
    ///
    /// The random generator of each request is seeded from the global seed and the request id so
    /// that the results do not depend on the order of evaluation.
    pub fn evaluate_all(&self, requests: &[TravelRequest], seed: u64) -> Result<Vec<RequestResult>> {
        let bp = EvaluationProgressBar::new(requests.len(), "Evaluating path types");
        let results = requests
            .par_iter()
            .panic_fuse()
            .map(|request| {
                bp.inc();
                let mut rng = XorShiftRng::seed_from_u64(seed.wrapping_add(request.id));
                let result = self.evaluate(request, &mut rng)?;
                Ok(RequestResult {
                    request_id: request.id,
                    result,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        bp.finish();
        debug!(
            "{} requests evaluated, {} with an available path",
            results.len(),
            results.iter().filter(|r| r.result.is_available()).count()
        );
        Ok(results)
    }
}
