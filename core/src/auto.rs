// Copyright 2022 Lucas Javaudin
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// https://creativecommons.org/licenses/by-nc-nd/4.0/legalcode

//! Auto paths: single-occupancy vehicle, HOV driver and passenger, paid ride-share.
use choice::{gamma, EPSILON};

use crate::context::EvaluationContext;
use crate::impedance::{Point, SkimQuery, DISTANCE};
use crate::location::Location;
use crate::mode::{AutoMode, PathType, SkimMode};
use crate::time::minutes_after_midnight;

/// Time, distance, cost and utility of an auto path.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AutoPath {
    pub time: f64,
    pub distance: f64,
    pub cost: f64,
    pub utility: f64,
}

/// Free-flow time, extra time and distance of one leg.
#[derive(Clone, Copy, Debug, Default)]
struct LegTimes {
    free_flow: f64,
    extra: f64,
    distance: f64,
}

impl std::ops::Add for LegTimes {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        LegTimes {
            free_flow: self.free_flow + rhs.free_flow,
            extra: self.extra + rhs.extra,
            distance: self.distance + rhs.distance,
        }
    }
}

/// Returns `true` if the value of time of autonomous vehicles applies.
fn uses_av_value_of_time(ctx: &EvaluationContext, mode: AutoMode) -> bool {
    let av = &ctx.parameters.autonomous_vehicles;
    match mode {
        AutoMode::PaidRideShare => av.paid_ride_share_uses_avs,
        _ => ctx.trip.request.vehicles_are_autonomous && av.include_auto_type_choice,
    }
}

fn resolve_skim_mode(ctx: &EvaluationContext, mode: AutoMode, use_av: bool) -> SkimMode {
    if use_av && ctx.parameters.autonomous_vehicles.use_separate_av_skims {
        SkimMode::AutonomousVehicle
    } else {
        mode.skim_mode()
    }
}

/// Returns the skim mode of a direct auto path.
pub fn auto_skim_mode(ctx: &EvaluationContext, mode: AutoMode) -> SkimMode {
    resolve_skim_mode(ctx, mode, uses_av_value_of_time(ctx, mode))
}

/// Returns the auto path between two locations, or `None` if it is unavailable.
///
/// A path on the full network is unavailable when its tolls are not larger than those of the
/// toll-free path.
pub fn auto_path(
    ctx: &EvaluationContext,
    mode: AutoMode,
    path_type: PathType,
    origin: Location,
    destination: Location,
) -> Option<AutoPath> {
    let use_av = uses_av_value_of_time(ctx, mode);
    auto_path_imp(ctx, mode, path_type, origin, destination, use_av)
}

/// Returns the auto path of an access or egress leg on the full network, or `None` if it is
/// unavailable.
///
/// Legs to and from transit never use the value of time or the skims of autonomous vehicles.
pub fn access_auto_path(
    ctx: &EvaluationContext,
    mode: AutoMode,
    origin: Location,
    destination: Location,
) -> Option<AutoPath> {
    auto_path_imp(ctx, mode, PathType::FullNetwork, origin, destination, false)
}

fn auto_path_imp(
    ctx: &EvaluationContext,
    mode: AutoMode,
    path_type: PathType,
    origin: Location,
    destination: Location,
    use_av: bool,
) -> Option<AutoPath> {
    let parameters = ctx.parameters;
    let skim_mode = resolve_skim_mode(ctx, mode, use_av);
    let is_ride_share = mode == AutoMode::PaidRideShare;
    let outbound = ctx.outbound_query("toll", skim_mode, path_type, origin.into(), destination.into());

    let tolls = ctx.round_trip_value(outbound);
    let mut toll_constant = 0.0;
    if path_type == PathType::FullNetwork
        && ctx
            .impedance
            .is_actual_combination(skim_mode, PathType::NoTolls)
    {
        let free_tolls = ctx.round_trip_value(SkimQuery {
            path_type: PathType::NoTolls,
            ..outbound
        });
        if tolls - free_tolls < EPSILON {
            return None;
        }
        toll_constant = parameters.auto.tolled_path_constant;
    }

    let circuity_distance = match (origin, destination) {
        (Location::Parcel(o), Location::Parcel(d))
            if parameters.auto.maximum_blending_distance > 0.0 =>
        {
            let zone_distance = ctx.impedance.value(&SkimQuery {
                origin: Point::Zone(o.zone),
                destination: Point::Zone(d.zone),
                ..outbound.with_variable(DISTANCE)
            });
            (zone_distance <= parameters.auto.maximum_blending_distance)
                .then(|| o.circuity_distance(d))
        }
        _ => None,
    };
    let outbound = SkimQuery {
        circuity_distance,
        ..outbound
    };

    let legs: Vec<(i32, LegTimes)> = ctx
        .leg_queries(outbound)
        .into_iter()
        .flatten()
        .map(|q| (q.minute, leg_times(ctx, q)))
        .collect();
    let mut times = legs
        .iter()
        .fold(LegTimes::default(), |acc, &(_, leg)| acc + leg);

    if !is_ride_share {
        if let Location::Parcel(parcel) = destination {
            times.extra += parcel.parking_search.minutes_for(ctx.trip.outbound_time());
        }
    }

    let time = times.free_flow + times.extra;
    if time > ctx.time_limit() || time < EPSILON {
        return None;
    }

    let mut cost = tolls;
    if let Some(pricing) = &parameters.mileage_pricing {
        cost += legs
            .iter()
            .map(|&(minute, leg)| {
                leg.distance * pricing.price_per_distance(minutes_after_midnight(minute))
            })
            .sum::<f64>();
    }
    if is_ride_share {
        let fares = &parameters.ride_share;
        let (fixed, per_distance) = if parameters.autonomous_vehicles.paid_ride_share_uses_avs {
            (fares.av_fixed_cost, fares.av_cost_per_distance)
        } else {
            (fares.fixed_cost, fares.cost_per_distance)
        };
        cost += legs
            .iter()
            .map(|&(_, leg)| leg.distance * per_distance + fixed)
            .sum::<f64>();
    } else {
        cost += parameters.auto.operating_cost_per_distance * times.distance;
    }

    if parameters.auto.congested_time_multiplier != 0.0 {
        times.extra *= parameters.auto.congested_time_multiplier;
    }
    let g = &parameters.gamma;
    let gamma_free_flow = gamma(times.free_flow, g.in_vehicle_time);
    let gamma_extra = gamma(times.extra, g.extra_time);
    let gamma_cost = if mode == AutoMode::HovPassenger && !parameters.auto.hov_passengers_incur_costs
    {
        0.0
    } else if is_ride_share {
        gamma(cost, g.paid_ride_share_cost)
    } else {
        gamma(cost, g.cost)
    };
    let extra_weight = if mode == AutoMode::HovPassenger {
        parameters.auto.passenger_extra_time_weight
    } else {
        parameters.auto.driver_extra_time_weight
    };
    let in_vehicle_weight = parameters
        .auto
        .in_vehicle_time_weights
        .get(ctx.trip.request.purpose.aggregate())
        .get(mode);
    let time_coefficient = if use_av {
        ctx.trip.time_coefficient
            * (1.0 - parameters.autonomous_vehicles.time_coefficient_discount)
    } else {
        ctx.trip.time_coefficient
    };
    let utility = ctx.scale()
        * (ctx.trip.cost_coefficient * gamma_cost
            + time_coefficient
                * in_vehicle_weight
                * (gamma_free_flow + gamma_extra * extra_weight)
            + toll_constant);

    Some(AutoPath {
        time,
        distance: times.distance,
        cost,
        utility,
    })
}

fn leg_times(ctx: &EvaluationContext, toll_query: SkimQuery) -> LegTimes {
    let free_flow = ctx.get(&toll_query.with_variable("ivtfree"));
    LegTimes {
        free_flow: free_flow.value,
        extra: ctx.impedance.value(&toll_query.with_variable("ivtextra")),
        distance: free_flow.blend_value.unwrap_or(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impedance::{Combination, PointKey, SkimEntry, SkimTable, SkimTableData};
    use crate::location::Parcel;
    use crate::mode::{Mode, Purpose};
    use crate::parameters::{MileagePricing, Parameters};
    use crate::request::{Endpoint, TravelRequest, Trip};
    use crate::time::EIGHT_AM;

    fn request(mode: Mode, return_time: Option<i32>) -> TravelRequest {
        TravelRequest {
            id: 1,
            mode,
            origin: Endpoint::Zone(1),
            destination: Endpoint::Zone(2),
            outbound_time: EIGHT_AM,
            return_time,
            purpose: Purpose::Work,
            cost_coefficient: -0.1,
            time_coefficient: -0.05,
            age: 30,
            household_vehicles: 1,
            vehicles_are_autonomous: false,
            transit_pass_tier: 0,
            transit_discount_fraction: 0.0,
            random_choice: false,
        }
    }

    fn entry(mode: SkimMode, path_type: PathType, variable: &str, value: f64) -> SkimEntry {
        SkimEntry::new(variable, mode, path_type, PointKey::Zone(1), PointKey::Zone(2), value)
    }

    fn table(full_tolls: f64, free_tolls: f64) -> SkimTable {
        let combinations = |path_types: &[PathType]| {
            path_types
                .iter()
                .flat_map(|&path_type| {
                    [SkimMode::Sov, SkimMode::HovPassenger]
                        .into_iter()
                        .map(move |mode| Combination { mode, path_type })
                })
                .collect::<Vec<_>>()
        };
        let mut entries = Vec::new();
        for mode in [SkimMode::Sov, SkimMode::HovPassenger] {
            for (path_type, toll) in [
                (PathType::FullNetwork, full_tolls),
                (PathType::NoTolls, free_tolls),
            ] {
                entries.push(entry(mode, path_type, "ivtfree", 20.0));
                entries.push(entry(mode, path_type, "ivtextra", 0.0));
                entries.push(entry(mode, path_type, "toll", toll));
                entries.push(entry(mode, path_type, DISTANCE, 15.0));
            }
        }
        SkimTable::new(SkimTableData {
            possible_combinations: combinations(&[PathType::FullNetwork, PathType::NoTolls]),
            actual_combinations: combinations(&[PathType::FullNetwork, PathType::NoTolls]),
            entries,
        })
        .unwrap()
    }

    fn evaluate(
        parameters: &Parameters,
        table: &SkimTable,
        req: &TravelRequest,
        mode: AutoMode,
        path_type: PathType,
    ) -> Option<AutoPath> {
        let trip = Trip::new(req, Location::Zone(1), Location::Zone(2));
        let ctx = EvaluationContext::new(parameters, table, trip);
        auto_path(&ctx, mode, path_type, trip.origin, trip.destination)
    }

    #[test]
    fn sov_utility_test() {
        let parameters = Parameters::default();
        let skims = table(5.0, 0.0);
        let req = request(Mode::Sov, None);
        let path = evaluate(&parameters, &skims, &req, AutoMode::Sov, PathType::FullNetwork)
            .unwrap();
        assert_eq!(path.time, 20.0);
        assert_eq!(path.cost, 5.0);
        assert_eq!(path.distance, 15.0);
        assert!((path.utility - (-1.5)).abs() < 1e-12);
    }

    #[test]
    fn av_value_of_time_test() {
        let mut parameters = Parameters::default();
        parameters.autonomous_vehicles.include_auto_type_choice = true;
        parameters.autonomous_vehicles.time_coefficient_discount = 0.5;
        let skims = table(5.0, 0.0);
        let mut req = request(Mode::Sov, None);
        req.vehicles_are_autonomous = true;
        let path = evaluate(&parameters, &skims, &req, AutoMode::Sov, PathType::FullNetwork)
            .unwrap();
        assert!((path.utility - (-0.1 * 5.0 - 0.025 * 20.0)).abs() < 1e-12);
        // Access and egress legs use the conventional value of time.
        let trip = Trip::new(&req, Location::Zone(1), Location::Zone(2));
        let ctx = EvaluationContext::new(&parameters, &skims, trip);
        let leg = access_auto_path(&ctx, AutoMode::Sov, trip.origin, trip.destination).unwrap();
        assert!((leg.utility - (-1.5)).abs() < 1e-12);
    }

    #[test]
    fn toll_suppression_test() {
        let mut parameters = Parameters::default();
        parameters.auto.tolled_path_constant = -0.3;
        let req = request(Mode::Sov, None);
        // Tolls are equal on both path types: the tolled path is a duplicate.
        let skims = table(0.0, 0.0);
        assert!(evaluate(&parameters, &skims, &req, AutoMode::Sov, PathType::FullNetwork).is_none());
        assert!(evaluate(&parameters, &skims, &req, AutoMode::Sov, PathType::NoTolls).is_some());
        // The toll-free path is cheaper: the tolled path remains, with the constant.
        let skims = table(2.0, 0.0);
        let path = evaluate(&parameters, &skims, &req, AutoMode::Sov, PathType::FullNetwork)
            .unwrap();
        assert!((path.utility - (-0.1 * 2.0 - 0.05 * 20.0 - 0.3)).abs() < 1e-12);
    }

    #[test]
    fn round_trip_test() {
        let parameters = Parameters::default();
        let mut skims = table(1.0, 0.0);
        for (variable, value) in [("ivtfree", 25.0), ("ivtextra", 3.0), ("toll", 1.0), (DISTANCE, 16.0)]
        {
            skims.insert(SkimEntry::new(
                variable,
                SkimMode::Sov,
                PathType::FullNetwork,
                PointKey::Zone(2),
                PointKey::Zone(1),
                value,
            ));
        }
        let one_way = request(Mode::Sov, None);
        let round_trip = request(Mode::Sov, Some(EIGHT_AM + 540));
        let outbound =
            evaluate(&parameters, &skims, &one_way, AutoMode::Sov, PathType::FullNetwork).unwrap();
        let both =
            evaluate(&parameters, &skims, &round_trip, AutoMode::Sov, PathType::FullNetwork)
                .unwrap();
        assert_eq!(both.time, outbound.time + 28.0);
        assert_eq!(both.distance, outbound.distance + 16.0);
        assert_eq!(both.cost, outbound.cost + 1.0);
    }

    #[test]
    fn passenger_cost_test() {
        let mut parameters = Parameters::default();
        parameters.auto.hov_passengers_incur_costs = false;
        let skims = table(5.0, 0.0);
        let req = request(Mode::HovPassenger, None);
        let path = evaluate(
            &parameters,
            &skims,
            &req,
            AutoMode::HovPassenger,
            PathType::FullNetwork,
        )
        .unwrap();
        assert_eq!(path.cost, 5.0);
        assert!((path.utility - (-1.0)).abs() < 1e-12);
    }

    #[test]
    fn ride_share_cost_test() {
        let mut parameters = Parameters::default();
        parameters.auto.operating_cost_per_distance = 1.0;
        parameters.ride_share.fixed_cost = 3.0;
        parameters.ride_share.cost_per_distance = 0.5;
        let skims = table(0.0, 0.0);
        let req = request(Mode::PaidRideShare, None);
        let path = evaluate(
            &parameters,
            &skims,
            &req,
            AutoMode::PaidRideShare,
            PathType::NoTolls,
        )
        .unwrap();
        // No operating cost for ride-share: 15 * 0.5 + 3.
        assert!((path.cost - 10.5).abs() < 1e-12);
    }

    #[test]
    fn mileage_pricing_test() {
        let mut parameters = Parameters::default();
        parameters.mileage_pricing = Some(MileagePricing {
            am_peak: [420, 540],
            pm_peak: [960, 1080],
            am_peak_cents: 10.0,
            pm_peak_cents: 0.0,
            between_peaks_cents: 0.0,
            outside_peaks_cents: 0.0,
        });
        let skims = table(0.0, 0.0);
        let req = request(Mode::Sov, None);
        // 8 AM is 480 minutes after midnight: AM peak.
        let path =
            evaluate(&parameters, &skims, &req, AutoMode::Sov, PathType::NoTolls).unwrap();
        assert!((path.cost - 1.5).abs() < 1e-12);
    }

    #[test]
    fn parking_search_test() {
        let mut parameters = Parameters::default();
        let skims = table(5.0, 0.0);
        let req = request(Mode::Sov, None);
        let origin = Parcel::new(1, 1, 0.0, 0.0);
        let mut destination = Parcel::new(2, 2, 0.0, 0.0);
        destination.parking_search.search_07_08 = 4.0;
        let trip = Trip::new(&req, Location::Parcel(&origin), Location::Parcel(&destination));
        let ctx = EvaluationContext::new(&parameters, &skims, trip);
        let path =
            auto_path(&ctx, AutoMode::Sov, PathType::FullNetwork, trip.origin, trip.destination)
                .unwrap();
        assert_eq!(path.time, 24.0);
        assert!((path.utility - (-1.5 - 0.05 * 4.0)).abs() < 1e-12);
        // Ride-share drivers do not search for parking.
        let ride_share = auto_path(
            &ctx,
            AutoMode::PaidRideShare,
            PathType::NoTolls,
            trip.origin,
            trip.destination,
        )
        .unwrap();
        assert_eq!(ride_share.time, 20.0);
        // The search time counts toward the time limit.
        parameters.available_path_upper_time_limit = 22.0;
        let ctx = EvaluationContext::new(&parameters, &skims, trip);
        assert!(
            auto_path(&ctx, AutoMode::Sov, PathType::FullNetwork, trip.origin, trip.destination)
                .is_none()
        );
    }

    #[test]
    fn time_limit_test() {
        let mut parameters = Parameters::default();
        parameters.available_path_upper_time_limit = 15.0;
        let skims = table(5.0, 0.0);
        let req = request(Mode::Sov, None);
        assert!(evaluate(&parameters, &skims, &req, AutoMode::Sov, PathType::FullNetwork).is_none());
        // Disconnected zones.
        let parameters = Parameters::default();
        let trip = Trip::new(&req, Location::Zone(2), Location::Zone(1));
        let ctx = EvaluationContext::new(&parameters, &skims, trip);
        assert!(auto_path(&ctx, AutoMode::Sov, PathType::NoTolls, trip.origin, trip.destination)
            .is_none());
    }
}
