// Copyright 2022 Lucas Javaudin
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// https://creativecommons.org/licenses/by-nc-nd/4.0/legalcode

//! Transit paths between two stop areas (or zones).
use choice::{gamma, EPSILON};

use crate::context::EvaluationContext;
use crate::impedance::{Point, SkimQuery, DISTANCE};
use crate::location::ZoneId;
use crate::mode::{PathType, SkimMode};
use crate::parameters::{FareModel, FareZoneParameters};
use crate::time::{minutes_after_midnight, Minute};

/// Walking time to and from the stops in the zonal transit model, in minutes.
const ZONAL_WALK_MINUTES: f64 = 5.0;

/// Time, distance, fare and utility of a transit path.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TransitPath {
    /// In-vehicle time, in minutes.
    pub time: f64,
    pub distance: f64,
    pub cost: f64,
    pub utility: f64,
}

/// Level-of-service of a transit path, summed over the legs.
#[derive(Clone, Copy, Debug, Default)]
struct TransitLevelOfService {
    first_wait: f64,
    transfer_wait: f64,
    fare: f64,
    bike_fare: f64,
    ferry: f64,
    metro: f64,
    bus: f64,
    light_rail: f64,
    regional_train: f64,
    s_train: f64,
    intercity_train: f64,
    transfer_walk: f64,
}

impl TransitLevelOfService {
    fn read(ctx: &EvaluationContext, query: SkimQuery) -> Self {
        let value = |variable| ctx.impedance.value(&query.with_variable(variable));
        let fare = value("farecard10");
        TransitLevelOfService {
            first_wait: value("firstandhiddenwaittime"),
            transfer_wait: value("waittime"),
            fare,
            bike_fare: if query.mode == SkimMode::BikeOnTransit {
                fare
            } else {
                0.0
            },
            ferry: value("invehtimeferry"),
            metro: value("invehtimemetro"),
            bus: value("invehtimebus"),
            light_rail: value("invehtimelrandlocaltrain"),
            regional_train: value("invehtimeretrain"),
            s_train: value("invehtimestrain"),
            intercity_train: value("invehtimeictrain"),
            transfer_walk: value("transferwalktime"),
        }
    }

    fn train(&self) -> f64 {
        self.regional_train + self.s_train + self.intercity_train
    }

    fn bus(&self) -> f64 {
        self.bus + self.ferry
    }

    fn in_vehicle_time(&self) -> f64 {
        self.train() + self.bus() + self.metro + self.light_rail
    }

    fn add(&mut self, other: &Self) {
        self.first_wait += other.first_wait;
        self.transfer_wait += other.transfer_wait;
        self.fare += other.fare;
        self.bike_fare += other.bike_fare;
        self.ferry += other.ferry;
        self.metro += other.metro;
        self.bus += other.bus;
        self.light_rail += other.light_rail;
        self.regional_train += other.regional_train;
        self.s_train += other.s_train;
        self.intercity_train += other.intercity_train;
        self.transfer_walk += other.transfer_walk;
    }
}

/// Returns the transit path between two points, or `None` if it is unavailable.
pub fn transit_path(
    ctx: &EvaluationContext,
    skim_mode: SkimMode,
    path_type: PathType,
    origin: Point,
    destination: Point,
) -> Option<TransitPath> {
    let parameters = ctx.parameters;
    let request = ctx.trip.request;
    let outbound = ctx.outbound_query(DISTANCE, skim_mode, path_type, origin, destination);
    let queries = ctx.leg_queries(outbound);
    let mut distance = 0.0;
    for query in queries.iter().flatten() {
        let leg_distance = ctx.impedance.value(query);
        if leg_distance < EPSILON {
            return None;
        }
        distance += leg_distance;
    }

    let mut los = TransitLevelOfService::default();
    let mut fare = 0.0;
    for query in queries.iter().flatten() {
        let leg = TransitLevelOfService::read(ctx, *query);
        if let FareModel::FareZones(fares) = &parameters.transit.fare_model {
            let zones = ctx.impedance.value(&query.with_variable("farezones"));
            fare += fare_zone_fare(fares, ctx, zones, query.minute, OffPeakRule::Departure);
        }
        los.add(&leg);
    }

    let time = los.in_vehicle_time();
    if time > ctx.time_limit() {
        return None;
    }

    if let FareModel::Skimmed = parameters.transit.fare_model {
        fare = if request.transit_pass_tier == 1 {
            0.0
        } else {
            los.fare + los.bike_fare
        };
    }
    fare *= 1.0 - request.transit_discount_fraction;

    let transit = &parameters.transit;
    let weights = transit.submode_weights.get(request.purpose.aggregate());
    let weighted_time = weights.train * los.train()
        + weights.bus * los.bus()
        + weights.metro * los.metro
        + weights.light_rail * los.light_rail;
    let g = &parameters.gamma;
    let utility = ctx.scale()
        * (ctx.trip.cost_coefficient * gamma(fare, g.cost)
            + ctx.trip.time_coefficient
                * (transit.in_vehicle_time_weight * gamma(weighted_time, g.in_vehicle_time)
                    + transit.first_wait_time_weight * los.first_wait
                    + transit.transfer_wait_time_weight * los.transfer_wait
                    + transit.walk_access_time_weight * los.transfer_walk));

    Some(TransitPath {
        time,
        distance,
        cost: fare,
        utility,
    })
}

/// Returns `true` if the given time (in minutes after midnight) is outside the fare peaks.
fn is_off_peak(fares: &FareZoneParameters, minutes_after_midnight: i32) -> bool {
    let t = minutes_after_midnight;
    let [am_start, am_end] = fares.am_peak;
    let [pm_start, pm_end] = fares.pm_peak;
    t < am_start || (t >= am_end && t < pm_start) || t >= pm_end
}

/// Where the off-peak discount of a fare-zone leg is checked.
#[derive(Clone, Copy, Debug)]
enum OffPeakRule {
    /// At the minute of the leg only.
    Departure,
    /// At both ends of the leg. The outbound leg is assumed to arrive at the outbound minute and
    /// the return leg to depart at the return minute.
    BothEnds { leg_time: f64, outbound: bool },
}

/// Returns the fare of one leg under the fare-zone model.
fn fare_zone_fare(
    fares: &FareZoneParameters,
    ctx: &EvaluationContext,
    zones: f64,
    minute: Minute,
    rule: OffPeakRule,
) -> f64 {
    let request = ctx.trip.request;
    let zones = zones.round().max(0.0) as usize;
    if zones <= request.transit_pass_tier as usize || request.age <= fares.free_travel_age {
        return 0.0;
    }
    let at = |table: &[f64]| table.get(zones).or(table.last()).copied().unwrap_or(0.0);
    let mut fare = at(&fares.adult_fares);
    if request.age <= fares.child_age {
        fare *= 1.0 - at(&fares.child_discounts) / 100.0;
    }
    let other_end_off_peak = match rule {
        OffPeakRule::Departure => true,
        OffPeakRule::BothEnds { leg_time, outbound } => {
            let other_end = if outbound {
                minute - leg_time.round() as Minute
            } else {
                minute + leg_time.round() as Minute
            };
            is_off_peak(fares, minutes_after_midnight(other_end))
        }
    };
    if is_off_peak(fares, minutes_after_midnight(minute)) && other_end_off_peak {
        fare *= 1.0 - at(&fares.off_peak_discounts) / 100.0;
    }
    fare
}

/// Returns the transit path between two zones under the zonal walk-transit model, or `None` if
/// the zones are not connected.
///
/// The path includes a fixed walking time at each end.
pub fn zonal_transit_path(
    ctx: &EvaluationContext,
    skim_mode: SkimMode,
    path_type: PathType,
    origin: ZoneId,
    destination: ZoneId,
) -> Option<TransitPath> {
    let outbound = ctx.outbound_query(
        "time",
        skim_mode,
        path_type,
        Point::Zone(origin),
        Point::Zone(destination),
    );
    let path_time = ctx.round_trip_value(outbound);
    if path_time < EPSILON {
        return None;
    }
    let walk_time = 2.0 * ZONAL_WALK_MINUTES * ctx.trip.round_trip_factor();
    let time = path_time + walk_time;
    if time > ctx.time_limit() {
        return None;
    }
    let generalized_time = ctx.round_trip_value(outbound.with_variable("gentime"));
    let fare = match &ctx.parameters.transit.fare_model {
        FareModel::FareZones(fares) => ctx
            .leg_queries(outbound)
            .into_iter()
            .enumerate()
            .filter_map(|(i, q)| q.map(|q| (i == 0, q)))
            .map(|(is_outbound, q)| {
                let zones = ctx.impedance.value(&q.with_variable("farezones"));
                let rule = OffPeakRule::BothEnds {
                    leg_time: ctx.impedance.value(&q),
                    outbound: is_outbound,
                };
                fare_zone_fare(fares, ctx, zones, q.minute, rule)
            })
            .sum(),
        FareModel::Skimmed => {
            if ctx.trip.request.transit_pass_tier == 1 {
                0.0
            } else {
                ctx.round_trip_value(outbound.with_variable("farecard10"))
            }
        }
    };
    let tc = ctx.trip.time_coefficient;
    let utility = ctx.scale()
        * (tc * generalized_time
            + ctx.trip.cost_coefficient * fare
            + tc * ctx.parameters.transit.walk_access_time_weight * walk_time);
    Some(TransitPath {
        time,
        distance: 0.0,
        cost: fare,
        utility,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impedance::{Combination, PointKey, SkimEntry, SkimTable, SkimTableData};
    use crate::location::Location;
    use crate::mode::{Mode, Purpose};
    use crate::parameters::Parameters;
    use crate::request::{Endpoint, TravelRequest, Trip};
    use crate::time::EIGHT_AM;

    fn request(pass_tier: u32, return_time: Option<Minute>) -> TravelRequest {
        TravelRequest {
            id: 1,
            mode: Mode::Transit,
            origin: Endpoint::Zone(1),
            destination: Endpoint::Zone(2),
            outbound_time: EIGHT_AM,
            return_time,
            purpose: Purpose::Work,
            cost_coefficient: -0.1,
            time_coefficient: -0.05,
            age: 30,
            household_vehicles: 0,
            vehicles_are_autonomous: false,
            transit_pass_tier: pass_tier,
            transit_discount_fraction: 0.0,
            random_choice: false,
        }
    }

    fn skims(mode: SkimMode, values: &[(&str, f64)]) -> SkimTable {
        let mut entries = Vec::new();
        for (o, d) in [(10, 20), (20, 10)] {
            for &(variable, value) in values {
                entries.push(SkimEntry::new(
                    variable,
                    mode,
                    PathType::LocalBus,
                    PointKey::StopArea(o),
                    PointKey::StopArea(d),
                    value,
                ));
            }
        }
        SkimTable::new(SkimTableData {
            possible_combinations: vec![Combination {
                mode,
                path_type: PathType::LocalBus,
            }],
            actual_combinations: vec![],
            entries,
        })
        .unwrap()
    }

    fn evaluate(
        parameters: &Parameters,
        table: &SkimTable,
        req: &TravelRequest,
        mode: SkimMode,
    ) -> Option<TransitPath> {
        let trip = Trip::new(req, Location::Zone(1), Location::Zone(2));
        let ctx = EvaluationContext::new(parameters, table, trip);
        transit_path(&ctx, mode, PathType::LocalBus, Point::StopArea(10), Point::StopArea(20))
    }

    const LEVEL_OF_SERVICE: [(&str, f64); 8] = [
        (DISTANCE, 10.0),
        ("firstandhiddenwaittime", 4.0),
        ("waittime", 2.0),
        ("farecard10", 2.0),
        ("invehtimebus", 10.0),
        ("invehtimeferry", 5.0),
        ("invehtimestrain", 8.0),
        ("transferwalktime", 3.0),
    ];

    #[test]
    fn transit_utility_test() {
        let parameters = Parameters::default();
        let table = skims(SkimMode::Transit, &LEVEL_OF_SERVICE);
        let req = request(0, None);
        let path = evaluate(&parameters, &table, &req, SkimMode::Transit).unwrap();
        assert_eq!(path.time, 23.0);
        assert_eq!(path.distance, 10.0);
        assert_eq!(path.cost, 2.0);
        let expected = -0.1 * 2.0 - 0.05 * (23.0 + 4.0 + 2.0 + 3.0);
        assert!((path.utility - expected).abs() < 1e-12);
    }

    #[test]
    fn pass_holder_test() {
        let parameters = Parameters::default();
        let table = skims(SkimMode::Transit, &LEVEL_OF_SERVICE);
        let req = request(1, None);
        let path = evaluate(&parameters, &table, &req, SkimMode::Transit).unwrap();
        assert_eq!(path.cost, 0.0);
    }

    #[test]
    fn bike_on_transit_fare_test() {
        let parameters = Parameters::default();
        let table = skims(SkimMode::BikeOnTransit, &LEVEL_OF_SERVICE);
        let mut req = request(0, Some(EIGHT_AM + 600));
        req.transit_discount_fraction = 0.5;
        let path = evaluate(&parameters, &table, &req, SkimMode::BikeOnTransit).unwrap();
        // Two legs, each with a passenger and a bike ticket, with a 50% discount.
        assert!((path.cost - 4.0).abs() < 1e-12);
        assert_eq!(path.time, 46.0);
        assert_eq!(path.distance, 20.0);
    }

    #[test]
    fn no_path_test() {
        let parameters = Parameters::default();
        let mut values = LEVEL_OF_SERVICE;
        values[0] = (DISTANCE, 0.0);
        let table = skims(SkimMode::Transit, &values);
        assert!(evaluate(&parameters, &table, &request(0, None), SkimMode::Transit).is_none());
        let mut parameters = Parameters::default();
        parameters.available_path_upper_time_limit = 20.0;
        let table = skims(SkimMode::Transit, &LEVEL_OF_SERVICE);
        assert!(evaluate(&parameters, &table, &request(0, None), SkimMode::Transit).is_none());
    }

    fn fare_zones() -> FareZoneParameters {
        FareZoneParameters {
            adult_fares: vec![0.0, 2.0, 3.0, 4.0],
            child_discounts: vec![0.0, 50.0, 50.0, 50.0],
            off_peak_discounts: vec![0.0, 10.0, 10.0, 10.0],
            free_travel_age: 5,
            child_age: 15,
            am_peak: [420, 540],
            pm_peak: [900, 1080],
        }
    }

    fn zonal_skims(fare_zones: f64) -> SkimTable {
        let mut entries = Vec::new();
        for (o, d) in [(1, 2), (2, 1)] {
            for (variable, value) in [("time", 20.0), ("gentime", 30.0), ("farezones", fare_zones)]
            {
                entries.push(SkimEntry::new(
                    variable,
                    SkimMode::Transit,
                    PathType::LocalBus,
                    PointKey::Zone(o),
                    PointKey::Zone(d),
                    value,
                ));
            }
        }
        SkimTable::new(SkimTableData {
            possible_combinations: vec![],
            actual_combinations: vec![],
            entries,
        })
        .unwrap()
    }

    fn zonal(parameters: &Parameters, table: &SkimTable, req: &TravelRequest) -> TransitPath {
        let trip = Trip::new(req, Location::Zone(1), Location::Zone(2));
        let ctx = EvaluationContext::new(parameters, table, trip);
        zonal_transit_path(&ctx, SkimMode::Transit, PathType::LocalBus, 1, 2).unwrap()
    }

    #[test]
    fn zonal_transit_test() {
        let mut parameters = Parameters::default();
        parameters.transit.fare_model = FareModel::FareZones(fare_zones());
        let table = zonal_skims(2.0);
        // 8 AM is 481 minutes after midnight: peak.
        let req = request(0, None);
        let path = zonal(&parameters, &table, &req);
        assert_eq!(path.time, 30.0);
        assert_eq!(path.cost, 3.0);
        assert_eq!(path.distance, 0.0);
        let expected = -0.05 * 30.0 - 0.1 * 3.0 - 0.05 * 10.0;
        assert!((path.utility - expected).abs() < 1e-12);
        // Round trip: walk time is doubled, the return leg departs at 6 PM (off-peak).
        let req = request(0, Some(901));
        let path = zonal(&parameters, &table, &req);
        assert_eq!(path.time, 60.0);
        assert!((path.cost - (3.0 + 2.7)).abs() < 1e-12);
    }

    #[test]
    fn fare_zone_rules_test() {
        let mut parameters = Parameters::default();
        parameters.transit.fare_model = FareModel::FareZones(fare_zones());
        let table = zonal_skims(2.0);
        // The pass covers two zones.
        let path = zonal(&parameters, &table, &request(2, None));
        assert_eq!(path.cost, 0.0);
        // Young children travel for free.
        let mut req = request(0, None);
        req.age = 4;
        assert_eq!(zonal(&parameters, &table, &req).cost, 0.0);
        // Child fare.
        req.age = 10;
        assert!((zonal(&parameters, &table, &req).cost - 1.5).abs() < 1e-12);
        // Beyond the fare table, the last fare applies.
        let table = zonal_skims(7.0);
        assert_eq!(zonal(&parameters, &table, &request(0, None)).cost, 4.0);
    }

    #[test]
    fn off_peak_test() {
        let mut parameters = Parameters::default();
        parameters.transit.fare_model = FareModel::FareZones(fare_zones());
        // The return leg departs at 2:40 PM (off-peak) and arrives during the PM peak.
        let req = request(0, Some(700));

        // Stop-area transit only looks at the departure minute of each leg.
        let mut values = LEVEL_OF_SERVICE.to_vec();
        values.push(("farezones", 2.0));
        let table = skims(SkimMode::Transit, &values);
        let path = evaluate(&parameters, &table, &req, SkimMode::Transit).unwrap();
        assert!((path.cost - (3.0 + 2.7)).abs() < 1e-12);

        // Zonal transit requires both ends of the leg to be off-peak.
        let table = zonal_skims(2.0);
        assert!((zonal(&parameters, &table, &req).cost - 6.0).abs() < 1e-12);
        let req = request(0, Some(650));
        assert!((zonal(&parameters, &table, &req).cost - (3.0 + 2.7)).abs() < 1e-12);
    }
}
