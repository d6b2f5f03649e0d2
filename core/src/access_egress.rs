// Copyright 2022 Lucas Javaudin
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// https://creativecommons.org/licenses/by-nc-nd/4.0/legalcode

//! Search of the best combination of access leg, transit path and egress leg.
//!
//! The access (respectively egress) legs are built from the facilities near the origin
//! (respectively destination) parcel, visited by increasing network length. Each access leg is
//! then combined with each egress leg through a transit path between their stop areas.
use crate::auto::access_auto_path;
use crate::context::EvaluationContext;
use crate::facilities::{Facilities, ParkAndRideNode, ProximityKind, StopArea};
use crate::impedance::{Point, DISTANCE};
use crate::location::{Location, Parcel, Parcels};
use crate::logging::{
    send_warning_at_most_n_times, send_warning_at_most_once, WarningType, MAX_FACILITY_WARNINGS,
};
use crate::mode::{AccessMode, AutoMode, PathType, Purpose, SkimMode};
use crate::parameters::SearchLimit;
use crate::path::{LegSummary, PathTypeCandidate};
use crate::shadow_price::ShadowPriceView;
use crate::time::Minute;
use crate::transit::transit_path;
use crate::walk_bike::walk_bike_path;

/// Side of the transit path where a leg is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    Origin,
    Destination,
}

/// An access or egress leg, between a parcel and a stop area.
#[derive(Clone, Debug)]
struct Leg<'a> {
    mode: AccessMode,
    stop_area: &'a StopArea,
    /// Auto park-and-ride node where the car is parked.
    parked_at: Option<&'a ParkAndRideNode>,
    time: f64,
    distance: f64,
    cost: f64,
    utility: f64,
}

impl Leg<'_> {
    fn summary(&self) -> LegSummary {
        LegSummary {
            mode: Some(self.mode),
            time: self.time,
            distance: self.distance,
            cost: self.cost,
            utility: self.utility,
        }
    }
}

/// Returns the parking duration at a park-and-ride node, in hours.
fn parking_duration(return_time: Option<Minute>, outbound_time: Minute, purpose: Purpose) -> f64 {
    match return_time {
        Some(t) => 1.0 + ((t - outbound_time) as f64 / 60.0).trunc(),
        None => match purpose {
            Purpose::Work => 8.0,
            Purpose::School => 6.0,
            Purpose::Social => 3.0,
            _ => 2.0,
        },
    }
}

/// Access and egress legs of a trip, for a transit mode.
///
/// The legs do not depend on the path type so they are built once and combined with the transit
/// paths of each path type.
#[derive(Clone)]
pub struct StopAreaSearch<'a> {
    ctx: EvaluationContext<'a>,
    skim_mode: SkimMode,
    shadow_prices: ShadowPriceView<'a>,
    access_legs: Vec<Leg<'a>>,
    egress_legs: Vec<Leg<'a>>,
}

impl<'a> StopAreaSearch<'a> {
    /// Builds the access and egress legs between the origin and destination parcels of the
    /// trip.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        ctx: EvaluationContext<'a>,
        parcels: &'a Parcels,
        facilities: &'a Facilities,
        shadow_prices: ShadowPriceView<'a>,
        skim_mode: SkimMode,
        access: AccessMode,
        egress: AccessMode,
        origin: &'a Parcel,
        destination: &'a Parcel,
    ) -> Self {
        let builder = LegBuilder {
            ctx,
            parcels,
            facilities,
            bike_on_board: skim_mode == SkimMode::BikeOnTransit,
            full_distance: ctx.impedance.value(&ctx.outbound_query(
                DISTANCE,
                SkimMode::HovPassenger,
                PathType::FullNetwork,
                Point::Zone(origin.zone),
                Point::Zone(destination.zone),
            )),
        };
        StopAreaSearch {
            ctx,
            skim_mode,
            shadow_prices,
            access_legs: builder.legs(access, Side::Origin, origin),
            egress_legs: builder.legs(egress, Side::Destination, destination),
        }
    }

    /// Returns the best path of the given path type, or `None` if no combination of legs is
    /// available.
    ///
    /// When two combinations have the same utility, the first one found is kept.
    pub fn best_path(&self, path_type: PathType) -> Option<PathTypeCandidate> {
        let time_limit = self.ctx.time_limit();
        let mut best: Option<PathTypeCandidate> = None;
        for access in self.access_legs.iter() {
            for egress in self.egress_legs.iter() {
                let Some(transit) = transit_path(
                    &self.ctx,
                    self.skim_mode,
                    path_type,
                    Point::StopArea(access.stop_area.skim_index),
                    Point::StopArea(egress.stop_area.skim_index),
                ) else {
                    continue;
                };
                if transit.time + access.time + egress.time > time_limit {
                    continue;
                }
                let mut utility = transit.utility + access.utility + egress.utility;
                if let Some(node) = access.parked_at {
                    // Estimated minute at which the car is parked.
                    let park_minute = (self.ctx.trip.outbound_time() as f64
                        - transit.time / 2.0
                        - 3.0)
                        .max(1.0) as Minute;
                    if !node.is_open_at(park_minute) {
                        continue;
                    }
                    utility += self.shadow_prices.price(node.id, park_minute);
                }
                if best.as_ref().is_some_and(|b| utility <= b.utility) {
                    continue;
                }
                let mut candidate = PathTypeCandidate::new(
                    transit.time + access.time + egress.time,
                    transit.distance + access.distance + egress.distance,
                    transit.cost + access.cost + egress.cost,
                    utility,
                );
                for leg in [access, egress] {
                    match leg.mode {
                        AccessMode::Walk => {
                            candidate.walk_time += leg.time;
                            candidate.walk_distance += leg.distance;
                        }
                        AccessMode::Bike => {
                            candidate.bike_time += leg.time;
                            candidate.bike_distance += leg.distance;
                            candidate.bike_cost += leg.cost;
                        }
                        _ => {}
                    }
                }
                candidate.transit_time = transit.time;
                candidate.transit_distance = transit.distance;
                candidate.transit_cost = transit.cost;
                candidate.transit_utility = transit.utility;
                candidate.origin_access = access.summary();
                candidate.destination_egress = egress.summary();
                candidate.park_and_ride_node = access.parked_at.map(|n| n.id);
                candidate.origin_stop_area = Some(access.stop_area.key);
                candidate.destination_stop_area = Some(egress.stop_area.key);
                best = Some(candidate);
            }
        }
        best
    }
}

/// Inputs shared by the construction of the access and egress legs.
struct LegBuilder<'a> {
    ctx: EvaluationContext<'a>,
    parcels: &'a Parcels,
    facilities: &'a Facilities,
    bike_on_board: bool,
    /// Zone-to-zone distance between the origin and the destination.
    full_distance: f64,
}

impl<'a> LegBuilder<'a> {
    fn proximity_kind(&self, mode: AccessMode) -> ProximityKind {
        match mode {
            AccessMode::Walk => ProximityKind::WalkStopArea,
            AccessMode::Bike if self.bike_on_board => ProximityKind::BikeOnBoardTerminal,
            AccessMode::Bike => ProximityKind::BikeParkAndRide,
            AccessMode::Sov => ProximityKind::AutoParkAndRide,
            AccessMode::HovPassenger | AccessMode::PaidRideShare => {
                ProximityKind::KissAndRideTerminal
            }
        }
    }

    fn search_limit(&self, kind: ProximityKind) -> &'a SearchLimit {
        let search = &self.ctx.parameters.search;
        match kind {
            ProximityKind::WalkStopArea => &search.walk,
            ProximityKind::BikeOnBoardTerminal => &search.bike_on_transit,
            ProximityKind::BikeParkAndRide => &search.bike_park_and_ride,
            ProximityKind::AutoParkAndRide => &search.auto_park_and_ride,
            ProximityKind::KissAndRideTerminal => &search.kiss_and_ride,
        }
    }

    /// Returns the maximum network length (in kilometers) between a parcel and a facility.
    fn max_length(&self, mode: AccessMode, limit: &SearchLimit) -> f64 {
        let search = &self.ctx.parameters.search;
        let ratio = match mode {
            AccessMode::Sov => search.max_drive_park_and_ride_ratio,
            AccessMode::Bike => search.max_bike_park_and_ride_ratio,
            AccessMode::HovPassenger | AccessMode::PaidRideShare => search.max_kiss_and_ride_ratio,
            AccessMode::Walk => 0.0,
        };
        if ratio > 0.0 {
            limit.max_length_km.min(ratio * self.full_distance)
        } else {
            limit.max_length_km
        }
    }

    fn legs(&self, mode: AccessMode, side: Side, parcel: &'a Parcel) -> Vec<Leg<'a>> {
        let kind = self.proximity_kind(mode);
        let limit = self.search_limit(kind);
        let max_length = self.max_length(mode, limit);
        self.facilities
            .proximity(kind)
            .candidates(parcel.id)
            .iter()
            .take(limit.max_count)
            .map(|entry| (entry.facility, entry.length / 1000.0))
            .take_while(|&(_, km)| km <= max_length)
            .filter_map(|(facility, km)| self.leg(mode, kind, side, parcel, facility, km))
            .collect()
    }

    fn stop_area(&self, key: u32) -> Option<&'a StopArea> {
        let stop_area = self.facilities.stop_area(key);
        if stop_area.is_none() {
            send_warning_at_most_n_times(
                WarningType::UnknownStopArea,
                &format!("Unknown stop area: {key}"),
                MAX_FACILITY_WARNINGS,
            );
        }
        stop_area
    }

    fn facility_parcel(&self, id: u32) -> Option<&'a Parcel> {
        let parcel = self.parcels.get(id);
        if parcel.is_none() {
            send_warning_at_most_once(
                WarningType::UnknownFacilityParcel,
                &format!("Unknown parcel {id} for a transit facility"),
            );
        }
        parcel
    }

    fn node(&self, kind: ProximityKind, id: u32) -> Option<&'a ParkAndRideNode> {
        let node = match kind {
            ProximityKind::AutoParkAndRide => self.facilities.auto_node(id),
            _ => self.facilities.bike_node(id),
        };
        if node.is_none() && self.facilities.node(id).is_none() {
            send_warning_at_most_n_times(
                WarningType::UnknownParkAndRideNode,
                &format!("Unknown park-and-ride node: {id}"),
                MAX_FACILITY_WARNINGS,
            );
        }
        // Nodes without enough capacity are silently skipped.
        node
    }

    /// Builds the leg between a parcel and a facility, or returns `None` if the facility cannot
    /// be used.
    fn leg(
        &self,
        mode: AccessMode,
        kind: ProximityKind,
        side: Side,
        parcel: &'a Parcel,
        facility: u32,
        km: f64,
    ) -> Option<Leg<'a>> {
        let ctx = &self.ctx;
        let node = if kind.is_node() {
            Some(self.node(kind, facility)?)
        } else {
            None
        };
        let stop_area = self.stop_area(node.map(|n| n.nearest_stop_area).unwrap_or(facility))?;
        let endpoints = || {
            let facility_parcel =
                self.facility_parcel(node.map(|n| n.nearest_parcel).unwrap_or(stop_area.parcel))?;
            Some(match side {
                Side::Origin => (Location::Parcel(parcel), Location::Parcel(facility_parcel)),
                Side::Destination => (Location::Parcel(facility_parcel), Location::Parcel(parcel)),
            })
        };
        let leg = match mode {
            AccessMode::Walk => {
                let rtf = ctx.trip.round_trip_factor();
                let time = km * ctx.parameters.walk_bike.walk_minutes_per_distance * rtf;
                Leg {
                    mode,
                    stop_area,
                    parked_at: None,
                    time,
                    distance: km * rtf,
                    cost: 0.0,
                    utility: ctx.scale()
                        * time
                        * ctx.trip.time_coefficient
                        * ctx.parameters.transit.walk_access_time_weight,
                }
            }
            AccessMode::Bike => {
                let (from, to) = endpoints()?;
                let path = walk_bike_path(ctx, SkimMode::Bike, PathType::FullNetwork, from, to)?;
                // The daily cost of bike park-and-ride nodes is paid on the access side.
                let cost = match (node, side) {
                    (Some(node), Side::Origin) => node.daily_cost,
                    _ => 0.0,
                };
                Leg {
                    mode,
                    stop_area,
                    parked_at: None,
                    time: path.time,
                    distance: path.distance,
                    cost,
                    utility: path.utility,
                }
            }
            AccessMode::Sov | AccessMode::HovPassenger | AccessMode::PaidRideShare => {
                let (from, to) = endpoints()?;
                let auto_mode = match mode {
                    AccessMode::Sov => AutoMode::Sov,
                    AccessMode::HovPassenger => AutoMode::HovPassenger,
                    _ => AutoMode::PaidRideShare,
                };
                let path = access_auto_path(ctx, auto_mode, from, to)?;
                let parked_at = node.filter(|_| side == Side::Origin);
                let parking_cost = match parked_at {
                    Some(node) => {
                        let duration = parking_duration(
                            ctx.trip.return_time(),
                            ctx.trip.outbound_time(),
                            ctx.trip.request.purpose,
                        );
                        node.parking_cost(ctx.trip.outbound_time(), duration)?
                    }
                    None => 0.0,
                };
                Leg {
                    mode,
                    stop_area,
                    parked_at,
                    time: path.time,
                    distance: path.distance,
                    cost: path.cost + parking_cost,
                    utility: path.utility
                        + ctx.scale() * ctx.trip.cost_coefficient * parking_cost,
                }
            }
        };
        Some(leg)
    }
}
