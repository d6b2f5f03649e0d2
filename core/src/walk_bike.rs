// Copyright 2022 Lucas Javaudin
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// https://creativecommons.org/licenses/by-nc-nd/4.0/legalcode

//! Direct walk and bike paths.
//!
//! Zone-to-zone values are read from the `time`, `distance` and `lstime` (generalized time)
//! skims. Within a zone, and for short trips between zones, values are computed at the parcel
//! level from the `distance-mz` skim.
use choice::EPSILON;

use crate::context::EvaluationContext;
use crate::impedance::{Point, SkimQuery, DISTANCE, MICROZONE_DISTANCE};
use crate::location::Location;
use crate::mode::{PathType, SkimMode};
use crate::parameters::IntrazonalFactors;

/// Time, distance and utility of a walk or bike path.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WalkBikePath {
    pub time: f64,
    pub generalized_time: f64,
    pub distance: f64,
    pub utility: f64,
}

impl WalkBikePath {
    fn blend(self, other: Self, factor: f64) -> Self {
        let mix = |a: f64, b: f64| factor * a + (1.0 - factor) * b;
        WalkBikePath {
            time: mix(self.time, other.time),
            generalized_time: mix(self.generalized_time, other.generalized_time),
            distance: mix(self.distance, other.distance),
            utility: 0.0,
        }
    }
}

/// Returns the walk or bike path between two locations, or `None` if it is unavailable.
pub fn walk_bike_path(
    ctx: &EvaluationContext,
    mode: SkimMode,
    path_type: PathType,
    origin: Location,
    destination: Location,
) -> Option<WalkBikePath> {
    let factors = match mode {
        SkimMode::Bike | SkimMode::BikeOnTransit => &ctx.parameters.walk_bike.bike_intrazonal,
        _ => &ctx.parameters.walk_bike.walk_intrazonal,
    };
    let zone_query = ctx.outbound_query(
        DISTANCE,
        mode,
        path_type,
        Point::Zone(origin.zone()),
        Point::Zone(destination.zone()),
    );
    let zone_distance = ctx.impedance.value(&zone_query);
    let max_blend = ctx.parameters.auto.maximum_blending_distance;
    let microzone = match (origin, destination) {
        (Location::Parcel(o), Location::Parcel(d)) => {
            // Parcel distances are stored with the walk skims only.
            let query = ctx.outbound_query(
                MICROZONE_DISTANCE,
                SkimMode::Walk,
                PathType::FullNetwork,
                origin.into(),
                destination.into(),
            );
            let mut km = ctx.impedance.value(&query) / 1000.0;
            if o.id != d.id {
                km *= factors.straight_line_factor;
            }
            Some(microzone_path(factors, km, ctx.trip.round_trip_factor()))
        }
        _ => None,
    };
    let path = match microzone {
        Some(mz) if origin.zone() == destination.zone() => mz,
        mz => {
            let zonal = zonal_path(ctx, zone_query)?;
            match mz {
                Some(mz) if zone_distance > EPSILON && zone_distance < max_blend => {
                    zonal.blend(mz, zone_distance / max_blend)
                }
                _ => zonal,
            }
        }
    };
    if path.time > ctx.time_limit() || path.time < EPSILON {
        return None;
    }
    Some(WalkBikePath {
        utility: ctx.scale() * ctx.trip.time_coefficient * path.generalized_time,
        ..path
    })
}

fn microzone_path(factors: &IntrazonalFactors, km: f64, round_trip_factor: f64) -> WalkBikePath {
    let time = km * factors.minutes_per_km + factors.extra_minutes;
    let generalized_time =
        time * factors.generalized_minutes_per_minute + factors.extra_generalized_minutes;
    WalkBikePath {
        time: time * round_trip_factor,
        generalized_time: generalized_time * round_trip_factor,
        distance: km * round_trip_factor,
        utility: 0.0,
    }
}

/// Returns the zone-to-zone path, or `None` if the zones are not connected.
fn zonal_path(ctx: &EvaluationContext, distance_query: SkimQuery) -> Option<WalkBikePath> {
    let time = ctx.round_trip_value(distance_query.with_variable("time"));
    if time < EPSILON {
        return None;
    }
    Some(WalkBikePath {
        time,
        generalized_time: ctx.round_trip_value(distance_query.with_variable("lstime")),
        distance: ctx.round_trip_value(distance_query),
        utility: 0.0,
    })
}
