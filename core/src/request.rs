// Copyright 2022 Lucas Javaudin
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// https://creativecommons.org/licenses/by-nc-nd/4.0/legalcode

//! Travel requests submitted to the path-type evaluation.
use anyhow::{anyhow, Result};
use schemars::JsonSchema;
use serde_derive::{Deserialize, Serialize};

use crate::location::{Location, ParcelId, Parcels, ZoneId};
use crate::mode::{Mode, Purpose};
use crate::time::Minute;

/// Identifier of a travel request.
pub type RequestId = u64;

const fn default_age() -> u32 {
    35
}

/// Origin or destination of a travel request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(tag = "type", content = "value")]
pub enum Endpoint {
    /// A parcel, whose zone is known from the parcel data.
    Parcel(ParcelId),
    /// Only the zone is known.
    Zone(ZoneId),
}

impl Endpoint {
    /// Resolves the endpoint to a [Location].
    ///
    /// Returns an error if the parcel is unknown.
    pub fn resolve<'a>(&self, parcels: &'a Parcels) -> Result<Location<'a>> {
        match *self {
            Self::Parcel(id) => parcels
                .get(id)
                .map(Location::Parcel)
                .ok_or_else(|| anyhow!("Unknown parcel id: {id}")),
            Self::Zone(zone) => Ok(Location::Zone(zone)),
        }
    }
}

/// A trip (or a round trip when a return time is given) of one traveler, for one travel mode.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
#[schemars(title = "Travel Request")]
#[schemars(description = "A trip of a traveler for which the path types of a mode are evaluated.")]
pub struct TravelRequest {
    /// Identifier of the request.
    pub id: RequestId,
    /// Travel mode to evaluate.
    pub mode: Mode,
    pub origin: Endpoint,
    pub destination: Endpoint,
    /// Departure minute of the outbound trip.
    pub outbound_time: Minute,
    /// Departure minute of the return trip (a non-positive value means a one-way trip).
    #[serde(default)]
    pub return_time: Option<Minute>,
    /// Purpose of the trip.
    pub purpose: Purpose,
    /// Tour-level cost coefficient (utility per monetary unit).
    pub cost_coefficient: f64,
    /// Tour-level time coefficient (utility per minute).
    pub time_coefficient: f64,
    /// Age of the traveler, in years.
    #[serde(default = "default_age")]
    pub age: u32,
    /// Number of vehicles of the traveler's household.
    #[serde(default)]
    pub household_vehicles: u32,
    /// Whether the household vehicles are autonomous.
    #[serde(default)]
    pub vehicles_are_autonomous: bool,
    /// Transit-pass ownership tier (`0` when the traveler has no pass).
    #[serde(default)]
    pub transit_pass_tier: u32,
    /// Fraction of the transit fare discounted for the traveler.
    #[serde(default)]
    pub transit_discount_fraction: f64,
    /// If `true`, the path type is drawn at random from the Logit probabilities, otherwise the
    /// path type with the largest utility is chosen.
    #[serde(default)]
    pub random_choice: bool,
}

impl TravelRequest {
    /// Returns the departure minute of the return trip, if any.
    pub fn return_time(&self) -> Option<Minute> {
        self.return_time.filter(|&t| t > 0)
    }

    /// Returns `2` for a round trip and `1` for a one-way trip.
    pub fn round_trip_factor(&self) -> f64 {
        if self.return_time().is_some() {
            2.0
        } else {
            1.0
        }
    }
}

/// A travel request with resolved locations and the coefficients used to evaluate it.
#[derive(Clone, Copy, Debug)]
pub struct Trip<'a> {
    pub request: &'a TravelRequest,
    pub origin: Location<'a>,
    pub destination: Location<'a>,
    /// Cost coefficient, after the distance adjustment.
    pub cost_coefficient: f64,
    pub time_coefficient: f64,
}

impl<'a> Trip<'a> {
    /// Creates a trip, using the cost coefficient of the request.
    pub fn new(request: &'a TravelRequest, origin: Location<'a>, destination: Location<'a>) -> Self {
        Trip {
            request,
            origin,
            destination,
            cost_coefficient: request.cost_coefficient,
            time_coefficient: request.time_coefficient,
        }
    }

    pub fn outbound_time(&self) -> Minute {
        self.request.outbound_time
    }

    pub fn return_time(&self) -> Option<Minute> {
        self.request.return_time()
    }

    pub fn round_trip_factor(&self) -> f64 {
        self.request.round_trip_factor()
    }

    /// Returns `true` if both endpoints are parcels.
    pub fn has_parcels(&self) -> bool {
        self.origin.parcel().is_some() && self.destination.parcel().is_some()
    }

    /// Returns the value of time of the traveler, in monetary units per hour.
    pub fn value_of_time(&self) -> f64 {
        if self.cost_coefficient.abs() < f64::EPSILON {
            0.0
        } else {
            60.0 * self.time_coefficient / self.cost_coefficient
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Parcel;

    fn request(return_time: Option<Minute>) -> TravelRequest {
        TravelRequest {
            id: 1,
            mode: Mode::Sov,
            origin: Endpoint::Parcel(1),
            destination: Endpoint::Zone(3),
            outbound_time: 300,
            return_time,
            purpose: Purpose::Work,
            cost_coefficient: -0.1,
            time_coefficient: -0.05,
            age: 40,
            household_vehicles: 1,
            vehicles_are_autonomous: false,
            transit_pass_tier: 0,
            transit_discount_fraction: 0.0,
            random_choice: false,
        }
    }

    #[test]
    fn return_time_test() {
        assert_eq!(request(None).return_time(), None);
        assert_eq!(request(Some(0)).return_time(), None);
        assert_eq!(request(Some(-1)).round_trip_factor(), 1.0);
        assert_eq!(request(Some(900)).return_time(), Some(900));
        assert_eq!(request(Some(900)).round_trip_factor(), 2.0);
    }

    #[test]
    fn resolve_test() {
        let parcels = Parcels::new(vec![Parcel::new(1, 2, 0., 0.)]).unwrap();
        let req = request(None);
        let origin = req.origin.resolve(&parcels).unwrap();
        assert_eq!(origin.zone(), 2);
        let destination = req.destination.resolve(&parcels).unwrap();
        assert!(destination.parcel().is_none());
        assert!(Endpoint::Parcel(5).resolve(&parcels).is_err());
        let trip = Trip::new(&req, origin, destination);
        assert!(!trip.has_parcels());
        assert!((trip.value_of_time() - 30.0).abs() < 1e-12);
    }

    #[test]
    fn deserialize_defaults_test() {
        let json = r#"{
            "id": 7,
            "mode": "SOV",
            "origin": {"type": "Zone", "value": 1},
            "destination": {"type": "Parcel", "value": 4},
            "outbound_time": 420,
            "purpose": "Shopping",
            "cost_coefficient": -0.2,
            "time_coefficient": -0.03
        }"#;
        let req: TravelRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.destination, Endpoint::Parcel(4));
        assert_eq!(req.return_time(), None);
        assert_eq!(req.age, 35);
        assert!(!req.random_choice);
    }
}
