// Copyright 2022 Lucas Javaudin
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// https://creativecommons.org/licenses/by-nc-nd/4.0/legalcode

//! Zones and parcels (microzones).
use anyhow::{bail, Result};
use hashbrown::HashMap;
use schemars::JsonSchema;
use serde_derive::{Deserialize, Serialize};

use crate::time::*;

/// Identifier of a zone.
pub type ZoneId = u32;
/// Identifier of a parcel.
pub type ParcelId = u32;

const fn default_circuity_ratio() -> f64 {
    1.0
}

/// Parking search time (in minutes) at a parcel, for ten periods of the day.
///
/// Each field is named by the hours delimiting its period.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct ParkingSearchTimes {
    #[serde(default)]
    pub search_21_05: f64,
    #[serde(default)]
    pub search_05_06: f64,
    #[serde(default)]
    pub search_06_07: f64,
    #[serde(default)]
    pub search_07_08: f64,
    #[serde(default)]
    pub search_08_09: f64,
    #[serde(default)]
    pub search_09_15: f64,
    #[serde(default)]
    pub search_15_16: f64,
    #[serde(default)]
    pub search_16_17: f64,
    #[serde(default)]
    pub search_17_18: f64,
    #[serde(default)]
    pub search_18_21: f64,
}

impl ParkingSearchTimes {
    /// Returns the parking search time for an arrival at the given minute.
    pub const fn minutes_for(&self, minute: Minute) -> f64 {
        if minute > NINE_PM || minute <= FIVE_AM {
            self.search_21_05
        } else if minute <= SIX_AM {
            self.search_05_06
        } else if minute <= SEVEN_AM {
            self.search_06_07
        } else if minute <= EIGHT_AM {
            self.search_07_08
        } else if minute <= NINE_AM {
            self.search_08_09
        } else if minute <= THREE_PM {
            self.search_09_15
        } else if minute <= FOUR_PM {
            self.search_15_16
        } else if minute <= FIVE_PM {
            self.search_16_17
        } else if minute <= SIX_PM {
            self.search_17_18
        } else {
            self.search_18_21
        }
    }
}

/// A parcel (or microzone): the finest spatial unit of the model.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
#[schemars(title = "Parcel")]
#[schemars(description = "A parcel (microzone), located inside a zone.")]
pub struct Parcel {
    /// Identifier of the parcel.
    pub id: ParcelId,
    /// Zone containing the parcel.
    pub zone: ZoneId,
    /// x coordinate of the parcel, in meters.
    pub x: f64,
    /// y coordinate of the parcel, in meters.
    pub y: f64,
    /// Ratio between network distance and straight-line distance around the parcel.
    #[serde(default = "default_circuity_ratio")]
    pub circuity_ratio: f64,
    /// Parking search times at the parcel.
    #[serde(default)]
    pub parking_search: ParkingSearchTimes,
    /// Hourly price of parking at the parcel.
    #[serde(default)]
    pub parking_hourly_price: f64,
}

impl Parcel {
    /// Creates a new parcel with no parking search time nor parking price.
    pub fn new(id: ParcelId, zone: ZoneId, x: f64, y: f64) -> Self {
        Parcel {
            id,
            zone,
            x,
            y,
            circuity_ratio: default_circuity_ratio(),
            parking_search: Default::default(),
            parking_hourly_price: 0.0,
        }
    }

    /// Returns the circuity-adjusted distance between two parcels, in kilometers.
    pub fn circuity_distance(&self, other: &Parcel) -> f64 {
        let euclidean = (self.x - other.x).hypot(self.y - other.y) / 1000.0;
        euclidean * (self.circuity_ratio + other.circuity_ratio) / 2.0
    }
}

/// Origin or destination of a path: either a parcel (with its zone) or only a zone.
#[derive(Clone, Copy, Debug)]
pub enum Location<'a> {
    Parcel(&'a Parcel),
    Zone(ZoneId),
}

impl<'a> Location<'a> {
    /// Returns the zone of the location.
    pub const fn zone(&self) -> ZoneId {
        match self {
            Self::Parcel(parcel) => parcel.zone,
            Self::Zone(zone) => *zone,
        }
    }

    /// Returns the parcel of the location, if known.
    pub const fn parcel(&self) -> Option<&'a Parcel> {
        match self {
            Self::Parcel(parcel) => Some(parcel),
            Self::Zone(_) => None,
        }
    }
}

/// Collection of the parcels, indexed by id.
#[derive(Clone, Debug, Default)]
pub struct Parcels(HashMap<ParcelId, Parcel>);

impl Parcels {
    /// Creates a collection of parcels.
    ///
    /// Returns an error if two parcels share the same id.
    pub fn new(parcels: Vec<Parcel>) -> Result<Self> {
        let mut map = HashMap::with_capacity(parcels.len());
        for parcel in parcels {
            let id = parcel.id;
            if map.insert(id, parcel).is_some() {
                bail!("Found two parcels with id {id}");
            }
        }
        Ok(Parcels(map))
    }

    /// Returns the parcel with the given id.
    pub fn get(&self, id: ParcelId) -> Option<&Parcel> {
        self.0.get(&id)
    }

    /// Returns the number of parcels.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there is no parcel.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parking_search_test() {
        let times = ParkingSearchTimes {
            search_21_05: 1.0,
            search_05_06: 2.0,
            search_06_07: 3.0,
            search_07_08: 4.0,
            search_08_09: 5.0,
            search_09_15: 6.0,
            search_15_16: 7.0,
            search_16_17: 8.0,
            search_17_18: 9.0,
            search_18_21: 10.0,
        };
        assert_eq!(times.minutes_for(THREE_AM), 1.0);
        assert_eq!(times.minutes_for(MINUTES_IN_A_DAY), 1.0);
        assert_eq!(times.minutes_for(FIVE_AM + 1), 2.0);
        assert_eq!(times.minutes_for(SEVEN_AM), 3.0);
        assert_eq!(times.minutes_for(EIGHT_AM), 4.0);
        assert_eq!(times.minutes_for(EIGHT_AM + 30), 5.0);
        assert_eq!(times.minutes_for(NINE_AM + 1), 6.0);
        assert_eq!(times.minutes_for(THREE_PM + 1), 7.0);
        assert_eq!(times.minutes_for(FOUR_PM + 1), 8.0);
        assert_eq!(times.minutes_for(FIVE_PM + 1), 9.0);
        assert_eq!(times.minutes_for(SIX_PM + 1), 10.0);
        assert_eq!(times.minutes_for(NINE_PM), 10.0);
    }

    #[test]
    fn circuity_distance_test() {
        let mut a = Parcel::new(1, 1, 0.0, 0.0);
        let b = Parcel::new(2, 1, 3000.0, 4000.0);
        assert!((a.circuity_distance(&b) - 5.0).abs() < 1e-12);
        a.circuity_ratio = 1.4;
        assert!((a.circuity_distance(&b) - 6.0).abs() < 1e-12);
    }

    #[test]
    fn parcels_test() {
        let parcels = Parcels::new(vec![Parcel::new(1, 10, 0., 0.), Parcel::new(2, 10, 0., 0.)])
            .unwrap();
        assert_eq!(parcels.len(), 2);
        assert_eq!(parcels.get(2).map(|p| p.zone), Some(10));
        assert!(parcels.get(3).is_none());
        assert!(Parcels::new(vec![Parcel::new(1, 10, 0., 0.), Parcel::new(1, 11, 0., 0.)])
            .is_err());
    }
}
