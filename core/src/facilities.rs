// Copyright 2022 Lucas Javaudin
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// https://creativecommons.org/licenses/by-nc-nd/4.0/legalcode

//! Transit stop areas, park-and-ride nodes and the proximity indices from parcels to them.
use anyhow::{bail, Result};
use choice::EPSILON;
use hashbrown::{HashMap, HashSet};
use log::debug;
use schemars::JsonSchema;
use serde_derive::{Deserialize, Serialize};

use crate::location::{ParcelId, ZoneId};
use crate::time::*;

/// Identifier of a park-and-ride node.
pub type NodeId = u32;
/// Key of a stop area, as given by the user.
pub type StopAreaKey = u32;
/// Index of a stop area in the transit skims.
pub type StopAreaIndex = u32;

/// Maximum parking duration at free short-stay lots, in hours.
pub const MAX_SHORT_STAY_HOURS: f64 = 2.0;

const fn default_is_true() -> bool {
    true
}

/// Parking policy of a park-and-ride node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub enum ParkingType {
    Free,
    /// Parking is paid by the hour, up to the daily cost.
    #[default]
    Paid,
    /// Free parking limited to short stays.
    FreeShortStay,
}

/// Hourly parking rates for three periods of the day.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct HourlyRates {
    /// Rate between 11 PM and 8 AM.
    #[serde(default)]
    pub night: f64,
    /// Rate between 8 AM and 6 PM.
    #[serde(default)]
    pub day: f64,
    /// Rate between 6 PM and 11 PM.
    #[serde(default)]
    pub evening: f64,
}

impl HourlyRates {
    /// Returns the hourly rate for parking starting at the given minute.
    pub const fn rate_for(&self, minute: Minute) -> f64 {
        if minute > ELEVEN_PM || minute <= EIGHT_AM {
            self.night
        } else if minute <= SIX_PM {
            self.day
        } else {
            self.evening
        }
    }
}

/// A park-and-ride facility, either for autos or for bikes.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
#[schemars(title = "Park-and-Ride Node")]
pub struct ParkAndRideNode {
    pub id: NodeId,
    pub zone: ZoneId,
    /// Parcel where the node is located.
    pub nearest_parcel: ParcelId,
    /// Stop area served by the node.
    pub nearest_stop_area: StopAreaKey,
    /// Number of parking spaces.
    pub capacity: f64,
    /// `true` for auto nodes, `false` for bike nodes.
    #[serde(default = "default_is_true")]
    pub serves_autos: bool,
    #[serde(default)]
    pub parking_type: ParkingType,
    #[serde(default)]
    pub daily_cost: f64,
    #[serde(default)]
    pub hourly_rates: HourlyRates,
    /// First and last arrival minutes at which the node can be used.
    #[serde(default)]
    pub operating_window: Option<[Minute; 2]>,
}

impl ParkAndRideNode {
    /// Returns `true` if a traveler can park at the node at the given minute.
    pub fn is_open_at(&self, minute: Minute) -> bool {
        self.operating_window
            .map(|[first, last]| minute >= first && minute <= last)
            .unwrap_or(true)
    }

    /// Returns the cost of parking at the node from the given minute, for the given duration (in
    /// hours).
    ///
    /// Returns `None` if the node does not allow parking that long.
    pub fn parking_cost(&self, arrival: Minute, duration: f64) -> Option<f64> {
        match self.parking_type {
            ParkingType::FreeShortStay if duration > MAX_SHORT_STAY_HOURS + EPSILON => None,
            ParkingType::Free | ParkingType::FreeShortStay => Some(0.0),
            ParkingType::Paid => {
                Some((self.hourly_rates.rate_for(arrival) * duration).min(self.daily_cost))
            }
        }
    }
}

/// An aggregated transit boarding location.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
#[schemars(title = "Stop Area")]
pub struct StopArea {
    pub key: StopAreaKey,
    /// Index of the stop area in the transit skims.
    pub skim_index: StopAreaIndex,
    /// Parcel where the stop area is located.
    pub parcel: ParcelId,
}

/// Kinds of facilities that can be reached from a parcel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
pub enum ProximityKind {
    /// Stop areas reached on foot.
    WalkStopArea,
    /// Stop areas where a bike can be taken on board.
    BikeOnBoardTerminal,
    /// Bike park-and-ride nodes.
    BikeParkAndRide,
    /// Auto park-and-ride nodes.
    AutoParkAndRide,
    /// Stop areas where travelers can be dropped off or picked up by car.
    KissAndRideTerminal,
}

impl ProximityKind {
    const ALL: [ProximityKind; 5] = [
        ProximityKind::WalkStopArea,
        ProximityKind::BikeOnBoardTerminal,
        ProximityKind::BikeParkAndRide,
        ProximityKind::AutoParkAndRide,
        ProximityKind::KissAndRideTerminal,
    ];

    /// Returns `true` if the facilities of this kind are park-and-ride nodes (otherwise, they are
    /// stop areas).
    pub const fn is_node(self) -> bool {
        matches!(self, Self::BikeParkAndRide | Self::AutoParkAndRide)
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// A facility near a parcel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProximityEntry {
    /// Node id or stop-area key of the facility.
    pub facility: u32,
    /// Network length between the parcel and the facility, in meters.
    pub length: f64,
}

/// Input record of a proximity index.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
pub struct ProximityRecord {
    pub kind: ProximityKind,
    pub parcel: ParcelId,
    /// Node id or stop-area key of the facility.
    pub facility: u32,
    /// Network length between the parcel and the facility, in meters.
    pub length: f64,
}

/// For each parcel, the facilities of one kind near the parcel, sorted by increasing length.
#[derive(Clone, Debug, Default)]
pub struct ProximityIndex(HashMap<ParcelId, Vec<ProximityEntry>>);

impl ProximityIndex {
    fn push(&mut self, parcel: ParcelId, entry: ProximityEntry) {
        self.0.entry(parcel).or_default().push(entry);
    }

    fn sort(&mut self) {
        for entries in self.0.values_mut() {
            // The sort is stable so that ties keep the input order.
            entries.sort_by(|a, b| a.length.total_cmp(&b.length));
        }
    }

    /// Returns the facilities near the parcel, sorted by increasing length.
    pub fn candidates(&self, parcel: ParcelId) -> &[ProximityEntry] {
        self.0.get(&parcel).map(|v| v.as_slice()).unwrap_or(&[])
    }
}

/// Serialized representation of the [Facilities].
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[schemars(title = "Facilities")]
#[schemars(description = "Stop areas, park-and-ride nodes and proximity indices.")]
pub struct FacilitiesData {
    #[serde(default)]
    pub park_and_ride_nodes: Vec<ParkAndRideNode>,
    #[serde(default)]
    pub stop_areas: Vec<StopArea>,
    #[serde(default)]
    pub proximity: Vec<ProximityRecord>,
}

/// Immutable collection of the transit facilities.
#[derive(Clone, Debug, Default)]
pub struct Facilities {
    nodes: HashMap<NodeId, ParkAndRideNode>,
    auto_nodes: HashSet<NodeId>,
    bike_nodes: HashSet<NodeId>,
    stop_areas: HashMap<StopAreaKey, StopArea>,
    indices: [ProximityIndex; 5],
}

impl Facilities {
    /// Builds the facilities.
    ///
    /// Returns an error if two nodes or two stop areas share the same identifier.
    pub fn new(data: FacilitiesData) -> Result<Self> {
        let mut nodes = HashMap::with_capacity(data.park_and_ride_nodes.len());
        let mut auto_nodes = HashSet::new();
        let mut bike_nodes = HashSet::new();
        for node in data.park_and_ride_nodes {
            let id = node.id;
            if node.capacity >= EPSILON {
                if node.serves_autos && node.capacity > 0.0 {
                    auto_nodes.insert(id);
                } else if !node.serves_autos && node.capacity > 2.0 {
                    bike_nodes.insert(id);
                }
            }
            if nodes.insert(id, node).is_some() {
                bail!("Found two park-and-ride nodes with id {id}");
            }
        }
        let mut stop_areas = HashMap::with_capacity(data.stop_areas.len());
        for stop_area in data.stop_areas {
            let key = stop_area.key;
            if stop_areas.insert(key, stop_area).is_some() {
                bail!("Found two stop areas with key {key}");
            }
        }
        let mut indices: [ProximityIndex; 5] = Default::default();
        for record in data.proximity {
            indices[record.kind.index()].push(
                record.parcel,
                ProximityEntry {
                    facility: record.facility,
                    length: record.length,
                },
            );
        }
        indices.iter_mut().for_each(ProximityIndex::sort);
        debug!(
            "Facilities: {} park-and-ride nodes ({} for autos, {} for bikes), {} stop areas",
            nodes.len(),
            auto_nodes.len(),
            bike_nodes.len(),
            stop_areas.len()
        );
        Ok(Facilities {
            nodes,
            auto_nodes,
            bike_nodes,
            stop_areas,
            indices,
        })
    }

    /// Returns the park-and-ride node with the given id.
    pub fn node(&self, id: NodeId) -> Option<&ParkAndRideNode> {
        self.nodes.get(&id)
    }

    /// Returns the node with the given id if it is an auto node with capacity.
    pub fn auto_node(&self, id: NodeId) -> Option<&ParkAndRideNode> {
        self.auto_nodes.get(&id).and_then(|id| self.nodes.get(id))
    }

    /// Returns the node with the given id if it is a bike node with enough capacity.
    pub fn bike_node(&self, id: NodeId) -> Option<&ParkAndRideNode> {
        self.bike_nodes.get(&id).and_then(|id| self.nodes.get(id))
    }

    /// Returns the stop area with the given key.
    pub fn stop_area(&self, key: StopAreaKey) -> Option<&StopArea> {
        self.stop_areas.get(&key)
    }

    /// Returns the proximity index of the given kind.
    pub fn proximity(&self, kind: ProximityKind) -> &ProximityIndex {
        &self.indices[kind.index()]
    }

    /// Returns the capacity of each park-and-ride node.
    pub fn capacities(&self) -> impl Iterator<Item = (NodeId, f64)> + '_ {
        self.nodes.values().map(|n| (n.id, n.capacity))
    }

    /// Returns the number of facilities of each proximity kind that are indexed.
    pub fn index_sizes(&self) -> Vec<(ProximityKind, usize)> {
        ProximityKind::ALL
            .iter()
            .map(|&k| (k, self.proximity(k).0.values().map(Vec::len).sum()))
            .collect()
    }
}
