// Copyright 2022 Lucas Javaudin
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// https://creativecommons.org/licenses/by-nc-nd/4.0/legalcode

//! Access to the impedance (skim) data.
use anyhow::{bail, Result};
use hashbrown::{HashMap, HashSet};
use schemars::JsonSchema;
use serde_derive::{Deserialize, Serialize};

use crate::facilities::StopAreaIndex;
use crate::location::{Location, ParcelId, ZoneId};
use crate::mode::{PathType, SkimMode};
use crate::time::Minute;

/// Name of the zone-to-zone distance variable.
pub const DISTANCE: &str = "distance";
/// Name of the parcel-to-parcel distance variable (in meters).
pub const MICROZONE_DISTANCE: &str = "distance-mz";

/// A point of the impedance data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Point {
    Zone(ZoneId),
    Parcel { parcel: ParcelId, zone: ZoneId },
    /// Transit stop area, identified by its index in the transit skims.
    StopArea(StopAreaIndex),
}

impl From<Location<'_>> for Point {
    fn from(location: Location<'_>) -> Self {
        match location {
            Location::Parcel(parcel) => Point::Parcel {
                parcel: parcel.id,
                zone: parcel.zone,
            },
            Location::Zone(zone) => Point::Zone(zone),
        }
    }
}

/// A request for the value of a skim variable.
#[derive(Clone, Copy, Debug)]
pub struct SkimQuery<'a> {
    pub variable: &'a str,
    pub mode: SkimMode,
    pub path_type: PathType,
    /// Value of time of the traveler, used to select the value-of-time class of the skims.
    pub value_of_time: f64,
    pub minute: Minute,
    pub origin: Point,
    pub destination: Point,
    /// Circuity-adjusted distance between the origin and destination parcels.
    pub circuity_distance: Option<f64>,
}

impl<'a> SkimQuery<'a> {
    /// Creates a query without circuity distance.
    pub fn new(
        variable: &'a str,
        mode: SkimMode,
        path_type: PathType,
        value_of_time: f64,
        minute: Minute,
        origin: Point,
        destination: Point,
    ) -> Self {
        SkimQuery {
            variable,
            mode,
            path_type,
            value_of_time,
            minute,
            origin,
            destination,
            circuity_distance: None,
        }
    }

    /// Returns the same query for another variable.
    pub fn with_variable(self, variable: &'a str) -> Self {
        SkimQuery { variable, ..self }
    }

    /// Returns the same query in the opposite direction, at the given minute.
    pub fn reversed(self, minute: Minute) -> Self {
        SkimQuery {
            minute,
            origin: self.destination,
            destination: self.origin,
            ..self
        }
    }
}

/// Value of a skim variable.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SkimValue {
    pub value: f64,
    /// Blending variable (usually a distance) associated with the value.
    pub blend_value: Option<f64>,
}

/// Read-only access to the impedance data.
pub trait ImpedanceLookup: Send + Sync {
    /// Returns the value of a skim variable.
    fn get(&self, query: &SkimQuery) -> SkimValue;

    /// Returns `true` if the path type can exist for the skim mode.
    fn is_possible_combination(&self, mode: SkimMode, path_type: PathType) -> bool;

    /// Returns `true` if the path type is skimmed for the skim mode.
    fn is_actual_combination(&self, mode: SkimMode, path_type: PathType) -> bool;

    /// Returns the value of a skim variable, ignoring the blending variable.
    fn value(&self, query: &SkimQuery) -> f64 {
        self.get(query).value
    }
}

/// Key of a point in a [SkimTable].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
#[serde(tag = "type", content = "value")]
pub enum PointKey {
    Zone(ZoneId),
    Parcel(ParcelId),
    StopArea(StopAreaIndex),
}

/// A (skim mode, path type) combination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
pub struct Combination {
    pub mode: SkimMode,
    pub path_type: PathType,
}

/// A value of a [SkimTable].
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
pub struct SkimEntry {
    pub variable: String,
    pub mode: SkimMode,
    pub path_type: PathType,
    pub origin: PointKey,
    pub destination: PointKey,
    /// Period `[start, end)` of the day when the value applies (the whole day by default).
    #[serde(default)]
    pub period: Option<[Minute; 2]>,
    pub value: f64,
    #[serde(default)]
    pub blend_value: Option<f64>,
}

impl SkimEntry {
    /// Creates an entry valid for the whole day.
    pub fn new(
        variable: &str,
        mode: SkimMode,
        path_type: PathType,
        origin: PointKey,
        destination: PointKey,
        value: f64,
    ) -> Self {
        SkimEntry {
            variable: variable.to_owned(),
            mode,
            path_type,
            origin,
            destination,
            period: None,
            value,
            blend_value: None,
        }
    }

    /// Restricts the entry to the period `[start, end)`.
    pub fn with_period(mut self, start: Minute, end: Minute) -> Self {
        self.period = Some([start, end]);
        self
    }
}

/// Serialized representation of a [SkimTable].
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[schemars(title = "Skims")]
#[schemars(description = "Impedance values by variable, mode, path type and origin-destination.")]
pub struct SkimTableData {
    /// Path types that can exist for each skim mode.
    pub possible_combinations: Vec<Combination>,
    /// Path types that are skimmed for each skim mode.
    pub actual_combinations: Vec<Combination>,
    #[serde(default)]
    pub entries: Vec<SkimEntry>,
}

type EntryKey = (SkimMode, PathType, PointKey, PointKey);

#[derive(Clone, Debug)]
struct PeriodValue {
    period: Option<[Minute; 2]>,
    value: f64,
    blend_value: Option<f64>,
}

impl PeriodValue {
    fn contains(&self, minute: Minute) -> bool {
        self.period
            .map(|[start, end]| minute >= start && minute < end)
            .unwrap_or(true)
    }
}

/// In-memory impedance data.
///
/// Missing values are equal to zero. A parcel point uses the parcel-level values when they exist
/// and the values of its zone otherwise. The value of time is ignored.
#[derive(Clone, Debug, Default)]
pub struct SkimTable {
    possible: HashSet<(SkimMode, PathType)>,
    actual: HashSet<(SkimMode, PathType)>,
    values: HashMap<String, HashMap<EntryKey, Vec<PeriodValue>>>,
}

impl SkimTable {
    /// Creates a new SkimTable.
    ///
    /// Returns an error if an actual combination is not a possible combination.
    pub fn new(data: SkimTableData) -> Result<Self> {
        let possible: HashSet<_> = data
            .possible_combinations
            .iter()
            .map(|c| (c.mode, c.path_type))
            .collect();
        let actual: HashSet<_> = data
            .actual_combinations
            .iter()
            .map(|c| (c.mode, c.path_type))
            .collect();
        for &(mode, path_type) in actual.iter() {
            if !possible.contains(&(mode, path_type)) {
                bail!("Invalid combination of skim mode and path type: {mode} / {path_type}");
            }
        }
        let mut table = SkimTable {
            possible,
            actual,
            values: HashMap::new(),
        };
        for entry in data.entries {
            table.insert(entry);
        }
        Ok(table)
    }

    /// Adds a value to the table.
    pub fn insert(&mut self, entry: SkimEntry) {
        let key = (entry.mode, entry.path_type, entry.origin, entry.destination);
        self.values
            .entry(entry.variable)
            .or_default()
            .entry(key)
            .or_default()
            .push(PeriodValue {
                period: entry.period,
                value: entry.value,
                blend_value: entry.blend_value,
            });
    }

    fn find(&self, query: &SkimQuery) -> Option<&PeriodValue> {
        let variable_values = self.values.get(query.variable)?;
        point_keys(query.origin)
            .into_iter()
            .flatten()
            .flat_map(|o| {
                point_keys(query.destination)
                    .into_iter()
                    .flatten()
                    .map(move |d| (o, d))
            })
            .find_map(|(o, d)| {
                variable_values
                    .get(&(query.mode, query.path_type, o, d))
                    .and_then(|values| values.iter().find(|v| v.contains(query.minute)))
            })
    }
}

/// Returns the keys of a point, from the most to the least detailed.
fn point_keys(point: Point) -> [Option<PointKey>; 2] {
    match point {
        Point::Zone(zone) => [Some(PointKey::Zone(zone)), None],
        Point::Parcel { parcel, zone } => [Some(PointKey::Parcel(parcel)), Some(PointKey::Zone(zone))],
        Point::StopArea(index) => [Some(PointKey::StopArea(index)), None],
    }
}

impl ImpedanceLookup for SkimTable {
    fn get(&self, query: &SkimQuery) -> SkimValue {
        let entry = self.find(query);
        let value = entry.map(|e| e.value).unwrap_or(0.0);
        let blend_value = query
            .circuity_distance
            .or_else(|| entry.and_then(|e| e.blend_value))
            .or_else(|| {
                if query.variable == DISTANCE {
                    None
                } else {
                    self.find(&query.with_variable(DISTANCE)).map(|e| e.value)
                }
            });
        SkimValue { value, blend_value }
    }

    fn is_possible_combination(&self, mode: SkimMode, path_type: PathType) -> bool {
        self.possible.contains(&(mode, path_type))
    }

    fn is_actual_combination(&self, mode: SkimMode, path_type: PathType) -> bool {
        self.actual.contains(&(mode, path_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn combination(mode: SkimMode, path_type: PathType) -> Combination {
        Combination { mode, path_type }
    }

    fn table() -> SkimTable {
        let data = SkimTableData {
            possible_combinations: vec![
                combination(SkimMode::Sov, PathType::FullNetwork),
                combination(SkimMode::Sov, PathType::NoTolls),
            ],
            actual_combinations: vec![combination(SkimMode::Sov, PathType::FullNetwork)],
            entries: vec![
                SkimEntry::new(
                    "ivtfree",
                    SkimMode::Sov,
                    PathType::FullNetwork,
                    PointKey::Zone(1),
                    PointKey::Zone(2),
                    20.0,
                )
                .with_period(1, 361),
                SkimEntry::new(
                    "ivtfree",
                    SkimMode::Sov,
                    PathType::FullNetwork,
                    PointKey::Zone(1),
                    PointKey::Zone(2),
                    30.0,
                ),
                SkimEntry::new(
                    DISTANCE,
                    SkimMode::Sov,
                    PathType::FullNetwork,
                    PointKey::Zone(1),
                    PointKey::Zone(2),
                    12.0,
                ),
                SkimEntry::new(
                    MICROZONE_DISTANCE,
                    SkimMode::Sov,
                    PathType::FullNetwork,
                    PointKey::Parcel(10),
                    PointKey::Parcel(20),
                    800.0,
                ),
            ],
        };
        SkimTable::new(data).unwrap()
    }

    #[test]
    fn get_test() {
        let table = table();
        let query = SkimQuery::new(
            "ivtfree",
            SkimMode::Sov,
            PathType::FullNetwork,
            20.0,
            100,
            Point::Zone(1),
            Point::Zone(2),
        );
        let value = table.get(&query);
        assert_eq!(value.value, 20.0);
        assert_eq!(value.blend_value, Some(12.0));
        // Outside of the first period, the whole-day value is used.
        assert_eq!(table.value(&query.reversed(100).reversed(500)), 30.0);
        // Missing values are zero.
        assert_eq!(table.get(&query.reversed(100)), SkimValue::default());
        let with_circuity = SkimQuery {
            circuity_distance: Some(3.5),
            ..query
        };
        assert_eq!(table.get(&with_circuity).blend_value, Some(3.5));
    }

    #[test]
    fn parcel_points_test() {
        let table = table();
        let origin = Point::Parcel { parcel: 10, zone: 1 };
        let destination = Point::Parcel { parcel: 20, zone: 2 };
        let query = SkimQuery::new(
            MICROZONE_DISTANCE,
            SkimMode::Sov,
            PathType::FullNetwork,
            0.0,
            100,
            origin,
            destination,
        );
        assert_eq!(table.value(&query), 800.0);
        // Zone-level variables are read at the zone of the parcels.
        assert_eq!(table.value(&query.with_variable("ivtfree")), 20.0);
    }

    #[test]
    fn combinations_test() {
        let table = table();
        assert!(table.is_possible_combination(SkimMode::Sov, PathType::NoTolls));
        assert!(!table.is_actual_combination(SkimMode::Sov, PathType::NoTolls));
        assert!(table.is_actual_combination(SkimMode::Sov, PathType::FullNetwork));
        let invalid = SkimTableData {
            possible_combinations: vec![],
            actual_combinations: vec![combination(SkimMode::Walk, PathType::Ferry)],
            entries: vec![],
        };
        let err = SkimTable::new(invalid).unwrap_err();
        assert!(err.to_string().contains("Walk / Ferry"));
    }
}
