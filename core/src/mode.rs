// Copyright 2022 Lucas Javaudin
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// https://creativecommons.org/licenses/by-nc-nd/4.0/legalcode

//! Travel modes, skim modes, path types and trip purposes.
use std::fmt;

use schemars::JsonSchema;
use serde_derive::{Deserialize, Serialize};

/// Travel mode whose path types are evaluated.
///
/// The composite modes are named `<access>Ride<egress>`: the traveler reaches a transit stop area
/// with the access mode, rides transit and leaves the egress stop area with the egress mode.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize, JsonSchema,
)]
pub enum Mode {
    Walk,
    Bike,
    /// Single-occupancy vehicle.
    #[serde(rename = "SOV")]
    Sov,
    /// High-occupancy vehicle, as the driver.
    HovDriver,
    /// High-occupancy vehicle, as a passenger.
    HovPassenger,
    /// Paid ride-share (taxi or ride-hailing service).
    PaidRideShare,
    /// Transit with walk access and egress.
    Transit,
    /// Transit with the bike carried on board.
    BikeOnTransit,
    WalkRideBike,
    WalkRideShare,
    BikeParkRideWalk,
    BikeParkRideBike,
    BikeParkRideShare,
    ShareRideWalk,
    ShareRideBike,
    ShareRideShare,
    CarKissRideWalk,
    CarKissRideBike,
    CarKissRideShare,
    CarParkRideWalk,
    CarParkRideBike,
    CarParkRideShare,
}

impl Mode {
    /// Returns the skim mode used to check which path types are available for this mode.
    pub const fn skim_mode(self) -> SkimMode {
        match self {
            Self::Walk => SkimMode::Walk,
            Self::Bike => SkimMode::Bike,
            Self::Sov => SkimMode::Sov,
            Self::HovDriver => SkimMode::HovDriver,
            Self::HovPassenger | Self::PaidRideShare => SkimMode::HovPassenger,
            Self::BikeOnTransit => SkimMode::BikeOnTransit,
            _ => SkimMode::Transit,
        }
    }

    /// Returns the evaluator route of the mode.
    pub const fn route(self) -> Route {
        use AccessMode as A;
        let (access, egress) = match self {
            Self::Walk => return Route::WalkBike(SkimMode::Walk),
            Self::Bike => return Route::WalkBike(SkimMode::Bike),
            Self::Sov => return Route::Auto(AutoMode::Sov),
            Self::HovDriver => return Route::Auto(AutoMode::HovDriver),
            Self::HovPassenger => return Route::Auto(AutoMode::HovPassenger),
            Self::PaidRideShare => return Route::Auto(AutoMode::PaidRideShare),
            Self::Transit => (A::Walk, A::Walk),
            Self::BikeOnTransit => {
                return Route::StopAreaTransit {
                    skim_mode: SkimMode::BikeOnTransit,
                    access: A::Bike,
                    egress: A::Bike,
                }
            }
            Self::WalkRideBike => (A::Walk, A::Bike),
            Self::WalkRideShare => (A::Walk, A::PaidRideShare),
            Self::BikeParkRideWalk => (A::Bike, A::Walk),
            Self::BikeParkRideBike => (A::Bike, A::Bike),
            Self::BikeParkRideShare => (A::Bike, A::PaidRideShare),
            Self::ShareRideWalk => (A::PaidRideShare, A::Walk),
            Self::ShareRideBike => (A::PaidRideShare, A::Bike),
            Self::ShareRideShare => (A::PaidRideShare, A::PaidRideShare),
            Self::CarKissRideWalk => (A::HovPassenger, A::Walk),
            Self::CarKissRideBike => (A::HovPassenger, A::Bike),
            Self::CarKissRideShare => (A::HovPassenger, A::PaidRideShare),
            Self::CarParkRideWalk => (A::Sov, A::Walk),
            Self::CarParkRideBike => (A::Sov, A::Bike),
            Self::CarParkRideShare => (A::Sov, A::PaidRideShare),
        };
        Route::StopAreaTransit {
            skim_mode: SkimMode::Transit,
            access,
            egress,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Mode under which the impedance data is stored.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize, JsonSchema,
)]
pub enum SkimMode {
    Walk,
    Bike,
    #[serde(rename = "SOV")]
    Sov,
    HovDriver,
    HovPassenger,
    /// Autonomous vehicles, when they have separate skims.
    AutonomousVehicle,
    Transit,
    BikeOnTransit,
}

impl fmt::Display for SkimMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Mode of a trip evaluated by the auto evaluator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
pub enum AutoMode {
    #[serde(rename = "SOV")]
    Sov,
    HovDriver,
    HovPassenger,
    PaidRideShare,
}

impl AutoMode {
    /// Returns the skim mode of the auto mode when autonomous-vehicle skims are not used.
    pub const fn skim_mode(self) -> SkimMode {
        match self {
            Self::Sov => SkimMode::Sov,
            Self::HovDriver => SkimMode::HovDriver,
            Self::HovPassenger | Self::PaidRideShare => SkimMode::HovPassenger,
        }
    }
}

/// Mode used to reach a transit stop area (access) or to leave it (egress).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
pub enum AccessMode {
    Walk,
    Bike,
    /// Drive alone to a park-and-ride node.
    #[serde(rename = "SOV")]
    Sov,
    /// Dropped off at a kiss-and-ride terminal.
    HovPassenger,
    /// Paid ride-share to or from a kiss-and-ride terminal.
    PaidRideShare,
}

/// Evaluator responsible for the path types of a mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    /// Direct walk or bike path.
    WalkBike(SkimMode),
    /// Direct auto path.
    Auto(AutoMode),
    /// Transit between two stop areas, with an access and an egress leg.
    StopAreaTransit {
        skim_mode: SkimMode,
        access: AccessMode,
        egress: AccessMode,
    },
}

/// Network variant competing within a mode.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize, JsonSchema,
)]
pub enum PathType {
    /// Unrestricted network.
    FullNetwork,
    /// Network without tolled links.
    NoTolls,
    LocalBus,
    LightRail,
    PremiumBus,
    CommuterRail,
    Ferry,
    #[serde(rename = "BRT")]
    Brt,
    FixedGuideway,
}

impl PathType {
    /// Number of path types.
    pub const COUNT: usize = 9;

    /// Every path type, in index order.
    pub const ALL: [PathType; Self::COUNT] = [
        PathType::FullNetwork,
        PathType::NoTolls,
        PathType::LocalBus,
        PathType::LightRail,
        PathType::PremiumBus,
        PathType::CommuterRail,
        PathType::Ferry,
        PathType::Brt,
        PathType::FixedGuideway,
    ];
}

impl fmt::Display for PathType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Purpose of a trip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
pub enum Purpose {
    Home,
    Work,
    School,
    Escort,
    Business,
    PersonalBusiness,
    Shopping,
    Meal,
    Social,
    Recreation,
    Medical,
}

impl Purpose {
    /// Returns the aggregate purpose used to select in-vehicle time weights.
    pub const fn aggregate(self) -> AggregatePurpose {
        match self {
            Self::Work | Self::School | Self::Escort => AggregatePurpose::Commute,
            Self::Business => AggregatePurpose::Business,
            _ => AggregatePurpose::Personal,
        }
    }

    /// Returns the aggregate purpose used to select cost elasticities.
    ///
    /// Only work and school trips are commute trips (escort trips are personal).
    pub const fn cost_purpose(self) -> AggregatePurpose {
        match self {
            Self::Work | Self::School => AggregatePurpose::Commute,
            Self::Business => AggregatePurpose::Business,
            _ => AggregatePurpose::Personal,
        }
    }

    /// Returns the aggregate purpose used to select HOV cost shares.
    ///
    /// Only work trips are commute trips.
    pub const fn cost_share_purpose(self) -> AggregatePurpose {
        match self {
            Self::Work => AggregatePurpose::Commute,
            Self::Business => AggregatePurpose::Business,
            _ => AggregatePurpose::Personal,
        }
    }
}

/// Aggregation of the trip purposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
pub enum AggregatePurpose {
    Commute,
    Business,
    Personal,
}
