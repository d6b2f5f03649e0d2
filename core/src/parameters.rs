// Copyright 2022 Lucas Javaudin
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// https://creativecommons.org/licenses/by-nc-nd/4.0/legalcode

//! Parameters of the path-type evaluation.
use anyhow::{bail, Result};
use schemars::JsonSchema;
use serde_derive::{Deserialize, Serialize};

use crate::mode::{AggregatePurpose, AutoMode, Purpose};
use crate::time::Minute;

const fn default_one() -> f64 {
    1.0
}

const fn default_is_true() -> bool {
    true
}

const fn default_time_limit() -> f64 {
    240.0
}

const fn default_walk_minutes_per_km() -> f64 {
    12.0
}

const fn default_max_count() -> usize {
    50
}

const fn default_max_length() -> f64 {
    999.99
}

const fn default_step_size() -> f64 {
    0.25
}

const fn default_delimiter() -> char {
    '\t'
}

fn default_am_peak() -> [Minute; 2] {
    [241, 361]
}

fn default_pm_peak() -> [Minute; 2] {
    [781, 901]
}

/// Exponents of the gamma transform of each utility component.
///
/// An exponent of `1` gives a linear transform, an exponent of `0` a logarithmic transform.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct GammaParameters {
    #[serde(default = "default_one")]
    pub cost: f64,
    #[serde(default = "default_one")]
    pub in_vehicle_time: f64,
    #[serde(default = "default_one")]
    pub extra_time: f64,
    #[serde(default = "default_one")]
    pub paid_ride_share_cost: f64,
}

impl Default for GammaParameters {
    fn default() -> Self {
        GammaParameters {
            cost: 1.0,
            in_vehicle_time: 1.0,
            extra_time: 1.0,
            paid_ride_share_cost: 1.0,
        }
    }
}

/// In-vehicle time weights of the auto modes, for one aggregate purpose.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct AutoTimeWeights {
    #[serde(default = "default_one")]
    pub sov: f64,
    #[serde(default = "default_one")]
    pub hov_driver: f64,
    #[serde(default = "default_one")]
    pub hov_passenger: f64,
}

impl Default for AutoTimeWeights {
    fn default() -> Self {
        AutoTimeWeights {
            sov: 1.0,
            hov_driver: 1.0,
            hov_passenger: 1.0,
        }
    }
}

impl AutoTimeWeights {
    /// Returns the weight of the auto mode (paid ride-share uses the passenger weight).
    pub const fn get(&self, mode: AutoMode) -> f64 {
        match mode {
            AutoMode::Sov => self.sov,
            AutoMode::HovDriver => self.hov_driver,
            AutoMode::HovPassenger | AutoMode::PaidRideShare => self.hov_passenger,
        }
    }
}

/// A value for each aggregate purpose.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct ByPurpose<T> {
    pub commute: T,
    pub business: T,
    pub personal: T,
}

impl<T: Clone> ByPurpose<T> {
    /// Creates a value identical for all purposes.
    pub fn uniform(value: T) -> Self {
        ByPurpose {
            commute: value.clone(),
            business: value.clone(),
            personal: value,
        }
    }
}

impl<T> ByPurpose<T> {
    pub const fn get(&self, purpose: AggregatePurpose) -> &T {
        match purpose {
            AggregatePurpose::Commute => &self.commute,
            AggregatePurpose::Business => &self.business,
            AggregatePurpose::Personal => &self.personal,
        }
    }
}

impl<T: Default + Clone> Default for ByPurpose<T> {
    fn default() -> Self {
        Self::uniform(T::default())
    }
}

fn default_uniform_weights() -> ByPurpose<AutoTimeWeights> {
    ByPurpose::uniform(AutoTimeWeights::default())
}

fn default_cost_share() -> ByPurpose<f64> {
    ByPurpose::uniform(1.0)
}

/// Parameters of the auto paths.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct AutoParameters {
    /// Operating cost per distance unit.
    #[serde(default)]
    pub operating_cost_per_distance: f64,
    /// Utility constant added to tolled paths.
    #[serde(default)]
    pub tolled_path_constant: f64,
    /// If `false`, the cost utility of HOV passengers is zero.
    #[serde(default = "default_is_true")]
    pub hov_passengers_incur_costs: bool,
    /// In-vehicle time weights, by aggregate purpose and auto mode.
    #[serde(default = "default_uniform_weights")]
    pub in_vehicle_time_weights: ByPurpose<AutoTimeWeights>,
    /// Extra-time weight of drivers.
    #[serde(default = "default_one")]
    pub driver_extra_time_weight: f64,
    /// Extra-time weight of passengers.
    #[serde(default = "default_one")]
    pub passenger_extra_time_weight: f64,
    /// Multiplier of the extra (congested) time (ignored when zero).
    #[serde(default)]
    pub congested_time_multiplier: f64,
    /// Distance below which the circuity-adjusted distance between parcels is used (`0` to
    /// disable).
    #[serde(default)]
    pub maximum_blending_distance: f64,
    /// Minimum age to drive.
    #[serde(default)]
    pub minimum_driving_age: u32,
    /// Share of the costs paid by a HOV occupant, by aggregate purpose.
    #[serde(default = "default_cost_share")]
    pub hov_cost_share: ByPurpose<f64>,
}

impl Default for AutoParameters {
    fn default() -> Self {
        AutoParameters {
            operating_cost_per_distance: 0.0,
            tolled_path_constant: 0.0,
            hov_passengers_incur_costs: true,
            in_vehicle_time_weights: default_uniform_weights(),
            driver_extra_time_weight: 1.0,
            passenger_extra_time_weight: 1.0,
            congested_time_multiplier: 0.0,
            maximum_blending_distance: 0.0,
            minimum_driving_age: 0,
            hov_cost_share: default_cost_share(),
        }
    }
}

/// In-vehicle time weights of the transit submodes, for one aggregate purpose.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct TransitSubmodeWeights {
    #[serde(default = "default_one")]
    pub train: f64,
    #[serde(default = "default_one")]
    pub bus: f64,
    #[serde(default = "default_one")]
    pub metro: f64,
    #[serde(default = "default_one")]
    pub light_rail: f64,
}

impl Default for TransitSubmodeWeights {
    fn default() -> Self {
        TransitSubmodeWeights {
            train: 1.0,
            bus: 1.0,
            metro: 1.0,
            light_rail: 1.0,
        }
    }
}

fn default_submode_weights() -> ByPurpose<TransitSubmodeWeights> {
    ByPurpose::uniform(TransitSubmodeWeights::default())
}

/// Fares of the fare-zone model.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct FareZoneParameters {
    /// Adult fare by number of fare zones crossed (the last fare applies beyond the table).
    pub adult_fares: Vec<f64>,
    /// Discount (in percent) for children, by number of fare zones crossed.
    #[serde(default)]
    pub child_discounts: Vec<f64>,
    /// Discount (in percent) for off-peak trips, by number of fare zones crossed.
    #[serde(default)]
    pub off_peak_discounts: Vec<f64>,
    /// Travelers up to this age travel for free.
    #[serde(default)]
    pub free_travel_age: u32,
    /// Travelers up to this age pay the child fare.
    #[serde(default)]
    pub child_age: u32,
    /// Start and end of the morning peak, in minutes after midnight.
    #[serde(default = "default_am_peak")]
    pub am_peak: [Minute; 2],
    /// Start and end of the afternoon peak, in minutes after midnight.
    #[serde(default = "default_pm_peak")]
    pub pm_peak: [Minute; 2],
}

/// How transit fares are computed.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(tag = "type", content = "value")]
pub enum FareModel {
    /// Fares are read from the `farecard10` skim.
    #[default]
    Skimmed,
    /// Fares depend on the number of fare zones crossed (`farezones` skim).
    FareZones(FareZoneParameters),
}

/// Parameters of the transit paths.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct TransitParameters {
    /// Weights of the in-vehicle time of each submode, by aggregate purpose.
    #[serde(default = "default_submode_weights")]
    pub submode_weights: ByPurpose<TransitSubmodeWeights>,
    #[serde(default = "default_one")]
    pub in_vehicle_time_weight: f64,
    #[serde(default = "default_one")]
    pub first_wait_time_weight: f64,
    #[serde(default = "default_one")]
    pub transfer_wait_time_weight: f64,
    /// Weight of the walking time to, from and between stops.
    #[serde(default = "default_one")]
    pub walk_access_time_weight: f64,
    #[serde(default)]
    pub fare_model: FareModel,
    /// If `false`, paid ride-share cannot be used to access or leave transit.
    #[serde(default = "default_is_true")]
    pub share_mode_available_for_transit: bool,
}

impl Default for TransitParameters {
    fn default() -> Self {
        TransitParameters {
            submode_weights: default_submode_weights(),
            in_vehicle_time_weight: 1.0,
            first_wait_time_weight: 1.0,
            transfer_wait_time_weight: 1.0,
            walk_access_time_weight: 1.0,
            fare_model: FareModel::default(),
            share_mode_available_for_transit: true,
        }
    }
}

/// Microzone values of the walk or bike paths within a zone.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct IntrazonalFactors {
    /// Ratio between network distance and straight-line distance between two parcels.
    #[serde(default = "default_one")]
    pub straight_line_factor: f64,
    #[serde(default = "default_walk_minutes_per_km")]
    pub minutes_per_km: f64,
    /// Minutes added to the travel time.
    #[serde(default)]
    pub extra_minutes: f64,
    /// Generalized minutes per minute of travel.
    #[serde(default = "default_one")]
    pub generalized_minutes_per_minute: f64,
    /// Generalized minutes added to the generalized time.
    #[serde(default)]
    pub extra_generalized_minutes: f64,
}

impl IntrazonalFactors {
    fn new(minutes_per_km: f64) -> Self {
        IntrazonalFactors {
            straight_line_factor: 1.0,
            minutes_per_km,
            extra_minutes: 0.0,
            generalized_minutes_per_minute: 1.0,
            extra_generalized_minutes: 0.0,
        }
    }
}

fn default_walk_intrazonal() -> IntrazonalFactors {
    IntrazonalFactors::new(12.0)
}

fn default_bike_intrazonal() -> IntrazonalFactors {
    IntrazonalFactors::new(4.0)
}

/// Parameters of the walk and bike paths.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct WalkBikeParameters {
    /// Walking minutes per distance unit, for access and egress legs.
    #[serde(default = "default_walk_minutes_per_km")]
    pub walk_minutes_per_distance: f64,
    #[serde(default = "default_walk_intrazonal")]
    pub walk_intrazonal: IntrazonalFactors,
    #[serde(default = "default_bike_intrazonal")]
    pub bike_intrazonal: IntrazonalFactors,
}

impl Default for WalkBikeParameters {
    fn default() -> Self {
        WalkBikeParameters {
            walk_minutes_per_distance: 12.0,
            walk_intrazonal: default_walk_intrazonal(),
            bike_intrazonal: default_bike_intrazonal(),
        }
    }
}

/// Bounds on the facilities searched for one access or egress type.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct SearchLimit {
    /// Maximum number of facilities searched.
    #[serde(default = "default_max_count")]
    pub max_count: usize,
    /// Maximum length between the parcel and the facility, in kilometers.
    #[serde(default = "default_max_length")]
    pub max_length_km: f64,
}

impl Default for SearchLimit {
    fn default() -> Self {
        SearchLimit {
            max_count: default_max_count(),
            max_length_km: default_max_length(),
        }
    }
}

/// Parameters of the access and egress search.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct SearchParameters {
    #[serde(default)]
    pub walk: SearchLimit,
    #[serde(default)]
    pub bike_on_transit: SearchLimit,
    #[serde(default)]
    pub bike_park_and_ride: SearchLimit,
    #[serde(default)]
    pub auto_park_and_ride: SearchLimit,
    #[serde(default)]
    pub kiss_and_ride: SearchLimit,
    /// Maximum ratio between the drive to the park-and-ride node and the origin-destination
    /// distance (`0` to disable).
    #[serde(default)]
    pub max_drive_park_and_ride_ratio: f64,
    /// Maximum ratio between the bike ride to the park-and-ride node and the origin-destination
    /// distance (`0` to disable).
    #[serde(default)]
    pub max_bike_park_and_ride_ratio: f64,
    /// Maximum ratio between the drive to the kiss-and-ride terminal and the origin-destination
    /// distance (`0` to disable).
    #[serde(default)]
    pub max_kiss_and_ride_ratio: f64,
}

/// Autonomous-vehicle settings.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct AutonomousVehicleParameters {
    /// Whether households choose between conventional and autonomous vehicles.
    #[serde(default)]
    pub include_auto_type_choice: bool,
    /// Whether autonomous vehicles have their own skims.
    #[serde(default)]
    pub use_separate_av_skims: bool,
    /// Whether paid ride-share is provided by autonomous vehicles.
    #[serde(default)]
    pub paid_ride_share_uses_avs: bool,
    /// Discount of the time coefficient in autonomous vehicles (between 0 and 1).
    #[serde(default)]
    pub time_coefficient_discount: f64,
}

/// Fares of paid ride-share.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct RideShareParameters {
    /// Fixed cost per ride.
    #[serde(default)]
    pub fixed_cost: f64,
    /// Cost per distance unit.
    #[serde(default)]
    pub cost_per_distance: f64,
    /// Fixed cost per ride with autonomous vehicles.
    #[serde(default)]
    pub av_fixed_cost: f64,
    /// Cost per distance unit with autonomous vehicles.
    #[serde(default)]
    pub av_cost_per_distance: f64,
}

/// Time-of-day mileage-based pricing.
///
/// Peaks are expressed in minutes after midnight.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct MileagePricing {
    #[serde(default = "default_am_peak")]
    pub am_peak: [Minute; 2],
    #[serde(default = "default_pm_peak")]
    pub pm_peak: [Minute; 2],
    /// Cents per distance unit during the morning peak.
    #[serde(default)]
    pub am_peak_cents: f64,
    /// Cents per distance unit during the afternoon peak.
    #[serde(default)]
    pub pm_peak_cents: f64,
    /// Cents per distance unit between the two peaks.
    #[serde(default)]
    pub between_peaks_cents: f64,
    /// Cents per distance unit before the morning peak and after the afternoon peak.
    #[serde(default)]
    pub outside_peaks_cents: f64,
}

impl MileagePricing {
    /// Returns the price (in monetary units per distance unit) at the given time (in minutes
    /// after midnight).
    pub fn price_per_distance(&self, minutes_after_midnight: i32) -> f64 {
        let [am_start, am_end] = self.am_peak;
        let [pm_start, pm_end] = self.pm_peak;
        let t = minutes_after_midnight;
        let cents = if t >= am_start && t < am_end {
            self.am_peak_cents
        } else if t >= pm_start && t < pm_end {
            self.pm_peak_cents
        } else if t >= am_end && t < pm_start {
            self.between_peaks_cents
        } else {
            self.outside_peaks_cents
        };
        cents / 100.0
    }
}

/// Adjustment of the cost coefficient with the trip distance.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct DistanceCostAdjustment {
    /// Reference distance of work trips, in kilometers.
    pub work_base_distance: f64,
    pub school_base_distance: f64,
    pub business_base_distance: f64,
    pub shopping_base_distance: f64,
    pub other_base_distance: f64,
    /// Minimum ratio between the trip distance and the reference distance.
    #[serde(default)]
    pub minimum_multiple: f64,
    /// Maximum ratio between the trip distance and the reference distance.
    pub maximum_multiple: f64,
    /// Elasticity of the cost coefficient to the distance, by aggregate purpose.
    pub elasticity: ByPurpose<f64>,
}

impl DistanceCostAdjustment {
    /// Returns the multiplier of the cost coefficient for a trip of the given distance (in
    /// kilometers).
    pub fn multiplier(&self, purpose: Purpose, distance: f64) -> f64 {
        let base = match purpose {
            Purpose::Work => self.work_base_distance,
            Purpose::School => self.school_base_distance,
            Purpose::Business => self.business_base_distance,
            Purpose::Shopping => self.shopping_base_distance,
            _ => self.other_base_distance,
        };
        if base <= 0.0 {
            return 1.0;
        }
        let multiple = (distance / base).clamp(self.minimum_multiple, self.maximum_multiple);
        multiple.powf(*self.elasticity.get(purpose.cost_purpose()))
    }
}

/// Shadow pricing of the park-and-ride nodes.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct ShadowPricingParameters {
    #[serde(default)]
    pub enabled: bool,
    /// Weight of the new price in the update of the prices (between 0 and 1).
    #[serde(default = "default_step_size")]
    pub step_size: f64,
    /// Penalty when the node is surely over capacity.
    #[serde(default)]
    pub maximum_penalty: f64,
    /// Number of minutes around each minute over which the maximum load is taken.
    #[serde(default)]
    pub time_spread: i32,
    /// Delimiter of the shadow-price file.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

impl Default for ShadowPricingParameters {
    fn default() -> Self {
        ShadowPricingParameters {
            enabled: false,
            step_size: default_step_size(),
            maximum_penalty: 0.0,
            time_spread: 0,
            delimiter: default_delimiter(),
        }
    }
}

/// Set of parameters of the path-type evaluation.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
#[schemars(title = "Parameters")]
#[schemars(description = "Set of parameters of the path-type evaluation.")]
pub struct Parameters {
    /// Scale factor applied to every path utility.
    #[serde(default = "default_one")]
    pub path_choice_scale_factor: f64,
    /// Upper time limit of available paths, in minutes (doubled for round trips).
    #[serde(default = "default_time_limit")]
    pub available_path_upper_time_limit: f64,
    #[serde(default)]
    pub gamma: GammaParameters,
    #[serde(default)]
    pub auto: AutoParameters,
    #[serde(default)]
    pub transit: TransitParameters,
    #[serde(default)]
    pub walk_bike: WalkBikeParameters,
    #[serde(default)]
    pub search: SearchParameters,
    #[serde(default)]
    pub autonomous_vehicles: AutonomousVehicleParameters,
    #[serde(default)]
    pub ride_share: RideShareParameters,
    #[serde(default)]
    pub mileage_pricing: Option<MileagePricing>,
    #[serde(default)]
    pub distance_cost_adjustment: Option<DistanceCostAdjustment>,
    #[serde(default)]
    pub shadow_pricing: ShadowPricingParameters,
    /// In estimation mode, the best path type is always chosen and shadow prices are ignored.
    #[serde(default)]
    pub is_in_estimation_mode: bool,
    /// Seed of the random number generators (random by default).
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for Parameters {
    fn default() -> Self {
        Parameters {
            path_choice_scale_factor: 1.0,
            available_path_upper_time_limit: default_time_limit(),
            gamma: Default::default(),
            auto: Default::default(),
            transit: Default::default(),
            walk_bike: Default::default(),
            search: Default::default(),
            autonomous_vehicles: Default::default(),
            ride_share: Default::default(),
            mileage_pricing: None,
            distance_cost_adjustment: None,
            shadow_pricing: Default::default(),
            is_in_estimation_mode: false,
            random_seed: None,
        }
    }
}

impl Parameters {
    /// Returns an error if the parameters are invalid.
    pub fn validate(&self) -> Result<()> {
        if !(self.path_choice_scale_factor > 0.0) {
            bail!(
                "The path choice scale factor must be positive, got {}",
                self.path_choice_scale_factor
            );
        }
        if !(self.available_path_upper_time_limit > 0.0) {
            bail!(
                "The available path upper time limit must be positive, got {}",
                self.available_path_upper_time_limit
            );
        }
        let walk_bike = &self.walk_bike;
        for (name, value) in [
            ("walk_minutes_per_distance", walk_bike.walk_minutes_per_distance),
            ("walk_intrazonal.minutes_per_km", walk_bike.walk_intrazonal.minutes_per_km),
            ("bike_intrazonal.minutes_per_km", walk_bike.bike_intrazonal.minutes_per_km),
        ] {
            if value < 0.0 {
                bail!("Parameter `{name}` cannot be negative, got {value}");
            }
        }
        let discount = self.autonomous_vehicles.time_coefficient_discount;
        if !(0.0..=1.0).contains(&discount) {
            bail!("The AV time coefficient discount must be between 0 and 1, got {discount}");
        }
        let step = self.shadow_pricing.step_size;
        if !(0.0..=1.0).contains(&step) {
            bail!("The shadow-pricing step size must be between 0 and 1, got {step}");
        }
        if let FareModel::FareZones(fares) = &self.transit.fare_model {
            if fares.adult_fares.is_empty() {
                bail!("The fare-zone model requires at least one adult fare");
            }
        }
        if let Some(adjustment) = &self.distance_cost_adjustment {
            if adjustment.minimum_multiple > adjustment.maximum_multiple {
                bail!(
                    "The minimum distance multiple ({}) is larger than the maximum ({})",
                    adjustment.minimum_multiple,
                    adjustment.maximum_multiple
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_test() {
        let json = r#"{
            "path_choice_scale_factor": 0.5,
            "auto": {"operating_cost_per_distance": 0.12},
            "transit": {"fare_model": {"type": "FareZones", "value": {"adult_fares": [2.0, 3.0]}}},
            "search": {"walk": {"max_count": 10}}
        }"#;
        let parameters: Parameters = serde_json::from_str(json).unwrap();
        assert_eq!(parameters.path_choice_scale_factor, 0.5);
        assert_eq!(parameters.available_path_upper_time_limit, 240.0);
        assert_eq!(parameters.auto.operating_cost_per_distance, 0.12);
        assert!(parameters.auto.hov_passengers_incur_costs);
        assert_eq!(parameters.auto.in_vehicle_time_weights.commute.sov, 1.0);
        assert_eq!(parameters.search.walk.max_count, 10);
        assert_eq!(parameters.search.walk.max_length_km, 999.99);
        assert_eq!(parameters.search.kiss_and_ride.max_count, 50);
        assert!(parameters.transit.share_mode_available_for_transit);
        match &parameters.transit.fare_model {
            FareModel::FareZones(fares) => {
                assert_eq!(fares.adult_fares, vec![2.0, 3.0]);
                assert_eq!(fares.am_peak, [241, 361]);
            }
            FareModel::Skimmed => panic!("Expected the fare-zone model"),
        }
        assert!(parameters.validate().is_ok());
        let empty: Parameters = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, Parameters::default());
    }

    #[test]
    fn validate_test() {
        let mut parameters = Parameters::default();
        assert!(parameters.validate().is_ok());
        parameters.path_choice_scale_factor = 0.0;
        assert!(parameters.validate().is_err());
        parameters = Parameters::default();
        parameters.available_path_upper_time_limit = -1.0;
        assert!(parameters.validate().is_err());
        parameters = Parameters::default();
        parameters.walk_bike.walk_minutes_per_distance = -1.0;
        assert!(parameters.validate().is_err());
        parameters = Parameters::default();
        parameters.autonomous_vehicles.time_coefficient_discount = 1.5;
        assert!(parameters.validate().is_err());
        parameters = Parameters::default();
        parameters.shadow_pricing.step_size = -0.1;
        assert!(parameters.validate().is_err());
        parameters = Parameters::default();
        parameters.path_choice_scale_factor = f64::NAN;
        assert!(parameters.validate().is_err());
    }

    #[test]
    fn mileage_pricing_test() {
        let pricing = MileagePricing {
            am_peak: [420, 540],
            pm_peak: [960, 1080],
            am_peak_cents: 10.0,
            pm_peak_cents: 20.0,
            between_peaks_cents: 5.0,
            outside_peaks_cents: 1.0,
        };
        assert_eq!(pricing.price_per_distance(300), 0.01);
        assert_eq!(pricing.price_per_distance(420), 0.1);
        assert_eq!(pricing.price_per_distance(540), 0.05);
        assert_eq!(pricing.price_per_distance(1000), 0.2);
        assert_eq!(pricing.price_per_distance(1080), 0.01);
        assert_eq!(pricing.price_per_distance(1500), 0.01);
    }

    #[test]
    fn distance_cost_adjustment_test() {
        let adjustment = DistanceCostAdjustment {
            work_base_distance: 10.0,
            school_base_distance: 5.0,
            business_base_distance: 20.0,
            shopping_base_distance: 4.0,
            other_base_distance: 8.0,
            minimum_multiple: 0.5,
            maximum_multiple: 4.0,
            elasticity: ByPurpose {
                commute: -0.5,
                business: 0.0,
                personal: -1.0,
            },
        };
        assert!((adjustment.multiplier(Purpose::Work, 40.0) - 0.5).abs() < 1e-12);
        // The multiple is capped.
        assert!((adjustment.multiplier(Purpose::Work, 1000.0) - 0.5).abs() < 1e-12);
        assert!((adjustment.multiplier(Purpose::Business, 40.0) - 1.0).abs() < 1e-12);
        assert!((adjustment.multiplier(Purpose::Shopping, 1.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn by_purpose_test() {
        let weights = ByPurpose {
            commute: AutoTimeWeights {
                sov: 1.0,
                hov_driver: 2.0,
                hov_passenger: 3.0,
            },
            business: AutoTimeWeights::default(),
            personal: AutoTimeWeights::default(),
        };
        let commute = weights.get(AggregatePurpose::Commute);
        assert_eq!(commute.get(AutoMode::HovDriver), 2.0);
        assert_eq!(commute.get(AutoMode::PaidRideShare), 3.0);
    }
}
