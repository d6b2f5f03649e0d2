// Copyright 2022 Lucas Javaudin
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// https://creativecommons.org/licenses/by-nc-nd/4.0/legalcode

//! Everything related to import / export of the evaluation data.
pub mod json;

use std::path::PathBuf;

use anyhow::{Context, Result};
use log::{debug, info};
use schemars::JsonSchema;
use serde_derive::{Deserialize, Serialize};

use crate::facilities::{Facilities, FacilitiesData};
use crate::impedance::{SkimTable, SkimTableData};
use crate::location::{Parcel, Parcels};
use crate::parameters::Parameters;
use crate::request::TravelRequest;
use crate::shadow_price::ShadowPrices;
use json::read_json;

/// Name of the file where the park-and-ride shadow prices are written.
pub const SHADOW_PRICE_FILENAME: &str = "park_and_ride_shadow_prices.txt";

/// Paths to the input files of a run.
///
/// Relative paths are interpreted from the directory of the run-parameters file.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct InputFiles {
    /// JSON file with the impedance values.
    pub skims: PathBuf,
    /// JSON file with the list of parcels.
    pub parcels: PathBuf,
    /// JSON file with the stop areas, park-and-ride nodes and proximity indices.
    #[serde(default)]
    pub facilities: Option<PathBuf>,
    /// JSON file with the list of travel requests.
    pub requests: PathBuf,
    /// Delimited text file with the park-and-ride shadow prices of the previous run.
    #[serde(default)]
    pub shadow_prices: Option<PathBuf>,
}

/// Parameters of a batch run.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
#[schemars(title = "Run Parameters")]
#[schemars(description = "Input files, output directory and parameters of a batch run.")]
pub struct RunParameters {
    pub input_files: InputFiles,
    /// Directory where the results are stored.
    pub output_directory: PathBuf,
    #[serde(default)]
    pub parameters: Parameters,
}

/// Inputs of a batch run, read from the files.
#[derive(Debug)]
pub struct RunInputs {
    pub skims: SkimTable,
    pub parcels: Parcels,
    pub facilities: Facilities,
    pub requests: Vec<TravelRequest>,
    pub shadow_prices: ShadowPrices,
}

/// Reads all the input files of a run.
pub fn read_inputs(input_files: &InputFiles, parameters: &Parameters) -> Result<RunInputs> {
    let skim_data: SkimTableData = read_json(&input_files.skims).context("Failed to read skims")?;
    let skims = SkimTable::new(skim_data).context("Invalid skims")?;
    let parcels: Vec<Parcel> =
        read_json(&input_files.parcels).context("Failed to read parcels")?;
    let parcels = Parcels::new(parcels).context("Invalid parcels")?;
    let facility_data: FacilitiesData = match &input_files.facilities {
        Some(path) => read_json(path).context("Failed to read facilities")?,
        None => Default::default(),
    };
    let facilities = Facilities::new(facility_data).context("Invalid facilities")?;
    for (kind, n) in facilities.index_sizes() {
        debug!("Proximity index {kind:?}: {n} entries");
    }
    let requests: Vec<TravelRequest> =
        read_json(&input_files.requests).context("Failed to read travel requests")?;
    let shadow_prices = match &input_files.shadow_prices {
        Some(path) => ShadowPrices::from_path(path, parameters.shadow_pricing.delimiter)
            .context("Failed to read shadow prices")?,
        None => ShadowPrices::new(),
    };
    info!(
        "Read {} parcels, {} travel requests and the shadow prices of {} nodes",
        parcels.len(),
        requests.len(),
        shadow_prices.len()
    );
    Ok(RunInputs {
        skims,
        parcels,
        facilities,
        requests,
        shadow_prices,
    })
}
