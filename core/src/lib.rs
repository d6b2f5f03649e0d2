// Copyright 2022 Lucas Javaudin
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// https://creativecommons.org/licenses/by-nc-nd/4.0/legalcode

//! Path-type choice: evaluation of the competing path types of a trip (network, toll-free
//! network, transit submodes and their access / egress variants) and reduction to one chosen
//! path and a generalized-time logsum.
#![doc(html_no_source)]

pub mod access_egress;
pub mod auto;
pub mod context;
pub mod facilities;
pub mod impedance;
pub mod io;
pub mod location;
pub mod logging;
pub mod mode;
pub mod orchestrator;
pub mod parameters;
pub mod path;
pub mod progress_bar;
pub mod request;
pub mod shadow_price;
pub mod time;
pub mod transit;
pub mod walk_bike;

use std::env;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use log::{error, info, log_enabled};

use crate::io::json::{read_json, write_json};
use crate::io::{read_inputs, RunParameters, SHADOW_PRICE_FILENAME};
use crate::orchestrator::PathTypeOrchestrator;
use crate::path::{EvaluationResult, RequestResult};
use crate::progress_bar::Spinner;
use crate::request::TravelRequest;
use crate::shadow_price::ShadowPrices;

// Dependencies only used in the bins.
use clap as _;

/// Reads the inputs of a run, evaluates all the travel requests and stores the results to the
/// output directory.
///
/// This function takes as argument the path to the run-parameters JSON file.
pub fn run_evaluation(path: &Path) -> Result<()> {
    run_evaluation_imp::<std::io::Sink>(path, None)
}

/// Same as [run_evaluation] but the logs are also sent to the given writer.
pub fn run_evaluation_with_writer<W: std::io::Write + Send + 'static>(
    path: &Path,
    writer: W,
) -> Result<()> {
    let res = run_evaluation_imp(path, Some(writer));
    if let Err(err) = res {
        if log_enabled!(log::Level::Error) {
            // Use the `error` macro so that the error is logged to all the loggers.
            error!("{err:?}");
            Ok(())
        } else {
            Err(anyhow!(err))
        }
    } else {
        Ok(())
    }
}

fn run_evaluation_imp<W: std::io::Write + Send + 'static>(
    path: &Path,
    writer: Option<W>,
) -> Result<()> {
    let run: RunParameters = read_json(path).context("Failed to read run parameters")?;
    run.parameters.validate().context("Invalid parameters")?;

    // Input paths are relative to the directory of the run-parameters file.
    if let Some(parent_dir) = path.parent() {
        if parent_dir.to_str().map(|s| !s.is_empty()).unwrap_or(true) {
            env::set_current_dir(parent_dir)
                .with_context(|| format!("Failed to set working directory to `{parent_dir:?}`"))?;
        }
    }

    std::fs::create_dir_all(&run.output_directory).with_context(|| {
        format!(
            "Failed to create output directory `{:?}`",
            run.output_directory
        )
    })?;

    logging::initialize_logging(&run.output_directory, writer)?;

    let mut spinner = Spinner::new("Reading input files");
    let inputs = read_inputs(&run.input_files, &run.parameters);
    spinner.finish();
    let mut inputs = inputs?;

    let parameters = &run.parameters;
    let seed = parameters.random_seed.unwrap_or_else(rand::random);
    info!("Evaluating {} travel requests (seed: {seed})", inputs.requests.len());
    let results = {
        let orchestrator = PathTypeOrchestrator::new(
            parameters,
            &inputs.skims,
            &inputs.parcels,
            &inputs.facilities,
            inputs.shadow_prices.view(parameters),
        );
        orchestrator.evaluate_all(&inputs.requests, seed)?
    };
    log_summary(&results);
    write_json(&results, &run.output_directory, "results")?;

    if parameters.shadow_pricing.enabled && !parameters.is_in_estimation_mode {
        update_shadow_prices(&mut inputs.shadow_prices, &inputs.requests, &results);
        inputs
            .shadow_prices
            .equilibrate(inputs.facilities.capacities(), &parameters.shadow_pricing);
        inputs.shadow_prices.to_path(
            &run.output_directory.join(SHADOW_PRICE_FILENAME),
            parameters.shadow_pricing.delimiter,
        )?;
        info!("Shadow prices of {} nodes updated", inputs.shadow_prices.len());
    }
    Ok(())
}

/// Replaces the park-and-ride loads with the stays of the chosen park-and-ride paths.
///
/// A car stays at the node from the outbound departure to the return departure. One-way trips do
/// not load the nodes.
fn update_shadow_prices(
    prices: &mut ShadowPrices,
    requests: &[TravelRequest],
    results: &[RequestResult],
) {
    prices.clear_loads();
    for (request, result) in requests.iter().zip(results) {
        let EvaluationResult::Available(chosen) = &result.result else {
            continue;
        };
        if let (Some(node), Some(return_time)) =
            (chosen.path.park_and_ride_node, request.return_time())
        {
            prices.record_stay(node, request.outbound_time, return_time, 1.0);
        }
    }
}

fn log_summary(results: &[RequestResult]) {
    let mut available = 0;
    let mut unavailable = 0;
    let mut unsupported = 0;
    for result in results {
        match &result.result {
            EvaluationResult::Available(_) => available += 1,
            EvaluationResult::Unavailable => unavailable += 1,
            EvaluationResult::Unsupported(_) => unsupported += 1,
        }
    }
    info!(
        "Results: {available} available, {unavailable} unavailable, {unsupported} unsupported"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::{Mode, PathType, Purpose};
    use crate::path::{ChosenPath, PathTypeCandidate};
    use crate::request::Endpoint;

    fn request(id: u64, return_time: Option<i32>) -> TravelRequest {
        TravelRequest {
            id,
            mode: Mode::CarParkRideWalk,
            origin: Endpoint::Zone(1),
            destination: Endpoint::Zone(2),
            outbound_time: 100,
            return_time,
            purpose: Purpose::Work,
            cost_coefficient: -0.1,
            time_coefficient: -0.02,
            age: 40,
            household_vehicles: 1,
            vehicles_are_autonomous: false,
            transit_pass_tier: 0,
            transit_discount_fraction: 0.0,
            random_choice: false,
        }
    }

    fn chosen(node: Option<u32>) -> EvaluationResult {
        let mut path = PathTypeCandidate::new(30.0, 10.0, 2.0, -1.0);
        path.park_and_ride_node = node;
        EvaluationResult::Available(ChosenPath {
            path_type: PathType::LocalBus,
            logsum: 50.0,
            generalized_time_chosen: 50.0,
            transit_generalized_time: 40.0,
            available_path_types: 1,
            path,
        })
    }

    #[test]
    fn update_shadow_prices_test() {
        let requests = vec![request(1, Some(110)), request(2, None), request(3, Some(105))];
        let results = vec![
            RequestResult {
                request_id: 1,
                result: chosen(Some(7)),
            },
            RequestResult {
                request_id: 2,
                result: chosen(Some(7)),
            },
            RequestResult {
                request_id: 3,
                result: EvaluationResult::Unavailable,
            },
        ];
        let mut prices = ShadowPrices::new();
        prices.record_load(7, 500, 3.0);
        update_shadow_prices(&mut prices, &requests, &results);
        let loads = &prices.node(7).unwrap().park_and_ride_load;
        assert_eq!(loads[499], 0.0);
        assert_eq!(loads.iter().sum::<f64>(), 10.0);
        assert_eq!(loads[99], 1.0);
        assert_eq!(loads[108], 1.0);
        assert_eq!(loads[109], 0.0);
    }
}
