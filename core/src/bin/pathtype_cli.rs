// Copyright 2022 Lucas Javaudin
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// https://creativecommons.org/licenses/by-nc-nd/4.0/legalcode

//! Binary to evaluate the path types of a batch of travel requests.
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

/// Evaluates the path types of travel requests and chooses one path type for each request.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Path to the JSON file with the run parameters
    #[arg(required = true)]
    parameters: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();
    pathtype_core::run_evaluation(&args.parameters)
}
