// Copyright 2022 Lucas Javaudin
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// https://creativecommons.org/licenses/by-nc-nd/4.0/legalcode

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, LevelFilter};
use pathtype_core::facilities::FacilitiesData;
use pathtype_core::impedance::SkimTableData;
use pathtype_core::io::RunParameters;
use pathtype_core::location::Parcel;
use pathtype_core::path::RequestResult;
use pathtype_core::request::TravelRequest;
use schemars::gen::{SchemaGenerator, SchemaSettings};
use schemars::JsonSchema;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

/// Generate the JSON Schemas for the input and output files of the path-type evaluation
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// The directory where the JSON Schemas should be stored
    path: PathBuf,
}

fn write_schema<T: JsonSchema>(gen: &SchemaGenerator, dir: &Path, name: &str) -> Result<()> {
    let schema = gen.clone().into_root_schema_for::<T>();
    let filename = dir.join(format!("schema-{name}.json"));
    let mut file = File::create(&filename)
        .with_context(|| format!("Unable to create file `{filename:?}`"))?;
    write!(file, "{}", serde_json::to_string_pretty(&schema)?)?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .context("Failed to initialize logging")?;

    info!("Generating JSON Schemas");
    let settings = SchemaSettings::draft07().with(|s| {
        s.option_nullable = true;
        s.option_add_null_type = false;
    });
    let gen = settings.into_generator();

    write_schema::<RunParameters>(&gen, &args.path, "run-parameters")?;
    write_schema::<SkimTableData>(&gen, &args.path, "skims")?;
    write_schema::<Vec<Parcel>>(&gen, &args.path, "parcels")?;
    write_schema::<FacilitiesData>(&gen, &args.path, "facilities")?;
    write_schema::<Vec<TravelRequest>>(&gen, &args.path, "requests")?;
    write_schema::<Vec<RequestResult>>(&gen, &args.path, "results")?;

    info!("Done");
    Ok(())
}
