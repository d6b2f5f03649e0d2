// Copyright 2022 Lucas Javaudin
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// https://creativecommons.org/licenses/by-nc-nd/4.0/legalcode

//! Imports / exports through JSON files.
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Reads some deserializable data from a JSON file.
pub fn read_json<D: DeserializeOwned>(filename: &Path) -> Result<D> {
    let file =
        File::open(filename).with_context(|| format!("Unable to open file `{filename:?}`"))?;
    let data = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Unable to parse file `{filename:?}`"))?;
    Ok(data)
}

/// Writes some serializable data as a JSON file.
///
/// The file is stored in the given directory, with filename "{name}.json".
pub fn write_json<D: Serialize>(data: D, output_dir: &Path, name: &str) -> Result<()> {
    let filename = output_dir.join(format!("{name}.json"));
    let file = File::create(&filename)
        .with_context(|| format!("Unable to create file `{filename:?}`"))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, &data)
        .with_context(|| format!("Unable to write file `{filename:?}`"))?;
    writer.flush()?;
    Ok(())
}
