// Copyright 2022 Lucas Javaudin
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// https://creativecommons.org/licenses/by-nc-nd/4.0/legalcode

//! Everything related to logging.
use std::fs::File;
use std::path::Path;
use std::sync::{LazyLock, Mutex};

use anyhow::{Context, Result};
use hashbrown::HashMap;
use log::{warn, LevelFilter};
use simplelog::{
    ColorChoice, CombinedLogger, Config, SharedLogger, TermLogger, TerminalMode, WriteLogger,
};

static SENT_WARNINGS: LazyLock<Mutex<HashMap<WarningType, usize>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// Number of times a warning about a facility with invalid data is sent.
pub(crate) const MAX_FACILITY_WARNINGS: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// Enum representing the various type of warning messages that can be sent.
pub(crate) enum WarningType {
    /// A proximity index references a park-and-ride node that does not exist.
    UnknownParkAndRideNode,
    /// A proximity index or a node references a stop area that does not exist.
    UnknownStopArea,
    /// A node or a stop area is located on a parcel that does not exist.
    UnknownFacilityParcel,
}

/// Sends a warning message if it was sent less than `n` times before.
pub(crate) fn send_warning_at_most_n_times(warn_type: WarningType, message: &str, n: usize) {
    let mut sent_warnings = SENT_WARNINGS
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let count = sent_warnings.entry(warn_type).or_insert(0);
    if *count < n {
        warn!("{}", message);
        *count += 1;
    }
}

/// Sends a warning message if it was never sent before.
pub(crate) fn send_warning_at_most_once(warn_type: WarningType, message: &str) {
    send_warning_at_most_n_times(warn_type, message, 1)
}

/// Initializes logging to a file and terminal.
pub fn initialize_logging<W: std::io::Write + Send + 'static>(
    output: &Path,
    maybe_writer: Option<W>,
) -> Result<()> {
    let log_filename = output.join("log.txt");
    let log_file = File::create(&log_filename)
        .with_context(|| format!("Failed to create log file `{log_filename:?}`"))?;
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![
        TermLogger::new(
            LevelFilter::Info,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Debug, Config::default(), log_file),
    ];
    if let Some(writer) = maybe_writer {
        loggers.push(WriteLogger::new(
            LevelFilter::Info,
            Config::default(),
            writer,
        ));
    }
    CombinedLogger::init(loggers).context("Failed to initialize logging")
}
