// Copyright 2022 Lucas Javaudin
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// https://creativecommons.org/licenses/by-nc-nd/4.0/legalcode

//! Progress bar of the batch evaluation and spinner of the input loading.
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use log::{log_enabled, Level};

/// The progress bar is refreshed every `UPDATE` evaluated requests.
const UPDATE: u64 = 1000;
/// Interval at which spinners are ticked.
const TICK_INTERVAL: Duration = Duration::from_millis(500);

fn style(template: &str, spinner: bool) -> ProgressStyle {
    let default = if spinner {
        ProgressStyle::default_spinner()
    } else {
        ProgressStyle::default_bar()
    };
    default.clone().template(template).unwrap_or(default)
}

/// Progress bar shared by the workers evaluating a batch of requests.
///
/// The bar is hidden when `Info` logging is disabled.
#[derive(Debug, Clone)]
pub struct EvaluationProgressBar {
    bp: ProgressBar,
    evaluated: Arc<AtomicU64>,
}

impl EvaluationProgressBar {
    pub fn new(n_requests: usize, msg: &'static str) -> Self {
        let bp = if log_enabled!(Level::Info) {
            ProgressBar::new(n_requests as u64).with_message(msg)
        } else {
            ProgressBar::hidden()
        };
        bp.set_style(style("{bar:40} {pos}/{len} {msg} ({eta})", false));
        EvaluationProgressBar {
            bp,
            evaluated: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Counts one more evaluated request.
    pub fn inc(&self) {
        let evaluated = self.evaluated.fetch_add(1, Ordering::Relaxed) + 1;
        if evaluated % UPDATE == 0 {
            self.bp.inc(UPDATE);
        }
    }

    /// Returns the number of requests counted so far.
    pub fn evaluated(&self) -> u64 {
        self.evaluated.load(Ordering::Relaxed)
    }

    pub fn finish(&self) {
        self.bp.finish_and_clear();
    }
}

/// Spinner displayed while a step without known length is running.
#[derive(Debug)]
pub struct Spinner(ProgressBar);

impl Spinner {
    pub fn new(msg: &str) -> Self {
        let bp = if log_enabled!(Level::Info) {
            ProgressBar::new_spinner().with_message(msg.to_owned())
        } else {
            ProgressBar::hidden()
        };
        bp.set_style(style("{spinner} {msg}", true));
        bp.enable_steady_tick(TICK_INTERVAL);
        Spinner(bp)
    }

    pub fn finish(&mut self) {
        self.0.finish_and_clear();
    }
}
