// Copyright 2022 Lucas Javaudin
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// https://creativecommons.org/licenses/by-nc-nd/4.0/legalcode

//! Shadow prices of the park-and-ride nodes.
//!
//! During the evaluation of travel requests, the prices are read through a [ShadowPriceView].
//! Loads are recorded and prices are updated afterwards, through a mutable reference to
//! [ShadowPrices].
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use hashbrown::HashMap;
use itertools::Itertools;
use log::debug;

use crate::facilities::NodeId;
use crate::parameters::{Parameters, ShadowPricingParameters};
use crate::time::{Minute, MINUTES_IN_A_DAY};

const N: usize = MINUTES_IN_A_DAY as usize;

/// Shadow-price data of one park-and-ride node, by minute of the day.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeShadowPrices {
    /// Change of the price at the last update.
    pub price_difference: Vec<f64>,
    pub price: Vec<f64>,
    /// Load of the node from travelers that are not simulated.
    pub exogenous_load: Vec<f64>,
    /// Load of the node from the simulated park-and-ride trips.
    pub park_and_ride_load: Vec<f64>,
}

impl Default for NodeShadowPrices {
    fn default() -> Self {
        NodeShadowPrices {
            price_difference: vec![0.0; N],
            price: vec![0.0; N],
            exogenous_load: vec![0.0; N],
            park_and_ride_load: vec![0.0; N],
        }
    }
}

/// Returns the index of a minute in the per-minute arrays.
fn minute_index(minute: Minute) -> usize {
    (minute.clamp(1, MINUTES_IN_A_DAY) - 1) as usize
}

/// Shadow prices of all the park-and-ride nodes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShadowPrices(HashMap<NodeId, NodeShadowPrices>);

impl ShadowPrices {
    pub fn new() -> Self {
        Default::default()
    }

    /// Returns the shadow-price data of a node.
    pub fn node(&self, id: NodeId) -> Option<&NodeShadowPrices> {
        self.0.get(&id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a read-only view of the prices, used during evaluation.
    pub fn view<'a>(&'a self, parameters: &Parameters) -> ShadowPriceView<'a> {
        ShadowPriceView {
            prices: (parameters.shadow_pricing.enabled && !parameters.is_in_estimation_mode)
                .then_some(self),
        }
    }

    /// Adds a park-and-ride load to a node at the given minute.
    pub fn record_load(&mut self, node: NodeId, minute: Minute, amount: f64) {
        self.0.entry(node).or_default().park_and_ride_load[minute_index(minute)] += amount;
    }

    /// Adds a park-and-ride load to a node for every minute in `[arrival, departure)`.
    pub fn record_stay(&mut self, node: NodeId, arrival: Minute, departure: Minute, amount: f64) {
        let loads = &mut self.0.entry(node).or_default().park_and_ride_load;
        for minute in arrival.max(1)..departure.min(MINUTES_IN_A_DAY + 1) {
            loads[minute_index(minute)] += amount;
        }
    }

    /// Sets the exogenous load of a node at the given minute.
    pub fn set_exogenous_load(&mut self, node: NodeId, minute: Minute, load: f64) {
        self.0.entry(node).or_default().exogenous_load[minute_index(minute)] = load;
    }

    /// Resets the park-and-ride loads of all nodes.
    pub fn clear_loads(&mut self) {
        for node in self.0.values_mut() {
            node.park_and_ride_load.iter_mut().for_each(|l| *l = 0.0);
        }
    }

    /// Updates the prices of the nodes from their loads and capacities.
    ///
    /// For each minute, the load is the maximum park-and-ride load over the time spread around
    /// the minute, plus the exogenous load. The new price moves towards the maximum penalty,
    /// weighted by the probability that a Poisson-distributed demand with the load as mean
    /// exceeds the capacity.
    pub fn equilibrate(
        &mut self,
        capacities: impl Iterator<Item = (NodeId, f64)>,
        parameters: &ShadowPricingParameters,
    ) {
        let step = parameters.step_size;
        let spread = parameters.time_spread.max(0) as usize;
        let mut n = 0;
        for (id, capacity) in capacities {
            let node = self.0.entry(id).or_default();
            for i in 0..N {
                let window = i.saturating_sub(spread)..(i + spread + 1).min(N);
                let max_load = node.park_and_ride_load[window]
                    .iter()
                    .copied()
                    .fold(0.0, f64::max);
                let load = node.exogenous_load[i] + max_load;
                let previous = node.price[i];
                let price = if capacity > 0.0 && load > 0.0 {
                    (1.0 - step) * previous
                        + step * parameters.maximum_penalty * poisson_tail(capacity, load)
                } else {
                    (1.0 - step) * previous
                };
                node.price_difference[i] = price - previous;
                node.price[i] = price;
            }
            n += 1;
        }
        debug!("Shadow prices updated for {n} park-and-ride nodes");
    }

    /// Reads shadow prices from a delimited text file.
    pub fn from_reader<R: Read>(reader: R, delimiter: char) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter_byte(delimiter)?)
            .has_headers(true)
            .from_reader(reader);
        let mut prices = HashMap::new();
        let mut record = csv::StringRecord::new();
        while reader.read_record(&mut record)? {
            let line = reader.position().line();
            let values: Vec<&str> = record.iter().filter(|s| !s.is_empty()).collect();
            if values.len() < 1 + 4 * N {
                bail!(
                    "Expected {} values at line {line}, found {}",
                    1 + 4 * N,
                    values.len()
                );
            }
            let id: NodeId = values[0]
                .trim()
                .parse()
                .with_context(|| format!("Invalid node id at line {line}: `{}`", values[0]))?;
            let parse = |k: usize| -> Result<Vec<f64>> {
                values[1 + k * N..1 + (k + 1) * N]
                    .iter()
                    .map(|v| {
                        v.trim()
                            .parse::<f64>()
                            .with_context(|| format!("Invalid value at line {line}: `{v}`"))
                    })
                    .collect()
            };
            let node = NodeShadowPrices {
                price_difference: parse(0)?,
                price: parse(1)?,
                exogenous_load: parse(2)?,
                park_and_ride_load: parse(3)?,
            };
            prices.insert(id, node);
        }
        Ok(ShadowPrices(prices))
    }

    /// Reads shadow prices from a file.
    pub fn from_path(path: &Path, delimiter: char) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Unable to open shadow-price file `{path:?}`"))?;
        Self::from_reader(file, delimiter)
            .with_context(|| format!("Unable to read shadow-price file `{path:?}`"))
    }

    /// Writes the shadow prices as a delimited text file, nodes sorted by id.
    pub fn to_writer<W: Write>(&self, writer: W, delimiter: char) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter_byte(delimiter)?)
            .from_writer(writer);
        let header = std::iter::once("NODEID".to_owned()).chain(
            ["DIFF", "PRICE", "EXLOAD", "PRLOAD"]
                .into_iter()
                .flat_map(|prefix| (0..N).map(move |i| format!("{prefix}{i:04}"))),
        );
        writer.write_record(header)?;
        for (id, node) in self.0.iter().sorted_by_key(|(id, _)| **id) {
            let values = [
                &node.price_difference,
                &node.price,
                &node.exogenous_load,
                &node.park_and_ride_load,
            ]
            .into_iter()
            .flatten()
            .map(|v| format!("{v:.6}"));
            writer.write_record(std::iter::once(id.to_string()).chain(values))?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Writes the shadow prices to a file.
    pub fn to_path(&self, path: &Path, delimiter: char) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Unable to create shadow-price file `{path:?}`"))?;
        self.to_writer(file, delimiter)
            .with_context(|| format!("Unable to write shadow-price file `{path:?}`"))
    }
}

fn delimiter_byte(delimiter: char) -> Result<u8> {
    u8::try_from(delimiter).map_err(|_| anyhow!("Invalid delimiter: `{delimiter}`"))
}

/// Returns `P[X > k]` for `X` following a Poisson distribution with mean `mean`, where `k` is the
/// integer part of `capacity`.
fn poisson_tail(capacity: f64, mean: f64) -> f64 {
    let k = capacity.floor() as u64;
    let ln_mean = mean.ln();
    let mut ln_term = -mean;
    let mut cdf = ln_term.exp();
    for j in 1..=k {
        ln_term += ln_mean - (j as f64).ln();
        cdf += ln_term.exp();
    }
    (1.0 - cdf).clamp(0.0, 1.0)
}

/// Read-only access to the shadow prices.
///
/// All the prices are zero when shadow pricing is disabled or in estimation mode.
#[derive(Clone, Copy, Debug, Default)]
pub struct ShadowPriceView<'a> {
    prices: Option<&'a ShadowPrices>,
}

impl<'a> ShadowPriceView<'a> {
    /// Returns a view where every price is zero.
    pub fn disabled() -> Self {
        Default::default()
    }

    /// Returns the shadow price of a node at the given minute.
    pub fn price(&self, node: NodeId, minute: Minute) -> f64 {
        self.prices
            .and_then(|p| p.node(node))
            .map(|n| n.price[minute_index(minute)])
            .unwrap_or(0.0)
    }
}
