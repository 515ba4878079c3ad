//! Learn command - normalize a Hubble export into a flow collection

use std::collections::BTreeSet;
use std::path::PathBuf;

use clap::Args;
use netsynth_common::FlowRecord;
use tracing::info;

use crate::config::NetsynthConfig;
use crate::Result;

#[derive(Args, Debug)]
pub struct LearnArgs {
    /// Hubble export to read, batched JSON or NDJSON (default: configured flows file)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Where to write the normalized collection (default: configured flows file)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Counts reported after a learn run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LearnSummary {
    pub flows: usize,
    pub addressable: usize,
    pub destinations: usize,
}

impl LearnSummary {
    pub fn from_records(records: &[FlowRecord]) -> Self {
        let addressable: Vec<&FlowRecord> = records
            .iter()
            .filter(|r| r.destination.is_addressable())
            .collect();
        let destinations: BTreeSet<(String, String)> = addressable
            .iter()
            .map(|r| {
                (
                    r.destination.namespace.clone(),
                    r.destination.labels.canonical(),
                )
            })
            .collect();

        Self {
            flows: records.len(),
            addressable: addressable.len(),
            destinations: destinations.len(),
        }
    }
}

pub fn run(args: LearnArgs, config: &NetsynthConfig) -> Result<()> {
    let input = args.input.unwrap_or_else(|| config.flows_file());
    let output = args.output.unwrap_or_else(|| config.flows_file());

    println!("Reading flows from {}...", input.display());
    let records = netsynth_hubble::read_flow_records(&input)?;
    let summary = LearnSummary::from_records(&records);

    netsynth_hubble::write_flow_records(&records, &output)?;
    info!(
        flows = summary.flows,
        addressable = summary.addressable,
        destinations = summary.destinations,
        "learned flows"
    );

    println!(
        "Loaded {} flows ({} with an addressable destination, {} distinct destinations)",
        summary.flows, summary.addressable, summary.destinations
    );
    println!("Flows saved to {}", output.display());
    Ok(())
}
