//! Propose command - synthesize policies from a flow collection

use std::path::PathBuf;

use clap::Args;
use netsynth_common::validate_namespace;
use netsynth_synth::{write_policies, PolicySynthesizer, Synthesis};
use tracing::warn;

use crate::config::NetsynthConfig;
use crate::{Error, Result};

#[derive(Args, Debug)]
pub struct ProposeArgs {
    /// Flow collection to learn from (default: configured flows file)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Where to write policy YAML (default: configured policy file)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Only synthesize policies for destinations in this namespace
    #[arg(short, long)]
    pub namespace: Option<String>,
}

pub fn run(args: ProposeArgs, config: &NetsynthConfig) -> Result<()> {
    let input = args.input.unwrap_or_else(|| config.flows_file());
    let output = args.output.unwrap_or_else(|| config.policy_file());
    let namespace = args
        .namespace
        .or_else(|| config.namespace().map(str::to_string))
        .filter(|ns| !ns.is_empty());
    if let Some(ns) = &namespace {
        validate_namespace(ns)?;
    }

    let records = netsynth_hubble::read_flow_records(&input)?;
    let synthesis = synthesize(&records, namespace.as_deref())?;

    if synthesis.is_empty() {
        warn!(
            flows = synthesis.stats.flows,
            skipped = synthesis.stats.flows_without_destination,
            "no synthesizable flows"
        );
        return Err(Error::command_failed(format!(
            "no policies could be synthesized from {} flows in {}",
            synthesis.stats.flows,
            input.display()
        )));
    }

    write_policies(&synthesis.policies, &output)?;

    println!(
        "Synthesized {} policies from {} flows",
        synthesis.stats.policies, synthesis.stats.flows
    );
    for policy in &synthesis.policies {
        println!(
            "  {}/{} ({} rules)",
            policy.namespace,
            policy.name,
            policy.rules.len()
        );
    }
    println!("Policies saved to {}", output.display());
    Ok(())
}

fn synthesize(
    records: &[netsynth_common::FlowRecord],
    namespace: Option<&str>,
) -> Result<Synthesis> {
    let synthesizer = match namespace {
        Some(ns) => PolicySynthesizer::new().with_namespace(ns),
        None => PolicySynthesizer::new(),
    };
    Ok(synthesizer.synthesize(records)?)
}
