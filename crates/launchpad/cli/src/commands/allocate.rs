//! `launchpad allocate`

use anyhow::Result;
use clap::Args;
use launchpad_allocation::AllocationEngine;
use serde::Serialize;
use tabled::{Table, Tabled};

use crate::config::LaunchpadConfig;

#[derive(Args, Debug)]
pub struct AllocateArgs {
    /// Number of milestones
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u32).range(1..=64))]
    pub count: u32,

    /// Funding goal; adds the amount per milestone
    #[arg(short, long)]
    pub goal: Option<u64>,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// One milestone's share of the goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tabled)]
#[serde(rename_all = "camelCase")]
pub struct AllocationRow {
    #[tabled(rename = "MILESTONE", display_with = "display_milestone")]
    pub milestone: usize,
    #[tabled(rename = "SHARE", display_with = "display_percentage")]
    pub percentage: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[tabled(rename = "AMOUNT", display_with = "display_amount")]
    pub amount: Option<u64>,
}

fn display_milestone(milestone: &usize) -> String {
    format!("#{milestone}")
}

fn display_percentage(percentage: &u8) -> String {
    format!("{percentage}%")
}

fn display_amount(amount: &Option<u64>) -> String {
    amount.map(|a| a.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Shares for `count` milestones, with amounts when a goal is given.
pub fn allocation_rows(engine: &AllocationEngine, count: usize, goal: Option<u64>) -> Vec<AllocationRow> {
    engine
        .percentages(count)
        .into_iter()
        .enumerate()
        .map(|(i, percentage)| AllocationRow {
            milestone: i + 1,
            percentage,
            amount: goal.map(|g| (u128::from(g) * u128::from(percentage) / 100) as u64),
        })
        .collect()
}

pub fn execute(args: AllocateArgs, config: &LaunchpadConfig) -> Result<()> {
    let allocation = &config.lifecycle.allocation;
    let count = args.count as usize;
    if count < allocation.min_milestones || count > allocation.max_milestones {
        tracing::warn!(
            count,
            min = allocation.min_milestones,
            max = allocation.max_milestones,
            "milestone count outside the submittable range"
        );
    }

    let engine = AllocationEngine::new(allocation.clone());
    let rows = allocation_rows(&engine, count, args.goal);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("{}", Table::new(rows));
    Ok(())
}
