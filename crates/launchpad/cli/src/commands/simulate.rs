//! `launchpad simulate`
//!
//! Walks one project from draft to live campaign using the in-memory
//! backend and wallet, printing each phase as it goes.

use std::sync::Arc;

use anyhow::{bail, Result};
use chrono::{Days, Utc};
use clap::Args;
use launchpad_gate::MockWallet;
use launchpad_lifecycle::{
    ActionOutcome, BackendError, LifecycleError, MockProjectBackend, ProjectLifecycle,
};
use launchpad_types::{MilestonePatch, Phase, ProjectDraft};

use crate::config::LaunchpadConfig;
use crate::output::{phase_header, print_info, print_milestones, print_success, print_warning};

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Start without a connected wallet so actions wait for the connect prompt
    #[arg(long)]
    pub disconnected: bool,

    /// Make the first submission fail at the backend, then retry
    #[arg(long)]
    pub fail_submit: bool,
}

const MILESTONE_PLAN: [(&str, &str); 6] = [
    ("Site survey", "Survey roofs and sign host agreements"),
    ("Permits", "File interconnection and building permits"),
    ("Procurement", "Order panels, inverters and racking"),
    ("Installation", "Mount arrays and wire inverters"),
    ("Commissioning", "Grid tie-in and utility inspection"),
    ("Handover", "Train the co-op and publish output data"),
];

pub async fn execute(args: SimulateArgs, config: &LaunchpadConfig) -> Result<()> {
    let sim = &config.simulation;
    let bounds = &config.lifecycle.allocation;

    let backend = Arc::new(MockProjectBackend::new());
    let wallet = Arc::new(if args.disconnected {
        MockWallet::disconnected()
    } else {
        MockWallet::connected()
    });
    if args.fail_submit {
        backend.fail_init(Some(BackendError::Unavailable));
    }

    let mut lifecycle =
        ProjectLifecycle::new(backend.clone(), wallet.clone(), config.lifecycle.clone())?;

    // ── Initialize ──────────────────────────────────────────────────
    phase_header(lifecycle.steps());

    lifecycle.set_draft(
        ProjectDraft::new("Community Solar Array", sim.goal)
            .with_tagline("Rooftop solar for the east side co-op")
            .with_description("Install 120 kW of shared rooftop solar across four buildings")
            .with_category("energy")
            .with_tag("solar")
            .with_tag("community"),
    )?;
    print_success(&format!("draft ready  goal={}", sim.goal));

    let target = sim
        .milestones
        .clamp(bounds.min_milestones, bounds.max_milestones);
    while lifecycle.milestones().len() < target {
        lifecycle.add_milestone()?;
    }

    let today = Utc::now().date_naive();
    let ids: Vec<_> = lifecycle.milestones().iter().map(|m| m.id).collect();
    for (i, id) in ids.into_iter().enumerate() {
        let (title, description) = MILESTONE_PLAN[i % MILESTONE_PLAN.len()];
        let due = today
            .checked_add_days(Days::new(45 * (i as u64 + 1)))
            .unwrap_or(today);
        lifecycle.update_milestone(
            id,
            &MilestonePatch::new()
                .title(title)
                .description(description)
                .delivery_date(due),
        )?;
    }
    print_success(&format!("{} milestones planned", lifecycle.milestones().len()));
    print_milestones(lifecycle.milestones());

    let mut attempts = 0;
    let project_id = loop {
        attempts += 1;
        let result = match lifecycle.submit_initialization().await {
            Ok(ActionOutcome::AwaitingWallet { .. }) => {
                print_info("wallet not connected, submission deferred");
                let released = lifecycle.connect_wallet().await;
                if released.is_ok() {
                    print_success("wallet connected, pending action released");
                }
                released
            }
            other => other.map(Some),
        };
        match result {
            Ok(Some(ActionOutcome::Submitted(id))) => break id,
            Ok(other) => bail!("unexpected submission outcome: {other:?}"),
            Err(LifecycleError::Backend(e)) if attempts == 1 => {
                print_warning(&format!("submission failed: {e}"));
                backend.fail_init(None);
                print_info("retrying submission");
            }
            Err(e) => return Err(e.into()),
        }
    };
    print_success(&format!("project submitted  id={project_id}"));

    // ── Validate ────────────────────────────────────────────────────
    phase_header(lifecycle.steps());

    for _ in 0..sim.votes {
        lifecycle.cast_vote().await?;
    }
    let details = lifecycle.campaign_details().await?;
    print_success(&format!("{} votes cast  status={:?}", details.votes, details.status));

    lifecycle.advance_to_launch()?;
    print_success("project approved");

    // ── Launch ──────────────────────────────────────────────────────
    phase_header(lifecycle.steps());

    let receipt = match lifecycle.launch_campaign().await? {
        ActionOutcome::Launched(receipt) => receipt,
        other => bail!("unexpected launch outcome: {other:?}"),
    };
    print_success(&format!(
        "campaign {} live at {}",
        receipt.campaign_id,
        receipt.launched_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    if lifecycle.phase() != Phase::Initialize || lifecycle.project_id().is_some() {
        bail!("workflow did not reset after launch");
    }
    print_info(&format!(
        "workflow reset  backend calls: init={} vote={} launch={}",
        backend.init_calls(),
        backend.vote_calls(),
        backend.launch_calls()
    ));
    println!();
    Ok(())
}
