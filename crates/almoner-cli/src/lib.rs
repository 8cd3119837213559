//! Command line front end for donation admin actions.
//!
//! Donations live in a JSON file (`--data`), settings in an optional YAML file
//! (`--config`). Commands that change donations write the file back.
//!
//! ```text
//! almoner --data donations.json actions 10
//! almoner --data donations.json run resend_donation_receipt 10
//! almoner --data donations.json bulk set-paid 10 11 12
//! almoner --data donations.json --output json statuses
//! ```

use std::path::{Path, PathBuf};
use std::rc::Rc;

use almoner::{
    shared, BulkOutcome, Donation, DonationAdmin, EmailKind, Mailer, MemoryStore, Settings,
};
use almoner_dispatch::{serialize_structured, ActionContext, DispatchOutcome, OutputMode, TargetId};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

#[derive(Debug, Parser)]
#[command(name = "almoner", version, about = "Run admin actions on donations")]
pub struct Cli {
    /// Donations JSON file
    #[arg(long, global = true, value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// Settings YAML file
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, short, global = true, value_enum, default_value = "text")]
    pub output: OutputMode,

    /// More logging (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the actions available for a donation
    Actions {
        id: TargetId,
        /// Context argument passed to availability checks
        #[arg(long = "arg", value_name = "KEY=VALUE")]
        args: Vec<String>,
    },
    /// Run one action against a donation
    Run {
        action: String,
        id: TargetId,
        /// Context argument passed to the action
        #[arg(long = "arg", value_name = "KEY=VALUE")]
        args: Vec<String>,
    },
    /// List the bulk status actions
    BulkActions,
    /// Apply a bulk status action (`set-{status}`) to donations
    Bulk {
        token: String,
        #[arg(required = true)]
        ids: Vec<TargetId>,
    },
    /// Show donation counts per status
    Statuses,
}

/// Mailer that records sends in the log instead of delivering anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailer;

impl Mailer for LogMailer {
    fn send(&self, kind: EmailKind, donation: &Donation) -> bool {
        tracing::info!(email = %kind, donation = donation.id, "email sent");
        true
    }
}

#[derive(Serialize)]
struct ActionsListing<T> {
    donation: TargetId,
    groups: T,
}

/// Runs a parsed command line and returns what to print.
pub fn run(cli: &Cli) -> Result<String> {
    let settings = match &cli.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };

    let store = match &cli.data {
        Some(path) => MemoryStore::open(path)
            .with_context(|| format!("failed to open donations file {}", path.display()))?,
        None => MemoryStore::new(),
    };
    let admin = DonationAdmin::new(shared(store), Rc::new(LogMailer), &settings);

    match &cli.command {
        Command::Actions { id, args } => {
            require_data(cli)?;
            let ctx = context(args)?;
            let groups = admin.available_groups(*id, &ctx);

            if cli.output.is_structured() {
                let listing = ActionsListing {
                    donation: *id,
                    groups: &groups,
                };
                return Ok(serialize_structured("actions", &listing, cli.output)?);
            }
            if groups.is_empty() {
                return Ok(format!("No actions available for donation {id}."));
            }

            let mut lines = Vec::new();
            for group in &groups {
                lines.push(format!("{}:", display_group(&group.name)));
                for action in &group.actions {
                    lines.push(format!("  {:<40} {}", action.key, action.label));
                }
            }
            Ok(lines.join("\n"))
        }

        Command::Run { action, id, args } => {
            let path = require_data(cli)?;
            let ctx = context(args)?;
            let report = admin.process_action_token(action, *id, &ctx)?;

            if report.outcome.is_executed() {
                save(&admin, path)?;
            }

            if cli.output.is_structured() {
                return Ok(serialize_structured("report", &report, cli.output)?);
            }
            Ok(match (&report.outcome, &report.notice) {
                (DispatchOutcome::Unavailable, _) => format!(
                    "Action \"{}\" is not available for donation {id}.",
                    report.action
                ),
                (_, Some(notice)) => notice.clone(),
                (DispatchOutcome::Executed { success: true, .. }, None) => {
                    format!("Action \"{}\" done.", report.action)
                }
                (DispatchOutcome::Executed { success: false, .. }, None) => {
                    format!("Action \"{}\" failed.", report.action)
                }
            })
        }

        Command::BulkActions => {
            let actions = admin.bulk_actions();
            if cli.output.is_structured() {
                return Ok(serialize_structured("bulk_actions", &actions, cli.output)?);
            }
            Ok(actions
                .iter()
                .map(|a| format!("{:<20} {}", a.token, a.label))
                .collect::<Vec<_>>()
                .join("\n"))
        }

        Command::Bulk { token, ids } => {
            let path = require_data(cli)?;
            let report = admin.apply_bulk_status(token, ids);

            if matches!(report.outcome, BulkOutcome::Applied { .. }) {
                save(&admin, path)?;
            }

            if cli.output.is_structured() {
                return Ok(serialize_structured("bulk", &report, cli.output)?);
            }
            Ok(match (&report.outcome, &report.notice) {
                (BulkOutcome::NotAStatusAction, _) => {
                    format!("\"{token}\" is not a status action; nothing changed.")
                }
                (BulkOutcome::InvalidStatus { status }, _) => {
                    format!("\"{status}\" is not a valid donation status; nothing changed.")
                }
                (BulkOutcome::Applied { .. }, Some(notice)) => notice.clone(),
                (BulkOutcome::Applied { count, .. }, None) => count.to_string(),
            })
        }

        Command::Statuses => {
            require_data(cli)?;
            let views = admin.status_views()?;
            if cli.output.is_structured() {
                return Ok(serialize_structured("statuses", &views, cli.output)?);
            }
            Ok(views
                .iter()
                .map(|v| format!("{} ({})", v.label, v.count))
                .collect::<Vec<_>>()
                .join("\n"))
        }
    }
}

fn require_data(cli: &Cli) -> Result<&Path> {
    cli.data
        .as_deref()
        .context("this command needs a donations file: pass --data <FILE>")
}

fn context(args: &[String]) -> Result<ActionContext> {
    ActionContext::from_pairs(args).map_err(anyhow::Error::msg)
}

fn save(admin: &DonationAdmin<MemoryStore>, path: &Path) -> Result<()> {
    admin
        .store()
        .borrow()
        .save(path)
        .with_context(|| format!("failed to write donations file {}", path.display()))
}

fn display_group(name: &str) -> &str {
    if name.is_empty() {
        "(ungrouped)"
    } else {
        name
    }
}
