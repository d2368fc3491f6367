use crate::error::{ApkwatchError, Result};
use crate::playstore::PlayStoreClient;
use crate::resolver::{self, CheckOutcome, UpdateStatus};
use crate::store::{AddOutcome, RemoveOutcome, TrackerStore};
use colored::Colorize;
use jiff::Zoned;
use jiff::civil::Date;
use std::path::PathBuf;

/// Display format for calendar dates, matching what the listing shows.
const DATE_DISPLAY: &str = "%b %d, %Y";

/// Resolve the state directory: an explicit override wins, otherwise the
/// per-user data dir. Business logic never reads ambient paths itself.
pub fn resolve_data_dir(override_dir: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = override_dir {
        return Ok(dir);
    }
    dirs::data_dir()
        .map(|d| d.join("apkwatch"))
        .ok_or_else(|| {
            ApkwatchError::Config(
                "no per-user data directory available; pass --data-dir".to_string(),
            )
        })
}

/// Start tracking a package. Exit is clean whether the id was new or already
/// tracked; the printed line is the only distinction.
pub fn execute_add(data_dir: PathBuf, package_id: &str) -> Result<()> {
    let mut store = TrackerStore::load(&data_dir)?;
    let today = Zoned::now().date();

    match store.add(package_id, today) {
        AddOutcome::Added => {
            store.save()?;
            println!(
                "{}",
                format!("✓ Now tracking '{}'", package_id).green()
            );
            println!(
                "   Tracking since: {}",
                today.strftime(DATE_DISPLAY).to_string().bright_cyan()
            );
        }
        AddOutcome::AlreadyTracked => {
            println!(
                "{}",
                format!("Package '{}' is already tracked", package_id).yellow()
            );
        }
    }

    Ok(())
}

/// Stop tracking a package. A missing id is informational, not an error.
pub fn execute_delete(data_dir: PathBuf, package_id: &str) -> Result<()> {
    let mut store = TrackerStore::load(&data_dir)?;

    match store.remove(package_id) {
        RemoveOutcome::Removed => {
            store.save()?;
            println!(
                "{}",
                format!("✓ Stopped tracking '{}'", package_id).green()
            );
        }
        RemoveOutcome::NotFound => {
            println!(
                "{}",
                format!("Package '{}' is not tracked", package_id).yellow()
            );
        }
    }

    Ok(())
}

/// Print the tracked packages and their stored state. No network activity.
pub fn execute_list(data_dir: PathBuf) -> Result<()> {
    let store = TrackerStore::load(&data_dir)?;

    if store.is_empty() {
        println!("{}", "No packages tracked yet".yellow());
        println!("{}", "Add one with: apkwatch -p <package-id>".dimmed());
        return Ok(());
    }

    println!("{}", "📦 Tracked packages:".cyan().bold());
    for pkg in store.packages() {
        let seen = match pkg.last_update_seen {
            Some(d) => d.strftime(DATE_DISPLAY).to_string(),
            None => "never resolved".to_string(),
        };
        let checked = match &pkg.last_checked {
            Some(z) => z.strftime("%Y-%m-%d %H:%M").to_string(),
            None => "never".to_string(),
        };
        println!(
            "  • {} updated {} (since {}, last check {})",
            pkg.package_id.white().bold(),
            seen.bright_cyan(),
            pkg.added_on.strftime(DATE_DISPLAY),
            checked.dimmed()
        );
    }

    println!("\n{}", "Summary:".cyan().bold());
    println!("  {} packages", store.len().to_string().yellow());

    Ok(())
}

/// Check every tracked package against its Play Store listing and persist
/// whatever was learned. Per-package fetch/parse failures are printed and
/// counted but never fail the run; only store load/save errors do.
pub fn execute_check(data_dir: PathBuf) -> Result<()> {
    println!(
        "{}",
        "Checking tracked packages for updates...".cyan().bold()
    );

    let mut store = TrackerStore::load(&data_dir)?;

    if store.is_empty() {
        println!("\n{}", "No packages tracked yet".yellow());
        println!("{}", "Add one with: apkwatch -p <package-id>".dimmed());
        return Ok(());
    }

    println!(
        "\n{}",
        format!("Resolving {} package(s)...", store.len()).yellow()
    );

    let client = PlayStoreClient::new()?;
    let now = Zoned::now();
    let outcomes = resolver::run_checks(&mut store, &client, &now);

    // Everything learned this run is persisted before reporting, so an
    // interrupted terminal still leaves the state current.
    store.save()?;

    println!();
    let mut updated = 0usize;
    let mut failed = 0usize;
    for outcome in &outcomes {
        print_outcome(outcome);
        match outcome {
            CheckOutcome::Resolved { resolution, .. }
                if matches!(resolution.status, UpdateStatus::Updated { .. }) =>
            {
                updated += 1;
            }
            CheckOutcome::Failed { .. } => failed += 1,
            _ => {}
        }
    }

    println!("\n{}", "Summary:".cyan().bold());
    println!(
        "  {} checked, {} with new updates, {} failed",
        outcomes.len().to_string().yellow(),
        updated.to_string().green(),
        failed.to_string().red()
    );

    Ok(())
}

fn display_date(date: Date) -> String {
    date.strftime(DATE_DISPLAY).to_string()
}

fn print_outcome(outcome: &CheckOutcome) {
    match outcome {
        CheckOutcome::Resolved {
            package_id,
            resolution,
        } => match &resolution.status {
            UpdateStatus::FirstObservation => {
                println!(
                    "  • {} first observation, updated on {}",
                    package_id.white().bold(),
                    display_date(resolution.observed).bright_cyan()
                );
            }
            UpdateStatus::Unchanged => {
                println!(
                    "  • {} up to date {}",
                    package_id.white().bold(),
                    format!("(updated on {})", display_date(resolution.observed)).dimmed()
                );
            }
            UpdateStatus::Updated { previous } => {
                println!(
                    "  • {} {} {} → {}",
                    package_id.white().bold(),
                    "NEW!".green().bold(),
                    display_date(*previous).red(),
                    display_date(resolution.observed).green().bold()
                );
            }
        },
        CheckOutcome::Failed { package_id, error } => {
            println!(
                "  • {} {} {}",
                package_id.white().bold(),
                "check failed:".red(),
                error.to_string().red()
            );
        }
    }
}
