use crate::error::{ApkwatchError, Result};
use crate::playstore::{ListingClient, extract_last_updated};
use crate::store::TrackerStore;
use indicatif::{ProgressBar, ProgressStyle};
use jiff::Zoned;
use jiff::civil::Date;

/// How an extracted date relates to what the store already knew.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateStatus {
    /// No prior "Updated on" value was stored for this package.
    FirstObservation,
    /// The listing still shows the date we last recorded.
    Unchanged,
    /// The listing shows a different date than the one recorded.
    Updated { previous: Date },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub observed: Date,
    pub status: UpdateStatus,
}

/// Terminal state of one package in one check run.
#[derive(Debug)]
pub enum CheckOutcome {
    Resolved {
        package_id: String,
        resolution: Resolution,
    },
    Failed {
        package_id: String,
        error: ApkwatchError,
    },
}

/// Resolves a package's public listing into an update classification.
pub struct UpdateResolver<'a> {
    client: &'a dyn ListingClient,
}

impl<'a> UpdateResolver<'a> {
    pub fn new(client: &'a dyn ListingClient) -> Self {
        Self { client }
    }

    /// Fetch the listing page, extract the "Updated on" date, and classify
    /// it against the previously stored value. Performs no retries; a
    /// transient failure surfaces once and the caller decides what to do.
    pub fn resolve(
        &self,
        package_id: &str,
        last_update_seen: Option<Date>,
    ) -> Result<Resolution> {
        let body = self.client.fetch_listing(package_id)?;
        let observed = extract_last_updated(package_id, &body)?;

        let status = match last_update_seen {
            None => UpdateStatus::FirstObservation,
            Some(previous) if previous == observed => UpdateStatus::Unchanged,
            Some(previous) => UpdateStatus::Updated { previous },
        };

        Ok(Resolution { observed, status })
    }
}

/// Run one check pass over every tracked package, in store order, merging
/// results back into the store. Fetch and parse failures are recorded as
/// outcomes and never stop the rest of the batch. `last_checked` is stamped
/// on every attempt, successful or not; `last_update_seen` only moves when a
/// new date was actually observed.
pub fn run_checks(
    store: &mut TrackerStore,
    client: &dyn ListingClient,
    now: &Zoned,
) -> Vec<CheckOutcome> {
    let resolver = UpdateResolver::new(client);
    let ids: Vec<String> = store
        .packages()
        .iter()
        .map(|p| p.package_id.clone())
        .collect();

    let pb = ProgressBar::new(ids.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  [{bar:40}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=>-"),
    );

    let mut outcomes = Vec::with_capacity(ids.len());
    for package_id in ids {
        pb.set_message(format!("Checking {}", package_id));

        let previous = store
            .get_mut(&package_id)
            .and_then(|p| p.last_update_seen);

        let outcome = match resolver.resolve(&package_id, previous) {
            Ok(resolution) => {
                if let Some(pkg) = store.get_mut(&package_id) {
                    pkg.last_checked = Some(now.clone());
                    if resolution.status != UpdateStatus::Unchanged {
                        pkg.last_update_seen = Some(resolution.observed);
                    }
                }
                CheckOutcome::Resolved {
                    package_id,
                    resolution,
                }
            }
            Err(error) => {
                if let Some(pkg) = store.get_mut(&package_id) {
                    pkg.last_checked = Some(now.clone());
                }
                CheckOutcome::Failed { package_id, error }
            }
        };

        outcomes.push(outcome);
        pb.inc(1);
    }

    pb.finish_and_clear();
    outcomes
}
