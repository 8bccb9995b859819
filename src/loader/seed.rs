//! One-shot import of the configured CSV files at startup.

use std::path::Path;

use tracing::{debug, info, warn};

use super::{load_ingredient_list, load_invitee_list, load_menus, Table};
use crate::config::AppConfig;
use crate::db::Store;

/// Tally of one seeding pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub loaded: usize,
    pub missing: usize,
    pub failed: usize,
}

/// Load every configured ingredient list, invitee list and the menu file.
/// A missing file leaves that list untouched; a present file replaces it.
/// Call once per process, before the UI starts.
pub fn load_initial_data(store: &Store, config: &AppConfig) -> SeedReport {
    let mut report = SeedReport::default();

    for list in &config.ingredient_lists {
        seed_file(&config.ingredient_csv(list), &mut report, |table| {
            load_ingredient_list(store, &list.key, table)
        });
    }

    for list in &config.invitee_lists {
        seed_file(&config.invitee_csv(list), &mut report, |table| {
            load_invitee_list(store, &list.key, table)
        });
    }

    seed_file(&config.menu_csv(), &mut report, |table| load_menus(store, table));

    info!(
        loaded = report.loaded,
        missing = report.missing,
        failed = report.failed,
        "initial data load finished"
    );
    report
}

fn seed_file(path: &Path, report: &mut SeedReport, load: impl FnOnce(&Table) -> bool) {
    if !path.exists() {
        debug!(path = %path.display(), "seed file not found");
        report.missing += 1;
        return;
    }

    match Table::from_path(path) {
        Ok(table) => {
            if load(&table) {
                report.loaded += 1;
            } else {
                report.failed += 1;
            }
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "could not read seed file");
            report.failed += 1;
        }
    }
}
