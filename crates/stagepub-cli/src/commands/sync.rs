//! Handler for `stagepub sync-maven-metadata`.

use std::path::Path;

use miette::Result;

use stagepub_ops::ops_sync::{self, SyncOutcome};
use stagepub_util::progress;

use crate::cli::ReleaseArgs;

pub fn exec(release: &ReleaseArgs, config_file: &Path) -> Result<()> {
    let config = super::resolve_config(release, config_file, None, None)?;
    let outcomes = super::runtime()?.block_on(ops_sync::sync_metadata(&config))?;

    let saved = outcomes
        .iter()
        .filter(|(_, o)| matches!(o, SyncOutcome::Saved { .. }))
        .count();
    progress::status(
        "Finished",
        &format!("{saved} of {} metadata file(s) synced", outcomes.len()),
    );
    Ok(())
}
