//! Handler for `stagepub merge-repos`.

use std::path::{Path, PathBuf};

use miette::Result;

use stagepub_ops::ops_merge;
use stagepub_util::progress;

use crate::cli::ReleaseArgs;

pub fn exec(release: &ReleaseArgs, config_file: &Path, repos: Vec<PathBuf>) -> Result<()> {
    let config = super::resolve_config(release, config_file, None, None)?;
    let copied = ops_merge::merge_repos(&config, repos)?;
    progress::status(
        "Merged",
        &format!("{copied} file(s) into {}", config.stage_root.display()),
    );
    Ok(())
}
