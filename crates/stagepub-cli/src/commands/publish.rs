//! Handler for `stagepub publish`.

use std::path::Path;

use miette::Result;

use stagepub_ops::ops_publish;
use stagepub_util::progress;

use crate::cli::ReleaseArgs;

pub fn exec(
    release: &ReleaseArgs,
    config_file: &Path,
    username: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let config = super::resolve_config(release, config_file, username, password)?;
    let summary = super::runtime()?.block_on(ops_publish::publish(&config))?;

    progress::status(
        "Published",
        &format!(
            "{} file(s) to {} ({} signed)",
            summary.uploaded, config.repositories.staging, summary.generation.signed
        ),
    );
    Ok(())
}
