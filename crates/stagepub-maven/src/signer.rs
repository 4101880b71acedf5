//! Detached artifact signing through an external `gpg` binary.
//!
//! The signing workspace (by default `build-gpg-sign/`) holds two key bundles,
//! `keys.gpg` and `keys.gpg.pub`, and a private `homedir/` trust store that is
//! created and populated on first use. When the workspace or the key bundles
//! are missing, signing is skipped for the whole run without failing it.

use std::path::{Path, PathBuf};

use stagepub_core::config::SigningConfig;
use stagepub_util::errors::StagepubError;
use stagepub_util::fs::{remove_file_if_exists, sibling_with_suffix};
use stagepub_util::process::CommandBuilder;
use stagepub_util::progress;

use crate::repository::SIGNATURE_SUFFIX;

/// Trust store directory, relative to the signing workspace.
pub const HOME_DIR: &str = "homedir";

/// Key bundles imported into the trust store, in import order.
pub const KEY_FILES: [&str; 2] = ["keys.gpg", "keys.gpg.pub"];

/// Present once the trust store has been materialized.
const KEYRING_FILE: &str = "pubring.kbx";

/// Something that can produce detached signatures.
pub trait Signer {
    /// Whether signatures will be produced. Performs one-time setup on first call.
    fn ensure_ready(&mut self) -> miette::Result<bool>;

    /// Write `<file>.asc` and return its path, or `None` when signing is disabled.
    fn sign(&mut self, file: &Path) -> miette::Result<Option<PathBuf>>;
}

/// Signer used when no signing workspace exists. Never produces anything.
#[derive(Debug, Default)]
pub struct DisabledSigner;

impl Signer for DisabledSigner {
    fn ensure_ready(&mut self) -> miette::Result<bool> {
        Ok(false)
    }

    fn sign(&mut self, _file: &Path) -> miette::Result<Option<PathBuf>> {
        Ok(None)
    }
}

/// Lifecycle of the gpg trust store within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignerState {
    Uninitialized,
    Ready,
    /// Key bundles were missing; stays disabled for the rest of the run.
    Disabled,
}

/// Signs files by running `gpg` inside the signing workspace.
#[derive(Debug)]
pub struct GpgSigner {
    workspace: PathBuf,
    program: String,
    state: SignerState,
}

impl GpgSigner {
    pub fn new(workspace: impl Into<PathBuf>, program: impl Into<String>) -> Self {
        Self {
            workspace: workspace.into(),
            program: program.into(),
            state: SignerState::Uninitialized,
        }
    }

    pub fn state(&self) -> SignerState {
        self.state
    }

    fn gpg<'a>(&self, args: impl IntoIterator<Item = &'a str>) -> CommandBuilder {
        CommandBuilder::new(&self.program)
            .args(["--homedir", HOME_DIR, "--batch", "--no-tty"])
            .args(args)
            .cwd(&self.workspace)
    }

    fn run(&self, cmd: &CommandBuilder) -> miette::Result<()> {
        let line = cmd.display();
        tracing::debug!("Running {line}");
        let status = cmd.status().map_err(|e| StagepubError::Signing {
            message: format!("Failed to start `{line}`: {e}"),
        })?;
        if !status.success() {
            let code = status
                .code()
                .map_or_else(|| "a signal".to_string(), |c| c.to_string());
            return Err(StagepubError::Signing {
                message: format!("`{line}` exited with {code}"),
            }
            .into());
        }
        Ok(())
    }

    fn initialize(&self) -> miette::Result<SignerState> {
        let home = self.workspace.join(HOME_DIR);
        if home.join(KEYRING_FILE).exists() {
            return Ok(SignerState::Ready);
        }

        if let Some(missing) = KEY_FILES
            .iter()
            .find(|k| !self.workspace.join(k).is_file())
        {
            tracing::info!(
                "Signing disabled: {} not found in {}",
                missing,
                self.workspace.display()
            );
            return Ok(SignerState::Disabled);
        }

        create_private_dir(&home)?;

        let _group = progress::group("Importing signing keys");
        for key in KEY_FILES {
            self.run(&self.gpg(["--import", key]))?;
        }
        Ok(SignerState::Ready)
    }
}

impl Signer for GpgSigner {
    fn ensure_ready(&mut self) -> miette::Result<bool> {
        if self.state == SignerState::Uninitialized {
            self.state = self.initialize()?;
        }
        Ok(self.state == SignerState::Ready)
    }

    fn sign(&mut self, file: &Path) -> miette::Result<Option<PathBuf>> {
        if !self.ensure_ready()? {
            return Ok(None);
        }

        let signature = sibling_with_suffix(file, SIGNATURE_SUFFIX);
        remove_file_if_exists(&signature).map_err(StagepubError::Io)?;

        let target = file.to_string_lossy().into_owned();
        self.run(&self.gpg(["-a", "--detach-sig", "--sign", target.as_str()]))?;

        if !signature.is_file() {
            return Err(StagepubError::Signing {
                message: format!("{} did not produce {}", self.program, signature.display()),
            }
            .into());
        }
        Ok(Some(signature))
    }
}

/// Pick the signer for this run: gpg when the workspace exists, otherwise none.
pub fn select(config: &SigningConfig) -> Box<dyn Signer> {
    if config.workspace.is_dir() {
        tracing::debug!("Signing workspace {}", config.workspace.display());
        Box::new(GpgSigner::new(&config.workspace, &config.program))
    } else {
        tracing::info!(
            "Signing disabled: no workspace at {}",
            config.workspace.display()
        );
        Box::new(DisabledSigner)
    }
}

/// Create `dir` readable only by the owner where the platform supports it.
fn create_private_dir(dir: &Path) -> miette::Result<()> {
    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder.create(dir).map_err(|e| {
        StagepubError::Signing {
            message: format!("Failed to create trust store {}: {e}", dir.display()),
        }
        .into()
    })
}
