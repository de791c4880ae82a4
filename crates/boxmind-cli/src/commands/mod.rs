pub mod compact;
pub mod context;
pub mod index;
pub mod search;
pub mod stats;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use boxmind_ai::session::UNKNOWN_TARGET;
use boxmind_ai::{ContextConfig, ContextEngine, SessionWorkspace};

use crate::output::OutputFormat;

/// Settings shared by every subcommand.
pub struct CommandContext {
    pub root: PathBuf,
    pub config: ContextConfig,
    pub format: OutputFormat,
}

impl CommandContext {
    pub fn new(root: Option<PathBuf>, config_path: Option<&Path>, format: OutputFormat) -> Result<Self> {
        let root = match root {
            Some(root) => root,
            None => default_root()?,
        };
        let config = match config_path {
            Some(path) => ContextConfig::load_from_path(path),
            None => ContextConfig::load(),
        };
        config.validate()?;
        tracing::debug!(root = %root.display(), ?config, "Resolved configuration");

        Ok(Self {
            root,
            config,
            format,
        })
    }

    /// Workspace of an existing box.
    pub fn session(&self, name: &str) -> Result<SessionWorkspace> {
        Ok(SessionWorkspace::existing(&self.root, name, UNKNOWN_TARGET)?)
    }

    /// Engine over an existing box, with its memory loaded.
    pub fn engine(&self, name: &str) -> Result<ContextEngine> {
        Ok(ContextEngine::new(self.session(name)?, self.config.clone()))
    }
}

fn default_root() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|dir| dir.join("boxmind"))
        .context("Could not determine a data directory; pass --root")
}
