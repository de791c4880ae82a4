//! Per-engagement session workspace.
//!
//! Each box gets its own directory under a root (`<root>/boxes/<name>`)
//! holding `history.json`, `memory.json` and compaction backups.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ContextError, Result};
use crate::llm::Message;
use crate::memory::{MEMORY_FILE, SessionContext, write_atomic};

pub const BOXES_DIR: &str = "boxes";
pub const HISTORY_FILE: &str = "history.json";

/// Target used when the caller does not know the box address.
pub const UNKNOWN_TARGET: &str = "unknown";

/// On-disk workspace of one engagement.
#[derive(Debug, Clone)]
pub struct SessionWorkspace {
    name: String,
    target: String,
    dir: PathBuf,
}

impl SessionWorkspace {
    /// Open (creating if needed) the workspace for `name` under `root`.
    pub fn open(root: impl AsRef<Path>, name: &str, target: impl Into<String>) -> Result<Self> {
        validate_name(name)?;
        let dir = root.as_ref().join(BOXES_DIR).join(name);
        fs::create_dir_all(&dir)?;
        Ok(Self {
            name: name.to_string(),
            target: target.into(),
            dir,
        })
    }

    /// Workspace for `name` under `root` if its directory already exists.
    pub fn existing(root: impl AsRef<Path>, name: &str, target: impl Into<String>) -> Result<Self> {
        validate_name(name)?;
        let dir = root.as_ref().join(BOXES_DIR).join(name);
        if !dir.is_dir() {
            return Err(ContextError::Session(format!(
                "No workspace for box '{}' at {}",
                name,
                dir.display()
            )));
        }
        Ok(Self {
            name: name.to_string(),
            target: target.into(),
            dir,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn history_path(&self) -> PathBuf {
        self.dir.join(HISTORY_FILE)
    }

    pub fn memory_path(&self) -> PathBuf {
        self.dir.join(MEMORY_FILE)
    }

    /// Load the message history. Missing or unparsable files yield an empty history.
    pub fn load_history(&self) -> Vec<Message> {
        let path = self.history_path();
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "Failed to read history");
                return Vec::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|err| {
            tracing::warn!(path = %path.display(), error = %err, "History file is corrupt, starting empty");
            Vec::new()
        })
    }

    /// Persist the message history through a temp file and rename.
    pub fn save_history(&self, messages: &[Message]) -> Result<()> {
        let json = serde_json::to_string_pretty(messages)?;
        write_atomic(&self.history_path(), &json)?;
        tracing::debug!(messages = messages.len(), box_name = %self.name, "History saved");
        Ok(())
    }
}

impl SessionContext for SessionWorkspace {
    fn box_name(&self) -> &str {
        &self.name
    }

    fn target(&self) -> &str {
        &self.target
    }

    fn workspace_dir(&self) -> &Path {
        &self.dir
    }
}

fn validate_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name != "."
        && name != ".."
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(ContextError::Session(format!("Invalid box name '{name}'")))
    }
}
