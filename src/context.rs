// File: ./src/context.rs
/*! Where prayer-notes keeps its files.

Config and the log file live in per-user directories; the vault is wherever
the notes are (the working directory unless the config names one). Code that
touches the filesystem receives a `&dyn AppContext` instead of looking these
locations up itself, so tests can point everything at a scratch directory.
*/

use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const LOG_FILE_NAME: &str = "prayer-notes.log";

/// The directories an [`AppContext`] can hand out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppDir {
    Config,
    Data,
}

impl AppDir {
    /// Subdirectory name used under an override or scratch root.
    fn subdir(self) -> &'static str {
        match self {
            AppDir::Config => "config",
            AppDir::Data => "data",
        }
    }
}

pub trait AppContext: Send + Sync + std::fmt::Debug {
    /// Returns the directory, creating it if needed.
    fn dir(&self, which: AppDir) -> Result<PathBuf>;

    fn get_config_dir(&self) -> Result<PathBuf> {
        self.dir(AppDir::Config)
    }

    fn get_data_dir(&self) -> Result<PathBuf> {
        self.dir(AppDir::Data)
    }

    fn get_config_file_path(&self) -> Result<PathBuf> {
        Ok(self.get_config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// `None` when no data directory can be determined or created.
    fn get_log_path(&self) -> Option<PathBuf> {
        self.get_data_dir().ok().map(|dir| dir.join(LOG_FILE_NAME))
    }

    /// Vault used when the config does not name one.
    fn get_vault_dir(&self) -> Result<PathBuf> {
        std::env::current_dir().context("Failed to determine current directory")
    }
}

fn create_dir_all(path: PathBuf) -> Result<PathBuf> {
    std::fs::create_dir_all(&path)
        .with_context(|| format!("Failed to create directory {}", path.display()))?;
    Ok(path)
}

/// Platform directories, or `<root>/config` and `<root>/data` with `--root`.
#[derive(Clone, Debug, Default)]
pub struct StandardContext {
    override_root: Option<PathBuf>,
}

impl StandardContext {
    pub fn new(override_root: Option<PathBuf>) -> Self {
        Self { override_root }
    }

    pub fn override_root(&self) -> Option<&Path> {
        self.override_root.as_deref()
    }
}

impl AppContext for StandardContext {
    fn dir(&self, which: AppDir) -> Result<PathBuf> {
        if let Some(root) = &self.override_root {
            return create_dir_all(root.join(which.subdir()));
        }
        let proj = ProjectDirs::from("org", "prayer-notes", "prayer-notes")
            .ok_or_else(|| anyhow::anyhow!("No home directory"))?;
        let path = match which {
            AppDir::Config => proj.config_dir(),
            AppDir::Data => proj.data_dir(),
        };
        create_dir_all(path.to_path_buf())
    }
}

/// Scratch directory for tests, with its own `vault` subdirectory.
/// Removed again on drop.
#[derive(Debug)]
pub struct TestContext {
    pub root: PathBuf,
}

impl TestContext {
    pub fn new() -> Self {
        let root = std::env::temp_dir().join(format!("prayer_notes_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&root).expect("failed to create test scratch dir");
        Self { root }
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl AppContext for TestContext {
    fn dir(&self, which: AppDir) -> Result<PathBuf> {
        create_dir_all(self.root.join(which.subdir()))
    }

    fn get_vault_dir(&self) -> Result<PathBuf> {
        create_dir_all(self.root.join("vault"))
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

pub type SharedContext = std::sync::Arc<dyn AppContext>;
