use anyhow::{anyhow, Context, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::PanelOptions;

/// File name of the persisted defaults record.
pub const DEFAULTS_FILE_NAME: &str = "modular_synth_panel_generator.json";

/// Remembers the last-used panel options between runs.
#[derive(Debug, Clone)]
pub struct DefaultsStore {
    path: PathBuf,
}

impl DefaultsStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Resolve the default record path (`~/.synthpanel/defaults/modular_synth_panel_generator.json`).
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| anyhow!("could not determine home directory"))?;
        Ok(home
            .join(".synthpanel")
            .join("defaults")
            .join(DEFAULTS_FILE_NAME))
    }

    pub fn at_default_location() -> Result<Self> {
        Ok(Self::new(Self::default_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the saved options. A missing file yields the built-in defaults.
    pub fn load(&self) -> Result<PanelOptions> {
        if !self.path.exists() {
            info!(path = %self.path.display(), "no defaults file to load");
            return Ok(PanelOptions::default());
        }

        let data = fs::read(&self.path)
            .with_context(|| format!("read defaults file {}", self.path.display()))?;
        let record: Map<String, Value> =
            serde_json::from_slice(&data).context("deserialize defaults record")?;
        let options = PanelOptions::from_record(&record)
            .with_context(|| format!("resolve defaults file {}", self.path.display()))?;
        info!(path = %self.path.display(), "loaded defaults file");
        Ok(options)
    }

    /// Like [`load`](Self::load), but falls back to the built-in defaults on any error.
    pub fn load_or_default(&self) -> PanelOptions {
        self.load().unwrap_or_else(|err| {
            warn!(path = %self.path.display(), error = %format!("{err:#}"), "ignoring unreadable defaults file");
            PanelOptions::default()
        })
    }

    /// Persist the options, creating the parent directory if needed.
    pub fn save(&self, options: &PanelOptions) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create defaults directory {}", parent.display()))?;
        }

        let data = serde_json::to_vec_pretty(&options.to_record())
            .context("serialize defaults record to JSON bytes")?;
        fs::write(&self.path, data)
            .with_context(|| format!("write defaults file {}", self.path.display()))?;
        info!(path = %self.path.display(), "saved defaults file");
        Ok(())
    }

    /// Remove the saved record. Returns whether a file was removed.
    pub fn erase(&self) -> Result<bool> {
        if !self.path.exists() {
            info!(path = %self.path.display(), "no defaults file to erase");
            return Ok(false);
        }
        fs::remove_file(&self.path)
            .with_context(|| format!("erase defaults file {}", self.path.display()))?;
        info!(path = %self.path.display(), "erased defaults file");
        Ok(true)
    }
}
