use crate::types::TargetModel;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct CpgConfig {
    /// Worker threads for translation; unset means one per available core
    pub workers: Option<usize>,
    /// Data model used to size integer types
    pub target_model: TargetModel,
    /// Abort translation on the first frontend error
    pub fail_fast: bool,
    /// `tracing` filter directive, e.g. `cpgraph=debug`
    pub log_filter: Option<String>,
}

impl CpgConfig {
    pub fn effective_workers(&self) -> usize {
        self.workers
            .filter(|n| *n > 0)
            .or_else(|| std::thread::available_parallelism().map(|n| n.get()).ok())
            .unwrap_or(1)
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("cpgraph.toml")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<CpgConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: CpgConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &CpgConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}
