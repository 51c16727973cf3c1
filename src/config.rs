use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::warnings::WarningsConfig;

/// File name looked up when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = "paper-index.toml";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub paths: PathsConfig,
    #[serde(default)]
    pub warnings: WarningsConfig,
    /// Label name to index level name.
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PathsConfig {
    /// Directory holding one subdirectory per document.
    pub papers_data_dir: PathBuf,
    /// The tracking database (`doc_tracking.db`).
    pub papers_metadata_db: PathBuf,
    /// Where the viewer database is written.
    pub result_db: PathBuf,
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let mut config: Config =
        toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    let paths = &mut config.paths;
    for (key, value) in [
        ("paths.papers_data_dir", &mut paths.papers_data_dir),
        ("paths.papers_metadata_db", &mut paths.papers_metadata_db),
        ("paths.result_db", &mut paths.result_db),
    ] {
        if value.as_os_str().is_empty() {
            bail!("{} must not be empty", key);
        }
        let expanded = expand_tilde(value);
        *value = expanded;
    }

    Ok(config)
}

/// Find the config file: the explicit path if given, otherwise the first
/// `paper-index.toml` found in the working directory, `~/.config` or the
/// directory of the executable.
pub fn locate_config(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    let mut candidates = vec![PathBuf::from(CONFIG_FILE_NAME)];
    if let Some(home) = home_dir() {
        candidates.push(home.join(".config").join(CONFIG_FILE_NAME));
    }
    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
    {
        candidates.push(exe_dir.join(CONFIG_FILE_NAME));
    }

    match candidates.iter().find(|p| p.is_file()) {
        Some(found) => Ok(found.clone()),
        None => bail!(
            "No config file found, looked for: {}",
            candidates
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
}

/// Replace a leading `~` component with `$HOME`.
fn expand_tilde(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}
