use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::crs::Crs;

fn default_destination_crs() -> Crs {
    Crs::wgs84()
}
fn default_verbose() -> bool {
    false
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct FileConfig {
    /// Destination CRS for `transform` when none is given on the command line
    #[serde(default = "default_destination_crs")]
    pub destination_crs: Crs,
    /// X offset applied to the east piece by `cut`; the CRS width if unset
    #[serde(default)]
    pub antimeridian_offset: Option<f64>,
    #[serde(default = "default_verbose")]
    pub verbose: bool,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            destination_crs: default_destination_crs(),
            antimeridian_offset: None,
            verbose: default_verbose(),
        }
    }
}

impl FileConfig {
    /// Load the first config file found in the search paths.
    ///
    /// Files that fail to parse are skipped; their errors are returned so the
    /// caller can report them once logging is set up.
    pub fn load() -> (Option<Self>, Vec<String>) {
        Self::load_first(&get_config_paths())
    }

    fn load_first(paths: &[PathBuf]) -> (Option<Self>, Vec<String>) {
        let mut warnings = Vec::new();
        for path in paths {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(path)
            {
                match toml::from_str(&contents) {
                    Ok(config) => return (Some(config), warnings),
                    Err(e) => {
                        warnings.push(format!("Failed to parse config file {:?}: {}", path, e));
                    }
                }
            }
        }
        (None, warnings)
    }

    /// Load an explicitly requested config file.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            bail!("Config file not found: {:?}", path);
        }
        let contents = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&contents).context("Failed to parse config file")
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("geoshift.toml"));
    paths.push(PathBuf::from(".geoshift.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("geoshift").join("config.toml"));
        paths.push(config_dir.join("geoshift.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".geoshift.toml"));
        paths.push(home.join(".config").join("geoshift").join("config.toml"));
    }

    paths
}
