//! Search configuration: `search.toml` inside the configuration directory.
//!
//! ```toml
//! [data]
//! workbook = "patient_data.xlsx"
//!
//! [codelist]
//! path = "dynairx_codelist.csv"
//!
//! [patient]
//! id = "4001"
//! ```
//!
//! Relative paths resolve against the configuration directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

pub const CONFIG_FILE: &str = "search.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    pub data: DataSection,
    pub codelist: CodelistSection,
    #[serde(default)]
    pub patient: PatientSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataSection {
    /// The multi-sheet patient-data workbook.
    pub workbook: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CodelistSection {
    /// The disease codelist CSV.
    pub path: PathBuf,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatientSection {
    /// Default patient identifier; the `--patient-id` flag overrides it.
    pub id: Option<String>,
}

/// Load `search.toml` from `config_dir`, resolving relative data paths
/// against that directory.
pub fn load_config(config_dir: &Path) -> Result<SearchConfig> {
    let path = config_dir.join(CONFIG_FILE);
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let mut config: SearchConfig = toml::from_str(&text)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    config.data.workbook = resolve_path(config_dir, config.data.workbook);
    config.codelist.path = resolve_path(config_dir, config.codelist.path);
    Ok(config)
}

fn resolve_path(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}
