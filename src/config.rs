//! Report configuration and asset directory resolution.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::assets;
use crate::error::{AssetError, Result};

/// Environment variable that points at the asset directory.
pub const ASSETS_DIR_ENV: &str = "MONITOREO_ASSETS_DIR";

/// Static texts and layout parameters shared by every report.
///
/// Values are read-only once constructed; a single instance is shared by all
/// concurrent generations.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReportConfig {
    /// Institution banner printed under the logos.
    pub institution: String,
    /// Program subtitle printed under the institution banner.
    pub program: String,
    /// City printed in the signature block of the student list.
    pub signature_city: String,
    /// Rows per table block for administrator, teacher, period and history reports.
    pub roster_page_size: usize,
    /// Rows per table block for the student grade list.
    pub student_page_size: usize,
    /// Page margin in points applied on every side.
    pub page_margin_pt: f64,
    /// Optional deadline for the render step, in milliseconds.
    pub render_deadline_ms: Option<u64>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            institution: "INSTITUTO TECNOLÓGICO DE CUAUTLA".to_owned(),
            program: "SISTEMA WEB DE MONITOREO EDUCATIVO ENFOCADO A ÍNDICES DE REPROBACIÓN Y DESERCIÓN ESCOLAR".to_owned(),
            signature_city: "Yecapixtla, Morelos".to_owned(),
            roster_page_size: 15,
            student_page_size: 30,
            page_margin_pt: 40.0,
            render_deadline_ms: None,
        }
    }
}

impl ReportConfig {
    /// Parses a configuration from JSON; missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&contents)
    }

    /// Deadline for the render step, if one is configured.
    pub fn render_deadline(&self) -> Option<Duration> {
        self.render_deadline_ms.map(Duration::from_millis)
    }
}

fn asset_root_candidates(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(path) = explicit {
        candidates.push(path.to_path_buf());
    }

    if let Some(path) = env::var_os(ASSETS_DIR_ENV) {
        if !path.is_empty() {
            candidates.push(PathBuf::from(path));
        }
    }

    if let Ok(current_exe) = env::current_exe() {
        if let Some(bin_dir) = current_exe.parent() {
            let candidate = bin_dir.join("assets");
            if !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        }
    }

    let manifest_candidate = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets");
    if !candidates.contains(&manifest_candidate) {
        candidates.push(manifest_candidate);
    }

    candidates
}

/// Picks the first directory that holds every required font and image.
///
/// The search order is the explicit path, then `MONITOREO_ASSETS_DIR`, then
/// `assets/` next to the executable, then `assets/` in the crate root.
pub fn resolve_asset_root(explicit: Option<&Path>) -> std::result::Result<PathBuf, AssetError> {
    let mut attempts = Vec::new();

    for candidate in asset_root_candidates(explicit) {
        if !candidate.is_dir() {
            attempts.push(format!("{} (directory missing)", candidate.display()));
            continue;
        }

        let missing = assets::missing_asset_files(&candidate);
        if missing.is_empty() {
            return Ok(candidate);
        }

        let missing_list = missing
            .iter()
            .map(|path| path.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        attempts.push(format!("{} (missing [{}])", candidate.display(), missing_list));
    }

    Err(AssetError::Unresolved(attempts.join(", ")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = ReportConfig::from_json_str(r#"{ "roster_page_size": 20 }"#)
            .expect("config parses");
        assert_eq!(config.roster_page_size, 20);
        assert_eq!(config.student_page_size, 30);
        assert_eq!(config.institution, "INSTITUTO TECNOLÓGICO DE CUAUTLA");
        assert_eq!(config.render_deadline(), None);
    }

    #[test]
    fn deadline_converts_to_duration() {
        let config = ReportConfig {
            render_deadline_ms: Some(1500),
            ..ReportConfig::default()
        };
        assert_eq!(config.render_deadline(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn explicit_directory_without_assets_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = resolve_asset_root(Some(dir.path())).unwrap_err();
        let message = err.to_string();
        assert!(message.contains(&dir.path().display().to_string()));
        assert!(message.contains("Montserrat-Regular.ttf"));
    }
}
