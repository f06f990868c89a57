//! Loader for the RON tuning file.

use bevy::prelude::*;
use ron::Options;
use std::fs;
use std::path::Path;

use super::MotionTuning;
use super::validation::validate_tuning;

pub const DEFAULT_TUNING_PATH: &str = "assets/data/motion_tuning.ron";

/// Error type for tuning loading failures.
#[derive(Debug)]
pub struct TuningLoadError {
    pub file: String,
    pub message: String,
}

impl std::fmt::Display for TuningLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to load {}: {}", self.file, self.message)
    }
}

impl std::error::Error for TuningLoadError {}

fn ron_options() -> Options {
    Options::default().with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
}

/// Parse tuning from RON text. Missing fields keep their defaults.
pub fn parse_tuning(source: &str, file: &str) -> Result<MotionTuning, TuningLoadError> {
    ron_options()
        .from_str(source)
        .map_err(|e| TuningLoadError {
            file: file.to_string(),
            message: format!("Parse error: {}", e),
        })
}

/// Load and validate tuning from a RON file.
pub fn load_tuning(path: &Path) -> Result<MotionTuning, TuningLoadError> {
    let file_name = path.display().to_string();
    let contents = fs::read_to_string(path).map_err(|e| TuningLoadError {
        file: file_name.clone(),
        message: format!("IO error: {}", e),
    })?;

    let tuning = parse_tuning(&contents, &file_name)?;

    let errors = validate_tuning(&tuning);
    if !errors.is_empty() {
        let message = errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(TuningLoadError {
            file: file_name,
            message: format!("Validation error: {}", message),
        });
    }

    Ok(tuning)
}

/// Load tuning, falling back to defaults on any failure.
pub fn load_tuning_or_default(path: &Path) -> MotionTuning {
    match load_tuning(path) {
        Ok(tuning) => {
            info!("Loaded motion tuning from {}", path.display());
            tuning
        }
        Err(e) => {
            warn!("{}; using default motion tuning", e);
            MotionTuning::default()
        }
    }
}
