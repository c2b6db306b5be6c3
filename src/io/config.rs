//! Programme configuration loading.
//!
//! The configuration is a JSON document matching `domain::EvaluationConfig`.
//! A default configuration for the known deployment is bundled into the binary;
//! a file given on the command line (or via `WELLBY_CONFIG`) replaces it.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::domain::EvaluationConfig;
use crate::error::AppError;

/// Environment variable naming a configuration file.
pub const CONFIG_ENV: &str = "WELLBY_CONFIG";

const BUNDLED_CONFIG: &str = include_str!("../../config/programmes.json");

/// The bundled configuration.
pub fn bundled_config() -> Result<EvaluationConfig, AppError> {
    serde_json::from_str(BUNDLED_CONFIG)
        .map_err(|e| AppError::new(4, format!("Bundled programme configuration is invalid: {e}")))
}

/// Read a configuration file.
pub fn read_config(path: &Path) -> Result<EvaluationConfig, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open config '{}': {e}", path.display())))?;
    let config: EvaluationConfig = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::new(2, format!("Invalid config '{}': {e}", path.display())))?;
    Ok(config)
}

/// Resolve the configuration: explicit path, then `WELLBY_CONFIG`, then the bundled file.
///
/// A `.env` file in the working directory is honoured for `WELLBY_CONFIG`.
pub fn load_config(explicit: Option<&Path>) -> Result<EvaluationConfig, AppError> {
    dotenvy::dotenv().ok();

    let from_env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
    match explicit.map(Path::to_path_buf).or(from_env) {
        Some(path) => {
            info!(path = %path.display(), "loading programme configuration");
            read_config(&path)
        }
        None => bundled_config(),
    }
}
