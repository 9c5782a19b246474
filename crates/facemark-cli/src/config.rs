//! CLI configuration.

use std::path::PathBuf;

use facemark_media::fs_utils::DEFAULT_IMAGE_EXTENSION;
use facemark_media::SeetaConfig;

/// Default SeetaFace model file, looked up relative to the working directory.
pub const DEFAULT_MODEL_PATH: &str = "seeta_fd_frontal_v1.0.bin";

/// CLI configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct CliConfig {
    /// SeetaFace model used by `detect` and `live`
    pub model_path: PathBuf,
    /// Smallest face the cascade looks for, in pixels
    pub min_face_size: u32,
    /// Cascade score threshold
    pub score_thresh: f64,
    /// Extension appended to output images without a known one
    pub default_extension: String,
    /// JSON log lines instead of colored text
    pub log_json: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            min_face_size: 20,
            score_thresh: 2.0,
            default_extension: DEFAULT_IMAGE_EXTENSION.to_string(),
            log_json: false,
        }
    }
}

impl CliConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or unparsable values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            model_path: lookup("FACEMARK_MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),
            min_face_size: lookup("FACEMARK_MIN_FACE_SIZE")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.min_face_size),
            score_thresh: lookup("FACEMARK_SCORE_THRESH")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.score_thresh),
            default_extension: lookup("FACEMARK_DEFAULT_EXTENSION")
                .map(|s| s.trim_start_matches('.').to_lowercase())
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.default_extension),
            log_json: lookup("LOG_FORMAT")
                .map(|v| v.to_lowercase() == "json")
                .unwrap_or(defaults.log_json),
        }
    }

    /// Cascade settings for the detector.
    pub fn seeta_config(&self) -> SeetaConfig {
        SeetaConfig {
            min_face_size: self.min_face_size,
            score_thresh: self.score_thresh,
            ..SeetaConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_unset() {
        let config = CliConfig::from_lookup(|_| None);
        assert_eq!(config, CliConfig::default());
        assert_eq!(config.default_extension, "jpg");
    }

    #[test]
    fn test_overrides_and_bad_values() {
        let env: HashMap<&str, &str> = [
            ("FACEMARK_MODEL_PATH", "/models/seeta.bin"),
            ("FACEMARK_MIN_FACE_SIZE", "forty"),
            ("FACEMARK_SCORE_THRESH", "1.5"),
            ("FACEMARK_DEFAULT_EXTENSION", ".PNG"),
            ("LOG_FORMAT", "JSON"),
        ]
        .into_iter()
        .collect();

        let config = CliConfig::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.model_path, PathBuf::from("/models/seeta.bin"));
        assert_eq!(config.min_face_size, 20);
        assert_eq!(config.score_thresh, 1.5);
        assert_eq!(config.default_extension, "png");
        assert!(config.log_json);
        assert_eq!(config.seeta_config().score_thresh, 1.5);
    }
}
