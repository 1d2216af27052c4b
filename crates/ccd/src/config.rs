//! Pipeline configuration.
//!
//! Every field has a default, so a YAML file only needs what it changes:
//!
//! ```yaml
//! threshold: 6.0
//! matrix: "709"
//! chroma_upsample: lanczos3
//! ccd:
//!   matrix_size: [13, 13]
//!   offset_size: [6, 6]
//! ```

use crate::{Error, Result};
use ccd_color::ColorMatrix;
use ccd_denoise::{CcdParams, DenoiseError, DEFAULT_THRESHOLD};
use ccd_resample::Filter;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for [`ChromaDenoise`](crate::ChromaDenoise).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DenoiseConfig {
    /// Denoiser threshold, passed through uninterpreted.
    pub threshold: f32,
    /// Matrix override; `None` infers it per frame.
    pub matrix: Option<ColorMatrix>,
    /// Kernel for upsampling subsampled chroma.
    pub chroma_upsample: Filter,
    /// Kernel for downsampling chroma back to the input subsampling.
    pub chroma_downsample: Filter,
    /// CCD grid parameters.
    pub ccd: CcdParams,
}

impl Default for DenoiseConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            matrix: None,
            chroma_upsample: Filter::CATMULL_ROM,
            chroma_downsample: Filter::CATMULL_ROM,
            ccd: CcdParams::default(),
        }
    }
}

impl DenoiseConfig {
    /// Default config with another threshold.
    pub fn with_threshold(threshold: f32) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }

    /// Loads a config from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        Self::from_yaml_str(&std::fs::read_to_string(path)?)
    }

    /// Parses and validates a YAML config.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Checks the threshold, chroma kernels and grid parameters.
    pub fn validate(&self) -> Result<()> {
        check_threshold(self.threshold)?;
        self.chroma_upsample.validate()?;
        self.chroma_downsample.validate()?;
        self.ccd.validate()?;
        Ok(())
    }
}

/// Rejects negative and non-finite thresholds.
pub(crate) fn check_threshold(threshold: f32) -> Result<()> {
    if threshold >= 0.0 && threshold.is_finite() {
        return Ok(());
    }
    Err(DenoiseError::InvalidParameter(format!("threshold must be >= 0, got {threshold}")).into())
}
