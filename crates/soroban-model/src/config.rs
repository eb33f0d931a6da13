#![forbid(unsafe_code)]

//! Frame configuration.
//!
//! Everything the engine needs to know about a frame is captured in one
//! [`AbacusConfig`] value handed to [`Abacus::new`](crate::Abacus::new). The
//! value is owned by the model; there is no process-wide configuration.
//!
//! # Loading
//!
//! ```toml
//! # soroban.toml
//! rods = 7
//! bead_span = 20.0
//! min_gap = 1.5
//! threshold_fraction = 0.4
//! ```
//!
//! ```rust,ignore
//! let config = AbacusConfig::from_toml_file("soroban.toml")?;
//! let config = AbacusConfig::from_json_str(json)?;
//! ```
//!
//! Missing keys fall back to [`AbacusConfig::default`]. Loaded configs are
//! validated before they are returned.

#[cfg(feature = "config-files")]
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::bead::TravelGeometry;

/// Largest rod count a frame may be configured with; `10^20 - 1` still fits
/// a `u128` total.
pub const MAX_RODS: usize = 20;

/// Construction-time parameters for a bead frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbacusConfig {
    /// Number of rods (digits). Default: 5.
    pub rods: usize,

    /// Extent of one bead along its rod. Default: 24.0.
    pub bead_span: f64,

    /// Minimum clearance between adjacent Light beads. Default: 2.0.
    pub min_gap: f64,

    /// Distance between a bead's active and inactive rest positions.
    /// Default: 24.0 (one bead span).
    pub travel: f64,

    /// Fraction of `travel`, measured from the divider, inside which a
    /// released bead counts as active. Default: 0.5.
    pub threshold_fraction: f64,

    /// Extra separation beyond `min_gap` at which two Light beads still count
    /// as touching when grouping at snap time. Default: 0.5.
    pub contact_tolerance: f64,
}

impl Default for AbacusConfig {
    fn default() -> Self {
        Self {
            rods: 5,
            bead_span: 24.0,
            min_gap: 2.0,
            travel: 24.0,
            threshold_fraction: 0.5,
            contact_tolerance: 0.5,
        }
    }
}

impl AbacusConfig {
    /// Default configuration with a different rod count.
    #[must_use]
    pub fn with_rods(rods: usize) -> Self {
        Self {
            rods,
            ..Self::default()
        }
    }

    /// Axis geometry derived from the spans.
    #[must_use]
    pub fn geometry(&self) -> TravelGeometry {
        TravelGeometry::new(self.bead_span, self.min_gap, self.travel)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.rods == 0 || self.rods > MAX_RODS {
            errors.push(format!(
                "rods must be in 1..={MAX_RODS}, got {}",
                self.rods
            ));
        }

        if !(self.bead_span.is_finite() && self.bead_span > 0.0) {
            errors.push(format!("bead_span must be > 0, got {}", self.bead_span));
        }

        if !(self.min_gap.is_finite() && self.min_gap >= 0.0) {
            errors.push(format!("min_gap must be >= 0, got {}", self.min_gap));
        }

        if !(self.travel.is_finite() && self.travel > 0.0) {
            errors.push(format!("travel must be > 0, got {}", self.travel));
        }

        if !(self.threshold_fraction > 0.0 && self.threshold_fraction < 1.0) {
            errors.push(format!(
                "threshold_fraction must be in (0, 1), got {}",
                self.threshold_fraction
            ));
        }

        // An inactive bead sits `travel` beyond its active neighbour; it must
        // never read as touching.
        if !(self.contact_tolerance >= 0.0 && self.contact_tolerance < self.travel) {
            errors.push(format!(
                "contact_tolerance must be in [0, travel), got {}",
                self.contact_tolerance
            ));
        }

        errors
    }

    /// Load from a TOML string.
    #[cfg(feature = "config-files")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(ConfigError::Toml)?;
        config.validated()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config-files")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config-files")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s).map_err(ConfigError::Json)?;
        config.validated()
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config-files")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Return `self` if valid, otherwise the collected validation errors.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur when building or loading a configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config-files")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config-files")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config-files")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config-files")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config-files")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config-files")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}
