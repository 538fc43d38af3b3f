use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::io::ColumnMapping;
use crate::linearize::LogDomain;
use crate::model::{FitModel, KinematicVariable, MotionType};
use crate::polyfit::QuadraticUncertainty;
use crate::{Error, Result};

/// Default cap on the number of points accepted for a single analysis
pub const DEFAULT_MAX_POINTS: usize = 10_000;

/// Smallest weighted spread of the abscissae, relative to their largest magnitude, accepted by
/// the straight line fit
pub const DEFAULT_SINGULAR_TOLERANCE: f64 = 1e-10;

/// Everything `analyse` needs besides the data
///
/// A configuration can be built in code or read from TOML, where every key is optional:
///
/// ```toml
/// model = "power-law"
/// motion = "accelerated"
/// variable = "position-time"
/// max_points = 500
/// log_domain = "strict"
/// quadratic_uncertainty = "covariance"
///
/// [columns]
/// x = "t"
/// y = 1
/// uy = "u(x)"
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    pub model: FitModel,
    pub motion: Option<MotionType>,
    pub variable: Option<KinematicVariable>,
    pub max_points: usize,
    pub log_domain: LogDomain,
    pub quadratic_uncertainty: QuadraticUncertainty,
    pub singular_tolerance: f64,
    /// Run the Jarque-Bera test on the residuals
    pub normality_test: bool,
    /// Generate the kinematic narrative
    pub interpretation: bool,
    /// Column layout used when the series is read from CSV
    pub columns: Option<ColumnMapping>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            model: FitModel::default(),
            motion: None,
            variable: None,
            max_points: DEFAULT_MAX_POINTS,
            log_domain: LogDomain::default(),
            quadratic_uncertainty: QuadraticUncertainty::default(),
            singular_tolerance: DEFAULT_SINGULAR_TOLERANCE,
            normality_test: true,
            interpretation: true,
            columns: None,
        }
    }
}

impl AnalysisConfig {
    #[must_use]
    pub fn new(model: FitModel) -> Self {
        Self {
            model,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_kinematics(mut self, motion: MotionType, variable: KinematicVariable) -> Self {
        self.motion = Some(motion);
        self.variable = Some(variable);
        self
    }

    #[must_use]
    pub fn with_max_points(mut self, max_points: usize) -> Self {
        self.max_points = max_points;
        self
    }

    #[must_use]
    pub fn with_log_domain(mut self, log_domain: LogDomain) -> Self {
        self.log_domain = log_domain;
        self
    }

    #[must_use]
    pub fn with_quadratic_uncertainty(mut self, method: QuadraticUncertainty) -> Self {
        self.quadratic_uncertainty = method;
        self
    }

    #[must_use]
    pub fn without_normality_test(mut self) -> Self {
        self.normality_test = false;
        self
    }

    #[must_use]
    pub fn without_interpretation(mut self) -> Self {
        self.interpretation = false;
        self
    }

    /// Parse a configuration from TOML
    ///
    /// # Errors
    /// Returns [`Error::Config`] for malformed TOML, unknown keys, or unsupported selector names.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Read a configuration from a TOML file
    ///
    /// # Errors
    /// Returns an error if the file is missing or unreadable, or if it fails to parse.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }
        let source = fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }
}
