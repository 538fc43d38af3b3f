use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while validating, fitting, loading or exporting a measurement series.
#[derive(Debug, Error)]
pub enum Error {
    /// Fewer points than the selected fit needs
    #[error("too few points: got {got}, need at least {min}")]
    TooFewPoints { got: usize, min: usize },

    /// More points than the configured cap
    #[error("too many points: got {got}, the limit is {max}")]
    TooManyPoints { got: usize, max: usize },

    /// A series does not match the length of `x`
    #[error("{series}/x length mismatch: {series} has {got} values, x has {expected}")]
    MismatchedLength {
        series: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("non-finite value in {series} at index {index}")]
    NonFinite { series: &'static str, index: usize },

    #[error("uncertainty {series} at index {index} must be strictly positive, got {value}")]
    NonPositiveUncertainty {
        series: &'static str,
        index: usize,
        value: f64,
    },

    /// The logarithm of zero is undefined
    #[error("cannot take the logarithm of {series} at index {index}: value is zero")]
    LogOfZero { series: &'static str, index: usize },

    /// Only raised under [`LogDomain::Strict`](crate::linearize::LogDomain::Strict)
    #[error("cannot take the logarithm of {series} at index {index}: value {value} is negative")]
    NegativeUnderLog {
        series: &'static str,
        index: usize,
        value: f64,
    },

    /// Linearized uncertainty is zero or non-finite, so the point has no usable weight
    #[error("linearized uncertainty {series} at index {index} is degenerate ({value})")]
    DegenerateUncertainty {
        series: &'static str,
        index: usize,
        value: f64,
    },

    /// Normal equations of the two parameter fit are (near) singular
    #[error("singular system in least squares fit: determinant {determinant:e}")]
    SingularSystem { determinant: f64 },

    /// Gaussian elimination met a negligible pivot
    #[error("numerically unstable linear system: pivot {pivot:e} in column {column}")]
    UnstableSystem { pivot: f64, column: usize },

    #[error("cannot calculate statistics for empty data")]
    EmptyInput,

    #[error("percentile must be between 0 and 100, got {0}")]
    InvalidPercentile(f64),

    #[error("unsupported fit model: {0}")]
    UnsupportedModel(String),

    #[error("unsupported motion type: {0}")]
    UnsupportedMotion(String),

    #[error("unsupported kinematic variable: {0}")]
    UnsupportedVariable(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("requested file not found: {0:?}")]
    FileNotFound(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("column {0} missing from input")]
    MissingColumn(String),

    #[error("row {row}: invalid value {value:?} in column {column}")]
    InvalidCell {
        row: usize,
        column: String,
        value: String,
    },
}

impl Error {
    /// Errors caused by the shape or content of the measurement data
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::TooFewPoints { .. }
                | Self::TooManyPoints { .. }
                | Self::MismatchedLength { .. }
                | Self::NonFinite { .. }
                | Self::NonPositiveUncertainty { .. }
                | Self::LogOfZero { .. }
                | Self::NegativeUnderLog { .. }
                | Self::DegenerateUncertainty { .. }
        )
    }

    #[must_use]
    pub const fn is_singular(&self) -> bool {
        matches!(
            self,
            Self::SingularSystem { .. } | Self::UnstableSystem { .. }
        )
    }

    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedModel(_)
                | Self::UnsupportedMotion(_)
                | Self::UnsupportedVariable(_)
                | Self::Config(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn length_mismatch_names_both_series() {
        let error = Error::MismatchedLength {
            series: "ux",
            expected: 3,
            got: 2,
        };
        assert_eq!(
            error.to_string(),
            "ux/x length mismatch: ux has 2 values, x has 3"
        );
        assert!(error.is_input_error());
        assert!(!error.is_singular());
    }

    #[test]
    fn errors_are_classified_into_disjoint_categories() {
        let singular = Error::SingularSystem { determinant: 0.0 };
        assert!(singular.is_singular());
        assert!(!singular.is_input_error());
        assert!(!singular.is_config_error());

        let config = Error::UnsupportedModel("cubic".into());
        assert!(config.is_config_error());
        assert!(!config.is_input_error());

        let empty = Error::EmptyInput;
        assert!(!empty.is_input_error());
        assert!(!empty.is_singular());
        assert!(!empty.is_config_error());
    }
}
