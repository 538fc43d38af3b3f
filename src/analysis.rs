use serde::Serialize;
use tracing::debug;

use crate::config::AnalysisConfig;
use crate::goodness::{residuals, FitStatistics};
use crate::interpretation::physical_interpretation;
use crate::linearize::{linearize, Linearization};
use crate::math::{to_f64, FitScalar};
use crate::model::{uses_quadratic_fit, FitModel, KinematicVariable, MotionType};
use crate::normality::{jarque_bera, NormalityTest};
use crate::polyfit::{fit_linear, fit_quadratic, LinearFit, QuadraticFit};
use crate::uncertainty::type_a_uncertainty;
use crate::{Error, Result};

/// Minimum number of points in a series
pub const MIN_POINTS: usize = 3;

/// Paired measurements with optional per-point uncertainties
#[derive(Clone, Debug, PartialEq)]
pub struct MeasurementSeries<E> {
    pub x: Vec<E>,
    pub y: Vec<E>,
    pub ux: Option<Vec<E>>,
    pub uy: Option<Vec<E>>,
}

impl<E> MeasurementSeries<E> {
    pub const fn new(x: Vec<E>, y: Vec<E>) -> Self {
        Self {
            x,
            y,
            ux: None,
            uy: None,
        }
    }

    #[must_use]
    pub fn with_ux(mut self, ux: Vec<E>) -> Self {
        self.ux = Some(ux);
        self
    }

    #[must_use]
    pub fn with_uy(mut self, uy: Vec<E>) -> Self {
        self.uy = Some(uy);
        self
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

impl<E: FitScalar> MeasurementSeries<E> {
    /// Check the series can be analysed, failing on the first violated constraint
    ///
    /// # Errors
    /// Returns the first entry of [`MeasurementSeries::issues`].
    pub fn validate(&self, max_points: usize) -> Result<()> {
        self.issues(max_points).into_iter().next().map_or(Ok(()), Err)
    }

    /// Every constraint the series violates
    ///
    /// Shape problems (lengths, point count) come first, followed by per-point problems in
    /// series order: non-finite values, then uncertainties which are not strictly positive.
    pub fn issues(&self, max_points: usize) -> Vec<Error> {
        let mut issues = vec![];
        let n = self.x.len();

        let series = [
            ("y", Some(&self.y)),
            ("ux", self.ux.as_ref()),
            ("uy", self.uy.as_ref()),
        ];
        for (name, values) in series {
            if let Some(values) = values {
                if values.len() != n {
                    issues.push(Error::MismatchedLength {
                        series: name,
                        expected: n,
                        got: values.len(),
                    });
                }
            }
        }

        if n < MIN_POINTS {
            issues.push(Error::TooFewPoints {
                got: n,
                min: MIN_POINTS,
            });
        }
        if n > max_points {
            issues.push(Error::TooManyPoints {
                got: n,
                max: max_points,
            });
        }

        let named = [
            ("x", Some(&self.x)),
            ("y", Some(&self.y)),
            ("ux", self.ux.as_ref()),
            ("uy", self.uy.as_ref()),
        ];
        for (name, values) in named {
            for (index, value) in values.into_iter().flatten().enumerate() {
                if !value.is_finite() {
                    issues.push(Error::NonFinite {
                        series: name,
                        index,
                    });
                }
            }
        }
        for (name, values) in [("ux", self.ux.as_ref()), ("uy", self.uy.as_ref())] {
            for (index, value) in values.into_iter().flatten().enumerate() {
                if value.is_finite() && *value <= E::zero() {
                    issues.push(Error::NonPositiveUncertainty {
                        series: name,
                        index,
                        value: to_f64(*value),
                    });
                }
            }
        }

        issues
    }
}

/// The fitted curve, either a straight line or a kinematic parabola
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Fit<E> {
    Linear(LinearFit<E>),
    Quadratic(QuadraticFit<E>),
}

impl<E: FitScalar> Fit<E> {
    /// Number of free parameters
    pub const fn parameters(&self) -> usize {
        match self {
            Self::Linear(_) => 2,
            Self::Quadratic(_) => 3,
        }
    }

    pub fn predict(&self, x: E) -> E {
        match self {
            Self::Linear(fit) => fit.predict(x),
            Self::Quadratic(fit) => fit.predict(x),
        }
    }

    pub const fn as_linear(&self) -> Option<&LinearFit<E>> {
        match self {
            Self::Linear(fit) => Some(fit),
            Self::Quadratic(_) => None,
        }
    }

    pub const fn as_quadratic(&self) -> Option<&QuadraticFit<E>> {
        match self {
            Self::Quadratic(fit) => Some(fit),
            Self::Linear(_) => None,
        }
    }
}

/// Coordinates behind a fit, ready for plotting or tabulation
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FitData<E> {
    pub x: Vec<E>,
    pub y: Vec<E>,
    pub x_lin: Vec<E>,
    pub y_lin: Vec<E>,
    pub ux_lin: Vec<E>,
    pub uy_lin: Vec<E>,
    /// Fitted values at `x_lin`
    pub fitted: Vec<E>,
    /// `y_lin - fitted`
    pub residuals: Vec<E>,
    pub label_x: String,
    pub label_y: String,
}

/// Outcome of [`analyse`]
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FitResult<E> {
    model: FitModel,
    motion: Option<MotionType>,
    variable: Option<KinematicVariable>,
    fit: Fit<E>,
    statistics: FitStatistics<E>,
    data: FitData<E>,
    normality: Option<NormalityTest<E>>,
    interpretation: Option<String>,
}

impl<E> FitResult<E> {
    pub const fn model(&self) -> FitModel {
        self.model
    }

    pub const fn motion(&self) -> Option<MotionType> {
        self.motion
    }

    pub const fn variable(&self) -> Option<KinematicVariable> {
        self.variable
    }

    pub const fn fit(&self) -> &Fit<E> {
        &self.fit
    }

    pub const fn statistics(&self) -> &FitStatistics<E> {
        &self.statistics
    }

    pub const fn data(&self) -> &FitData<E> {
        &self.data
    }

    pub fn residuals(&self) -> &[E] {
        &self.data.residuals
    }

    pub const fn normality(&self) -> Option<&NormalityTest<E>> {
        self.normality.as_ref()
    }

    pub fn interpretation(&self) -> Option<&str> {
        self.interpretation.as_deref()
    }
}

/// Fit `series` according to `config`
///
/// Missing uncertainties are replaced by [`type_a_uncertainty`], the series is linearized for the
/// selected model and fitted by weighted least squares. Uniformly accelerated position-time data
/// with the power-law model is fitted with the three parameter kinematic parabola instead.
/// Residuals are then scored and, unless disabled in `config`, tested for normality and
/// interpreted kinematically.
///
/// # Errors
/// - input errors if the series fails [`MeasurementSeries::validate`], a logarithm is undefined,
///   or a linearized uncertainty is degenerate
/// - [`Error::SingularSystem`] or [`Error::UnstableSystem`] if the normal equations are singular
/// - [`Error::TooFewPoints`] if the quadratic fit is selected for three points
pub fn analyse<E: FitScalar>(
    series: &MeasurementSeries<E>,
    config: &AnalysisConfig,
) -> Result<FitResult<E>> {
    series.validate(config.max_points)?;

    let ux = series.ux.clone().unwrap_or_else(|| {
        debug!("no x uncertainties supplied, using the default estimate");
        type_a_uncertainty(&series.x)
    });
    let uy = series.uy.clone().unwrap_or_else(|| {
        debug!("no y uncertainties supplied, using the default estimate");
        type_a_uncertainty(&series.y)
    });

    let linearization = linearize(
        &series.x,
        &series.y,
        &ux,
        &uy,
        config.model,
        config.motion,
        config.variable,
        config.log_domain,
    )?;
    check_linearization(&linearization)?;
    debug!(
        points = linearization.len(),
        label_x = %linearization.label_x,
        label_y = %linearization.label_y,
        "series linearized"
    );

    let fit = if uses_quadratic_fit(config.model, config.motion, config.variable) {
        Fit::Quadratic(fit_quadratic(
            &linearization.x,
            &linearization.y,
            &linearization.uy,
            config.quadratic_uncertainty,
        )?)
    } else {
        Fit::Linear(fit_linear(
            &linearization.x,
            &linearization.y,
            &linearization.uy,
            config.singular_tolerance,
        )?)
    };

    let fitted = linearization
        .x
        .iter()
        .map(|x| fit.predict(*x))
        .collect::<Vec<_>>();
    let residuals = residuals(&linearization.y, &fitted);
    let statistics = FitStatistics::evaluate(
        &linearization.y,
        &residuals,
        &linearization.uy,
        fit.parameters(),
    );
    debug!(
        r_squared = to_f64(statistics.r_squared),
        reduced_chi_squared = to_f64(statistics.reduced_chi_squared),
        df = statistics.degrees_of_freedom,
        "fit evaluated"
    );

    let normality = config.normality_test.then(|| jarque_bera(&residuals));
    let interpretation = config
        .interpretation
        .then(|| physical_interpretation(&fit, config.motion, config.variable));

    let Linearization {
        x: x_lin,
        y: y_lin,
        ux: ux_lin,
        uy: uy_lin,
        label_x,
        label_y,
    } = linearization;

    Ok(FitResult {
        model: config.model,
        motion: config.motion,
        variable: config.variable,
        fit,
        statistics,
        data: FitData {
            x: series.x.clone(),
            y: series.y.clone(),
            x_lin,
            y_lin,
            ux_lin,
            uy_lin,
            fitted,
            residuals,
            label_x,
            label_y,
        },
        normality,
        interpretation,
    })
}

/// Linearized coordinates must be finite and every point needs a usable weight
fn check_linearization<E: FitScalar>(linearization: &Linearization<E>) -> Result<()> {
    for (name, values) in [("x", &linearization.x), ("y", &linearization.y)] {
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(Error::NonFinite {
                series: name,
                index,
            });
        }
    }
    if let Some((index, value)) = linearization
        .uy
        .iter()
        .enumerate()
        .find(|(_, u)| !u.is_finite() || **u <= E::zero())
    {
        return Err(Error::DegenerateUncertainty {
            series: "uy",
            index,
            value: to_f64(*value),
        });
    }
    Ok(())
}
