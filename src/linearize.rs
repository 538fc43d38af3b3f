use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::math::{constant, to_f64, FitScalar};
use crate::model::{uses_quadratic_fit, uses_squared_time, FitModel, KinematicVariable, MotionType};
use crate::{Error, Result};

/// How values are treated before a logarithm is taken
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogDomain {
    /// Take the logarithm of the absolute value, so negative inputs are folded onto the
    /// positive axis. This reproduces reports generated by earlier versions.
    #[default]
    Absolute,
    /// Reject negative inputs
    Strict,
}

/// A series mapped into a space where the model is linear in its parameters
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Linearization<E> {
    pub x: Vec<E>,
    pub y: Vec<E>,
    pub ux: Vec<E>,
    pub uy: Vec<E>,
    pub label_x: String,
    pub label_y: String,
}

impl<E: FitScalar> Linearization<E> {
    fn identity(x: &[E], y: &[E], ux: &[E], uy: &[E], labels: (&str, &str)) -> Self {
        Self {
            x: x.to_vec(),
            y: y.to_vec(),
            ux: ux.to_vec(),
            uy: uy.to_vec(),
            label_x: labels.0.to_owned(),
            label_y: labels.1.to_owned(),
        }
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Transform a series and its uncertainties so that `model` becomes a straight line
///
/// The kinematic selectors take priority over `model`: uniformly accelerated position-time data
/// is either fitted against $t^2$ (linear model) or passed through untouched for the quadratic
/// fit (power-law model). Otherwise logarithmic axes are introduced as the model requires, and
/// the uncertainties are propagated to first order, $u(\ln v) = |u / v|$.
///
/// # Errors
/// Returns an error if a value under a logarithm is zero, or negative under
/// [`LogDomain::Strict`].
#[allow(clippy::too_many_arguments)]
pub fn linearize<E: FitScalar>(
    x: &[E],
    y: &[E],
    ux: &[E],
    uy: &[E],
    model: FitModel,
    motion: Option<MotionType>,
    variable: Option<KinematicVariable>,
    log_domain: LogDomain,
) -> Result<Linearization<E>> {
    if uses_squared_time(model, motion, variable) {
        let two: E = constant(2.0);
        return Ok(Linearization {
            x: x.iter().map(|t| *t * *t).collect(),
            y: y.to_vec(),
            // u(t^2) = 2 |t| u(t)
            ux: x.iter().zip(ux).map(|(t, u)| two * t.abs() * *u).collect(),
            uy: uy.to_vec(),
            label_x: "t²".to_owned(),
            label_y: "x".to_owned(),
        });
    }

    if uses_quadratic_fit(model, motion, variable) {
        return Ok(Linearization::identity(x, y, ux, uy, ("t", "x")));
    }

    match model {
        FitModel::Linear => Ok(Linearization::identity(x, y, ux, uy, ("x", "y"))),
        FitModel::PowerLaw => Ok(Linearization {
            x: logarithm(x, "x", log_domain)?,
            y: logarithm(y, "y", log_domain)?,
            ux: relative(ux, x),
            uy: relative(uy, y),
            label_x: "ln(x)".to_owned(),
            label_y: "ln(y)".to_owned(),
        }),
        FitModel::Exponential => Ok(Linearization {
            x: x.to_vec(),
            y: logarithm(y, "y", log_domain)?,
            ux: ux.to_vec(),
            uy: relative(uy, y),
            label_x: "x".to_owned(),
            label_y: "ln(y)".to_owned(),
        }),
    }
}

fn logarithm<E: FitScalar>(
    values: &[E],
    series: &'static str,
    log_domain: LogDomain,
) -> Result<Vec<E>> {
    let mut folded = 0;
    let logs = values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            if value.is_zero() {
                return Err(Error::LogOfZero { series, index });
            }
            if value.is_sign_negative() {
                match log_domain {
                    LogDomain::Strict => {
                        return Err(Error::NegativeUnderLog {
                            series,
                            index,
                            value: to_f64(*value),
                        })
                    }
                    LogDomain::Absolute => folded += 1,
                }
            }
            Ok(value.abs().ln())
        })
        .collect::<Result<Vec<E>>>()?;

    if folded > 0 {
        warn!(series, folded, "negative values folded onto the positive axis before the logarithm");
    }
    Ok(logs)
}

fn relative<E: FitScalar>(uncertainties: &[E], values: &[E]) -> Vec<E> {
    uncertainties
        .iter()
        .zip(values)
        .map(|(u, v)| (*u / *v).abs())
        .collect()
}
