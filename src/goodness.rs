use serde::Serialize;

use crate::math::FitScalar;
use crate::statistics::mean;

/// Goodness-of-fit statistics shared by every fit shape
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FitStatistics<E> {
    /// Coefficient of determination, clamped to `[0, 1]`
    pub r_squared: E,
    /// $\chi^2 / \nu$ using the linearized uncertainties
    pub reduced_chi_squared: E,
    /// $\sqrt{SS_{res} / \nu}$
    pub residual_std: E,
    pub degrees_of_freedom: usize,
    pub points: usize,
}

impl<E: FitScalar> FitStatistics<E> {
    /// Score observed values `y` given the `residuals` of a fit with `parameters` free parameters
    ///
    /// The caller guarantees more points than parameters.
    pub fn evaluate(y: &[E], residuals: &[E], uy: &[E], parameters: usize) -> Self {
        let degrees_of_freedom = y.len() - parameters;
        Self {
            r_squared: r_squared_from_residuals(y, residuals),
            reduced_chi_squared: reduced_chi_squared(residuals, uy, degrees_of_freedom),
            residual_std: residual_std(residuals, degrees_of_freedom),
            degrees_of_freedom,
            points: y.len(),
        }
    }
}

/// Pointwise `observed - fitted`
pub fn residuals<E: FitScalar>(observed: &[E], fitted: &[E]) -> Vec<E> {
    observed.iter().zip(fitted).map(|(y, f)| *y - *f).collect()
}

/// $R^2 = 1 - SS_{res} / SS_{tot}$, never negative
///
/// A constant `observed` series has no variance to explain, in which case $R^2$ is one for a
/// perfect fit and zero otherwise.
pub fn r_squared<E: FitScalar>(observed: &[E], fitted: &[E]) -> E {
    r_squared_from_residuals(observed, &residuals(observed, fitted))
}

fn r_squared_from_residuals<E: FitScalar>(observed: &[E], residuals: &[E]) -> E {
    let y_mean = mean(observed);
    let ss_res = sum_of_squares(residuals);
    let ss_tot = observed
        .iter()
        .map(|y| (*y - y_mean) * (*y - y_mean))
        .sum::<E>();

    if ss_tot.is_zero() {
        return if ss_res.is_zero() { E::one() } else { E::zero() };
    }
    (E::one() - ss_res / ss_tot).max(E::zero()).min(E::one())
}

/// $\chi^2_\nu = \frac{1}{\nu} \sum_i r_i^2 / u_i^2$
pub fn reduced_chi_squared<E: FitScalar>(residuals: &[E], uncertainties: &[E], df: usize) -> E {
    let chi_squared = residuals
        .iter()
        .zip(uncertainties)
        .map(|(r, u)| (*r * *r) / (*u * *u))
        .sum::<E>();
    chi_squared / E::from(df).expect("usize must fit in `E`")
}

/// $\sqrt{SS_{res} / \nu}$
pub fn residual_std<E: FitScalar>(residuals: &[E], df: usize) -> E {
    (sum_of_squares(residuals) / E::from(df).expect("usize must fit in `E`")).sqrt()
}

fn sum_of_squares<E: FitScalar>(values: &[E]) -> E {
    values.iter().map(|v| *v * *v).sum()
}
