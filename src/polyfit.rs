use itertools::izip;
use ndarray::{array, Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::math::{constant, to_f64, weighted_normal_equations, FitScalar};
use crate::student::confidence_half_width;
use crate::{Error, Result};

/// A fitted quantity and its 95% confidence half-width
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Estimate<E> {
    pub value: E,
    pub uncertainty: E,
}

impl<E: FitScalar> Estimate<E> {
    pub const fn new(value: E, uncertainty: E) -> Self {
        Self { value, uncertainty }
    }

    /// Multiply by an exact constant
    #[must_use]
    pub fn scale(&self, factor: E) -> Self {
        Self {
            value: self.value * factor,
            uncertainty: self.uncertainty * factor.abs(),
        }
    }
}

/// How the uncertainties of the quadratic fit are estimated
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuadraticUncertainty {
    /// Diagonal-only estimates built from the weighted power sums. This is an approximation
    /// which ignores the correlation between coefficients.
    #[default]
    Diagonal,
    /// Diagonal of the inverse normal equations matrix, scaled by the residual deviation
    Covariance,
}

/// Straight line $y = m x + b$ fitted by weighted least squares
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LinearFit<E> {
    pub slope: Estimate<E>,
    pub intercept: Estimate<E>,
}

impl<E: FitScalar> LinearFit<E> {
    pub fn predict(&self, x: E) -> E {
        self.slope.value * x + self.intercept.value
    }

    /// Prefactor $A = e^b$ of a power law or exponential fitted in log space
    ///
    /// The uncertainty is propagated to first order, $u(A) = A \, u(b)$.
    pub fn amplitude(&self) -> Estimate<E> {
        let value = self.intercept.value.exp();
        Estimate::new(value, value * self.intercept.uncertainty)
    }
}

/// Kinematic parabola $x = x_0 + v_0 t + \frac{1}{2} a t^2$ fitted by weighted least squares
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct QuadraticFit<E> {
    pub initial_position: Estimate<E>,
    pub initial_velocity: Estimate<E>,
    pub acceleration: Estimate<E>,
    /// Polynomial coefficients $c_0, c_1, c_2$ in ascending order of power
    pub coefficients: [E; 3],
}

impl<E: FitScalar> QuadraticFit<E> {
    pub fn predict(&self, t: E) -> E {
        let [c0, c1, c2] = self.coefficients;
        c0 + c1 * t + c2 * t * t
    }
}

fn inverse_variance_weights<E: FitScalar>(uy: &[E]) -> Vec<E> {
    uy.iter().map(|u| (*u * *u).recip()).collect()
}

/// Fit a straight line to `(x, y)` with weights $1 / u_y^2$
///
/// The normal equations are solved in centred form. With the weighted means $\bar x$, $\bar y$
/// and the sums $S_{xx} = \sum w (x - \bar x)^2$, $S_{xy} = \sum w (x - \bar x)(y - \bar y)$
/// $$
///     m = \frac{S_{xy}}{S_{xx}}, \quad b = \bar y - m \bar x, \quad \Delta = S_w S_{xx},
/// $$
/// which equals the textbook $\Delta = S_w S_{wxx} - S_{wx}^2$ without its cancellation. The
/// standard errors $\sqrt{S_w / \Delta}$ and $\sqrt{S_{wxx} / \Delta}$ are reported as 95%
/// half-widths using the Student t value for $n - 2$ degrees of freedom.
///
/// # Errors
/// Returns [`Error::SingularSystem`] if the weighted spread of `x`, $\sqrt{S_{xx} / S_w}$, is at
/// most `tolerance` times the largest $|x|$, as happens when all `x` coincide. The test is
/// dimensionless, so it does not depend on the units of `x` or on the size of the weights.
pub fn fit_linear<E: FitScalar>(x: &[E], y: &[E], uy: &[E], tolerance: f64) -> Result<LinearFit<E>> {
    let weights = inverse_variance_weights(uy);
    let sum_w = weights.iter().copied().sum::<E>();
    let x_mean = weighted_mean(&weights, x, sum_w);
    let y_mean = weighted_mean(&weights, y, sum_w);

    let (mut s_xx, mut s_xy) = (E::zero(), E::zero());
    for (w, x, y) in izip!(&weights, x, y) {
        let (dx, dy) = (*x - x_mean, *y - y_mean);
        s_xx = s_xx + *w * dx * dx;
        s_xy = s_xy + *w * dx * dy;
    }
    let delta = sum_w * s_xx;

    let spread = (s_xx / sum_w).sqrt();
    let magnitude = x.iter().fold(E::zero(), |acc, x| acc.max(x.abs()));
    if !delta.is_finite() || delta <= E::zero() || spread <= magnitude * constant(tolerance) {
        return Err(Error::SingularSystem {
            determinant: to_f64(delta),
        });
    }

    let slope = s_xy / s_xx;
    let intercept = y_mean - slope * x_mean;

    let df = x.len().saturating_sub(2);
    // S_w / delta = 1 / S_xx and S_wxx / delta = 1 / S_w + mean(x)^2 / S_xx
    let u_slope = confidence_half_width(s_xx.recip().sqrt(), df);
    let u_intercept =
        confidence_half_width((sum_w.recip() + x_mean * x_mean / s_xx).sqrt(), df);

    debug!(
        slope = to_f64(slope),
        intercept = to_f64(intercept),
        determinant = to_f64(delta),
        df,
        "weighted linear fit"
    );

    Ok(LinearFit {
        slope: Estimate::new(slope, u_slope),
        intercept: Estimate::new(intercept, u_intercept),
    })
}

fn weighted_mean<E: FitScalar>(weights: &[E], values: &[E], sum_w: E) -> E {
    izip!(weights, values).map(|(w, v)| *w * *v).sum::<E>() / sum_w
}

/// Fit $y = c_0 + c_1 x + c_2 x^2$ with weights $1 / u_y^2$ and read it as a kinematic parabola
///
/// The abscissae are first mapped onto $\tau = (x - \bar x) / s$, with $\bar x$ the weighted mean
/// and $s$ the largest distance from it, so the normal equations stay well scaled whatever the
/// units of `x`. They are solved there by Gaussian elimination and the coefficients mapped back.
/// The coefficients map onto $x_0 = c_0$, $v_0 = c_1$ and $a = 2 c_2$, with uncertainties
/// estimated according to `method` and scaled by the residual standard deviation and the Student
/// t value for $n - 3$ degrees of freedom.
///
/// # Errors
/// - [`Error::TooFewPoints`] if fewer than four points leave no residual degree of freedom
/// - [`Error::UnstableSystem`] or [`Error::SingularSystem`] for degenerate abscissae
pub fn fit_quadratic<E: FitScalar>(
    x: &[E],
    y: &[E],
    uy: &[E],
    method: QuadraticUncertainty,
) -> Result<QuadraticFit<E>> {
    if x.len() < 4 {
        return Err(Error::TooFewPoints {
            got: x.len(),
            min: 4,
        });
    }

    let weights = inverse_variance_weights(uy);
    let sum_w = weights.iter().copied().sum::<E>();
    let centre = weighted_mean(&weights, x, sum_w);
    let span = x
        .iter()
        .fold(E::zero(), |acc, x| acc.max((*x - centre).abs()));
    let magnitude = x.iter().fold(E::zero(), |acc, x| acc.max(x.abs()));
    if !span.is_finite() || span <= magnitude * E::epsilon() * constant(16.0) {
        // Coincident abscissae, the normal equations matrix has rank one
        return Err(Error::SingularSystem { determinant: 0.0 });
    }

    let tau = x.iter().map(|x| (*x - centre) / span).collect::<Vec<_>>();
    let (matrix, rhs) = weighted_normal_equations(&tau, y, &weights, 2);
    let scaled = solve_linear_system(matrix.clone(), rhs)?;

    // c = back * d for y = d_0 + d_1 tau + d_2 tau^2
    let two: E = constant(2.0);
    let span_squared = span * span;
    let back = array![
        [E::one(), -centre / span, centre * centre / span_squared],
        [E::zero(), span.recip(), -two * centre / span_squared],
        [E::zero(), E::zero(), span_squared.recip()],
    ];
    let solution = back.dot(&scaled);
    let coefficients = [solution[0], solution[1], solution[2]];

    let df = x.len() - 3;
    let ss_res = izip!(&tau, y)
        .map(|(tau, y)| {
            let residual = *y - (scaled[0] + scaled[1] * *tau + scaled[2] * *tau * *tau);
            residual * residual
        })
        .sum::<E>();
    let s_res = (ss_res / E::from(df).expect("usize must fit in `E`")).sqrt();

    let [sigma_x0, sigma_v0, sigma_half_a] = match method {
        QuadraticUncertainty::Diagonal => {
            let power_sum = |power: i32| {
                izip!(&weights, x)
                    .map(|(w, x)| *w * x.powi(power))
                    .sum::<E>()
            };
            let (sum_wt2, sum_wt4) = (power_sum(2), power_sum(4));
            // S_w S_wt2 - S_wt^2, in centred form
            let denominator = sum_w
                * izip!(&weights, x)
                    .map(|(w, x)| *w * (*x - centre) * (*x - centre))
                    .sum::<E>();
            if denominator <= E::zero() {
                return Err(Error::SingularSystem {
                    determinant: to_f64(denominator),
                });
            }
            [
                (sum_wt2 / denominator).sqrt(),
                sum_wt2.recip().sqrt(),
                sum_wt4.recip().sqrt(),
            ]
        }
        QuadraticUncertainty::Covariance => {
            // Inverse of the raw normal equations matrix, carried back from tau
            let covariance = back.dot(&invert(matrix)?).dot(&back.t());
            [
                covariance[[0, 0]].sqrt(),
                covariance[[1, 1]].sqrt(),
                covariance[[2, 2]].sqrt(),
            ]
        }
    };

    debug!(
        x0 = to_f64(coefficients[0]),
        v0 = to_f64(coefficients[1]),
        a = to_f64(two * coefficients[2]),
        s_res = to_f64(s_res),
        df,
        ?method,
        "weighted quadratic fit"
    );

    Ok(QuadraticFit {
        initial_position: Estimate::new(
            coefficients[0],
            confidence_half_width(s_res * sigma_x0, df),
        ),
        initial_velocity: Estimate::new(
            coefficients[1],
            confidence_half_width(s_res * sigma_v0, df),
        ),
        // u(a) = 2 u(a / 2)
        acceleration: Estimate::new(
            coefficients[2],
            confidence_half_width(s_res * sigma_half_a, df),
        )
        .scale(two),
        coefficients,
    })
}

/// Solve the square system `matrix * z = rhs` by Gaussian elimination with partial pivoting
///
/// At each step the row holding the largest magnitude entry of the pivot column is swapped onto
/// the diagonal before the column is eliminated below it. Back substitution then recovers `z`.
///
/// # Panics
/// If `matrix` is not square, or its dimension differs from `rhs`.
///
/// # Errors
/// Returns [`Error::UnstableSystem`] when a pivot is negligible relative to the largest entry of
/// `matrix`.
///
/// # Examples
///
/// ```
/// use metrofit::polyfit::solve_linear_system;
/// use ndarray::{arr1, arr2};
///
/// let matrix = arr2(&[[0., 2.], [1., 1.]]);
/// let solution = solve_linear_system(matrix, arr1(&[4., 3.])).unwrap();
///
/// assert_eq!(solution, arr1(&[1., 2.]));
/// ```
pub fn solve_linear_system<E: FitScalar>(matrix: Array2<E>, rhs: Array1<E>) -> Result<Array1<E>> {
    let n = rhs.len();
    assert_eq!(matrix.dim(), (n, n), "system must be square and match the rhs");

    let scale = matrix.iter().fold(E::zero(), |acc, v| acc.max(v.abs()));
    let tolerance = scale * E::epsilon() * constant(1024.0);

    let mut augmented = Array2::zeros((n, n + 1));
    augmented.slice_mut(ndarray::s![.., ..n]).assign(&matrix);
    augmented.column_mut(n).assign(&rhs);

    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|a, b| {
                augmented[[*a, col]]
                    .abs()
                    .partial_cmp(&augmented[[*b, col]].abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(col);

        let pivot = augmented[[pivot_row, col]];
        if pivot.is_nan() || pivot.abs() <= tolerance {
            return Err(Error::UnstableSystem {
                pivot: to_f64(pivot),
                column: col,
            });
        }

        if pivot_row != col {
            for jj in 0..=n {
                augmented.swap([col, jj], [pivot_row, jj]);
            }
        }

        for row in (col + 1)..n {
            let factor = augmented[[row, col]] / pivot;
            for jj in col..=n {
                augmented[[row, jj]] = augmented[[row, jj]] - factor * augmented[[col, jj]];
            }
        }
    }

    let mut solution = Array1::zeros(n);
    for row in (0..n).rev() {
        let mut sum = augmented[[row, n]];
        for jj in (row + 1)..n {
            sum = sum - augmented[[row, jj]] * solution[jj];
        }
        solution[row] = sum / augmented[[row, row]];
    }

    Ok(solution)
}

/// Invert a square matrix column by column with [`solve_linear_system`]
///
/// # Errors
/// Propagates [`Error::UnstableSystem`] for singular matrices.
pub fn invert<E: FitScalar>(matrix: Array2<E>) -> Result<Array2<E>> {
    let n = matrix.nrows();
    let mut inverse = Array2::zeros((n, n));
    for col in 0..n {
        let mut unit = Array1::zeros(n);
        unit[col] = E::one();
        let column = solve_linear_system(matrix.clone(), unit)?;
        inverse.column_mut(col).assign(&column);
    }
    Ok(inverse)
}

#[cfg(test)]
mod tests {
    use ndarray::{arr1, arr2, Array2};
    use ndarray_rand::rand::{Rng, SeedableRng};
    use ndarray_rand::rand_distr::Uniform;
    use ndarray_rand::RandomExt;
    use rand_isaac::isaac64::Isaac64Rng;

    use super::{
        fit_linear, fit_quadratic, invert, solve_linear_system, Estimate, QuadraticUncertainty,
    };
    use crate::math::weighted_normal_equations;
    use crate::Error;

    const TOLERANCE: f64 = 1e-10;

    #[test]
    fn exact_line_is_recovered() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, 6.0, 8.0, 10.0];
        let uy = [0.1; 5];

        let fit = fit_linear(&x, &y, &uy, TOLERANCE).unwrap();

        approx::assert_relative_eq!(fit.slope.value, 2.0, max_relative = 1e-12);
        approx::assert_abs_diff_eq!(fit.intercept.value, 0.0, epsilon = 1e-12);
        assert!(fit.slope.uncertainty > 0.0);
        assert!(fit.intercept.uncertainty > 0.0);
    }

    #[test]
    fn linear_uncertainties_are_scaled_by_student_t() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.1, 3.9, 6.2, 7.8, 10.1];
        let uy = [0.5; 5];

        let fit = fit_linear(&x, &y, &uy, TOLERANCE).unwrap();

        // w = 4: S_w = 20, S_wx = 60, S_wxx = 220, delta = 800
        approx::assert_relative_eq!(
            fit.slope.uncertainty,
            (20.0_f64 / 800.0).sqrt() * 3.182,
            max_relative = 1e-12
        );
        approx::assert_relative_eq!(
            fit.intercept.uncertainty,
            (220.0_f64 / 800.0).sqrt() * 3.182,
            max_relative = 1e-12
        );
    }

    #[test]
    fn heavier_weights_pull_the_line() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [0.0, 1.0, 2.0, 4.0];
        let loose = fit_linear(&x, &y, &[1.0, 1.0, 1.0, 100.0], TOLERANCE).unwrap();
        let tight = fit_linear(&x, &y, &[1.0, 1.0, 1.0, 0.01], TOLERANCE).unwrap();

        // Down-weighting the outlier recovers the line through the first three points
        approx::assert_relative_eq!(loose.slope.value, 1.0, max_relative = 1e-3);
        assert!(tight.slope.value > loose.slope.value);
    }

    #[test]
    fn coincident_abscissae_are_singular() {
        for value in [2.0, 3.0, 0.7] {
            let x = [value; 5];
            let y = [1.0, 2.0, 3.0, 4.0, 5.0];
            let error = fit_linear(&x, &y, &[0.1; 5], TOLERANCE).unwrap_err();
            assert!(matches!(error, Error::SingularSystem { .. }));
            assert!(error.is_singular());
        }
    }

    #[test]
    fn offset_abscissae_are_not_singular() {
        for offset in [1e5, 1e7] {
            let x = (0..5_i32).map(|ii| offset + f64::from(ii)).collect::<Vec<_>>();
            let y = x.iter().map(|x| 2.0 * (x - offset) + 1.0).collect::<Vec<_>>();

            let fit = fit_linear(&x, &y, &[1.0; 5], TOLERANCE).unwrap();

            approx::assert_relative_eq!(fit.slope.value, 2.0, max_relative = 1e-9);
            approx::assert_abs_diff_eq!(fit.predict(offset), 1.0, epsilon = 1e-6);
            // w = 1: S_xx = 10
            approx::assert_relative_eq!(
                fit.slope.uncertainty,
                0.1_f64.sqrt() * 3.182,
                max_relative = 1e-9
            );
        }
    }

    #[test]
    fn small_weights_do_not_make_the_line_singular() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = x.map(|x| 1e5 * x + 3e5);

        let fit = fit_linear(&x, &y, &[3e4; 5], TOLERANCE).unwrap();

        approx::assert_relative_eq!(fit.slope.value, 1e5, max_relative = 1e-12);
        approx::assert_relative_eq!(fit.intercept.value, 3e5, max_relative = 1e-12);
    }

    #[test]
    fn amplitude_is_the_exponentiated_intercept() {
        let intercept = Estimate::new(2.0_f64.ln(), 0.1);
        let fit = super::LinearFit {
            slope: Estimate::new(1.5, 0.01),
            intercept,
        };
        let amplitude = fit.amplitude();
        approx::assert_relative_eq!(amplitude.value, 2.0, max_relative = 1e-12);
        approx::assert_relative_eq!(amplitude.uncertainty, 0.2, max_relative = 1e-12);
    }

    #[test]
    fn exact_parabola_is_recovered() {
        let (x0, v0, a) = (1.5, -0.75, 9.81);
        let t = (0..10_i32).map(|ii| f64::from(ii) * 0.2).collect::<Vec<_>>();
        let x = t
            .iter()
            .map(|t| x0 + v0 * t + 0.5 * a * t * t)
            .collect::<Vec<_>>();
        let ux = vec![0.01; t.len()];

        for method in [QuadraticUncertainty::Diagonal, QuadraticUncertainty::Covariance] {
            let fit = fit_quadratic(&t, &x, &ux, method).unwrap();
            approx::assert_relative_eq!(fit.initial_position.value, x0, max_relative = 1e-9);
            approx::assert_relative_eq!(fit.initial_velocity.value, v0, max_relative = 1e-9);
            approx::assert_relative_eq!(fit.acceleration.value, a, max_relative = 1e-9);
            for (t, x) in t.iter().zip(&x) {
                approx::assert_abs_diff_eq!(fit.predict(*t), *x, epsilon = 1e-9);
            }
            // Zero residual scatter leaves (numerically) zero uncertainty
            assert!(fit.acceleration.uncertainty < 1e-6);
        }
    }

    #[test]
    fn quadratic_uncertainty_follows_the_diagonal_approximation() {
        let seed = 40;
        let mut rng = Isaac64Rng::seed_from_u64(seed);
        let t = (0..12_i32).map(|ii| f64::from(ii) * 0.5).collect::<Vec<_>>();
        let x = t
            .iter()
            .map(|t| 0.2 + 1.1 * t + 0.5 * 2.0 * t * t + rng.gen_range(-0.05..0.05))
            .collect::<Vec<_>>();
        let ux = vec![0.05; t.len()];

        let fit = fit_quadratic(&t, &x, &ux, QuadraticUncertainty::Diagonal).unwrap();

        let w = 400.0;
        let sum_wt4: f64 = t.iter().map(|t| w * t.powi(4)).sum();
        let ss_res: f64 = t
            .iter()
            .zip(&x)
            .map(|(t, x)| (x - fit.predict(*t)).powi(2))
            .sum();
        let s_res = (ss_res / 9.0).sqrt();
        let expected = 2.0 * s_res * (1.0 / sum_wt4).sqrt() * 2.262;
        approx::assert_relative_eq!(fit.acceleration.uncertainty, expected, max_relative = 1e-9);
        approx::assert_relative_eq!(fit.acceleration.value, 2.0, max_relative = 0.05);
    }

    #[test]
    fn quadratic_uncertainty_follows_the_inverse_normal_matrix() {
        let seed = 40;
        let mut rng = Isaac64Rng::seed_from_u64(seed);
        let t = (0..12_i32).map(|ii| f64::from(ii) * 0.5).collect::<Vec<_>>();
        let x = t
            .iter()
            .map(|t| 0.2 + 1.1 * t + 0.5 * 2.0 * t * t + rng.gen_range(-0.05..0.05))
            .collect::<Vec<_>>();
        let ux = vec![0.05; t.len()];

        let fit = fit_quadratic(&t, &x, &ux, QuadraticUncertainty::Covariance).unwrap();

        let weights = ux.iter().map(|u| 1.0 / (u * u)).collect::<Vec<_>>();
        let (matrix, _) = weighted_normal_equations(&t, &x, &weights, 2);
        let inverse = invert(matrix).unwrap();
        let ss_res: f64 = t
            .iter()
            .zip(&x)
            .map(|(t, x)| (x - fit.predict(*t)).powi(2))
            .sum();
        let s_res = (ss_res / 9.0).sqrt();
        assert!(s_res > 0.0);
        let half_width = |k: usize| s_res * inverse[[k, k]].sqrt() * 2.262;

        approx::assert_relative_eq!(
            fit.initial_position.uncertainty,
            half_width(0),
            max_relative = 1e-8
        );
        approx::assert_relative_eq!(
            fit.initial_velocity.uncertainty,
            half_width(1),
            max_relative = 1e-8
        );
        approx::assert_relative_eq!(
            fit.acceleration.uncertainty,
            2.0 * half_width(2),
            max_relative = 1e-8
        );
    }

    #[test]
    fn short_captures_are_fitted_in_scaled_time() {
        // Ten samples spanning 0.9 ms
        let (x0, v0, a) = (0.01, 2.0, 9.81);
        let t = (0..10_i32).map(|ii| f64::from(ii) * 1e-4).collect::<Vec<_>>();
        let x = t
            .iter()
            .map(|t| x0 + v0 * t + 0.5 * a * t * t)
            .collect::<Vec<_>>();
        let ux = vec![1e-6; t.len()];

        for method in [QuadraticUncertainty::Diagonal, QuadraticUncertainty::Covariance] {
            let fit = fit_quadratic(&t, &x, &ux, method).unwrap();
            approx::assert_relative_eq!(fit.initial_position.value, x0, max_relative = 1e-9);
            approx::assert_relative_eq!(fit.initial_velocity.value, v0, max_relative = 1e-6);
            approx::assert_relative_eq!(fit.acceleration.value, a, max_relative = 1e-6);
            assert!(fit.acceleration.uncertainty.is_finite());
        }
    }

    #[test]
    fn quadratic_fit_needs_a_residual_degree_of_freedom() {
        let error = fit_quadratic(
            &[0.0, 1.0, 2.0],
            &[0.0, 1.0, 4.0],
            &[0.1; 3],
            QuadraticUncertainty::Diagonal,
        )
        .unwrap_err();
        assert!(matches!(error, Error::TooFewPoints { got: 3, min: 4 }));
    }

    #[test]
    fn coincident_times_are_singular() {
        let error = fit_quadratic(
            &[2.0; 6],
            &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
            &[0.1; 6],
            QuadraticUncertainty::Diagonal,
        )
        .unwrap_err();
        assert!(error.is_singular());
    }

    #[test]
    fn elimination_pivots_on_the_largest_entry() {
        // A zero leading entry forces a row swap
        let matrix = arr2(&[[0.0, 1.0, 2.0], [1.0, 0.0, 3.0], [4.0, -3.0, 8.0]]);
        let expected = arr1(&[1.0, -2.0, 0.5]);
        let rhs = matrix.dot(&expected);

        let solution = solve_linear_system(matrix, rhs).unwrap();
        for (actual, expected) in solution.iter().zip(expected.iter()) {
            approx::assert_relative_eq!(actual, expected, max_relative = 1e-12);
        }
    }

    #[test]
    fn random_systems_are_solved() {
        let seed = 40;
        let mut rng = Isaac64Rng::seed_from_u64(seed);
        let dim = 5;
        let matrix = Array2::random_using((dim, dim), Uniform::new(-1., 1.), &mut rng)
            + Array2::<f64>::eye(dim) * 5.0;
        let expected = ndarray::Array1::random_using(dim, Uniform::new(-10., 10.), &mut rng);
        let rhs = matrix.dot(&expected);

        let solution = solve_linear_system(matrix, rhs).unwrap();
        for (actual, expected) in solution.iter().zip(expected.iter()) {
            approx::assert_relative_eq!(actual, expected, max_relative = 1e-10);
        }
    }

    #[test]
    fn singular_matrix_is_rejected() {
        let matrix = arr2(&[[1.0, 2.0], [2.0, 4.0]]);
        let error = solve_linear_system(matrix, arr1(&[1.0, 2.0])).unwrap_err();
        assert!(matches!(error, Error::UnstableSystem { column: 1, .. }));
    }

    #[test]
    fn inverse_times_matrix_is_the_identity() {
        let matrix = arr2(&[[4.0, 1.0, 2.0], [1.0, 3.0, 0.5], [2.0, 0.5, 5.0]]);
        let inverse = invert(matrix.clone()).unwrap();
        let product = matrix.dot(&inverse);
        for ((ii, jj), value) in product.indexed_iter() {
            let expected = if ii == jj { 1.0 } else { 0.0 };
            approx::assert_abs_diff_eq!(*value, expected, epsilon = 1e-12);
        }
    }
}
