use std::fmt::{Debug, Display};
use std::iter::Sum;

use ndarray::{Array1, Array2, Axis, LinalgScalar};
use num_traits::Float;

/// Floating point types the fitting routines are generic over
pub trait FitScalar: Float + LinalgScalar + Sum + Debug + Display + Send + Sync {}

impl<T> FitScalar for T where T: Float + LinalgScalar + Sum + Debug + Display + Send + Sync {}

/// Convert a literal `f64` constant into `E`
pub(crate) fn constant<E: Float>(value: f64) -> E {
    E::from(value).expect("`f64` constant must fit in `E`")
}

pub(crate) fn to_f64<E: Float>(value: E) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

/// Generate the Vandermonde matrix of `degree` for observations `x`
///
/// The Vandermonde matrix is a (n x degree + 1) matrix. Each row of the matrix is a geometric
/// progression for an individual observation `x` from power `0` to `degree` inclusive.
///
/// # Panics
///
/// The generator panics in the event that `degree` cannot be converted to `i32`. As the maximum
/// value which can be represented by an `i32` is `2_147_483_647i32` this is unlikely to occur so
/// the error probably does not need to be gracefully handled.
///
/// # Examples
///
/// ```
/// use metrofit::math::vandermonde;
/// use ndarray::arr2;
///
/// let observations: Vec<f64> = vec![2., 3.];
/// let vander = vandermonde(&observations, 2);
///
/// let expected = arr2(&[[1., 2., 4.], [1., 3., 9.]]);
/// assert_eq!(vander, expected);
/// ```
pub fn vandermonde<E: Float>(x: &[E], degree: usize) -> Array2<E> {
    Array2::from_shape_fn((x.len(), degree + 1), |(ii, jj)| {
        x[ii].powi(i32::try_from(jj).expect("{jj} doesn't fit in `i32`"))
    })
}

/// Normal equations of a weighted polynomial least squares problem
///
/// For a design matrix $V$ (the Vandermonde matrix of `x`) and diagonal weights $W$ this returns
/// the pair
/// $$
///     A = V^T W V, \quad b = V^T W y
/// $$
/// so that `A[[j, k]]` is $\sum_i w_i x_i^{j + k}$ and `b[j]` is $\sum_i w_i x_i^j y_i$.
pub fn weighted_normal_equations<E: FitScalar>(
    x: &[E],
    y: &[E],
    weights: &[E],
    degree: usize,
) -> (Array2<E>, Array1<E>) {
    let design = vandermonde(x, degree);
    let weights = Array1::from(weights.to_vec()).insert_axis(Axis(1));
    let weighted_design = &design * &weights;
    let y = Array1::from(y.to_vec());

    let matrix = weighted_design.t().dot(&design);
    let rhs = weighted_design.t().dot(&y);
    (matrix, rhs)
}
