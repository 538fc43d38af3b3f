use crate::math::{constant, FitScalar};

/// Default per-point uncertainty for a series supplied without one
///
/// The estimate is a tenth of a quadratic-mean based standard error
/// $$
///     u = 0.1 \sqrt{\frac{1}{n} \frac{\sum_i v_i^2}{n}}
/// $$
/// and is the same for every point. Note the sum runs over the raw values rather than the
/// deviations from the mean, so this is a coarse default rather than a strict Type A evaluation.
/// Callers who need the latter should supply explicit uncertainties.
pub fn type_a_uncertainty<E: FitScalar>(values: &[E]) -> Vec<E> {
    if values.is_empty() {
        return vec![];
    }
    let n = E::from(values.len()).expect("usize must fit in `E`");
    let mean_square = values.iter().map(|v| *v * *v).sum::<E>() / n;
    let standard_error = (mean_square / n).sqrt();
    let uncertainty = standard_error * constant(0.1);

    vec![uncertainty; values.len()]
}
