use serde::Serialize;

use crate::math::{constant, FitScalar};
use crate::{Error, Result};

/// Descriptive statistics of a numeric series
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Summary<E> {
    pub count: usize,
    pub mean: E,
    /// Sample standard deviation, with Bessel's correction
    pub std: E,
    pub min: E,
    pub max: E,
    pub q1: E,
    pub median: E,
    pub q3: E,
}

/// Summarise `values`
///
/// # Errors
/// Returns [`Error::EmptyInput`] when `values` is empty.
pub fn summarize<E: FitScalar>(values: &[E]) -> Result<Summary<E>> {
    if values.is_empty() {
        return Err(Error::EmptyInput);
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    Ok(Summary {
        count: values.len(),
        mean: mean(values),
        std: sample_std(values),
        min: sorted[0],
        max: sorted[sorted.len() - 1],
        q1: percentile(&sorted, 25.0)?,
        median: percentile(&sorted, 50.0)?,
        q3: percentile(&sorted, 75.0)?,
    })
}

/// Linearly interpolated percentile `p` of an ascending `sorted` series
///
/// The percentile sits at fractional index $p (n - 1) / 100$, between the two neighbouring
/// order statistics.
///
/// # Errors
/// - [`Error::InvalidPercentile`] if `p` is outside `[0, 100]`
/// - [`Error::EmptyInput`] if `sorted` is empty
pub fn percentile<E: FitScalar>(sorted: &[E], p: f64) -> Result<E> {
    if !(0.0..=100.0).contains(&p) {
        return Err(Error::InvalidPercentile(p));
    }
    if sorted.is_empty() {
        return Err(Error::EmptyInput);
    }

    #[allow(clippy::cast_precision_loss)]
    let index = p / 100.0 * (sorted.len() - 1) as f64;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let (lower, upper) = (index.floor() as usize, index.ceil() as usize);
    let fraction: E = constant(index - index.floor());

    Ok(sorted[lower] + fraction * (sorted[upper] - sorted[lower]))
}

pub(crate) fn mean<E: FitScalar>(values: &[E]) -> E {
    values.iter().copied().sum::<E>() / E::from(values.len()).expect("usize must fit in `E`")
}

/// Bessel-corrected standard deviation, zero for fewer than two values
pub(crate) fn sample_std<E: FitScalar>(values: &[E]) -> E {
    if values.len() < 2 {
        return E::zero();
    }
    let mean = mean(values);
    let variance = values.iter().map(|v| (*v - mean) * (*v - mean)).sum::<E>()
        / E::from(values.len() - 1).expect("usize must fit in `E`");
    variance.sqrt()
}
