use std::fmt::Write;

use serde::Serialize;

use crate::math::{constant, to_f64, FitScalar};
use crate::statistics::{mean, sample_std};

/// Chi-squared critical value for two degrees of freedom at the 5% significance level
pub const JARQUE_BERA_CRITICAL: f64 = 5.991;

/// Outcome of a normality test on fit residuals
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NormalityTest<E> {
    pub test_name: String,
    pub statistic: E,
    pub is_normal: bool,
    pub skewness: E,
    /// Excess kurtosis, zero for a normal distribution
    pub kurtosis: E,
    pub interpretation: String,
}

/// Jarque-Bera test of the hypothesis that `residuals` are normally distributed
///
/// With sample skewness $S$ and excess kurtosis $K$ (standardised by the Bessel-corrected
/// standard deviation) the statistic is
/// $$
///     JB = \frac{n}{6} \left( S^2 + \frac{K^2}{4} \right),
/// $$
/// and the residuals are classed as normal when $JB$ is below the $\chi^2_2$ critical value.
///
/// Residuals with no spread, as left by an exact fit, cannot be standardised. They are reported
/// as normal with zero moments rather than propagating a division by zero.
pub fn jarque_bera<E: FitScalar>(residuals: &[E]) -> NormalityTest<E> {
    let n = E::from(residuals.len()).expect("usize must fit in `E`");
    let mean = mean(residuals);
    let std = sample_std(residuals);

    let magnitude = residuals.iter().fold(E::zero(), |acc, r| acc.max(r.abs()));
    if residuals.len() < 2 || std.is_nan() || std <= magnitude * E::epsilon() * constant(16.0) {
        return NormalityTest {
            test_name: "Jarque-Bera".to_owned(),
            statistic: E::zero(),
            is_normal: true,
            skewness: E::zero(),
            kurtosis: E::zero(),
            interpretation: "The residuals are numerically zero, so the data lie exactly on the \
                fitted curve and their distribution cannot be assessed."
                .to_owned(),
        };
    }

    let standardised = residuals.iter().map(|r| (*r - mean) / std);
    let skewness = standardised.clone().map(|z| z.powi(3)).sum::<E>() / n;
    let kurtosis = standardised.map(|z| z.powi(4)).sum::<E>() / n - constant(3.0);

    let statistic =
        n / constant(6.0) * (skewness * skewness + kurtosis * kurtosis / constant(4.0));
    let is_normal = statistic < constant(JARQUE_BERA_CRITICAL);

    NormalityTest {
        test_name: "Jarque-Bera".to_owned(),
        statistic,
        is_normal,
        skewness,
        kurtosis,
        interpretation: interpret(is_normal, to_f64(skewness), to_f64(kurtosis)),
    }
}

fn interpret(is_normal: bool, skewness: f64, kurtosis: f64) -> String {
    if is_normal {
        return "The residuals follow an approximately NORMAL distribution. \
            This supports the fitted model and indicates that the errors are random."
            .to_owned();
    }

    let mut interpretation = String::new();
    if skewness.abs() > 0.5 {
        let direction = if skewness > 0.0 { "positive" } else { "negative" };
        let _ = write!(
            interpretation,
            "The residuals show {direction} ASYMMETRY (skewness = {skewness:.3}). "
        );
    }
    if kurtosis.abs() > 1.0 {
        let tails = if kurtosis > 0.0 { "heavy" } else { "light" };
        let _ = write!(
            interpretation,
            "They have {tails} tails (excess kurtosis = {kurtosis:.3}). "
        );
    }
    interpretation.push_str("Consider reviewing outliers or the fitted model.");
    interpretation
}
