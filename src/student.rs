use crate::math::{constant, FitScalar};

/// Two-tailed 95% critical values of Student's t distribution, keyed by degrees of freedom
const T_TABLE_95: [(usize, f64); 36] = [
    (1, 12.706),
    (2, 4.303),
    (3, 3.182),
    (4, 2.776),
    (5, 2.571),
    (6, 2.447),
    (7, 2.365),
    (8, 2.306),
    (9, 2.262),
    (10, 2.228),
    (11, 2.201),
    (12, 2.179),
    (13, 2.160),
    (14, 2.145),
    (15, 2.131),
    (16, 2.120),
    (17, 2.110),
    (18, 2.101),
    (19, 2.093),
    (20, 2.086),
    (21, 2.080),
    (22, 2.074),
    (23, 2.069),
    (24, 2.064),
    (25, 2.060),
    (26, 2.056),
    (27, 2.052),
    (28, 2.048),
    (29, 2.045),
    (30, 2.042),
    (40, 2.021),
    (50, 2.009),
    (60, 2.000),
    (80, 1.990),
    (100, 1.984),
    (120, 1.980),
];

/// Critical value of the normal distribution used beyond the table
pub const NORMAL_CRITICAL_95: f64 = 1.96;

/// Two-tailed 95% Student t critical value for `df` degrees of freedom
///
/// Tabulated degrees of freedom are exact; in between, values are interpolated linearly from the
/// neighbouring entries. Above 120 degrees of freedom, and for the meaningless `df = 0`, the
/// normal approximation $1.96$ is returned.
pub fn t_critical_95(df: usize) -> f64 {
    if df == 0 || df > 120 {
        return NORMAL_CRITICAL_95;
    }

    match T_TABLE_95.binary_search_by_key(&df, |(key, _)| *key) {
        Ok(index) => T_TABLE_95[index].1,
        Err(index) => {
            // `df` lies strictly between two entries as the table spans 1..=120
            let (lower_df, lower) = T_TABLE_95[index - 1];
            let (upper_df, upper) = T_TABLE_95[index];
            #[allow(clippy::cast_precision_loss)]
            let fraction = (df - lower_df) as f64 / (upper_df - lower_df) as f64;
            lower + fraction * (upper - lower)
        }
    }
}

/// Scale a one sigma standard error to a 95% confidence half-width
pub fn confidence_half_width<E: FitScalar>(standard_error: E, df: usize) -> E {
    standard_error * constant(t_critical_95(df))
}
