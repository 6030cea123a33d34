//! Central moments of a sample
//!
//! Deviations are accumulated around the first observation before the mean is
//! removed, so a constant sample yields exactly zero variance instead of a
//! rounding residue. Skew and excess kurtosis use the bias-corrected sample
//! estimators (adjusted Fisher-Pearson G1 and G2).

use serde::Serialize;

/// Sample moments of a set of finite values
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Moments {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    // Sums of the 2nd/3rd/4th powers of deviations from the mean
    m2: f64,
    m3: f64,
    m4: f64,
}

impl Moments {
    /// Compute moments of `values`, `None` for an empty sample
    pub fn compute(values: &[f64]) -> Option<Self> {
        let shift = *values.first()?;
        let n = values.len() as f64;

        let shifted_mean = values.iter().map(|v| v - shift).sum::<f64>() / n;

        let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
        for v in values {
            let d = (v - shift) - shifted_mean;
            let d2 = d * d;
            m2 += d2;
            m3 += d2 * d;
            m4 += d2 * d2;
        }

        Some(Self {
            count: values.len(),
            mean: shift + shifted_mean,
            min: statrs::statistics::Statistics::min(values),
            max: statrs::statistics::Statistics::max(values),
            m2,
            m3,
            m4,
        })
    }

    /// Sample variance (n - 1 denominator)
    pub fn variance(&self) -> Option<f64> {
        (self.count >= 2).then(|| self.m2 / (self.count - 1) as f64)
    }

    pub fn std_dev(&self) -> Option<f64> {
        self.variance().map(f64::sqrt)
    }

    /// All observations identical
    pub fn is_constant(&self) -> bool {
        self.min == self.max
    }

    /// Adjusted Fisher-Pearson skewness, defined for three or more values
    pub fn skew(&self) -> Option<f64> {
        if self.count < 3 {
            return None;
        }
        if self.m2 == 0.0 {
            return Some(0.0);
        }
        let n = self.count as f64;
        Some(n * (n - 1.0).sqrt() / (n - 2.0) * (self.m3 / self.m2.powf(1.5)))
    }

    /// Bias-corrected excess kurtosis, defined for four or more values
    pub fn kurtosis(&self) -> Option<f64> {
        if self.count < 4 {
            return None;
        }
        let n = self.count as f64;
        let denominator = (n - 2.0) * (n - 3.0) * self.m2 * self.m2;
        if denominator == 0.0 {
            return Some(0.0);
        }
        let adjustment = 3.0 * (n - 1.0).powi(2) / ((n - 2.0) * (n - 3.0));
        Some(n * (n + 1.0) * (n - 1.0) * self.m4 / denominator - adjustment)
    }
}
