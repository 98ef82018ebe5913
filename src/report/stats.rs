//! Descriptive statistics over a set of scores.

use std::fmt;

/// count / mean / std / min / quartiles / max of one column.
///
/// `std` is the sample standard deviation (n - 1). Quantiles interpolate
/// linearly between the closest ranks. Undefined values are NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Describe {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl Describe {
    pub fn of(values: &[f64]) -> Self {
        let count = values.len();
        if count == 0 {
            return Self {
                count,
                mean: f64::NAN,
                std: f64::NAN,
                min: f64::NAN,
                q25: f64::NAN,
                median: f64::NAN,
                q75: f64::NAN,
                max: f64::NAN,
            };
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let mean = sorted.iter().sum::<f64>() / count as f64;
        let std = if count > 1 {
            let ss: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (count - 1) as f64).sqrt()
        } else {
            f64::NAN
        };
        Self {
            count,
            mean,
            std,
            min: sorted[0],
            q25: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q75: quantile(&sorted, 0.75),
            max: sorted[count - 1],
        }
    }

    fn rows(&self) -> [(&'static str, f64); 8] {
        [
            ("count", self.count as f64),
            ("mean", self.mean),
            ("std", self.std),
            ("min", self.min),
            ("25%", self.q25),
            ("50%", self.median),
            ("75%", self.q75),
            ("max", self.max),
        ]
    }

    /// Plain-text table with one labelled column, suitable for a code block
    pub fn to_table(&self, column: &str) -> String {
        let cells: Vec<(&str, String)> = self
            .rows()
            .iter()
            .map(|(label, v)| (*label, if v.is_nan() { "NaN".to_string() } else { format!("{:.6}", v) }))
            .collect();
        let width = cells.iter().map(|(_, c)| c.len()).max().unwrap_or(0).max(column.len());
        let mut out = format!("{:<5}  {:>width$}\n", "", column);
        for (label, cell) in cells {
            out.push_str(&format!("{:<5}  {:>width$}\n", label, cell));
        }
        out.pop();
        out
    }
}

/// Linear interpolation on an ascending, non-empty slice
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

impl fmt::Display for Describe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_table("value"))
    }
}
