//! Ranking a value within a yearly series, plus range summaries.

use crate::sentinel::Reading;

/// A 1-based rank among the valid entries of a series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rank {
    /// Ordinal string, e.g. `1st`, `22nd`, `33rd`, `11th`.
    pub rank: String,
    /// Number of valid (non-sentinel) entries in the series.
    pub count: usize,
}

/// English ordinal suffix: 11–13 take `th`, otherwise by last digit.
fn ordinal(n: usize) -> String {
    let suffix = match n % 100 {
        11..=13 => "th",
        _ => match n % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        },
    };
    format!("{n}{suffix}")
}

/// Rank `value` within `series`, warmest first.
///
/// Sentinel entries are filtered out before ranking and never ranked
/// themselves; `None` when `value` is not among the valid entries.
pub fn rank_of(value: f64, series: &[Reading]) -> Option<Rank> {
    let mut valid: Vec<f64> = series.iter().filter_map(Reading::value).collect();
    valid.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));

    let position = valid.iter().position(|v| *v == value)?;
    Some(Rank {
        rank: ordinal(position + 1),
        count: valid.len(),
    })
}

/// Summary of a series' spread, e.g.
/// `Temperature Range: 1.73° C ( 26.41° C to 28.14° C )`.
///
/// `None` when the series holds no valid readings.
pub fn range_summary(label: &str, series: &[Reading]) -> Option<String> {
    let valid: Vec<f64> = series.iter().filter_map(Reading::value).collect();
    if valid.is_empty() {
        return None;
    }
    let min = valid.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = valid.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    Some(format!(
        "{label} Range: {:.2}° C ( {min:.2}° C to {max:.2}° C )",
        max - min
    ))
}
