//! Light pipeline trait, implemented by every stage.
use crate::error::Error;

pub trait Pipeline<T> {
    /// Stage name, used for logging and summary file names.
    fn name() -> &'static str;
    fn run(&self) -> Result<T, Error>;
}

/// Percentage formatted with one decimal (`"42.0%"`), or `"0%"` when `total` is zero.
pub(crate) fn rate(count: usize, total: usize) -> String {
    if total == 0 {
        "0%".to_string()
    } else {
        format!("{:.1}%", count as f64 / total as f64 * 100.0)
    }
}
