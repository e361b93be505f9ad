pub mod stats;
pub mod tally;
pub mod validate;

/// Share of `part` in `total` as a percentage rounded to two decimals; 0 when nothing was cast.
pub fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 / total as f64 * 10_000.0).round() / 100.0
}
