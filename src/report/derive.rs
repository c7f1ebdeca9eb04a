// src/report/derive.rs
use super::types::Rate;

/// Split an aggregate insertion rate between women and men in proportion to their
/// headcount: `total * group / (female + male)`.
///
/// This is a linear apportionment, not a measured per-gender rate. Both results are
/// `Unavailable` when the aggregate is, or when the headcounts sum to zero.
pub fn apportion(total: Rate, female: u32, male: i64) -> (Rate, Rate) {
    let headcount = female as i64 + male;
    match total {
        Rate::Value(t) if headcount != 0 => {
            let denom = headcount as f64;
            (
                Rate::Value(t * female as f64 / denom),
                Rate::Value(t * male as f64 / denom),
            )
        }
        _ => (Rate::Unavailable, Rate::Unavailable),
    }
}
