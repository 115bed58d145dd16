use crate::expand::Amount;

/// Next contiguous run of at most `min(amount, limit)` ids starting at `start`.
///
/// Clamps to the end of `ids`; an out-of-range `start` yields an empty slice.
pub fn next_id_slice(ids: &[String], start: usize, amount: Amount, limit: usize) -> &[String] {
    if start >= ids.len() {
        return &[];
    }
    let take = amount.cap(limit);
    let end = start.saturating_add(take).min(ids.len());
    &ids[start..end]
}
