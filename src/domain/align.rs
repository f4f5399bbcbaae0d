//! Trailing-window alignment of unequal-length series.
//!
//! Two series fetched over the same trailing calendar window at the same
//! frequency differ only in how far back history goes, so the shorter one
//! is matched positionally against the tail of the longer one. No
//! timestamp join is performed; this is an approximation, not a guaranteed
//! timestamp match.

use crate::domain::error::CoinbetaError;

/// The last `target_len` elements of `longer`.
///
/// Fails with [`CoinbetaError::MisalignedSeries`] when the reference series
/// is shorter than the target — roles are never swapped.
pub fn align_tail<T>(target_len: usize, longer: &[T]) -> Result<&[T], CoinbetaError> {
    if target_len > longer.len() {
        return Err(CoinbetaError::MisalignedSeries {
            need: target_len,
            have: longer.len(),
        });
    }
    Ok(&longer[longer.len() - target_len..])
}
