//! Nearest-color snapping against a fixed reference palette.

use crate::color::{Color, distance_squared};
use crate::error::{Error, Result};

/// Index of the reference entry closest to `color`.
///
/// Ties go to the entry declared first. `reference` must not be empty.
#[inline]
pub(crate) fn nearest_index(color: Color, reference: &[Color]) -> usize {
    let mut best_idx = 0;
    let mut best_dist = u32::MAX;
    for (idx, candidate) in reference.iter().enumerate() {
        let dist = distance_squared(color, *candidate);
        // strict `<` keeps the earliest of equidistant entries
        if dist < best_dist {
            best_dist = dist;
            best_idx = idx;
        }
    }
    best_idx
}

/// Snap every candidate to its nearest reference color, in input order.
///
/// The output has one entry per candidate and is not deduplicated.
///
/// # Errors
///
/// [`Error::EmptyPalette`] if `reference` is empty.
pub fn match_to_palette(candidates: &[Color], reference: &[Color]) -> Result<Vec<Color>> {
    if reference.is_empty() {
        return Err(Error::EmptyPalette);
    }
    let matched: Vec<Color> = candidates
        .iter()
        .map(|&c| reference[nearest_index(c, reference)])
        .collect();
    tracing::debug!(
        candidates = candidates.len(),
        reference = reference.len(),
        "snapped colors to reference palette"
    );
    Ok(matched)
}
