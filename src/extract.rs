//! Palette discovery: the exact set of colors in an image, or a bounded set
//! of dominant colors found by k-means.

use std::collections::HashSet;

use kmeans_colors::get_kmeans;
use palette::Srgb;

use crate::buffer::PixelBuffer;
use crate::color::{Color, key};
use crate::error::{Error, Result};
use crate::matcher::match_to_palette;

pub const DEFAULT_MAX_COLORS: usize = 10;
pub const DEFAULT_SEED: u64 = 0;
pub const KMEANS_MAX_ITER: usize = 20;
pub const KMEANS_CONVERGE: f32 = 1e-4;
/// `kmeans_colors` stores cluster assignments as `u8`.
pub const MAX_CLUSTERS: usize = 256;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExtractMode {
    /// Every distinct color actually present.
    Exact,
    /// At most `max_colors` k-means centroids.
    #[default]
    Clustering,
}

/// Parameters for [`extract_colors`].
#[derive(Clone, Debug, PartialEq)]
pub struct ExtractOptions {
    pub mode: ExtractMode,
    /// Upper bound on the clustered palette. Must be in `1..=MAX_CLUSTERS`.
    pub max_colors: usize,
    /// In clustering mode, centroids are snapped to this palette. In exact
    /// mode, only the entries that occur in the image are kept.
    pub reference: Option<Vec<Color>>,
    /// Seed for centroid initialisation. Same pixels + same seed gives the
    /// same output.
    pub seed: u64,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            mode: ExtractMode::default(),
            max_colors: DEFAULT_MAX_COLORS,
            reference: None,
            seed: DEFAULT_SEED,
        }
    }
}

impl ExtractOptions {
    pub fn exact() -> Self {
        Self {
            mode: ExtractMode::Exact,
            ..Self::default()
        }
    }

    pub fn clustering(max_colors: usize) -> Self {
        Self {
            mode: ExtractMode::Clustering,
            max_colors,
            ..Self::default()
        }
    }

    pub fn with_reference(mut self, reference: Vec<Color>) -> Self {
        self.reference = Some(reference);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.max_colors == 0 || self.max_colors > MAX_CLUSTERS {
            return Err(Error::invalid_parameter("max_colors", self.max_colors));
        }
        Ok(())
    }
}

/// Extract the palette of `buffer`.
///
/// Exact mode returns distinct colors in first-occurrence row-major order
/// (`max_colors` is validated but does not truncate). With a reference
/// palette, exact mode instead returns the reference entries present in
/// the image, in reference order.
///
/// Clustering mode partitions every pixel into `max_colors` groups and
/// returns the rounded cluster means, snapped to the reference palette if one
/// is given. The result is deduplicated (first occurrence wins) and never
/// longer than `max_colors`.
///
/// # Errors
///
/// - [`Error::InvalidParameter`] if `max_colors` is 0 or above [`MAX_CLUSTERS`]
/// - [`Error::EmptyPalette`] if a reference palette is given but empty
pub fn extract_colors(buffer: &PixelBuffer, options: &ExtractOptions) -> Result<Vec<Color>> {
    options.validate()?;
    let reference = options.reference.as_deref().map(reference_palette).transpose()?;

    let colors = match options.mode {
        ExtractMode::Exact => {
            let distinct = distinct_colors(buffer.pixels());
            match reference {
                Some(reference) => {
                    let present: HashSet<[u8; 3]> = distinct.iter().map(|&c| key(c)).collect();
                    reference
                        .into_iter()
                        .filter(|&c| present.contains(&key(c)))
                        .collect()
                }
                None => distinct,
            }
        }
        ExtractMode::Clustering => {
            let dominant = dominant_colors(buffer, options.max_colors, options.seed);
            let snapped = match reference {
                Some(reference) => match_to_palette(&dominant, &reference)?,
                None => dominant,
            };
            let mut unique = dedup_preserving_order(snapped);
            unique.truncate(options.max_colors);
            unique
        }
    };

    tracing::debug!(
        mode = ?options.mode,
        width = buffer.width(),
        height = buffer.height(),
        max_colors = options.max_colors,
        colors = colors.len(),
        "extracted palette"
    );
    Ok(colors)
}

/// Distinct colors in first-occurrence order.
pub fn distinct_colors(pixels: &[Color]) -> Vec<Color> {
    let mut seen = HashSet::new();
    pixels
        .iter()
        .copied()
        .filter(|&c| seen.insert(key(c)))
        .collect()
}

fn dedup_preserving_order(colors: Vec<Color>) -> Vec<Color> {
    distinct_colors(&colors)
}

/// Reject an empty reference palette; drop repeated entries.
fn reference_palette(reference: &[Color]) -> Result<Vec<Color>> {
    if reference.is_empty() {
        return Err(Error::EmptyPalette);
    }
    let unique = distinct_colors(reference);
    if unique.len() != reference.len() {
        tracing::warn!(
            given = reference.len(),
            kept = unique.len(),
            "reference palette contains duplicates, keeping first occurrences"
        );
    }
    Ok(unique)
}

/// K-means clusters of every pixel, each reduced to its mean color.
///
/// With `k` or fewer distinct colors, each distinct color is its own
/// zero-error cluster and is returned directly; k-means++ seeding cannot
/// pick `k` distinct starting points otherwise.
///
/// Only the assignment is taken from `kmeans_colors`. Its `f32` centroids
/// lose precision on large images and an empty cluster gets a random
/// color, so means are recomputed here from the 8-bit pixels and empty
/// clusters are dropped.
fn dominant_colors(buffer: &PixelBuffer, k: usize, seed: u64) -> Vec<Color> {
    let distinct = distinct_colors(buffer.pixels());
    if distinct.len() <= k {
        tracing::trace!(distinct = distinct.len(), k, "fewer distinct colors than clusters");
        return distinct;
    }

    let samples: Vec<Srgb<f32>> = buffer
        .pixels()
        .iter()
        .map(|&c| c.into_format::<f32>())
        .collect();
    let kmeans = get_kmeans(k, KMEANS_MAX_ITER, KMEANS_CONVERGE, false, &samples, seed);
    tracing::trace!(k, seed, score = kmeans.score, "k-means finished");

    cluster_means(buffer.pixels(), &kmeans.indices, k)
}

/// Per-cluster mean of `pixels`, in cluster order, skipping empty clusters.
fn cluster_means(pixels: &[Color], indices: &[u8], k: usize) -> Vec<Color> {
    let mut sums = vec![[0u64; 3]; k];
    let mut counts = vec![0u64; k];
    for (&c, &idx) in pixels.iter().zip(indices) {
        let idx = idx as usize;
        sums[idx][0] += c.red as u64;
        sums[idx][1] += c.green as u64;
        sums[idx][2] += c.blue as u64;
        counts[idx] += 1;
    }

    let empty = counts.iter().filter(|&&n| n == 0).count();
    if empty > 0 {
        tracing::trace!(empty, k, "dropping empty clusters");
    }

    sums.iter()
        .zip(&counts)
        .filter(|&(_, &n)| n > 0)
        .map(|(sum, &n)| {
            Srgb::new(
                rounded_mean(sum[0], n),
                rounded_mean(sum[1], n),
                rounded_mean(sum[2], n),
            )
        })
        .collect()
}

/// `sum / count` rounded half up. The mean of 8-bit values fits in a `u8`.
#[inline(always)]
fn rounded_mean(sum: u64, count: u64) -> u8 {
    ((sum + count / 2) / count) as u8
}
