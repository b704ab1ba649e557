//! Tolerance-based color replacement.

use serde_json::Value;

use crate::buffer::PixelBuffer;
use crate::color::{Color, decode_hex, distance};
use crate::error::{Error, Result};

/// Euclidean RGB radius used when the caller does not pick one.
pub const DEFAULT_TOLERANCE: f64 = 30.0;

/// Ordered `(target, replacement)` pairs. Earlier pairs take precedence.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColorMapping {
    pairs: Vec<(Color, Color)>,
}

impl ColorMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mapping with one pair.
    pub fn single(target: Color, replacement: Color) -> Self {
        Self {
            pairs: vec![(target, replacement)],
        }
    }

    pub fn push(&mut self, target: Color, replacement: Color) {
        self.pairs.push((target, replacement));
    }

    /// Parse a JSON object of `"target": "replacement"` hex strings.
    ///
    /// Key order in the document is the evaluation order.
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text).map_err(|e| Error::MalformedMapping {
            reason: "invalid JSON".to_string(),
            source: Some(e),
        })?;
        let Value::Object(map) = value else {
            return Err(Error::MalformedMapping {
                reason: "expected an object of target to replacement colors".to_string(),
                source: None,
            });
        };

        let mut mapping = Self::new();
        for (target, replacement) in &map {
            let Some(replacement) = replacement.as_str() else {
                return Err(Error::MalformedMapping {
                    reason: format!("replacement for {target:?} is not a string"),
                    source: None,
                });
            };
            mapping.push(decode_hex(target)?, decode_hex(replacement)?);
        }
        Ok(mapping)
    }

    pub fn pairs(&self) -> &[(Color, Color)] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Replacement for `color` under first-match-wins, if any pair is
    /// strictly within `tolerance`.
    #[inline]
    fn resolve(&self, color: Color, tolerance: f64) -> Option<Color> {
        self.pairs
            .iter()
            .find(|(target, _)| distance(color, *target) < tolerance)
            .map(|&(_, replacement)| replacement)
    }
}

impl FromIterator<(Color, Color)> for ColorMapping {
    fn from_iter<I: IntoIterator<Item = (Color, Color)>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().collect(),
        }
    }
}

/// Rewrite every pixel that lies strictly within `tolerance` of a target.
///
/// Decisions are taken against the original colors of the whole buffer
/// before anything is written, so a replaced pixel is never matched again
/// in the same pass.
///
/// # Errors
///
/// - [`Error::InvalidParameter`] if `tolerance` is negative or NaN
/// - [`Error::EmptyMapping`] if `mapping` has no pairs
pub fn replace_colors(
    mut buffer: PixelBuffer,
    mapping: &ColorMapping,
    tolerance: f64,
) -> Result<PixelBuffer> {
    if tolerance.is_nan() || tolerance < 0.0 {
        return Err(Error::invalid_parameter("tolerance", tolerance));
    }
    if mapping.is_empty() {
        return Err(Error::EmptyMapping);
    }

    let decisions: Vec<Option<Color>> = buffer
        .pixels()
        .iter()
        .map(|&c| mapping.resolve(c, tolerance))
        .collect();

    let mut replaced = 0usize;
    for (pixel, decision) in buffer.pixels_mut().iter_mut().zip(decisions) {
        if let Some(color) = decision {
            *pixel = color;
            replaced += 1;
        }
    }

    tracing::debug!(
        width = buffer.width(),
        height = buffer.height(),
        pairs = mapping.len(),
        tolerance,
        replaced,
        "replaced colors"
    );
    Ok(buffer)
}
