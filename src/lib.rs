use base64::Engine;
use js_sys::{Array, Object, Reflect, Uint8Array};
use wasm_bindgen::prelude::*;

mod buffer;
mod color;
mod error;
mod extract;
mod matcher;
mod replace;

pub use buffer::PixelBuffer;
pub use color::{
    Color, DEFAULT_REFERENCE_PALETTE, decode_hex, distance, encode_hex,
    parse_palette, to_hex_string,
};
pub use error::{Error, Result};
pub use extract::{
    DEFAULT_MAX_COLORS, DEFAULT_SEED, ExtractMode, ExtractOptions, KMEANS_CONVERGE,
    KMEANS_MAX_ITER, MAX_CLUSTERS, distinct_colors, extract_colors,
};
pub use matcher::match_to_palette;
pub use replace::{ColorMapping, DEFAULT_TOLERANCE, replace_colors};

fn js_error(e: Error) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Extract the colors of an encoded image.
///
/// * `exact` - list every distinct color instead of clustering to `max_colors`
/// * `palette` - optional reference palette of hex strings
/// * `seed` - k-means seed, [`DEFAULT_SEED`] when omitted
///
/// Returns an `Array` of `#rrggbb` strings.
#[wasm_bindgen]
pub fn get_unique_colors(
    input: Vec<u8>,
    max_colors: usize,
    exact: bool,
    palette: Option<Array>,
    seed: Option<u32>,
) -> std::result::Result<Array, JsValue> {
    let reference = match palette {
        Some(js_palette) => {
            let mut tmp = Vec::new();
            for val in js_palette.iter() {
                let s = val
                    .as_string()
                    .ok_or_else(|| JsValue::from_str("Palette values must be strings"))?;
                tmp.push(decode_hex(&s).map_err(js_error)?);
            }
            Some(tmp)
        }
        None => None,
    };

    let options = ExtractOptions {
        mode: if exact {
            ExtractMode::Exact
        } else {
            ExtractMode::Clustering
        },
        max_colors,
        reference,
        seed: seed.map(u64::from).unwrap_or(DEFAULT_SEED),
    };
    let buffer = PixelBuffer::from_bytes(&input).map_err(js_error)?;
    let colors = extract_colors(&buffer, &options).map_err(js_error)?;

    let result = Array::new();
    for c in colors {
        result.push(&JsValue::from_str(&to_hex_string(c)));
    }
    Ok(result)
}

/// Replace colors of an encoded image.
///
/// `color_map` is a JSON object of `"target": "replacement"` hex strings,
/// applied first-match-wins in document order. `tolerance` defaults to
/// [`DEFAULT_TOLERANCE`].
///
/// Returns `{ image: Uint8Array, base64: string }` holding the PNG result.
#[wasm_bindgen]
pub fn replace_color(
    input: Vec<u8>,
    color_map: &str,
    tolerance: Option<f64>,
) -> std::result::Result<Object, JsValue> {
    let mapping = ColorMapping::from_json(color_map).map_err(js_error)?;
    let buffer = PixelBuffer::from_bytes(&input).map_err(js_error)?;
    let modified = replace_colors(buffer, &mapping, tolerance.unwrap_or(DEFAULT_TOLERANCE))
        .map_err(js_error)?;

    let png = modified.to_png().map_err(js_error)?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(&png);

    let result = Object::new();
    Reflect::set(
        &result,
        &JsValue::from_str("image"),
        &Uint8Array::from(png.as_slice()),
    )?;
    Reflect::set(&result, &JsValue::from_str("base64"), &JsValue::from_str(&encoded))?;
    Ok(result)
}

/// Native counterpart of [`get_unique_colors`]: decode, extract and return
/// `#rrggbb` strings.
#[cfg(not(target_arch = "wasm32"))]
pub fn get_unique_colors_bytes(input: &[u8], options: &ExtractOptions) -> Result<Vec<String>> {
    let buffer = PixelBuffer::from_bytes(input)?;
    let colors = extract_colors(&buffer, options)?;
    Ok(colors.into_iter().map(to_hex_string).collect())
}

/// Native counterpart of [`replace_color`]: decode, replace and return PNG bytes.
#[cfg(not(target_arch = "wasm32"))]
pub fn replace_color_bytes(
    input: &[u8],
    mapping: &ColorMapping,
    tolerance: f64,
) -> Result<Vec<u8>> {
    let buffer = PixelBuffer::from_bytes(input)?;
    replace_colors(buffer, mapping, tolerance)?.to_png()
}
