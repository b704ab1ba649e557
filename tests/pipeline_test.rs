//! End-to-end tests over encoded image bytes, the way a caller hands images in.

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use palette_swap::{
    ColorMapping, DEFAULT_REFERENCE_PALETTE, DEFAULT_TOLERANCE, Error, ExtractOptions, PixelBuffer,
    decode_hex, get_unique_colors_bytes, replace_color_bytes,
};
use pretty_assertions::assert_eq;

fn png(img: RgbImage) -> Vec<u8> {
    let mut buf = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut std::io::Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    buf
}

fn red_green() -> Vec<u8> {
    let mut img = RgbImage::new(2, 1);
    img.put_pixel(0, 0, Rgb([255, 0, 0]));
    img.put_pixel(1, 0, Rgb([0, 255, 0]));
    png(img)
}

/// Left half near-red, right half near-blue, with per-pixel jitter.
fn two_tone(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        let jitter = ((x * 7 + y * 3) % 9) as u8;
        if x < width / 2 {
            Rgb([250 - jitter, jitter, 0])
        } else {
            Rgb([0, jitter, 250 - jitter])
        }
    });
    png(img)
}

#[test]
fn exact_extraction_of_two_pixels() {
    let colors = get_unique_colors_bytes(&red_green(), &ExtractOptions::exact()).unwrap();
    assert_eq!(colors, vec!["#ff0000", "#00ff00"]);
}

#[test]
fn exact_extraction_against_default_palette() {
    let options = ExtractOptions::exact().with_reference(DEFAULT_REFERENCE_PALETTE.to_vec());
    let colors = get_unique_colors_bytes(&red_green(), &options).unwrap();
    assert_eq!(colors, vec!["#ff0000", "#00ff00"]);

    let gray = png(RgbImage::from_pixel(3, 3, Rgb([0x80, 0x80, 0x80])));
    assert_eq!(
        get_unique_colors_bytes(&gray, &options).unwrap(),
        vec!["#808080"]
    );
}

#[test]
fn clustering_snaps_to_reference_palette() {
    let input = two_tone(12, 8);
    let options = ExtractOptions::clustering(4).with_reference(DEFAULT_REFERENCE_PALETTE.to_vec());
    let mut colors = get_unique_colors_bytes(&input, &options).unwrap();
    colors.sort();
    assert_eq!(colors, vec!["#0000ff", "#ff0000"]);
}

#[test]
fn clustering_is_reproducible_with_a_seed() {
    let input = two_tone(20, 20);
    let options = ExtractOptions::clustering(3).with_seed(42);
    let first = get_unique_colors_bytes(&input, &options).unwrap();
    let second = get_unique_colors_bytes(&input, &options).unwrap();
    assert_eq!(first, second);
    assert!(first.len() <= 3);
}

#[test]
fn replacement_scenario() {
    let mapping = ColorMapping::from_json(r##"{"#ff0000": "#0000ff"}"##).unwrap();
    let out = replace_color_bytes(&red_green(), &mapping, 10.0).unwrap();
    let buffer = PixelBuffer::from_bytes(&out).unwrap();
    assert_eq!(
        buffer.pixels(),
        &[decode_hex("#0000ff").unwrap(), decode_hex("#00ff00").unwrap()]
    );
}

#[test]
fn default_tolerance_recolors_a_jittered_region() {
    let mapping = ColorMapping::single(
        decode_hex("#fa0000").unwrap(),
        decode_hex("#ffffff").unwrap(),
    );
    let out = replace_color_bytes(&two_tone(10, 4), &mapping, DEFAULT_TOLERANCE).unwrap();
    let buffer = PixelBuffer::from_bytes(&out).unwrap();
    let white = decode_hex("ffffff").unwrap();
    for y in 0..4 {
        for x in 0..10 {
            let replaced = buffer.get(x, y) == Some(white);
            assert_eq!(replaced, x < 5, "pixel ({x}, {y})");
        }
    }
}

#[test]
fn boundary_errors_are_reported() {
    assert!(matches!(
        get_unique_colors_bytes(b"definitely not a png", &ExtractOptions::exact()),
        Err(Error::Decode(_))
    ));
    assert!(matches!(
        get_unique_colors_bytes(&red_green(), &ExtractOptions::clustering(0)),
        Err(Error::InvalidParameter { .. })
    ));
    let mapping = ColorMapping::single(decode_hex("ff0000").unwrap(), decode_hex("00ff00").unwrap());
    assert!(matches!(
        replace_color_bytes(&red_green(), &mapping, -1.0),
        Err(Error::InvalidParameter { .. })
    ));
    assert!(matches!(
        replace_color_bytes(&red_green(), &ColorMapping::new(), 1.0),
        Err(Error::EmptyMapping)
    ));
}
