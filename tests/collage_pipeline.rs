//! End-to-end collage builds through the `image` codec.
//!
//! Inputs are solid-color PNGs generated in memory, so every region of the
//! output JPEG can be checked for the color that should land there.

use std::io::Cursor;

use image::{ImageFormat, Rgb, RgbImage};
use zencollage::*;

const RED: [u8; 3] = [220, 30, 30];
const GREEN: [u8; 3] = [30, 200, 30];
const BLUE: [u8; 3] = [30, 30, 220];
const WHITE: [u8; 3] = [255, 255, 255];

fn png(w: u32, h: u32, rgb: [u8; 3]) -> Vec<u8> {
    let img = RgbImage::from_pixel(w, h, Rgb(rgb));
    let mut cursor = Cursor::new(Vec::new());
    img.write_to(&mut cursor, ImageFormat::Png).unwrap();
    cursor.into_inner()
}

fn decode(jpeg: &[u8]) -> RgbImage {
    image::load_from_memory(jpeg).unwrap().into_rgb8()
}

/// Each channel within `tol` of `expected` (JPEG is lossy).
fn assert_near(img: &RgbImage, x: u32, y: u32, expected: [u8; 3], tol: u8) {
    let got = img.get_pixel(x, y).0;
    for c in 0..3 {
        assert!(
            got[c].abs_diff(expected[c]) <= tol,
            "pixel ({x},{y}) = {got:?}, expected ≈ {expected:?}"
        );
    }
}

fn four_images() -> Vec<Vec<u8>> {
    vec![
        png(1000, 1000, RED),
        png(1600, 800, GREEN),
        png(300, 600, BLUE),
        png(2000, 1000, WHITE),
    ]
}

// ---- Layout and pixels ----

#[test]
fn four_images_two_rows() {
    let codec = ImageCrateCodec::new();
    let collage = build_collage(&codec, &four_images(), &CollageConfig::new()).unwrap();

    assert_eq!(collage.plan.rows.rows, [0..2, 2..4]);
    assert_eq!(collage.output, Size::new(1250, 918));

    let out = decode(&collage.encoded);
    assert_eq!(out.dimensions(), (1250, 918));

    // Sample well inside each placement.
    assert_near(&out, 200, 200, RED, 40);
    assert_near(&out, 800, 200, GREEN, 40);
    assert_near(&out, 120, 660, BLUE, 40);
    assert_near(&out, 800, 660, WHITE, 40);
}

#[test]
fn short_image_sits_in_a_taller_row() {
    let codec = ImageCrateCodec::new();
    let images = vec![
        png(500, 500, RED),
        png(800, 400, GREEN),
        png(300, 600, BLUE),
        png(1000, 500, WHITE),
    ];
    let collage = build_collage(&codec, &images, &CollageConfig::new()).unwrap();
    let plan = &collage.plan;

    assert_eq!(weights(&plan.sources), [100, 200, 50, 200]);
    assert_eq!(plan.rows.rows, [0..2, 2..4]);
    assert_eq!(plan.layout.rows[0].height, 481);
    assert_eq!(collage.output, Size::new(1250, 982));

    let out = decode(&collage.encoded);
    assert_near(&out, 200, 200, RED, 40);
    assert_near(&out, 800, 200, GREEN, 40);
    // Below the 385 px tall image, down to the end of the row.
    assert_near(&out, 800, 435, [0, 0, 0], 40);
    assert_near(&out, 120, 720, BLUE, 40);
    assert_near(&out, 800, 720, WHITE, 40);
}

#[test]
fn background_shows_under_short_images() {
    let codec = ImageCrateCodec::new();
    // Both shorter than the normalization height, so neither is enlarged.
    let images = vec![png(400, 300, RED), png(400, 500, BLUE)];
    let config = CollageConfig::new().background(CanvasColor::white());
    let collage = build_collage(&codec, &images, &config).unwrap();

    assert_eq!(collage.output, Size::new(800, 500));
    let out = decode(&collage.encoded);
    assert_near(&out, 200, 150, RED, 40);
    assert_near(&out, 200, 450, WHITE, 40);
    assert_near(&out, 600, 450, BLUE, 40);
}

#[test]
fn oversized_collage_is_fitted_to_bounds() {
    let codec = ImageCrateCodec::new();
    let config = CollageConfig::new().max_output(625, 5000);
    let collage = build_collage(&codec, &four_images(), &config).unwrap();

    assert_eq!(collage.plan.layout.canvas, Size::new(1250, 918));
    assert_eq!(collage.output, Size::new(625, 459));
    assert_eq!(decode(&collage.encoded).dimensions(), (625, 459));
}

#[test]
fn output_is_jpeg() {
    let codec = ImageCrateCodec::new();
    let collage = build_collage(&codec, &[png(64, 48, GREEN)], &CollageConfig::new()).unwrap();
    assert_eq!(
        image::guess_format(&collage.encoded).unwrap(),
        ImageFormat::Jpeg
    );
}

#[test]
fn repeated_builds_are_byte_identical() {
    let codec = ImageCrateCodec::new();
    let images = four_images();
    let a = build_collage(&codec, &images, &CollageConfig::new()).unwrap();
    let b = build_collage(&codec, &images, &CollageConfig::new()).unwrap();
    assert_eq!(a.encoded, b.encoded);
    assert_eq!(a.plan, b.plan);
}

// ---- Failures ----

#[test]
fn no_images_is_input_error() {
    let images: Vec<Vec<u8>> = Vec::new();
    let err = build_collage(&ImageCrateCodec::new(), &images, &CollageConfig::new()).unwrap_err();
    assert!(matches!(err, CollageError::NoImages));
    assert!(err.is_input_error());
}

#[test]
fn corrupt_image_aborts_whole_build() {
    let mut images = four_images();
    images[2] = b"\x89PNG but not really".to_vec();
    let err = build_collage(&ImageCrateCodec::new(), &images, &CollageConfig::new()).unwrap_err();
    assert!(
        matches!(err, CollageError::Decode { index: 2, .. }),
        "{err:?}"
    );
    assert!(!err.is_input_error());
}
