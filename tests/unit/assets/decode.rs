use std::io::Cursor;

use super::*;

#[test]
fn decode_image_png_keeps_straight_alpha() {
    let src_rgba = vec![100u8, 50u8, 200u8, 128u8];
    let img = image::RgbaImage::from_raw(1, 1, src_rgba.clone()).unwrap();

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();

    let decoded = decode_image(&buf, "px.png").unwrap();
    assert_eq!(decoded.name, "px.png");
    assert_eq!(decoded.size(), ImageSize::from_pixels(1, 1));
    assert_eq!(decoded.pixels.as_raw().as_slice(), src_rgba.as_slice());
}

#[test]
fn decode_image_rejects_garbage() {
    let err = decode_image(b"not an image", "junk.png").unwrap_err();
    assert!(err.to_string().contains("junk.png"));
}

#[test]
fn decode_source_uses_file_name() {
    let dir = std::env::temp_dir().join(format!("pagestack_decode_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("shirt.png");
    image::RgbImage::from_pixel(3, 2, image::Rgb([9, 8, 7]))
        .save(&path)
        .unwrap();

    let src = decode_source(&path).unwrap();
    assert_eq!(src.name, "shirt.png");
    assert_eq!(src.pixels.dimensions(), (3, 2));
    assert_eq!(src.pixels.get_pixel(0, 0).0, [9, 8, 7, 255]);
}

/// Encode a JPEG whose left half is red and right half blue, tagged with EXIF `orientation`.
fn tagged_jpeg(w: u32, h: u32, orientation: u16) -> Vec<u8> {
    let img = image::RgbImage::from_fn(w, h, |x, _| {
        if x < w / 2 {
            image::Rgb([255, 0, 0])
        } else {
            image::Rgb([0, 0, 255])
        }
    });
    let mut jpeg = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg, 95)
        .encode_image(&img)
        .unwrap();

    // Big-endian TIFF with a single IFD entry: 0x0112 (Orientation), SHORT, count 1.
    let mut tiff = vec![b'M', b'M', 0x00, 0x2A, 0x00, 0x00, 0x00, 0x08, 0x00, 0x01];
    tiff.extend_from_slice(&[0x01, 0x12, 0x00, 0x03, 0x00, 0x00, 0x00, 0x01]);
    tiff.extend_from_slice(&orientation.to_be_bytes());
    tiff.extend_from_slice(&[0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);

    let mut payload = b"Exif\0\0".to_vec();
    payload.extend_from_slice(&tiff);
    let seg_len = u16::try_from(payload.len() + 2).unwrap();

    let mut out = jpeg[..2].to_vec();
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&seg_len.to_be_bytes());
    out.extend_from_slice(&payload);
    out.extend_from_slice(&jpeg[2..]);
    out
}

#[test]
fn decode_image_applies_exif_rotation() {
    let bytes = tagged_jpeg(16, 8, 6);
    let decoded = decode_image(&bytes, "phone.jpg").unwrap();
    assert_eq!(decoded.pixels.dimensions(), (8, 16));

    // a clockwise quarter turn moves the left (red) half to the top
    let top = decoded.pixels.get_pixel(4, 3).0;
    let bottom = decoded.pixels.get_pixel(4, 12).0;
    assert!(top[0] > top[2].saturating_add(100), "top = {top:?}");
    assert!(bottom[2] > bottom[0].saturating_add(100), "bottom = {bottom:?}");
}

#[test]
fn decode_image_without_rotation_keeps_stored_size() {
    let decoded = decode_image(&tagged_jpeg(16, 8, 1), "flat.jpg").unwrap();
    assert_eq!(decoded.pixels.dimensions(), (16, 8));
    assert!(!swaps_axes(Orientation::Rotate180));
    assert!(swaps_axes(Orientation::Rotate270FlipH));
}

#[test]
fn header_probe_agrees_with_decoded_orientation() {
    use crate::assets::source::{HeaderProbe, SizeSource};

    let dir = std::env::temp_dir().join(format!("pagestack_exif_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("sideways.jpg");
    std::fs::write(&path, tagged_jpeg(40, 30, 6)).unwrap();

    let probed = HeaderProbe.image_size(&path).unwrap();
    assert_eq!(probed, ImageSize::from_pixels(30, 40));
    assert_eq!(decode_source(&path).unwrap().size(), probed);
}
