use super::*;

fn rgba(width: u32, height: u32, px: &[[u8; 4]]) -> PixelBuffer {
    PixelBuffer::new(width, height, 4, px.concat()).unwrap()
}

#[test]
fn opaque_alpha_matches_rgb_for_any_background() {
    let px = [[10, 20, 30, 255], [200, 100, 0, 255]];
    for bg in [Rgb8::new(0, 0, 0), Rgb8::new(255, 255, 255), Rgb8::new(7, 99, 180)] {
        let out = composite(rgba(2, 1, &px), Some(bg), false).unwrap();
        assert_eq!(out.pixels, vec![10, 20, 30, 200, 100, 0]);
    }
}

#[test]
fn transparent_alpha_yields_background() {
    let px = [[10, 20, 30, 0]; 3];
    let out = composite(rgba(3, 1, &px), Some(Rgb8::new(1, 2, 3)), false).unwrap();
    assert_eq!(out.pixels, [1, 2, 3].repeat(3));
}

#[test]
fn half_alpha_truncates() {
    let out = composite(rgba(1, 1, &[[0, 255, 0, 128]]), Some(Rgb8::default()), false).unwrap();
    assert_eq!(out.pixels, vec![0, 128, 0]);

    // 100 * 127 / 255 + 200 * 128 / 255, summed before dividing.
    let out = composite(
        rgba(1, 1, &[[200, 200, 200, 128]]),
        Some(Rgb8::new(100, 100, 100)),
        false,
    )
    .unwrap();
    assert_eq!(out.pixels, vec![150, 150, 150]);
}

#[test]
fn none_background_is_black() {
    let out = composite(rgba(1, 1, &[[255, 255, 255, 0]]), None, false).unwrap();
    assert_eq!(out.pixels, vec![0, 0, 0]);
}

#[test]
fn rgb_passes_through() {
    let buf = PixelBuffer::new(2, 1, 3, vec![1, 2, 3, 4, 5, 6]).unwrap();
    let out = composite(buf, Some(Rgb8::new(9, 9, 9)), false).unwrap();
    assert_eq!(out.pixels, vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(out.stride, 6);
    assert_eq!(out.start_offset(), 0);
}

#[test]
fn flip_negates_stride_without_copying() {
    let buf = PixelBuffer::new(1, 3, 3, vec![1, 1, 1, 2, 2, 2, 3, 3, 3]).unwrap();
    let out = composite(buf, None, true).unwrap();
    assert_eq!(out.stride, -3);
    assert!(out.is_flipped());
    assert_eq!(out.pixels, vec![1, 1, 1, 2, 2, 2, 3, 3, 3]);
    assert_eq!(out.start_offset(), 6);
    let rows: Vec<&[u8]> = out.rows().collect();
    assert_eq!(rows, vec![&[3u8, 3, 3][..], &[2u8, 2, 2][..], &[1u8, 1, 1][..]]);
}

#[test]
fn gray_is_not_composited() {
    let buf = PixelBuffer::new(1, 1, 2, vec![5, 5]).unwrap();
    assert!(matches!(
        composite(buf, None, false),
        Err(RespackError::UnsupportedPixelLayout(_))
    ));
}
