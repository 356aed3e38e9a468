use cubequant::{DitherMode, PaletteSynthesis, QuantizeConfig, QuantizeError};
use rgb::{RGB8, RGBA8};

fn gradient(width: usize, height: usize) -> Vec<RGB8> {
    let mut pixels = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let r = (x * 255 / width) as u8;
            let g = (y * 255 / height) as u8;
            let b = ((x + y) * 128 / (width + height)) as u8;
            pixels.push(RGB8::new(r, g, b));
        }
    }
    pixels
}

fn noisy(width: usize, height: usize) -> Vec<RGB8> {
    (0..(width * height) as u32)
        .map(|i| {
            let h = i.wrapping_mul(2654435761);
            RGB8::new(h as u8, (h >> 8) as u8, (h >> 16) as u8)
        })
        .collect()
}

fn assert_valid(image: &cubequant::IndexedImage, width: usize, height: usize, palette_size: usize) {
    assert_eq!(image.width(), width);
    assert_eq!(image.height(), height);
    assert_eq!(image.indices().len(), width * height);
    assert_eq!(image.palette().len(), palette_size);
    for &idx in image.indices() {
        assert!(
            idx >= 1 && (idx as usize) < palette_size,
            "index {idx} outside 1..{palette_size}"
        );
    }
}

#[test]
fn smoke_test_rgb() {
    let (width, height) = (32, 32);
    let pixels = gradient(width, height);
    let image = cubequant::quantize_rgb(&pixels, width, height, &QuantizeConfig::default()).unwrap();
    assert_valid(&image, width, height, 256);
    assert_eq!(image.palette_bytes().len(), 256 * 3);
}

#[test]
fn smoke_test_raw_rgba_buffer() {
    let (width, height) = (20, 12);
    let data: Vec<u8> = gradient(width, height)
        .iter()
        .flat_map(|p| [p.r, p.g, p.b, 255])
        .collect();
    let config = QuantizeConfig::new().palette_size(64);
    let image = cubequant::quantize(&data, width, height, 4, &config).unwrap();
    assert_valid(&image, width, height, 64);
}

#[test]
fn indices_stay_in_range_for_all_palette_sizes() {
    let (width, height) = (40, 30);
    let pixels = noisy(width, height);
    for size in [2, 3, 16, 100, 255, 256] {
        let config = QuantizeConfig::new().palette_size(size);
        let image = cubequant::quantize_rgb(&pixels, width, height, &config).unwrap();
        assert_valid(&image, width, height, size);
    }
}

#[test]
fn palette_of_two_maps_everything_to_one() {
    let pixels = noisy(8, 8);
    let config = QuantizeConfig::new().palette_size(2);
    let image = cubequant::quantize_rgb(&pixels, 8, 8, &config).unwrap();
    assert!(image.indices().iter().all(|&i| i == 1));
}

#[test]
fn all_config_modes() {
    let pixels = gradient(16, 16);
    for dither in [DitherMode::None, DitherMode::Diffusion] {
        for synthesis in [PaletteSynthesis::Corners, PaletteSynthesis::LeafMean] {
            let config = QuantizeConfig::new()
                .palette_size(32)
                .dither(dither)
                .synthesis(synthesis);
            let image = cubequant::quantize_rgb(&pixels, 16, 16, &config).unwrap();
            assert_valid(&image, 16, 16, 32);
        }
    }
}

#[test]
fn deterministic_output() {
    let pixels = noisy(64, 48);
    let config = QuantizeConfig::new().palette_size(128);
    let a = cubequant::quantize_rgb(&pixels, 64, 48, &config).unwrap();
    let b = cubequant::quantize_rgb(&pixels, 64, 48, &config).unwrap();
    assert_eq!(a, b);
}

#[test]
fn single_color_image_is_lossless() {
    let color = RGB8::new(128, 64, 200);
    let pixels = vec![color; 64];
    for synthesis in [PaletteSynthesis::Corners, PaletteSynthesis::LeafMean] {
        let config = QuantizeConfig::new().palette_size(16).synthesis(synthesis);
        let image = cubequant::quantize_rgb(&pixels, 8, 8, &config).unwrap();
        assert_valid(&image, 8, 8, 16);
        assert!(image.to_rgb().iter().all(|&c| c == color));
    }
}

#[test]
fn four_cube_corners_map_to_themselves() {
    // Index 0 holds the black min corner, so four colors need five slots.
    let pixels = [
        RGB8::new(255, 0, 0),
        RGB8::new(0, 255, 0),
        RGB8::new(0, 0, 255),
        RGB8::new(255, 255, 0),
    ];
    let config = QuantizeConfig::new().palette_size(5);
    let image = cubequant::quantize_rgb(&pixels, 2, 2, &config).unwrap();
    assert_valid(&image, 2, 2, 5);

    let mut indices = image.indices().to_vec();
    indices.sort_unstable();
    indices.dedup();
    assert_eq!(indices.len(), 4);
    assert_eq!(image.to_rgb(), pixels.to_vec());
}

#[test]
fn few_distinct_colors_resolve_to_leaves() {
    // Two colors in a checkerboard: far fewer than 9 distinct sample values.
    let mut pixels = Vec::with_capacity(256);
    for y in 0..16 {
        for x in 0..16 {
            pixels.push(if (x + y) % 2 == 0 {
                RGB8::new(10, 10, 10)
            } else {
                RGB8::new(240, 240, 240)
            });
        }
    }
    let image = cubequant::quantize_rgb(&pixels, 16, 16, &QuantizeConfig::default()).unwrap();
    assert_valid(&image, 16, 16, 256);
}

#[test]
fn alpha_does_not_affect_result() {
    let pixels = gradient(12, 12);
    let translucent: Vec<RGBA8> = pixels
        .iter()
        .enumerate()
        .map(|(i, p)| RGBA8::new(p.r, p.g, p.b, (i * 7) as u8))
        .collect();
    let config = QuantizeConfig::new().palette_size(24);
    let rgb = cubequant::quantize_rgb(&pixels, 12, 12, &config).unwrap();
    let rgba = cubequant::quantize_rgba(&translucent, 12, 12, &config).unwrap();
    assert_eq!(rgb, rgba);
}

#[test]
fn sample_count_is_clamped_to_image() {
    let pixels = noisy(4, 4);
    let config = QuantizeConfig::new().palette_size(8).sample_count(100_000);
    let image = cubequant::quantize_rgb(&pixels, 4, 4, &config).unwrap();
    assert_valid(&image, 4, 4, 8);
}

#[test]
fn resize_then_quantize() {
    let (width, height) = (30, 20);
    let data: Vec<u8> = gradient(width, height)
        .iter()
        .flat_map(|p| [p.r, p.g, p.b])
        .collect();
    let config = QuantizeConfig::new().palette_size(16);
    let image = cubequant::resize_and_quantize(&data, width, height, 3, 10, 7, &config).unwrap();
    assert_valid(&image, 10, 7, 16);
}

#[test]
fn error_zero_dimension() {
    let data = vec![0u8; 3];
    let config = QuantizeConfig::default();
    assert_eq!(
        cubequant::quantize(&data, 0, 1, 3, &config),
        Err(QuantizeError::ZeroDimension)
    );
    assert_eq!(
        cubequant::quantize(&data, 1, 0, 3, &config),
        Err(QuantizeError::ZeroDimension)
    );
}

#[test]
fn error_dimension_mismatch() {
    let data = vec![0u8; 10 * 3];
    assert!(matches!(
        cubequant::quantize(&data, 4, 4, 3, &QuantizeConfig::default()),
        Err(QuantizeError::DimensionMismatch { len: 30, .. })
    ));
}

#[test]
fn error_invalid_depth() {
    let data = vec![0u8; 8];
    assert_eq!(
        cubequant::quantize(&data, 2, 2, 2, &QuantizeConfig::default()),
        Err(QuantizeError::InvalidDepth(2))
    );
}

#[test]
fn error_invalid_palette_size() {
    let data = vec![0u8; 12];
    for size in [0, 1, 257] {
        assert_eq!(
            cubequant::quantize(&data, 2, 2, 3, &QuantizeConfig::new().palette_size(size)),
            Err(QuantizeError::InvalidPaletteSize(size))
        );
    }
}

#[test]
fn error_zero_sample_count() {
    let data = vec![0u8; 12];
    assert_eq!(
        cubequant::quantize(&data, 2, 2, 3, &QuantizeConfig::new().sample_count(0)),
        Err(QuantizeError::ZeroSampleCount)
    );
}
