use anyhow::Result;
use gaugeread::GaugeError;
use gaugeread::detection::preprocessing::{Polarity, binarize, crop};
use gaugeread::models::CropRect;
use image::{DynamicImage, GrayImage, Luma};

/// One row with the gray levels 0, 119, 120, 121 and 255
fn ramp() -> GrayImage {
    let levels = [0u8, 119, 120, 121, 255];
    GrayImage::from_fn(levels.len() as u32, 1, |x, _| Luma([levels[x as usize]]))
}

fn row(img: &GrayImage) -> Vec<u8> {
    img.pixels().map(|p| p[0]).collect()
}

#[test]
fn test_dark_on_light_makes_dark_pixels_bright() -> Result<()> {
    let binary = binarize(&ramp(), 120, 255, Polarity::DarkOnLight)?;
    assert_eq!(row(&binary), vec![255, 255, 255, 0, 0]);
    Ok(())
}

#[test]
fn test_light_on_dark_keeps_bright_pixels() -> Result<()> {
    let binary = binarize(&ramp(), 120, 255, Polarity::LightOnDark)?;
    assert_eq!(row(&binary), vec![0, 0, 0, 255, 255]);
    Ok(())
}

#[test]
fn test_brightness_sets_the_foreground_level() -> Result<()> {
    let binary = binarize(&ramp(), 120, 200, Polarity::LightOnDark)?;
    assert_eq!(row(&binary), vec![0, 0, 0, 200, 200]);
    assert_eq!(binary.dimensions(), (5, 1));
    Ok(())
}

#[test]
fn test_crop_keeps_exclusive_bounds() -> Result<()> {
    let img = DynamicImage::ImageLuma8(GrayImage::from_fn(10, 8, |x, y| Luma([(x + 10 * y) as u8])));
    let rect = CropRect { left: 2, top: 3, right: 6, bottom: 8 };

    let cropped = crop(&img, &rect)?.to_luma8();
    assert_eq!(cropped.dimensions(), (4, 5));
    assert_eq!(cropped.get_pixel(0, 0)[0], 32);
    assert_eq!(cropped.get_pixel(3, 4)[0], 75);

    let too_wide = CropRect { right: 11, ..rect };
    assert!(matches!(crop(&img, &too_wide), Err(GaugeError::CropOutOfBounds { .. })));
    Ok(())
}
