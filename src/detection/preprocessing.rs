use anyhow::Result;
use image::{DynamicImage, GrayImage};
use opencv::core::Mat;
use opencv::imgproc;
use opencv::prelude::*;

use crate::error::GaugeError;
use crate::models::CropRect;

/// Which side of the threshold ends up bright in the binary image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// Pixels at or below the threshold become bright (dark needle on a light face)
    DarkOnLight,
    /// Pixels above the threshold become bright (light needle on a dark face)
    LightOnDark,
}

impl Polarity {
    fn threshold_type(self) -> i32 {
        match self {
            Polarity::DarkOnLight => imgproc::THRESH_BINARY_INV,
            Polarity::LightOnDark => imgproc::THRESH_BINARY,
        }
    }
}

/// Cut the configured rectangle out of the source image
pub fn crop(img: &DynamicImage, rect: &CropRect) -> Result<DynamicImage, GaugeError> {
    if !rect.fits_within(img.width(), img.height()) || rect.width() == 0 || rect.height() == 0 {
        return Err(GaugeError::CropOutOfBounds {
            left: rect.left,
            top: rect.top,
            right: rect.right,
            bottom: rect.bottom,
            width: img.width(),
            height: img.height(),
        });
    }

    Ok(img.crop_imm(rect.left, rect.top, rect.width(), rect.height()))
}

/// Convert image to grayscale
pub fn to_grayscale(img: &DynamicImage) -> GrayImage {
    img.to_luma8()
}

/// Fixed-level threshold. Bright pixels get `brightness`, the rest 0.
pub fn binarize(img: &GrayImage, threshold: u8, brightness: u8, polarity: Polarity) -> Result<GrayImage> {
    let src = gray_to_mat(img)?;
    let mut dst = Mat::default();
    imgproc::threshold(
        &src,
        &mut dst,
        f64::from(threshold),
        f64::from(brightness),
        polarity.threshold_type(),
    )?;
    mat_to_gray(&dst)
}

/// Copy a single-channel image into an owned 8-bit Mat
pub(crate) fn gray_to_mat(img: &GrayImage) -> Result<Mat> {
    let rows = i32::try_from(img.height())?;
    let cols = i32::try_from(img.width())?;
    let view = Mat::new_rows_cols_with_data(rows, cols, img.as_raw().as_slice())?;
    Ok(view.try_clone()?)
}

/// Copy an 8-bit single-channel Mat back into a GrayImage
pub(crate) fn mat_to_gray(mat: &Mat) -> Result<GrayImage> {
    let width = u32::try_from(mat.cols())?;
    let height = u32::try_from(mat.rows())?;
    let data = mat.data_bytes()?.to_vec();
    GrayImage::from_raw(width, height, data)
        .ok_or_else(|| anyhow::anyhow!("Mat of {}x{} does not hold one byte per pixel", width, height))
}
