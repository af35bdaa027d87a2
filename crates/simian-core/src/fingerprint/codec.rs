//! Image → fingerprint encoding.

use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView};

use super::dct::{dct_2d, flatten_nested_squares};
use super::Fingerprint;
use crate::config::constants::codec::{AC_SHIFT, DC_SHIFT, FINGERPRINT_SIDE, LUMA_OFFSET};
use crate::error::FingerprintError;

/// Compute the full-resolution fingerprint of `image`.
pub fn encode(image: &DynamicImage) -> Result<Fingerprint, FingerprintError> {
    let coefficients = coefficient_matrix(image)?;
    Ok(Fingerprint::from_samples(flatten_nested_squares(
        &coefficients,
    )))
}

/// Quantised DCT coefficients of `image`, row-major `8 x 8`.
pub fn coefficient_matrix(image: &DynamicImage) -> Result<Vec<i16>, FingerprintError> {
    let luma = sample_luma(image, FINGERPRINT_SIDE as u32)?;
    let mut coefficients = dct_2d(FINGERPRINT_SIDE, FINGERPRINT_SIDE, &luma);
    quantize(&mut coefficients);
    Ok(coefficients)
}

/// Bilinear downsample to `side x side` and convert to zero-centred luma.
pub fn sample_luma(image: &DynamicImage, side: u32) -> Result<Vec<i8>, FingerprintError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(FingerprintError::EmptyImage { width, height });
    }

    let rgb = image.to_rgb8();
    let scaled = imageops::resize(&rgb, side, side, FilterType::Triangle);

    Ok(scaled
        .pixels()
        .map(|p| centred_luma(p[0], p[1], p[2]))
        .collect())
}

/// BT.601 integer luma, shifted into `-128..=127`.
pub fn centred_luma(r: u8, g: u8, b: u8) -> i8 {
    let y = (19595 * u32::from(r) + 38470 * u32::from(g) + 7471 * u32::from(b) + (1 << 15)) >> 16;
    (y as i32 - LUMA_OFFSET) as i8
}

/// DC `>> 7`, AC `>> 5`, in place on a row-major block.
pub fn quantize(coefficients: &mut [i16]) {
    if let Some((dc, ac)) = coefficients.split_first_mut() {
        *dc >>= DC_SHIFT;
        for c in ac {
            *c >>= AC_SHIFT;
        }
    }
}
