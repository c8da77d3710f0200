// Mask export: painted pixels become white (255), everything else black (0).
// Visual: the saved PNG is a black picture with your doodle in solid white.

use std::path::Path;

use image::{GrayImage, ImageFormat, Luma};
use log::info;

use crate::error::ExportError;
use crate::pixel::unpack_premultiplied_argb32;
use crate::types::MaskLayer;

pub const PAINTED: u8 = 255;
pub const UNTOUCHED: u8 = 0;

/// Single-channel 0/255 mask, one value per mask pixel.
/// A pixel counts as painted when its alpha is non-zero.
pub fn binary_mask(mask: &MaskLayer) -> Result<GrayImage, ExportError> {
    let rgba = unpack_premultiplied_argb32(&mask.pixels, mask.width, mask.height, mask.stride)?;
    let (w, h) = rgba.dimensions();
    Ok(GrayImage::from_fn(w, h, |x, y| {
        if rgba.get_pixel(x, y)[3] != 0 { Luma([PAINTED]) } else { Luma([UNTOUCHED]) }
    }))
}

/// Encode the binary mask as PNG at `path`.
/// `None` means no image was ever loaded; nothing is written then.
pub fn export_mask(mask: Option<&MaskLayer>, path: impl AsRef<Path>) -> Result<(), ExportError> {
    let mask = mask.ok_or(ExportError::NoImage)?;
    let path = path.as_ref();
    let binary = binary_mask(mask)?;
    binary
        .save_with_format(path, ImageFormat::Png)
        .map_err(|source| ExportError::Write { path: path.to_path_buf(), source })?;
    info!("mask saved to {} ({}x{})", path.display(), binary.width(), binary.height());
    Ok(())
}
