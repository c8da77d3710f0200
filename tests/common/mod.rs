#![allow(dead_code)]

use std::path::{Path, PathBuf};

use image::{GrayImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use image_doodler::app::{App, InputEvent};
use image_doodler::dialogs::FilePicker;

/// Picker that answers with fixed paths, standing in for native dialogs.
#[derive(Default)]
pub struct FixedPicker {
    pub open: Option<PathBuf>,
    pub save: Option<PathBuf>,
}

impl FilePicker for FixedPicker {
    fn pick_image(&mut self) -> Option<PathBuf> {
        self.open.clone()
    }
    fn pick_mask_destination(&mut self) -> Option<PathBuf> {
        self.save.clone()
    }
}

/// Solid white RGBA PNG of the given size.
pub fn write_white_png(dir: &Path, name: &str, w: u32, h: u32) -> PathBuf {
    let path = dir.join(name);
    RgbaImage::from_pixel(w, h, Rgba([255, 255, 255, 255]))
        .save_with_format(&path, ImageFormat::Png)
        .expect("write test png");
    path
}

/// Solid grey RGB image in another container format (BMP, JPEG).
pub fn write_rgb(dir: &Path, name: &str, w: u32, h: u32, format: ImageFormat) -> PathBuf {
    let path = dir.join(name);
    RgbImage::from_pixel(w, h, Rgb([120, 120, 120]))
        .save_with_format(&path, format)
        .expect("write test image");
    path
}

pub fn read_mask(path: &Path) -> GrayImage {
    let img = image::open(path).expect("mask decodes");
    assert!(
        matches!(img, image::DynamicImage::ImageLuma8(_)),
        "mask must be single channel 8-bit"
    );
    img.to_luma8()
}

/// Press at the first point, move through the rest, release.
pub fn drag(app: &mut App, points: &[(i32, i32)]) {
    let mut picker = FixedPicker::default();
    let (first, rest) = points.split_first().expect("at least one point");
    app.dispatch(InputEvent::PointerDown(*first), &mut picker);
    for &p in rest {
        app.dispatch(InputEvent::PointerMove(p), &mut picker);
    }
    app.dispatch(InputEvent::PointerUp, &mut picker);
}
