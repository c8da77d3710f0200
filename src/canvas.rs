// Holds the picture being doodled on and its hidden mask layer.
// Visual: the picture is what the window shows; the mask is never shown,
// it only remembers where the pen went.

use std::path::Path;

use image::{ImageError, ImageReader, RgbaImage};
use log::info;

use crate::error::DecodeError;
use crate::pixel::{blend_premultiplied, blend_straight, premultiply};
use crate::stroke::{segment_coverage, Point};
use crate::types::{MaskLayer, PenState};

/// Image and mask always travel together so their sizes cannot drift apart.
struct Layers {
    image: RgbaImage,
    mask: MaskLayer,
}

#[derive(Default)]
pub struct Canvas {
    layers: Option<Layers>,
}

impl Canvas {
    /// Empty canvas: nothing loaded, nothing to draw on.
    pub fn new() -> Self {
        Self { layers: None }
    }

    /// Canvas showing `image` with a fresh transparent mask.
    pub fn from_image(image: RgbaImage) -> Self {
        let mut canvas = Self::new();
        canvas.replace(image);
        canvas
    }

    /// Decode a PNG/JPEG/BMP file and start over with a transparent mask.
    /// On failure the previous image and mask stay as they were.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), DecodeError> {
        let path = path.as_ref();
        let wrap = |source: ImageError| DecodeError { path: path.to_path_buf(), source };

        // Sniff the content rather than trusting the extension.
        let decoded = ImageReader::open(path)
            .map_err(|e| wrap(ImageError::IoError(e)))?
            .with_guessed_format()
            .map_err(|e| wrap(ImageError::IoError(e)))?
            .decode()
            .map_err(wrap)?;

        let image = decoded.to_rgba8();
        info!("loaded {} ({}x{})", path.display(), image.width(), image.height());
        self.replace(image);
        Ok(())
    }

    fn replace(&mut self, image: RgbaImage) {
        let mask = MaskLayer::transparent(image.width() as usize, image.height() as usize);
        self.layers = Some(Layers { image, mask });
    }

    pub fn is_loaded(&self) -> bool {
        self.layers.is_some()
    }

    pub fn current_image(&self) -> Option<&RgbaImage> {
        self.layers.as_ref().map(|l| &l.image)
    }

    pub fn current_mask(&self) -> Option<&MaskLayer> {
        self.layers.as_ref().map(|l| &l.mask)
    }

    /// (width, height) of the loaded image.
    pub fn dimensions(&self) -> Option<(usize, usize)> {
        self.layers.as_ref().map(|l| (l.image.width() as usize, l.image.height() as usize))
    }

    /// Paint one pen segment onto the image and the mask.
    /// Both layers receive exactly the same pixel set. No-op when empty.
    pub fn paint_segment(&mut self, from: Point, to: Point, pen: &PenState) {
        let Some(layers) = self.layers.as_mut() else {
            return;
        };
        let bounds = (layers.mask.width, layers.mask.height);
        let color = pen.color();
        let premul = premultiply(color);

        for (x, y) in segment_coverage(from, to, pen.width(), bounds) {
            blend_straight(layers.image.get_pixel_mut(x as u32, y as u32), color);
            let idx = y * layers.mask.stride + x;
            layers.mask.pixels[idx] = blend_premultiplied(layers.mask.pixels[idx], premul);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn mask_matches_image_size() {
        let canvas = Canvas::from_image(RgbaImage::new(37, 11));
        let mask = canvas.current_mask().unwrap();
        assert_eq!((mask.width, mask.height), (37, 11));
        assert_eq!(canvas.dimensions(), Some((37, 11)));
    }

    #[test]
    fn empty_canvas_ignores_paint() {
        let mut canvas = Canvas::new();
        canvas.paint_segment((0, 0), (5, 5), &PenState::default());
        assert!(canvas.current_image().is_none());
        assert!(canvas.current_mask().is_none());
    }

    #[test]
    fn paint_reaches_both_layers() {
        let mut canvas = Canvas::from_image(RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255])));
        let pen = PenState::new(Rgba([0, 255, 0, 255]), 1);
        canvas.paint_segment((2, 3), (2, 3), &pen);
        assert_eq!(*canvas.current_image().unwrap().get_pixel(2, 3), Rgba([0, 255, 0, 255]));
        assert_eq!(canvas.current_mask().unwrap().get(2, 3), 0xFF_00_FF_00);
        assert_eq!(canvas.current_mask().unwrap().get(3, 3), 0);
    }

    #[test]
    fn missing_file_is_a_decode_error() {
        let mut canvas = Canvas::new();
        let err = canvas.load("/definitely/not/here.png").unwrap_err();
        assert!(matches!(err.source, ImageError::IoError(_)));
        assert!(!canvas.is_loaded());
    }
}
