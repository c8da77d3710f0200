// Core types shared by the canvas, the renderer and the window.

use image::Rgba;

/// Thinnest pen the width prompt accepts.
pub const MIN_PEN_WIDTH: u32 = 1;
/// Widest pen the width prompt accepts.
pub const MAX_PEN_WIDTH: u32 = 100;

#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the window contents are (pixels)
    pub height: usize,     // how tall the window contents are (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }

    /// Match the window size; contents are undefined afterwards.
    pub fn resize(&mut self, width: usize, height: usize) {
        if self.width != width || self.height != height {
            self.width = width;
            self.height = height;
            self.pixels.resize(width * height, 0);
        }
    }

    pub fn fill(&mut self, color: u32) {
        self.pixels.fill(color);
    }
}

/// Transparent overlay that records every stroke.
/// Pixels are premultiplied ARGB32: 0xAARRGGBB, rows `stride` pixels apart.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaskLayer {
    pub width: usize,
    pub height: usize,
    pub stride: usize,
    pub pixels: Vec<u32>,
}

impl MaskLayer {
    /// Fully transparent layer, tightly packed (stride == width).
    pub fn transparent(width: usize, height: usize) -> Self {
        Self { width, height, stride: width, pixels: vec![0u32; width * height] }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u32 {
        self.pixels[y * self.stride + x]
    }
}

/// Colour and width applied to the next stroke segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PenState {
    color: Rgba<u8>,
    width: u32,
}

impl Default for PenState {
    /// Faint red, 5 px: shows the picture through the doodle.
    fn default() -> Self {
        Self { color: Rgba([255, 0, 0, 20]), width: 5 }
    }
}

impl PenState {
    pub fn new(color: Rgba<u8>, width: u32) -> Self {
        let mut pen = Self { color, width: MIN_PEN_WIDTH };
        pen.set_width(width);
        pen
    }

    pub fn color(&self) -> Rgba<u8> {
        self.color
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn set_color(&mut self, color: Rgba<u8>) {
        self.color = color;
    }

    /// Out-of-range widths are clamped to [MIN_PEN_WIDTH, MAX_PEN_WIDTH].
    pub fn set_width(&mut self, width: u32) {
        self.width = width.clamp(MIN_PEN_WIDTH, MAX_PEN_WIDTH);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_is_clamped_on_both_ends() {
        let mut pen = PenState::default();
        pen.set_width(0);
        assert_eq!(pen.width(), 1);
        pen.set_width(150);
        assert_eq!(pen.width(), 100);
        pen.set_width(42);
        assert_eq!(pen.width(), 42);
    }

    #[test]
    fn constructor_clamps_too() {
        assert_eq!(PenState::new(Rgba([0, 0, 0, 255]), 1000).width(), MAX_PEN_WIDTH);
    }

    #[test]
    fn new_mask_is_transparent() {
        let mask = MaskLayer::transparent(7, 3);
        assert_eq!(mask.pixels.len(), 21);
        assert!(mask.pixels.iter().all(|&p| p == 0));
    }
}
