// Turns pointer drags into painted line segments.
// Visual: holding the left button and moving leaves a trail of pen-coloured
// segments on the picture; the same pixels light up in the hidden mask.

use log::debug;

use crate::canvas::Canvas;
use crate::types::PenState;

/// Pointer position in image pixel coordinates. May lie outside the image.
pub type Point = (i32, i32);

/// Pixels covered by a `width`-wide straight segment, clipped to `bounds`.
///
/// No antialiasing: a pixel is in or out. Pixel centres are measured against
/// the line through the centres of the `from`/`to` pixels:
/// along the line `-w/2 <= t < len + w/2` (square caps), across it
/// `-w/2 <= n < w/2`. A zero-length segment gives a `w x w` square.
pub fn segment_coverage(from: Point, to: Point, width: u32, bounds: (usize, usize)) -> Vec<(usize, usize)> {
    let (bw, bh) = (bounds.0 as i64, bounds.1 as i64);
    if bw == 0 || bh == 0 {
        return Vec::new();
    }

    let (x0, y0) = (from.0 as f64, from.1 as f64);
    let (dx, dy) = ((to.0 - from.0) as f64, (to.1 - from.1) as f64);
    let len = (dx * dx + dy * dy).sqrt();
    let (ux, uy) = if len > 0.0 { (dx / len, dy / len) } else { (1.0, 0.0) };
    // unit normal, 90° from the direction
    let (nx, ny) = (-uy, ux);
    let half = width as f64 / 2.0;

    // Bounding box of the capped rectangle, grown by one for rounding.
    let pad = half.ceil() as i64 + 1;
    let min_x = (from.0.min(to.0) as i64 - pad).max(0);
    let max_x = (from.0.max(to.0) as i64 + pad).min(bw - 1);
    let min_y = (from.1.min(to.1) as i64 - pad).max(0);
    let max_y = (from.1.max(to.1) as i64 + pad).min(bh - 1);

    let mut covered = Vec::new();
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let (vx, vy) = (x as f64 - x0, y as f64 - y0);
            let along = vx * ux + vy * uy;
            let across = vx * nx + vy * ny;
            if along >= -half && along < len + half && across >= -half && across < half {
                covered.push((x as usize, y as usize));
            }
        }
    }
    covered
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrokeState {
    Idle,
    Drawing { anchor: Point },
}

/// Idle/Drawing state machine for one pointer.
pub struct StrokeRenderer {
    state: StrokeState,
}

impl Default for StrokeRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl StrokeRenderer {
    pub fn new() -> Self {
        Self { state: StrokeState::Idle }
    }

    pub fn state(&self) -> StrokeState {
        self.state
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, StrokeState::Drawing { .. })
    }

    /// Idle -> Drawing, only when there is an image to draw on.
    pub fn pointer_down(&mut self, pos: Point, canvas: &Canvas) {
        if canvas.is_loaded() {
            debug!("stroke begins at {pos:?}");
            self.state = StrokeState::Drawing { anchor: pos };
        }
    }

    /// Paint anchor -> pos on both layers and move the anchor.
    /// Returns true when something was painted.
    pub fn pointer_move(&mut self, pos: Point, canvas: &mut Canvas, pen: &PenState) -> bool {
        let StrokeState::Drawing { anchor } = self.state else {
            return false;
        };
        if !canvas.is_loaded() {
            return false;
        }
        canvas.paint_segment(anchor, pos, pen);
        self.state = StrokeState::Drawing { anchor: pos };
        true
    }

    /// Drawing -> Idle.
    pub fn pointer_up(&mut self) {
        if self.is_drawing() {
            debug!("stroke ends");
        }
        self.state = StrokeState::Idle;
    }

    /// Forget any stroke in progress (a new image was loaded).
    pub fn reset(&mut self) {
        self.state = StrokeState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::collections::HashSet;

    fn canvas(w: u32, h: u32) -> Canvas {
        Canvas::from_image(RgbaImage::from_pixel(w, h, Rgba([255, 255, 255, 255])))
    }

    #[test]
    fn horizontal_segment_is_width_rows_tall() {
        let px = segment_coverage((10, 50), (90, 50), 5, (100, 100));
        let rows: HashSet<usize> = px.iter().map(|p| p.1).collect();
        assert_eq!(rows, (48..=52).collect());
        let cols: HashSet<usize> = px.iter().map(|p| p.0).collect();
        assert_eq!(*cols.iter().min().unwrap(), 8);
        assert_eq!(*cols.iter().max().unwrap(), 92);
        // full rectangle, no holes
        assert_eq!(px.len(), 5 * 85);
    }

    #[test]
    fn width_one_vertical_segment_is_one_column() {
        let px = segment_coverage((3, 2), (3, 7), 1, (10, 10));
        assert!(px.iter().all(|p| p.0 == 3));
        let rows: HashSet<usize> = px.iter().map(|p| p.1).collect();
        assert_eq!(rows, (2..=7).collect());
    }

    #[test]
    fn zero_length_segment_is_a_square() {
        let px = segment_coverage((5, 5), (5, 5), 3, (20, 20));
        assert_eq!(px.len(), 9);
        assert!(px.contains(&(4, 4)) && px.contains(&(6, 6)));
    }

    #[test]
    fn diagonal_segment_covers_both_endpoints() {
        let px = segment_coverage((0, 0), (9, 9), 2, (10, 10));
        assert!(px.contains(&(0, 0)));
        assert!(px.contains(&(9, 9)));
        assert!(px.contains(&(5, 5)));
        assert!(!px.contains(&(9, 0)));
    }

    #[test]
    fn coverage_is_clipped_to_bounds() {
        let px = segment_coverage((-20, 5), (50, 5), 3, (10, 10));
        assert!(px.iter().all(|&(x, y)| x < 10 && y < 10));
        assert_eq!(px.len(), 30);
        assert!(segment_coverage((-50, -50), (-40, -40), 3, (10, 10)).is_empty());
    }

    #[test]
    fn state_machine_follows_pointer() {
        let mut c = canvas(20, 20);
        let pen = PenState::default();
        let mut r = StrokeRenderer::new();

        assert!(!r.pointer_move((1, 1), &mut c, &pen), "idle move must not draw");
        r.pointer_down((2, 2), &c);
        assert_eq!(r.state(), StrokeState::Drawing { anchor: (2, 2) });
        assert!(r.pointer_move((8, 2), &mut c, &pen));
        assert_eq!(r.state(), StrokeState::Drawing { anchor: (8, 2) });
        r.pointer_up();
        assert_eq!(r.state(), StrokeState::Idle);
    }

    #[test]
    fn pointer_down_without_image_stays_idle() {
        let c = Canvas::new();
        let mut r = StrokeRenderer::new();
        r.pointer_down((1, 1), &c);
        assert_eq!(r.state(), StrokeState::Idle);
    }

    #[test]
    fn idle_move_leaves_layers_untouched() {
        let mut c = canvas(10, 10);
        let before = c.current_image().unwrap().clone();
        let mut r = StrokeRenderer::new();
        r.pointer_move((5, 5), &mut c, &PenState::default());
        assert_eq!(c.current_image().unwrap(), &before);
        assert!(c.current_mask().unwrap().pixels.iter().all(|&p| p == 0));
    }
}
