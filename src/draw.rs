// Window + software drawing utilities.
// Visual effects provided here:
// 1) A resizable window showing the picture at its top-left corner, under a HUD strip.
// 2) A crosshair that follows your mouse over the picture.
// 3) A tiny 5x7 bitmap font for the HUD, the status line and the prompts.

use image::Rgba;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, ScaleMode, Window, WindowOptions};

use crate::app::{width_hint, App, Command, InputEvent, Prompt, PALETTE};
use crate::canvas::Canvas;
use crate::error::Error;
use crate::pixel::{blend_straight, pack_xrgb};
use crate::types::{FrameBuffer, PenState};

/// Height of the HUD strip; the picture starts right below it.
pub const HUD_HEIGHT: usize = 14;

const BACKGROUND: u32 = 0x00_2B_2B_2B;
const HUD_BACKGROUND: u32 = 0x00_18_18_18;
const TEXT: u32 = 0x00_FF_FF_FF;
const ACCENT: u32 = 0x00_FF_CC_33;

pub struct Drawer {
    window: Window,      // the on-screen window you see
    left_was_down: bool, // button state last frame, for press/release edges
    last_pos: Option<(i32, i32)>,
}

impl Drawer {
    /// Create a resizable window.
    /// Visual: a new empty window appears with your chosen title.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let options = WindowOptions { resize: true, scale_mode: ScaleMode::UpperLeft, ..WindowOptions::default() };
        let mut window = Window::new(title, width, height, options).map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(60);
        Ok(Self { window, left_was_down: false, last_pos: None })
    }

    /// Push the pixels for this frame to the screen.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Current inner size; the framebuffer follows it.
    pub fn size(&self) -> (usize, usize) {
        self.window.get_size()
    }

    /// Mouse position in picture coordinates (window minus the HUD strip).
    pub fn mouse_pos(&self) -> Option<(i32, i32)> {
        self.window
            .get_mouse_pos(MouseMode::Pass)
            .map(|(x, y)| (x.floor() as i32, y.floor() as i32 - HUD_HEIGHT as i32))
    }

    /// Turn this frame's keyboard and mouse state into discrete events.
    pub fn poll_events(&mut self) -> Vec<InputEvent> {
        let mut events: Vec<InputEvent> =
            self.window.get_keys_pressed(KeyRepeat::No).into_iter().filter_map(key_event).collect();

        let down = self.window.get_mouse_down(MouseButton::Left);
        let pos = self.mouse_pos();
        match (self.left_was_down, down, pos) {
            // Presses only count over the picture area, like clicks on a widget.
            (false, true, Some(p)) if p.0 >= 0 && p.1 >= 0 => events.push(InputEvent::PointerDown(p)),
            (true, true, Some(p)) if self.last_pos != Some(p) => events.push(InputEvent::PointerMove(p)),
            (true, false, _) => events.push(InputEvent::PointerUp),
            _ => {}
        }
        self.left_was_down = down;
        self.last_pos = pos;
        events
    }
}

fn key_event(key: Key) -> Option<InputEvent> {
    let digit = |d: u8| Some(InputEvent::Digit(d));
    match key {
        Key::O => Some(InputEvent::Command(Command::OpenImage)),
        Key::S => Some(InputEvent::Command(Command::SaveMask)),
        Key::C => Some(InputEvent::Command(Command::SetPenColor)),
        Key::W => Some(InputEvent::Command(Command::SetPenWidth)),
        Key::Key0 | Key::NumPad0 => digit(0),
        Key::Key1 | Key::NumPad1 => digit(1),
        Key::Key2 | Key::NumPad2 => digit(2),
        Key::Key3 | Key::NumPad3 => digit(3),
        Key::Key4 | Key::NumPad4 => digit(4),
        Key::Key5 | Key::NumPad5 => digit(5),
        Key::Key6 | Key::NumPad6 => digit(6),
        Key::Key7 | Key::NumPad7 => digit(7),
        Key::Key8 | Key::NumPad8 => digit(8),
        Key::Key9 | Key::NumPad9 => digit(9),
        Key::Space | Key::Comma | Key::Period => Some(InputEvent::Separator),
        Key::Backspace => Some(InputEvent::Backspace),
        Key::Enter | Key::NumPadEnter => Some(InputEvent::Enter),
        Key::Escape => Some(InputEvent::Escape),
        _ => None,
    }
}

/* ---------- Scene: picture, HUD, prompt, crosshair ---------- */

/// Compose one full frame for the current app state.
pub fn render_scene(fb: &mut FrameBuffer, app: &App, mouse: Option<(i32, i32)>) {
    fb.fill(BACKGROUND);
    draw_canvas(fb, app.canvas(), HUD_HEIGHT);
    draw_hud(fb, app);

    match app.prompt() {
        Some(prompt) => draw_prompt(fb, prompt, app.pen()),
        None => {
            if let Some((mx, my)) = mouse {
                if my >= 0 {
                    draw_crosshair(fb, mx, my + HUD_HEIGHT as i32, 8, ACCENT);
                }
            }
        }
    }
}

/// Copy the picture into the frame at (0, top), clipped to the window.
/// Transparent picture pixels show the window background through.
pub fn draw_canvas(fb: &mut FrameBuffer, canvas: &Canvas, top: usize) {
    let Some(image) = canvas.current_image() else {
        draw_text_5x7(fb, 8, top as i32 + 8, "PRESS O TO OPEN AN IMAGE", TEXT);
        return;
    };
    let bg = Rgba([0x2B, 0x2B, 0x2B, 0xFF]);
    let rows = (image.height() as usize).min(fb.height.saturating_sub(top));
    let cols = (image.width() as usize).min(fb.width);
    for y in 0..rows {
        let row_ofs = (y + top) * fb.width;
        for x in 0..cols {
            let src = *image.get_pixel(x as u32, y as u32);
            let out = if src[3] == 255 {
                src
            } else {
                let mut px = bg;
                blend_straight(&mut px, src);
                px
            };
            fb.pixels[row_ofs + x] = pack_xrgb(out);
        }
    }
}

fn draw_hud(fb: &mut FrameBuffer, app: &App) {
    fill_rect(fb, 0, 0, fb.width as i32, HUD_HEIGHT as i32, HUD_BACKGROUND);
    let pen = app.pen();
    let keys = format!("O OPEN  S SAVE  C COLOR  W WIDTH  ESC QUIT | PEN {}", pen.width());
    let mut x = draw_text_5x7(fb, 6, 4, &keys, TEXT);
    x += 6;
    draw_swatch(fb, x, 3, 9, pen.color());
    x += 18;
    if let Some(status) = app.status() {
        draw_text_5x7(fb, x, 4, &format!("| {status}"), ACCENT);
    }
}

fn draw_prompt(fb: &mut FrameBuffer, prompt: &Prompt, pen: &PenState) {
    let (w, h) = (260, 64);
    let x0 = (fb.width as i32 - w) / 2;
    let y0 = (fb.height as i32 - h) / 2;
    fill_rect(fb, x0, y0, w, h, HUD_BACKGROUND);
    draw_rect_outline(fb, x0, y0, w, h, ACCENT);

    match prompt {
        Prompt::Palette => {
            draw_text_5x7(fb, x0 + 10, y0 + 10, "PEN COLOR: 1-9 SWATCH, 0 CUSTOM RGB", TEXT);
            for (i, (_, color)) in PALETTE.iter().enumerate() {
                let sx = x0 + 10 + i as i32 * 27;
                draw_swatch(fb, sx, y0 + 28, 18, *color);
                draw_text_5x7(fb, sx + 6, y0 + 50, &(i + 1).to_string(), TEXT);
            }
        }
        Prompt::Rgba { text } => {
            draw_text_5x7(fb, x0 + 10, y0 + 10, "CUSTOM COLOR: R G B (A), 0-255", TEXT);
            let end = draw_text_5x7(fb, x0 + 10, y0 + 30, &format!("RGBA: {text}"), ACCENT);
            fill_rect(fb, end, y0 + 30, 5, 7, ACCENT); // caret
            draw_text_5x7(fb, x0 + 10, y0 + 48, "SPACE OR , SEPARATES, ENTER OK", TEXT);
        }
        Prompt::Width { text } => {
            draw_text_5x7(fb, x0 + 10, y0 + 10, &format!("SET PEN WIDTH ({})", width_hint()), TEXT);
            let end = draw_text_5x7(fb, x0 + 10, y0 + 30, &format!("WIDTH: {text}"), ACCENT);
            fill_rect(fb, end, y0 + 30, 5, 7, ACCENT); // caret
            draw_text_5x7(fb, x0 + 10, y0 + 48, &format!("ENTER OK, ESC CANCELS, NOW {}", pen.width()), TEXT);
        }
    }
}

/// Colour chip framed in white; translucent colours are shown over black.
fn draw_swatch(fb: &mut FrameBuffer, x: i32, y: i32, size: i32, color: Rgba<u8>) {
    let mut px = Rgba([0, 0, 0, 255]);
    blend_straight(&mut px, color);
    fill_rect(fb, x, y, size, size, pack_xrgb(px));
    draw_rect_outline(fb, x, y, size, size, TEXT);
}

/* ---------- Software drawing: pixels, lines, rectangles, crosshair ---------- */

/// Put a pixel on the framebuffer if (x,y) is inside bounds.
#[inline]
fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    let idx = y * fb.width + x;
    fb.pixels[idx] = color;
}

/// Draw a thin line between (x0,y0) and (x1,y1) using Bresenham.
fn draw_line(fb: &mut FrameBuffer, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
    let (mut x0, mut y0) = (x0, y0);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        put_pixel(fb, x0, y0, color);
        if x0 == x1 && y0 == y1 { break; }
        let e2 = 2 * err;
        if e2 >= dy { err += dy; x0 += sx; }
        if e2 <= dx { err += dx; y0 += sy; }
    }
}

pub fn fill_rect(fb: &mut FrameBuffer, x: i32, y: i32, w: i32, h: i32, color: u32) {
    for yy in y..y + h {
        for xx in x..x + w {
            put_pixel(fb, xx, yy, color);
        }
    }
}

fn draw_rect_outline(fb: &mut FrameBuffer, x: i32, y: i32, w: i32, h: i32, color: u32) {
    if w <= 0 || h <= 0 {
        return;
    }
    draw_line(fb, x, y, x + w - 1, y, color);
    draw_line(fb, x, y + h - 1, x + w - 1, y + h - 1, color);
    draw_line(fb, x, y, x, y + h - 1, color);
    draw_line(fb, x + w - 1, y, x + w - 1, y + h - 1, color);
}

/// Draw a small crosshair centered at (cx,cy).
/// Visual: a “+” shape (with a tiny gap at the center) follows your mouse.
pub fn draw_crosshair(fb: &mut FrameBuffer, cx: i32, cy: i32, size: i32, color: u32) {
    draw_line(fb, cx - size, cy, cx - 2, cy, color);
    draw_line(fb, cx + 2, cy, cx + size, cy, color);
    draw_line(fb, cx, cy - size, cx, cy - 2, color);
    draw_line(fb, cx, cy + 2, cx, cy + size, color);
    put_pixel(fb, cx, cy, color);
}

/* ---------- 5x7 bitmap font (digits, A-Z, HUD punctuation) ---------- */

/// Return a 5x7 glyph bitmap. Lowercase is drawn as uppercase.
/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch.to_ascii_uppercase() {
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'J' => g!(0b00111,0b00010,0b00010,0b00010,0b00010,0b10010,0b01100),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b10001,0b11001,0b10101,0b10011,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'Q' => g!(0b01110,0b10001,0b10001,0b10001,0b10101,0b10010,0b01101),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),
        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),
        'Z' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b10000,0b11111),

        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),
        ',' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b01000),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),
        '_' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b11111),
        '/' => g!(0b00001,0b00010,0b00010,0b00100,0b01000,0b01000,0b10000),
        '\\' => g!(0b10000,0b01000,0b01000,0b00100,0b00010,0b00010,0b00001),
        '(' => g!(0b00010,0b00100,0b01000,0b01000,0b01000,0b00100,0b00010),
        ')' => g!(0b01000,0b00100,0b00010,0b00010,0b00010,0b00100,0b01000),
        '!' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00000,0b00100),
        '?' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b00000,0b00100),

        _ => None,
    }
}

/// Draw a single 5x7 character at (x,y) with a 1-pixel black shadow.
/// Characters without a glyph show as '?'.
fn draw_char_5x7(fb: &mut FrameBuffer, x: i32, y: i32, ch: char, color: u32) {
    let Some(rows) = glyph5x7(ch).or_else(|| glyph5x7('?')) else {
        return;
    };
    for (offset, c) in [(1, 0x00000000), (0, color)] {
        for (ry, rowbits) in rows.iter().enumerate() {
            for rx in 0..5 {
                if (rowbits & (1 << (4 - rx))) != 0 {
                    put_pixel(fb, x + rx + offset, y + ry as i32 + offset, c);
                }
            }
        }
    }
}

/// Draw a text string using 5x7 glyphs; returns the x just past the text.
pub fn draw_text_5x7(fb: &mut FrameBuffer, mut x: i32, y: i32, text: &str, color: u32) -> i32 {
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, color);
        x += 6; // 5 pixels glyph width + 1 pixel spacing
    }
    x
}
