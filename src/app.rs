// The application shell: turns input events into canvas/pen/export actions.
// Visual: every key command either changes the picture, opens a prompt in
// the HUD, or leaves a status message there.

use std::path::{Path, PathBuf};

use image::Rgba;
use log::{debug, info, warn};

use crate::canvas::Canvas;
use crate::dialogs::FilePicker;
use crate::error::ExportError;
use crate::export::export_mask;
use crate::stroke::{Point, StrokeRenderer};
use crate::types::{PenState, MAX_PEN_WIDTH};

/// Swatches offered by the colour prompt, keys 1..9.
pub const PALETTE: [(&str, Rgba<u8>); 9] = [
    ("FAINT RED", Rgba([255, 0, 0, 20])),
    ("RED", Rgba([255, 0, 0, 255])),
    ("GREEN", Rgba([0, 200, 0, 255])),
    ("BLUE", Rgba([0, 80, 255, 255])),
    ("YELLOW", Rgba([255, 220, 0, 255])),
    ("MAGENTA", Rgba([255, 0, 255, 255])),
    ("CYAN", Rgba([0, 220, 220, 255])),
    ("WHITE", Rgba([255, 255, 255, 255])),
    ("BLACK", Rgba([0, 0, 0, 255])),
];

/// Width prompt never holds more digits than the widest pen needs.
const WIDTH_DIGITS: usize = 3;
/// "255 255 255 255": four channels, three separators.
const RGBA_CHARS: usize = 15;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    OpenImage,
    SaveMask,
    SetPenColor,
    SetPenWidth,
}

/// One discrete input, already in image coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    PointerDown(Point),
    PointerMove(Point),
    PointerUp,
    Command(Command),
    Digit(u8),
    /// Space/comma between channel values in the custom colour prompt.
    Separator,
    Backspace,
    Enter,
    Escape,
}

/// Modal prompt currently shown in the HUD.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Prompt {
    Palette,
    /// Custom colour typed as "R G B" or "R G B A", decimal 0-255.
    Rgba { text: String },
    Width { text: String },
}

pub struct App {
    canvas: Canvas,
    renderer: StrokeRenderer,
    pen: PenState,
    prompt: Option<Prompt>,
    status: Option<String>,
    quit: bool,
}

impl App {
    pub fn new(pen: PenState) -> Self {
        Self {
            canvas: Canvas::new(),
            renderer: StrokeRenderer::new(),
            pen,
            prompt: None,
            status: None,
            quit: false,
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn pen(&self) -> &PenState {
        &self.pen
    }

    pub fn prompt(&self) -> Option<&Prompt> {
        self.prompt.as_ref()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn wants_quit(&self) -> bool {
        self.quit
    }

    pub fn is_drawing(&self) -> bool {
        self.renderer.is_drawing()
    }

    /// Handle one input. Returns true when the canvas pixels changed.
    pub fn dispatch(&mut self, event: InputEvent, picker: &mut dyn FilePicker) -> bool {
        // Releasing the button always ends a stroke, prompt or not.
        if event == InputEvent::PointerUp {
            self.renderer.pointer_up();
            return false;
        }
        if self.prompt.is_some() {
            self.prompt_input(event);
            return false;
        }

        match event {
            InputEvent::PointerDown(pos) => self.renderer.pointer_down(pos, &self.canvas),
            InputEvent::PointerMove(pos) => return self.renderer.pointer_move(pos, &mut self.canvas, &self.pen),
            InputEvent::Command(cmd) => return self.run_command(cmd, picker),
            InputEvent::Escape => self.quit = true,
            InputEvent::PointerUp
            | InputEvent::Digit(_)
            | InputEvent::Separator
            | InputEvent::Backspace
            | InputEvent::Enter => {}
        }
        false
    }

    fn run_command(&mut self, cmd: Command, picker: &mut dyn FilePicker) -> bool {
        debug!("command {cmd:?}");
        match cmd {
            Command::OpenImage => match picker.pick_image() {
                Some(path) => return self.open_image(&path),
                None => debug!("open cancelled"),
            },
            Command::SaveMask => {
                // No dialog when there is nothing to save.
                if !self.canvas.is_loaded() {
                    self.report_export(Err(ExportError::NoImage));
                } else if let Some(path) = picker.pick_mask_destination() {
                    self.save_mask(&with_png_extension(path));
                }
            }
            Command::SetPenColor => self.open_prompt(Prompt::Palette),
            Command::SetPenWidth => self.open_prompt(Prompt::Width { text: self.pen.width().to_string() }),
        }
        false
    }

    fn open_prompt(&mut self, prompt: Prompt) {
        self.renderer.pointer_up();
        self.prompt = Some(prompt);
    }

    /// Load an image; on failure the old picture stays and the HUD says why.
    pub fn open_image(&mut self, path: &Path) -> bool {
        match self.canvas.load(path) {
            Ok(()) => {
                self.renderer.reset();
                self.status = Some(format!("OPENED {}", file_label(path)));
                true
            }
            Err(e) => {
                warn!("{e}");
                self.status = Some(format!("OPEN FAILED: {}", file_label(path)));
                false
            }
        }
    }

    pub fn save_mask(&mut self, path: &Path) {
        let result = export_mask(self.canvas.current_mask(), path);
        if result.is_ok() {
            self.status = Some(format!("MASK SAVED: {}", file_label(path)));
        }
        self.report_export(result);
    }

    fn report_export(&mut self, result: Result<(), ExportError>) {
        if let Err(e) = result {
            warn!("{e}");
            self.status = Some(match e {
                ExportError::NoImage => "NOTHING TO SAVE: OPEN AN IMAGE FIRST".to_string(),
                ExportError::Format(_) => "SAVE FAILED: MASK BUFFER IS DAMAGED".to_string(),
                ExportError::Write { path, .. } => format!("SAVE FAILED: {}", path.display()),
            });
        }
    }

    fn prompt_input(&mut self, event: InputEvent) {
        let mut close = false;
        let mut next = None;
        match (self.prompt.as_mut(), event) {
            (_, InputEvent::Escape) => close = true,
            (Some(Prompt::Palette), InputEvent::Digit(0)) => {
                next = Some(Prompt::Rgba { text: rgba_text(self.pen.color()) });
            }
            (Some(Prompt::Palette), InputEvent::Digit(d @ 1..=9)) => {
                let (name, color) = PALETTE[d as usize - 1];
                self.pen.set_color(color);
                info!("pen colour {name} {:?}", color.0);
                self.status = Some(format!("PEN COLOR: {name}"));
                close = true;
            }
            (Some(Prompt::Rgba { text }), InputEvent::Digit(d)) => {
                if text.len() < RGBA_CHARS && d <= 9 {
                    text.push(char::from(b'0' + d));
                }
            }
            (Some(Prompt::Rgba { text }), InputEvent::Separator) => {
                if text.len() < RGBA_CHARS && !text.is_empty() && !text.ends_with(' ') {
                    text.push(' ');
                }
            }
            (Some(Prompt::Rgba { text }), InputEvent::Backspace) => {
                text.pop();
            }
            (Some(Prompt::Rgba { text }), InputEvent::Enter) => {
                match parse_rgba(text) {
                    Some(color) => {
                        self.pen.set_color(color);
                        info!("pen colour custom {:?}", color.0);
                        self.status = Some(format!("PEN COLOR: {}", rgba_text(color)));
                    }
                    None => {
                        warn!("rejected colour entry {text:?}");
                        self.status = Some("BAD COLOR: TYPE R G B OR R G B A, EACH 0-255".to_string());
                    }
                }
                close = true;
            }
            (Some(Prompt::Width { text }), InputEvent::Digit(d)) => {
                if text.len() < WIDTH_DIGITS && d <= 9 {
                    text.push(char::from(b'0' + d));
                }
            }
            (Some(Prompt::Width { text }), InputEvent::Backspace) => {
                text.pop();
            }
            (Some(Prompt::Width { text }), InputEvent::Enter) => {
                if let Ok(width) = text.parse::<u32>() {
                    self.pen.set_width(width);
                    info!("pen width {} (asked {width})", self.pen.width());
                    self.status = Some(format!("PEN WIDTH: {}", self.pen.width()));
                }
                close = true;
            }
            _ => {}
        }
        if close {
            self.prompt = None;
        } else if next.is_some() {
            self.prompt = next;
        }
    }
}

/// "R G B A" as typed back into the custom colour prompt.
pub fn rgba_text(color: Rgba<u8>) -> String {
    let [r, g, b, a] = color.0;
    format!("{r} {g} {b} {a}")
}

/// Parse "R G B" (opaque) or "R G B A"; each value must fit in 0-255.
pub fn parse_rgba(text: &str) -> Option<Rgba<u8>> {
    let values: Vec<u8> = text
        .split(|c: char| c == ' ' || c == ',')
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<u8>().ok())
        .collect::<Option<_>>()?;
    match values[..] {
        [r, g, b] => Some(Rgba([r, g, b, 255])),
        [r, g, b, a] => Some(Rgba([r, g, b, a])),
        _ => None,
    }
}

/// Save dialogs may hand back a name without `.png`.
/// An existing suffix is kept: "scan.v2" becomes "scan.v2.png", never "scan.png".
pub fn with_png_extension(path: PathBuf) -> PathBuf {
    match path.extension() {
        Some(ext) if ext.eq_ignore_ascii_case("png") => path,
        None => path.with_extension("png"),
        Some(_) => {
            let mut name = path.into_os_string();
            name.push(".png");
            PathBuf::from(name)
        }
    }
}

fn file_label(path: &Path) -> String {
    path.file_name().unwrap_or(path.as_os_str()).to_string_lossy().into_owned()
}

/// Upper bound shown next to the width prompt.
pub fn width_hint() -> String {
    format!("1-{MAX_PEN_WIDTH}")
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Picker that answers with fixed paths and counts how often it was asked.
    #[derive(Default)]
    struct ScriptedPicker {
        open: Option<PathBuf>,
        save: Option<PathBuf>,
        asked: usize,
    }

    impl FilePicker for ScriptedPicker {
        fn pick_image(&mut self) -> Option<PathBuf> {
            self.asked += 1;
            self.open.clone()
        }
        fn pick_mask_destination(&mut self) -> Option<PathBuf> {
            self.asked += 1;
            self.save.clone()
        }
    }

    fn press(app: &mut App, events: &[InputEvent]) {
        let mut picker = ScriptedPicker::default();
        for &e in events {
            app.dispatch(e, &mut picker);
        }
    }

    #[test]
    fn save_without_image_skips_dialog() {
        let mut app = App::new(PenState::default());
        let mut picker = ScriptedPicker { save: Some(PathBuf::from("/tmp/x.png")), ..Default::default() };
        app.dispatch(InputEvent::Command(Command::SaveMask), &mut picker);
        assert_eq!(picker.asked, 0);
        assert!(app.status().unwrap().contains("NOTHING TO SAVE"));
    }

    #[test]
    fn width_prompt_clamps_and_commits() {
        let mut app = App::new(PenState::default());
        press(&mut app, &[
            InputEvent::Command(Command::SetPenWidth),
            InputEvent::Backspace,
            InputEvent::Digit(1),
            InputEvent::Digit(5),
            InputEvent::Digit(0),
            InputEvent::Digit(7), // ignored, three digits max
            InputEvent::Enter,
        ]);
        assert_eq!(app.pen().width(), 100);
        assert!(app.prompt().is_none());

        press(&mut app, &[
            InputEvent::Command(Command::SetPenWidth),
            InputEvent::Backspace,
            InputEvent::Backspace,
            InputEvent::Backspace,
            InputEvent::Digit(0),
            InputEvent::Enter,
        ]);
        assert_eq!(app.pen().width(), 1);
    }

    #[test]
    fn width_prompt_starts_with_current_width() {
        let mut app = App::new(PenState::default());
        press(&mut app, &[InputEvent::Command(Command::SetPenWidth)]);
        assert_eq!(app.prompt(), Some(&Prompt::Width { text: "5".into() }));
        press(&mut app, &[InputEvent::Digit(2), InputEvent::Escape]);
        assert_eq!(app.pen().width(), 5, "escape must not commit");
        assert!(!app.wants_quit(), "escape closes the prompt only");
    }

    #[test]
    fn palette_prompt_sets_colour() {
        let mut app = App::new(PenState::default());
        press(&mut app, &[InputEvent::Command(Command::SetPenColor), InputEvent::Separator]);
        assert_eq!(app.prompt(), Some(&Prompt::Palette));
        press(&mut app, &[InputEvent::Digit(4)]);
        assert_eq!(app.pen().color(), PALETTE[3].1);
        assert!(app.prompt().is_none());
    }

    fn type_rgba(app: &mut App, text: &str) {
        press(app, &[InputEvent::Command(Command::SetPenColor), InputEvent::Digit(0)]);
        for _ in 0..RGBA_CHARS {
            press(app, &[InputEvent::Backspace]);
        }
        for ch in text.chars() {
            let event = match ch {
                ' ' | ',' => InputEvent::Separator,
                d => InputEvent::Digit(d.to_digit(10).unwrap() as u8),
            };
            press(app, &[event]);
        }
        press(app, &[InputEvent::Enter]);
    }

    #[test]
    fn custom_colour_prompt_starts_with_current_colour() {
        let mut app = App::new(PenState::default());
        press(&mut app, &[InputEvent::Command(Command::SetPenColor), InputEvent::Digit(0)]);
        assert_eq!(app.prompt(), Some(&Prompt::Rgba { text: "255 0 0 20".into() }));
    }

    #[test]
    fn custom_colour_reaches_any_rgb() {
        let mut app = App::new(PenState::default());
        type_rgba(&mut app, "12 34 56");
        assert_eq!(app.pen().color(), Rgba([12, 34, 56, 255]));
        assert!(app.prompt().is_none());

        type_rgba(&mut app, "200,100,50,128");
        assert_eq!(app.pen().color(), Rgba([200, 100, 50, 128]));
    }

    #[test]
    fn bad_custom_colour_keeps_pen() {
        let mut app = App::new(PenState::default());
        type_rgba(&mut app, "300 0 0");
        assert_eq!(app.pen().color(), PenState::default().color());
        assert!(app.status().unwrap().starts_with("BAD COLOR"));
        type_rgba(&mut app, "1 2");
        assert_eq!(app.pen().color(), PenState::default().color());
    }

    #[test]
    fn rgba_parsing() {
        assert_eq!(parse_rgba("1 2 3"), Some(Rgba([1, 2, 3, 255])));
        assert_eq!(parse_rgba(" 1,2 3 4 "), Some(Rgba([1, 2, 3, 4])));
        assert_eq!(parse_rgba("1 2 3 4 5"), None);
        assert_eq!(parse_rgba("256 0 0"), None);
        assert_eq!(parse_rgba(""), None);
    }

    #[test]
    fn escape_without_prompt_quits() {
        let mut app = App::new(PenState::default());
        press(&mut app, &[InputEvent::Escape]);
        assert!(app.wants_quit());
    }

    #[test]
    fn png_extension_is_added_once() {
        assert_eq!(with_png_extension(PathBuf::from("a/mask")), PathBuf::from("a/mask.png"));
        assert_eq!(with_png_extension(PathBuf::from("a/mask.PNG")), PathBuf::from("a/mask.PNG"));
        // dotted names keep their full name; nothing the dialog did not confirm is overwritten
        assert_eq!(with_png_extension(PathBuf::from("out/scan.v2")), PathBuf::from("out/scan.v2.png"));
        assert_eq!(with_png_extension(PathBuf::from("out/photo.jpg")), PathBuf::from("out/photo.jpg.png"));
    }

    #[test]
    fn cancelled_open_changes_nothing() {
        let mut app = App::new(PenState::default());
        let mut picker = ScriptedPicker::default();
        assert!(!app.dispatch(InputEvent::Command(Command::OpenImage), &mut picker));
        assert_eq!(picker.asked, 1);
        assert!(!app.canvas().is_loaded());
    }
}
