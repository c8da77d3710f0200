// What you SEE:
// • A window with a HUD strip on top; the picture sits right under it.
// • O opens an image, hold Left Mouse to doodle over it.
// • C picks a pen colour, W sets the pen width (1-100).
// • S saves the mask: white where you doodled, black elsewhere. ESC quits.

use image_doodler::app::App;
use image_doodler::config::DoodlerConfig;
use image_doodler::dialogs::NativePicker;
use image_doodler::draw::{render_scene, Drawer};
use image_doodler::error::Error;
use image_doodler::types::FrameBuffer;
use log::{info, warn};

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    /* --- Startup defaults ---
       A broken config file only costs you the custom defaults. */
    let config = DoodlerConfig::load().unwrap_or_else(|e| {
        warn!("{e}; using defaults");
        DoodlerConfig::default()
    });
    info!("starting image doodler, pen {:?} width {}", config.pen_color, config.pen().width());

    /* --- Window + reusable screen buffer ---
       Visual: window opens with the HUD and an "open an image" hint. */
    let mut drawer = Drawer::new("Image Doodler", config.window_width, config.window_height)?;
    let mut screen = FrameBuffer::new(config.window_width, config.window_height);

    let mut app = App::new(config.pen());
    let mut picker = NativePicker;

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !app.wants_quit() {
        /* 1) Inputs: keys become commands, mouse edges become stroke events.
           Open/Save block here while their dialog is up. */
        for event in drawer.poll_events() {
            app.dispatch(event, &mut picker);
        }

        /* 2) Follow the window size (it is resizable). */
        let (w, h) = drawer.size();
        screen.resize(w.max(1), h.max(1));

        /* 3) Picture + HUD + prompt/crosshair, then present. */
        render_scene(&mut screen, &app, drawer.mouse_pos());
        drawer.present(&screen)?;
    }

    info!("bye");
    Ok(())
}
