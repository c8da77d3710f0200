// File pickers for Open Image / Save Mask.
// Visual: a native open/save dialog pops up over the window; the doodler
// waits until it closes.

use std::path::PathBuf;

/// Where the shell asks for file paths. `None` means the user cancelled.
pub trait FilePicker {
    fn pick_image(&mut self) -> Option<PathBuf>;
    fn pick_mask_destination(&mut self) -> Option<PathBuf>;
}

/// Blocking native dialogs through `rfd`.
pub struct NativePicker;

impl FilePicker for NativePicker {
    fn pick_image(&mut self) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title("Open Image")
            .add_filter("Images", &["png", "jpg", "jpeg", "bmp"])
            .pick_file()
    }

    fn pick_mask_destination(&mut self) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title("Save Mask")
            .add_filter("PNG Files", &["png"])
            .set_file_name("mask.png")
            .save_file()
    }
}
