pub mod app;
pub mod canvas;
pub mod config;
pub mod dialogs;
pub mod draw;
pub mod error;
pub mod export;
pub mod pixel;
pub mod stroke;
pub mod types;

pub use crate::app::{App, Command, InputEvent};
pub use crate::canvas::Canvas;
pub use crate::error::{DecodeError, Error, ExportError};
pub use crate::export::{binary_mask, export_mask};
pub use crate::stroke::StrokeRenderer;
pub use crate::types::{MaskLayer, PenState};
