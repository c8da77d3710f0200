// Error types for the doodler.
// Every variant states *where* things went wrong.
use std::path::PathBuf;

use thiserror::Error;

/// Loading an image failed. The canvas keeps whatever it showed before.
#[derive(Debug, Error)]
#[error("cannot open image {}: {source}", path.display())]
pub struct DecodeError {
    pub path: PathBuf,
    #[source]
    pub source: image::ImageError,
}

/// Raw pixel buffer does not match the geometry it claims to have.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PixelFormatError {
    #[error("stride {stride} is smaller than width {width}")]
    StrideTooSmall { stride: usize, width: usize },
    #[error("buffer holds {len} pixels, geometry needs {needed}")]
    BufferTooShort { len: usize, needed: usize },
}

/// Saving the mask failed. Nothing is written for `NoImage` or `Format`.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no image loaded, nothing to save")]
    NoImage,
    #[error("mask buffer is malformed: {0}")]
    Format(#[from] PixelFormatError),
    #[error("cannot write mask to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Reading the optional config file failed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("window init error: {0}")]
    WindowInit(String), // Creating the window failed
    #[error("window update error: {0}")]
    WindowUpdate(String), // Pushing the frame to the window failed
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
