//! io::npy
//!
//! NumPy `.npy` strategy for n-dimensional `f64` arrays.
//!
//! Arrays of any shape round-trip exactly. Files holding another element
//! type are reported as malformed content.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use ndarray::ArrayD;
use ndarray_npy::{ReadNpyError, ReadNpyExt, WriteNpyError, WriteNpyExt};

use super::traits::{
    discard_on_error, open_existing, prepare_destination, unsupported_content, unsupported_filter,
    Content, FileIoError, IoStrategy, ReadFilter,
};
use crate::core::types::Extension;

/// Reads and writes NumPy arrays (`.npy`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NpyStrategy;

impl NpyStrategy {
    pub const fn new() -> Self {
        Self
    }
}

impl IoStrategy for NpyStrategy {
    fn name(&self) -> &'static str {
        "npy"
    }

    fn extension(&self) -> Extension {
        Extension::from_static(".npy")
    }

    fn read(&self, path: &Path, filter: Option<&ReadFilter>) -> Result<Content, FileIoError> {
        if let Some(filter) = filter {
            return Err(unsupported_filter(self.name(), filter));
        }

        let file = open_existing(path)?;
        let array = ArrayD::<f64>::read_npy(BufReader::new(file)).map_err(|e| match e {
            ReadNpyError::Io(source) => FileIoError::io(path, source),
            other => FileIoError::malformed(path, other),
        })?;

        tracing::debug!(path = %path.display(), shape = ?array.shape(), "read array");
        Ok(Content::Array(array))
    }

    fn write(&self, path: &Path, content: &Content) -> Result<PathBuf, FileIoError> {
        let array = match content {
            Content::Array(a) => a,
            other => return Err(unsupported_content(self.name(), "an array", other)),
        };

        let path = prepare_destination(path, &self.extension())?;
        let file = File::create(&path).map_err(|e| FileIoError::io(&path, e))?;
        discard_on_error(&path, encode(&path, file, array))?;

        tracing::debug!(path = %path.display(), shape = ?array.shape(), "wrote array");
        Ok(path)
    }
}

fn encode(path: &Path, file: File, array: &ArrayD<f64>) -> Result<(), FileIoError> {
    let mut writer = BufWriter::new(file);
    array.write_npy(&mut writer).map_err(|e| match e {
        WriteNpyError::Io(source) => FileIoError::io(path, source),
        other => FileIoError::malformed(path, other),
    })?;
    writer.flush().map_err(|e| FileIoError::io(path, e))
}
