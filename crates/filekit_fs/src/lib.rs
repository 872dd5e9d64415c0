//! # FileKit
//!
//! Synchronous, buffer-bounded filesystem utilities.
//!
//! [`FileKit`] wraps `std::fs` with a uniform error type: every fallible
//! method returns [`Result`], and every [`Error`] names the action that
//! failed, the path involved and an [`ErrorCode`] classifying the cause.
//! Streaming reads (`read_line`, `tail`, `fread`, `hash`, `copy`) go through
//! one fixed-size buffer loop, so memory use is bounded by
//! [`Config::read_buf_size`] regardless of file size.
//!
//! Every path argument is normalized through
//! [`filekit_path::PathNormalizer`] before it reaches the filesystem.

mod config;
mod copy;
mod dir;
mod error;
mod hash;
mod link;
mod meta;
mod options;
mod read;
mod remove;
mod write;

use std::path::{Path, PathBuf};

use filekit_path::PathNormalizer;

pub use crate::config::{Config, DEFAULT_READ_BUF_SIZE, detect_cygwin_root};
pub use crate::error::{Error, ErrorCode, IoResultExt, Result};
pub use crate::hash::HashAlgorithm;
pub use crate::options::{CopyOptions, FileOptions, WriteOptions};
pub use crate::read::{Contents, Encoding};
pub use crate::write::ToLines;

/// Handle exposing the throwing surface of filekit.
#[derive(Debug, Clone)]
pub struct FileKit {
    config: Config,
    paths: PathNormalizer,
}

impl Default for FileKit {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl FileKit {
    pub fn new(config: Config) -> Self {
        let paths = PathNormalizer::new(config.platform, config.cygwin_root.clone());
        Self { config, paths }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The normalizer applied to every path argument.
    pub fn paths(&self) -> &PathNormalizer {
        &self.paths
    }

    pub fn read_buf_size(&self) -> usize {
        self.config.read_buf_size
    }

    /// Changes the chunk size used by streaming operations. Zero is raised
    /// to one byte.
    pub fn set_read_buf_size(&mut self, size: usize) {
        self.config.read_buf_size = size.max(1);
    }

    /// Runs `path` through the normalizer. Paths that are not valid UTF-8
    /// are returned untouched.
    pub fn normalize(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        match path.to_str() {
            Some(text) => PathBuf::from(self.paths.normalize(text)),
            None => path.to_path_buf(),
        }
    }
}
