use std::fs;
use std::path::Path;

use crate::FileKit;

impl FileKit {
    pub fn exists(&self, path: impl AsRef<Path>) -> bool {
        self.normalize(path).exists()
    }

    pub fn is_file(&self, path: impl AsRef<Path>) -> bool {
        self.normalize(path).is_file()
    }

    pub fn is_dir(&self, path: impl AsRef<Path>) -> bool {
        self.normalize(path).is_dir()
    }

    /// Whether `path` itself is a symbolic link; the link is not followed.
    pub fn is_symlink(&self, path: impl AsRef<Path>) -> bool {
        fs::symlink_metadata(self.normalize(path))
            .map(|metadata| metadata.file_type().is_symlink())
            .unwrap_or(false)
    }
}
