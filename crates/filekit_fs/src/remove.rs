use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;

use crate::FileKit;
use crate::error::{Error, ErrorCode, IoResultExt, Result};

impl FileKit {
    /// Removes a single file or symbolic link. Directories are refused with
    /// [`ErrorCode::IsADirectory`] whatever the platform reports.
    pub fn unlink(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = self.normalize(path);
        debug!(path = %path.display(), "Removing file");
        fs::remove_file(&path).map_err(|err| {
            let is_dir = fs::symlink_metadata(&path).is_ok_and(|metadata| metadata.is_dir());
            if is_dir {
                Error::with_code(ErrorCode::IsADirectory, "unlink", &path, err)
            } else {
                Error::new("unlink", &path, err)
            }
        })
    }

    /// Removes `path` recursively. A missing path is not an error.
    pub fn rm_rf(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = self.normalize(path);
        let metadata = match fs::symlink_metadata(&path) {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(err) => return Err(err).context_path("stat", &path),
        };
        debug!(path = %path.display(), "Removing recursively");
        if metadata.is_dir() {
            fs::remove_dir_all(&path).context_path("remove", &path)
        } else {
            fs::remove_file(&path).context_path("remove", &path)
        }
    }
}
