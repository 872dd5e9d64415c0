use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;

use crate::FileKit;
use crate::copy::same_file;
use crate::error::{IoResultExt, Result};
use crate::options::FileOptions;

#[cfg(unix)]
fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    if target.is_dir() {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    }
}

#[cfg(not(any(unix, windows)))]
fn create_symlink(_target: &Path, _link: &Path) -> io::Result<()> {
    Err(io::Error::from(io::ErrorKind::Unsupported))
}

impl FileKit {
    /// Hard-links `dst` to `src`.
    ///
    /// When the link cannot be made (another device, a directory source) the
    /// content is copied instead, unless `opts.no_copy` is set.
    pub fn link(
        &self,
        src: impl AsRef<Path>,
        dst: impl AsRef<Path>,
        opts: &FileOptions,
    ) -> Result<()> {
        let src = self.normalize(src);
        let dst = self.normalize(dst);
        if same_file(&src, &dst) {
            debug!(dst = %dst.display(), "Destination already links to the source");
            return Ok(());
        }
        self.prepare_destination(&dst, opts)?;

        match fs::hard_link(&src, &dst) {
            Ok(()) => Ok(()),
            Err(err) if opts.no_copy => Err(err).context_path("link", &dst),
            Err(err) => {
                debug!(
                    src = %src.display(),
                    dst = %dst.display(),
                    error = %err,
                    "Hard link failed, copying instead"
                );
                self.copy(&src, &dst, opts)
            }
        }
    }

    /// Points `dst` at the canonical path of `src`. Platforms without
    /// symbolic links get a hard link instead.
    pub fn symlink(
        &self,
        src: impl AsRef<Path>,
        dst: impl AsRef<Path>,
        opts: &FileOptions,
    ) -> Result<()> {
        if !self.config.platform.supports_symlinks() {
            return self.link(src, dst, opts);
        }
        let src = self.normalize(src);
        let dst = self.normalize(dst);
        self.prepare_destination(&dst, opts)?;

        let target = fs::canonicalize(&src).context_path("resolve", &src)?;
        debug!(target = %target.display(), dst = %dst.display(), "Creating symlink");
        create_symlink(&target, &dst).context_path("symlink", &dst)
    }
}
