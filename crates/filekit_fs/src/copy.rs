use std::fs;
use std::io::Write;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::FileKit;
use crate::error::{IoResultExt, Result};
use crate::options::FileOptions;

#[cfg(unix)]
fn permission_bits(metadata: &fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o777
}

#[cfg(not(unix))]
fn permission_bits(metadata: &fs::Metadata) -> u32 {
    if metadata.permissions().readonly() { 0o444 } else { 0o666 }
}

/// Whether both paths name the same existing file.
#[cfg(unix)]
pub(crate) fn same_file(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;
    match (fs::metadata(a), fs::metadata(b)) {
        (Ok(a), Ok(b)) => a.dev() == b.dev() && a.ino() == b.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
pub(crate) fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn ends_with_separator(path: &Path) -> bool {
    path.as_os_str()
        .to_str()
        .is_some_and(|text| text.ends_with('/') || text.ends_with(std::path::MAIN_SEPARATOR))
}

impl FileKit {
    /// Copies a file, or a directory tree entry by entry.
    ///
    /// A file copied onto an existing directory, or onto a path ending with
    /// a separator, lands inside it under its own name. Directory copies
    /// stop at the first entry that fails.
    pub fn copy(
        &self,
        src: impl AsRef<Path>,
        dst: impl AsRef<Path>,
        opts: &FileOptions,
    ) -> Result<()> {
        let src = self.normalize(src);
        let dst = self.normalize(dst);
        if src.is_dir() {
            self.copy_dir(&src, &dst, opts)
        } else {
            self.copy_file(&src, &dst, opts)
        }
    }

    fn copy_dir(&self, src: &Path, dst: &Path, opts: &FileOptions) -> Result<()> {
        debug!(src = %src.display(), dst = %dst.display(), "Copying directory");
        self.mkdirp(dst, None)?;

        let mut names = fs::read_dir(src)
            .context_path("read directory", src)?
            .map(|entry| entry.map(|entry| entry.file_name()))
            .collect::<std::io::Result<Vec<_>>>()
            .context_path("read directory", src)?;
        names.sort();

        for name in names {
            self.copy(src.join(&name), dst.join(&name), opts)?;
        }
        Ok(())
    }

    fn copy_file(&self, src: &Path, dst: &Path, opts: &FileOptions) -> Result<()> {
        let metadata = fs::metadata(src).context_path("stat", src)?;
        let dst = self.copy_target(src, dst);
        if same_file(src, &dst) {
            debug!(dst = %dst.display(), "Destination is the source, nothing to copy");
            return Ok(());
        }
        self.prepare_destination(&dst, opts)?;

        let mode = opts.mode.unwrap_or_else(|| permission_bits(&metadata));
        debug!(src = %src.display(), dst = %dst.display(), mode, "Copying file");
        let mut out = self.open_for_write(&dst, Some(mode), false)?;
        self.read_chunks(src, None, 0, |chunk, _| {
            out.write_all(chunk).context_path("write", &dst)?;
            Ok(ControlFlow::Continue(()))
        })
    }

    fn copy_target(&self, src: &Path, dst: &Path) -> PathBuf {
        if !dst.is_dir() && !ends_with_separator(dst) {
            return dst.to_path_buf();
        }
        match src.file_name() {
            Some(name) => dst.join(name),
            None => dst.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serial_test::serial;
    use tempfile::TempDir;

    use super::*;
    use crate::ErrorCode;

    struct Fixture {
        dir: TempDir,
        fs: FileKit,
    }

    impl Fixture {
        fn new() -> Self {
            Self { dir: tempfile::tempdir().unwrap(), fs: FileKit::default() }
        }

        fn path(&self, name: &str) -> PathBuf {
            self.dir.path().join(name)
        }

        fn file(&self, name: &str, content: &str) -> PathBuf {
            let path = self.path(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, content).unwrap();
            path
        }
    }

    #[test]
    #[serial]
    fn test_copy_file() {
        let fixture = Fixture::new();
        let src = fixture.file("src.txt", "data");
        let dst = fixture.path("dst.txt");

        fixture.fs.copy(&src, &dst, &FileOptions::default()).unwrap();

        assert_eq!(fs::read_to_string(&dst).unwrap(), "data");
    }

    #[test]
    #[serial]
    fn test_copy_across_several_chunks() {
        let mut fixture = Fixture::new();
        fixture.fs.set_read_buf_size(3);
        let content = "0123456789".repeat(7);
        let src = fixture.file("src.txt", &content);
        let dst = fixture.path("dst.txt");

        fixture.fs.copy(&src, &dst, &FileOptions::default()).unwrap();

        assert_eq!(fs::read_to_string(&dst).unwrap(), content);
    }

    #[test]
    #[serial]
    fn test_copy_into_existing_directory() {
        let fixture = Fixture::new();
        let src = fixture.file("src.txt", "data");
        let dst = fixture.path("target");
        fs::create_dir(&dst).unwrap();

        fixture.fs.copy(&src, &dst, &FileOptions::default()).unwrap();

        assert_eq!(fs::read_to_string(dst.join("src.txt")).unwrap(), "data");
    }

    #[test]
    #[serial]
    fn test_copy_into_separator_terminated_path() {
        let fixture = Fixture::new();
        let src = fixture.file("src.txt", "data");
        let dst = format!("{}/", fixture.path("fresh").display());

        fixture
            .fs
            .copy(&src, &dst, &FileOptions::default().mkdirp(true))
            .unwrap();

        let actual = fs::read_to_string(fixture.path("fresh/src.txt")).unwrap();
        assert_eq!(actual, "data");
    }

    #[test]
    #[serial]
    fn test_copy_missing_destination_dir_without_mkdirp() {
        let fixture = Fixture::new();
        let src = fixture.file("src.txt", "data");
        let actual = fixture
            .fs
            .copy(&src, fixture.path("no/such/dir/file"), &FileOptions::default())
            .unwrap_err();
        assert_eq!(actual.code(), ErrorCode::NotFound);
    }

    #[test]
    #[serial]
    fn test_copy_missing_source() {
        let fixture = Fixture::new();
        let actual = fixture
            .fs
            .copy(fixture.path("missing"), fixture.path("dst"), &FileOptions::default())
            .unwrap_err();
        assert_eq!(actual.code(), ErrorCode::NotFound);
        assert_eq!(actual.action(), "stat");
    }

    #[test]
    #[serial]
    fn test_copy_directory_tree() {
        let fixture = Fixture::new();
        fixture.file("tree/a.txt", "a");
        fixture.file("tree/sub/b.txt", "b");
        fixture.file("tree/sub/deeper/c.txt", "c");

        fixture
            .fs
            .copy(fixture.path("tree"), fixture.path("copy"), &FileOptions::default())
            .unwrap();

        for (name, expected) in [("a.txt", "a"), ("sub/b.txt", "b"), ("sub/deeper/c.txt", "c")] {
            let actual = fs::read_to_string(fixture.path("copy").join(name)).unwrap();
            assert_eq!(actual, expected);
        }
    }

    #[test]
    #[serial]
    fn test_copy_onto_itself_keeps_content() {
        let fixture = Fixture::new();
        let src = fixture.file("precious.txt", "precious");

        fixture.fs.copy(&src, &src, &FileOptions::default()).unwrap();
        fixture
            .fs
            .copy(&src, fixture.dir.path(), &FileOptions::default().unlink(true))
            .unwrap();

        assert_eq!(fs::read_to_string(&src).unwrap(), "precious");
    }

    #[cfg(unix)]
    #[test]
    #[serial]
    fn test_copy_onto_hard_link_of_source_keeps_content() {
        let fixture = Fixture::new();
        let src = fixture.file("src.txt", "precious");
        let dst = fixture.path("dst.txt");
        fs::hard_link(&src, &dst).unwrap();

        fixture.fs.copy(&src, &dst, &FileOptions::default()).unwrap();

        assert_eq!(fs::read_to_string(&src).unwrap(), "precious");
        assert_eq!(fs::read_to_string(&dst).unwrap(), "precious");
    }

    #[cfg(unix)]
    #[test]
    #[serial]
    fn test_copy_keeps_source_mode() {
        use std::os::unix::fs::PermissionsExt;

        let fixture = Fixture::new();
        let src = fixture.file("script.sh", "#!/bin/sh\n");
        fs::set_permissions(&src, fs::Permissions::from_mode(0o750)).unwrap();
        let dst = fixture.path("copied.sh");

        fixture.fs.copy(&src, &dst, &FileOptions::default()).unwrap();

        let umask = {
            // SAFETY: the mask is read and put back immediately.
            let mask = unsafe { libc::umask(0) };
            unsafe { libc::umask(mask) };
            mask as u32
        };
        let actual = fs::metadata(&dst).unwrap().permissions().mode() & 0o777;
        assert_eq!(actual, 0o750 & !umask);
    }

    #[cfg(unix)]
    #[test]
    #[serial]
    fn test_copy_explicit_mode() {
        use std::os::unix::fs::PermissionsExt;

        let fixture = Fixture::new();
        let src = fixture.file("src.txt", "data");
        let dst = fixture.path("dst.txt");

        fixture
            .fs
            .copy(&src, &dst, &FileOptions::default().mode(0o600))
            .unwrap();

        let actual = fs::metadata(&dst).unwrap().permissions().mode() & 0o777;
        assert_eq!(actual, 0o600);
    }
}
