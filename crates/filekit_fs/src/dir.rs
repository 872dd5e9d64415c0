use std::fs::DirBuilder;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::FileKit;
use crate::error::{IoResultExt, Result};

const DEFAULT_DIR_MODE: u32 = 0o777;

/// Clears the process umask for its lifetime and restores the previous
/// value on drop.
struct UmaskGuard {
    #[cfg(unix)]
    previous: libc::mode_t,
}

impl UmaskGuard {
    #[cfg(unix)]
    fn clear() -> Self {
        // SAFETY: umask only swaps the process file mode creation mask.
        let previous = unsafe { libc::umask(0) };
        Self { previous }
    }

    #[cfg(not(unix))]
    fn clear() -> Self {
        Self {}
    }
}

impl Drop for UmaskGuard {
    fn drop(&mut self) {
        // SAFETY: restores the mask saved in `clear`.
        #[cfg(unix)]
        unsafe {
            libc::umask(self.previous);
        }
    }
}

#[cfg(unix)]
fn dir_builder(mode: u32) -> DirBuilder {
    use std::os::unix::fs::DirBuilderExt;
    let mut builder = DirBuilder::new();
    builder.mode(mode);
    builder
}

#[cfg(not(unix))]
fn dir_builder(_mode: u32) -> DirBuilder {
    DirBuilder::new()
}

impl FileKit {
    /// Creates `path` along with every missing ancestor.
    ///
    /// Returns the first directory that had to be created, or `path` itself
    /// when it already existed. With an explicit `mode` the umask is cleared
    /// while the directories are created, so they get exactly `mode`.
    pub fn mkdirp(&self, path: impl AsRef<Path>, mode: Option<u32>) -> Result<PathBuf> {
        let path = self.normalize(path);
        let path = self.normalize(std::path::absolute(&path).context_path("resolve", &path)?);
        let _guard = mode.map(|_| UmaskGuard::clear());

        let mut missing = Vec::new();
        let mut current = Some(path.as_path());
        while let Some(dir) = current.filter(|dir| !dir.exists()) {
            missing.push(dir);
            current = dir.parent();
        }

        let builder = dir_builder(mode.unwrap_or(DEFAULT_DIR_MODE));
        for dir in missing.iter().rev() {
            debug!(path = %dir.display(), "Creating directory");
            builder.create(dir).context_path("mkdir", dir)?;
        }

        Ok(missing.last().map_or_else(|| path.clone(), |dir| dir.to_path_buf()))
    }

    /// Creates the parent directories of `path` and returns `path`.
    pub fn mkdirp_file(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            self.mkdirp(parent, None)?;
        }
        Ok(path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use serial_test::serial;

    use super::*;
    use crate::ErrorCode;

    #[cfg(unix)]
    fn mode_of(path: &Path) -> u32 {
        use std::os::unix::fs::PermissionsExt;
        fs::metadata(path).unwrap().permissions().mode() & 0o777
    }

    #[cfg(unix)]
    fn current_umask() -> libc::mode_t {
        let guard = UmaskGuard::clear();
        guard.previous
    }

    #[test]
    #[serial]
    fn test_mkdirp_returns_first_created_dir() {
        let dir = tempfile::tempdir().unwrap();
        let fs = FileKit::default();
        let fixture = dir.path().join("test2/test3");

        let actual = fs.mkdirp(&fixture, None).unwrap();

        let expected = dir.path().join("test2");
        assert_eq!(actual, expected);
        assert!(fixture.is_dir());
    }

    #[test]
    #[serial]
    fn test_mkdirp_existing_dir_returns_itself() {
        let dir = tempfile::tempdir().unwrap();
        let actual = FileKit::default().mkdirp(dir.path(), None).unwrap();
        assert_eq!(actual, dir.path());
    }

    #[test]
    #[serial]
    fn test_mkdirp_deep_path_with_trailing_separator() {
        let dir = tempfile::tempdir().unwrap();
        let fixture = format!("{}/a/b/c/d/e/f/", dir.path().display());

        let actual = FileKit::default().mkdirp(&fixture, None).unwrap();

        assert_eq!(actual, dir.path().join("a"));
        assert!(dir.path().join("a/b/c/d/e/f").is_dir());
    }

    #[test]
    #[serial]
    fn test_mkdirp_collapses_parent_segments() {
        let dir = tempfile::tempdir().unwrap();
        let fixture = dir.path().join("x/../y");
        let actual = FileKit::default().mkdirp(&fixture, None).unwrap();
        assert_eq!(actual, dir.path().join("y"));
    }

    #[cfg(unix)]
    #[test]
    #[serial]
    fn test_mkdirp_applies_exact_mode() {
        let dir = tempfile::tempdir().unwrap();
        let fs = FileKit::default();

        for (name, mode) in [("open", 0o777), ("shared", 0o755), ("tight", 0o700)] {
            let fixture = dir.path().join(name).join("inner");
            let made = fs.mkdirp(&fixture, Some(mode)).unwrap();
            assert_eq!(made, dir.path().join(name));
            assert_eq!(mode_of(&made), mode);
            assert_eq!(mode_of(&fixture), mode);
        }
    }

    #[cfg(unix)]
    #[test]
    #[serial]
    fn test_mkdirp_restores_umask() {
        let dir = tempfile::tempdir().unwrap();
        let before = current_umask();

        FileKit::default()
            .mkdirp(dir.path().join("m"), Some(0o777))
            .unwrap();
        let actual = current_umask();

        assert_eq!(actual, before);
    }

    #[cfg(unix)]
    #[test]
    #[serial]
    fn test_mkdirp_failure_restores_umask() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain");
        fs::write(&file, "").unwrap();
        let before = current_umask();

        let result = FileKit::default().mkdirp(file.join("sub/dir"), Some(0o700));
        let actual = current_umask();

        assert_eq!(result.unwrap_err().code(), ErrorCode::NotADirectory);
        assert_eq!(actual, before);
    }

    #[cfg(unix)]
    #[test]
    #[serial]
    fn test_mkdirp_relative_parent_segments_resolve() {
        let dir = tempfile::tempdir().unwrap();
        let base = fs::canonicalize(dir.path()).unwrap();
        fs::create_dir(base.join("cwd")).unwrap();
        let previous = std::env::current_dir().unwrap();
        std::env::set_current_dir(base.join("cwd")).unwrap();

        let result = FileKit::default().mkdirp("../made/inner", None);
        std::env::set_current_dir(previous).unwrap();
        let actual = result.unwrap();

        let expected = base.join("made");
        assert_eq!(actual, expected);
        assert!(!actual.components().any(|part| part == std::path::Component::ParentDir));
        assert!(base.join("made/inner").is_dir());
    }

    #[test]
    #[serial]
    fn test_mkdirp_under_file_is_not_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("mkdir_file");
        fs::write(&file, "").unwrap();

        let actual = FileKit::default()
            .mkdirp(file.join("cannot/create"), None)
            .unwrap_err();

        assert_eq!(actual.code(), ErrorCode::NotADirectory);
    }

    #[cfg(unix)]
    #[test]
    #[serial]
    fn test_mkdirp_permission_denied() {
        // SAFETY: geteuid has no preconditions.
        if unsafe { libc::geteuid() } == 0 {
            return;
        }
        let actual = FileKit::default()
            .mkdirp("/cannot/create", None)
            .unwrap_err();
        assert_eq!(actual.code(), ErrorCode::PermissionDenied);
    }

    #[test]
    #[serial]
    fn test_mkdirp_file_creates_parent_only() {
        let dir = tempfile::tempdir().unwrap();
        let fixture = dir.path().join("p/q/file.txt");

        let actual = FileKit::default().mkdirp_file(&fixture).unwrap();

        assert_eq!(actual, fixture);
        assert!(dir.path().join("p/q").is_dir());
        assert!(!fixture.exists());
    }

    #[test]
    fn test_mkdirp_file_bare_name() {
        let actual = FileKit::default().mkdirp_file("file.txt").unwrap();
        assert_eq!(actual, PathBuf::from("file.txt"));
    }
}
