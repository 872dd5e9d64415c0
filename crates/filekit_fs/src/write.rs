use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::time::SystemTime;

use tracing::debug;

use crate::FileKit;
use crate::error::{IoResultExt, Result};
use crate::options::FileOptions;

/// Content accepted by [`FileKit::write_lines`].
///
/// Sequences write one line per element, each followed by `\n`; an empty
/// sequence writes nothing. A single string is one line.
pub trait ToLines {
    fn to_lines(&self) -> String;
}

fn join_lines<S: AsRef<str>>(lines: &[S]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(line.as_ref());
        out.push('\n');
    }
    out
}

impl<S: AsRef<str>> ToLines for [S] {
    fn to_lines(&self) -> String {
        join_lines(self)
    }
}

impl<S: AsRef<str>> ToLines for Vec<S> {
    fn to_lines(&self) -> String {
        join_lines(self)
    }
}

impl<S: AsRef<str>, const N: usize> ToLines for [S; N] {
    fn to_lines(&self) -> String {
        join_lines(self)
    }
}

impl ToLines for str {
    fn to_lines(&self) -> String {
        format!("{self}\n")
    }
}

impl ToLines for String {
    fn to_lines(&self) -> String {
        self.as_str().to_lines()
    }
}

const DEFAULT_FILE_MODE: u32 = 0o666;

#[cfg(unix)]
fn apply_mode(options: &mut OpenOptions, mode: u32) {
    use std::os::unix::fs::OpenOptionsExt;
    options.mode(mode);
}

#[cfg(not(unix))]
fn apply_mode(_options: &mut OpenOptions, _mode: u32) {}

impl FileKit {
    pub fn write(
        &self,
        path: impl AsRef<Path>,
        data: impl AsRef<[u8]>,
        opts: &FileOptions,
    ) -> Result<()> {
        let path = self.normalize(path);
        self.prepare_destination(&path, opts)?;
        debug!(path = %path.display(), "Writing file");
        let mut file = self.open_for_write(&path, opts.mode, false)?;
        file.write_all(data.as_ref()).context_path("write", &path)
    }

    pub fn append(
        &self,
        path: impl AsRef<Path>,
        data: impl AsRef<[u8]>,
        opts: &FileOptions,
    ) -> Result<()> {
        let path = self.normalize(path);
        self.prepare_destination(&path, opts)?;
        debug!(path = %path.display(), "Appending to file");
        let mut file = self.open_for_write(&path, opts.mode, true)?;
        file.write_all(data.as_ref()).context_path("append", &path)
    }

    pub fn write_lines<L: ToLines + ?Sized>(
        &self,
        path: impl AsRef<Path>,
        lines: &L,
        opts: &FileOptions,
    ) -> Result<()> {
        self.write(path, lines.to_lines(), opts)
    }

    /// Creates `path` if absent and bumps its modification time.
    pub fn touch(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = self.normalize(path);
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&path)
            .context_path("open", &path)?;
        file.set_modified(SystemTime::now())
            .context_path("touch", &path)
    }

    /// Opens `path` for writing, truncating unless `append`. `mode` applies
    /// only when the file gets created.
    pub(crate) fn open_for_write(
        &self,
        path: &Path,
        mode: Option<u32>,
        append: bool,
    ) -> Result<File> {
        let mut options = OpenOptions::new();
        options.create(true);
        if append {
            options.append(true);
        } else {
            options.write(true).truncate(true);
        }
        apply_mode(&mut options, mode.unwrap_or(DEFAULT_FILE_MODE));
        options.open(path).context_path("open", path)
    }

    /// Applies `mkdirp` and `unlink` from `opts` to a destination path that
    /// has already been normalized.
    pub(crate) fn prepare_destination(&self, path: &Path, opts: &FileOptions) -> Result<()> {
        if opts.mkdirp {
            self.mkdirp_file(path)?;
        }
        if opts.unlink {
            match std::fs::remove_file(path) {
                Err(err) if err.kind() != io::ErrorKind::NotFound => {
                    return Err(err).context_path("unlink", path);
                }
                _ => {}
            }
        }
        Ok(())
    }
}
