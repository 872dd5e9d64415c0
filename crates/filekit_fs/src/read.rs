use std::fs::{self, File};
use std::io;
use std::ops::ControlFlow;
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;
use strum_macros::{Display, EnumString};
use tracing::trace;

use crate::FileKit;
use crate::error::{Error, IoResultExt, Result};

lazy_static! {
    static ref LINE_BREAK: Regex = Regex::new(r"\r?\n").unwrap();
}

/// How `read_all` interprets the bytes of a file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Encoding {
    #[default]
    Utf8,
    /// One char per byte, never fails.
    Latin1,
    /// No decoding.
    Raw,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Contents {
    Text(String),
    Bytes(Vec<u8>),
}

impl Contents {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Bytes(_) => None,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Text(text) => text.into_bytes(),
            Self::Bytes(bytes) => bytes,
        }
    }
}

/// An open read handle, a fixed-capacity buffer and a cursor.
///
/// The session borrows the handle; whoever opened it closes it by dropping
/// it, whichever way the loop ends.
struct ReadSession<'a> {
    file: &'a File,
    path: Option<&'a Path>,
    buf: Vec<u8>,
    offset: u64,
}

impl<'a> ReadSession<'a> {
    fn new(file: &'a File, path: Option<&'a Path>, capacity: usize, start: u64) -> Self {
        Self { file, path, buf: vec![0; capacity], offset: start }
    }

    /// Feeds every chunk to `on_chunk` until end of file or until it breaks.
    fn run<F>(mut self, mut on_chunk: F) -> Result<()>
    where
        F: FnMut(&[u8], u64) -> Result<ControlFlow<()>>,
    {
        loop {
            let read = read_at(self.file, &mut self.buf, self.offset)
                .map_err(|err| self.read_error(err))?;
            if read == 0 {
                return Ok(());
            }
            trace!(offset = self.offset, read, "Read chunk");
            if on_chunk(&self.buf[..read], self.offset)?.is_break() {
                return Ok(());
            }
            self.offset += read as u64;
        }
    }

    fn read_error(&self, err: io::Error) -> Error {
        match self.path {
            Some(path) => Error::new("read", path, err),
            None => Error::descriptor("read", err),
        }
    }
}

#[cfg(unix)]
fn read_at(file: &File, buf: &mut [u8], offset: u64) -> io::Result<usize> {
    use std::os::unix::fs::FileExt;
    file.read_at(buf, offset)
}

#[cfg(windows)]
fn read_at(file: &File, buf: &mut [u8], offset: u64) -> io::Result<usize> {
    use std::os::windows::fs::FileExt;
    file.seek_read(buf, offset)
}

fn decode_utf8(bytes: Vec<u8>, path: &Path) -> Result<String> {
    String::from_utf8(bytes)
        .map_err(|err| Error::new("decode", path, io::Error::new(io::ErrorKind::InvalidData, err)))
}

impl FileKit {
    /// Reads `path` from `start` in chunks of at most `length` bytes
    /// (`None` or zero: the configured buffer size).
    ///
    /// `on_chunk` receives each chunk and the offset it was read from, and
    /// stops the loop early by returning `ControlFlow::Break`. Errors it
    /// returns are propagated as-is.
    pub fn read_chunks<F>(
        &self,
        path: impl AsRef<Path>,
        length: Option<usize>,
        start: u64,
        on_chunk: F,
    ) -> Result<()>
    where
        F: FnMut(&[u8], u64) -> Result<ControlFlow<()>>,
    {
        let path = self.normalize(path);
        let file = File::open(&path).context_path("open", &path)?;
        let length = length
            .filter(|length| *length > 0)
            .unwrap_or(self.config.read_buf_size);
        ReadSession::new(&file, Some(&path), length, start).run(on_chunk)
    }

    /// First line of the file without its terminator; `\r\n` counts as one.
    /// End of file terminates the last line.
    pub fn read_line(&self, path: impl AsRef<Path>) -> Result<String> {
        let path = self.normalize(path);
        let mut line = Vec::new();
        self.read_chunks(&path, None, 0, |chunk, _| {
            match chunk.iter().position(|byte| *byte == b'\n') {
                Some(end) => {
                    line.extend_from_slice(&chunk[..end]);
                    Ok(ControlFlow::Break(()))
                }
                None => {
                    line.extend_from_slice(chunk);
                    Ok(ControlFlow::Continue(()))
                }
            }
        })?;
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        decode_utf8(line, &path)
    }

    /// Whole file as UTF-8 text.
    pub fn read(&self, path: impl AsRef<Path>) -> Result<String> {
        let path = self.normalize(path);
        let bytes = fs::read(&path).context_path("read", &path)?;
        decode_utf8(bytes, &path)
    }

    pub fn read_all(&self, path: impl AsRef<Path>, encoding: Encoding) -> Result<Contents> {
        let path = self.normalize(path);
        let bytes = fs::read(&path).context_path("read", &path)?;
        Ok(match encoding {
            Encoding::Utf8 => Contents::Text(decode_utf8(bytes, &path)?),
            Encoding::Latin1 => Contents::Text(bytes.iter().map(|byte| char::from(*byte)).collect()),
            Encoding::Raw => Contents::Bytes(bytes),
        })
    }

    /// Lines split on `\n` or `\r\n`. A trailing line break does not produce
    /// an empty last line; blank lines before it are kept.
    pub fn read_lines(&self, path: impl AsRef<Path>) -> Result<Vec<String>> {
        let content = self.read(path)?;
        let mut lines: Vec<String> = LINE_BREAK.split(&content).map(str::to_string).collect();
        if lines.last().is_some_and(String::is_empty) {
            lines.pop();
        }
        Ok(lines)
    }

    /// Everything from `start` to end of file on an already open handle.
    pub fn fread(&self, file: &File, start: u64) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        ReadSession::new(file, None, self.config.read_buf_size, start).run(|chunk, _| {
            out.extend_from_slice(chunk);
            Ok(ControlFlow::Continue(()))
        })?;
        Ok(out)
    }

    /// The last `count` bytes of the file (`None` or zero: the configured
    /// buffer size), fewer when the file is smaller.
    pub fn tail(&self, path: impl AsRef<Path>, count: Option<u64>) -> Result<Vec<u8>> {
        let path = self.normalize(path);
        let size = fs::metadata(&path).context_path("stat", &path)?.len();
        let count = count
            .filter(|count| *count > 0)
            .unwrap_or(self.config.read_buf_size as u64);
        let start = size.saturating_sub(count);

        let mut out = Vec::with_capacity((size - start) as usize);
        self.read_chunks(&path, None, start, |chunk, _| {
            out.extend_from_slice(chunk);
            Ok(ControlFlow::Continue(()))
        })?;
        Ok(out)
    }
}
