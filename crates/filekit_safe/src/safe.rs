use std::fs::File;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use filekit_fs::{
    Contents, Encoding, ErrorCode, FileKit, FileOptions, HashAlgorithm, Result, ToLines,
};
use strum_macros::{Display, EnumIter, IntoStaticStr};
use tracing::debug;

use crate::last_error::{Failure, LastError};
use crate::sentinel::{Code, False, Null, Sentinel, SentinelKind};

/// Non-failing view of a [`FileKit`].
///
/// Every wrapped operation returns a sentinel instead of an error and leaves
/// the cause in [`SafeFileKit::last_error`]. The throwing surface stays
/// available through [`SafeFileKit::inner`].
#[derive(Debug, Default)]
pub struct SafeFileKit {
    fs: FileKit,
    last_error: LastError,
}

impl SafeFileKit {
    pub fn new(fs: FileKit) -> Self {
        Self { fs, last_error: LastError::default() }
    }

    pub fn inner(&self) -> &FileKit {
        &self.fs
    }

    pub fn inner_mut(&mut self) -> &mut FileKit {
        &mut self.fs
    }

    /// Code of the failure recorded by the latest wrapped call, if it failed.
    pub fn errno(&self) -> Option<ErrorCode> {
        self.last_error.code()
    }

    pub fn last_error(&self) -> Option<Failure> {
        self.last_error.get()
    }

    fn guard<S, T>(&self, operation: Operation, run: impl FnOnce() -> Result<T>) -> S::Output
    where
        S: Sentinel<T>,
    {
        self.last_error.clear();
        match run() {
            Ok(value) => S::pass(value),
            Err(err) => {
                debug!(%operation, code = %err.code(), error = %err, "Returning sentinel");
                self.last_error.record(operation, &err);
                S::fail(err.code())
            }
        }
    }

    pub fn exists(&self, path: impl AsRef<Path>) -> bool {
        self.fs.exists(path)
    }

    pub fn is_file(&self, path: impl AsRef<Path>) -> bool {
        self.fs.is_file(path)
    }

    pub fn is_dir(&self, path: impl AsRef<Path>) -> bool {
        self.fs.is_dir(path)
    }

    pub fn is_symlink(&self, path: impl AsRef<Path>) -> bool {
        self.fs.is_symlink(path)
    }

    pub fn normalize(&self, path: impl AsRef<Path>) -> PathBuf {
        self.fs.normalize(path)
    }
}

/// Declares the wrapped operations once. Each row yields an [`Operation`]
/// variant, an entry of [`SENTINELS`] and a method on [`SafeFileKit`] that
/// forwards to the [`FileKit`] method of the same name. Type parameters of
/// the method go in brackets after its name.
macro_rules! safe_surface {
    ($(
        $variant:ident => $name:ident $([$($generic:tt)*])? (
            $($arg:ident: $ty:ty),* $(,)?
        ) -> $out:ty => $kind:ident;
    )*) => {
        /// Operations available on the safe surface.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr, EnumIter)]
        #[strum(serialize_all = "snake_case")]
        pub enum Operation {
            $($variant,)*
        }

        impl Operation {
            pub fn sentinel(self) -> SentinelKind {
                match self {
                    $(Self::$variant => <$kind as Sentinel<$out>>::KIND,)*
                }
            }
        }

        /// Every wrapped operation with the sentinel it returns on failure.
        pub const SENTINELS: &[(Operation, SentinelKind)] = &[
            $((Operation::$variant, <$kind as Sentinel<$out>>::KIND),)*
        ];

        impl SafeFileKit {
            $(
                pub fn $name $(<$($generic)*>)? (
                    &self,
                    $($arg: $ty),*
                ) -> <$kind as Sentinel<$out>>::Output {
                    self.guard::<$kind, $out>(Operation::$variant, || self.fs.$name($($arg),*))
                }
            )*
        }
    };
}

safe_surface! {
    Read => read(path: impl AsRef<Path>) -> String => Null;
    ReadAll => read_all(path: impl AsRef<Path>, encoding: Encoding) -> Contents => Null;
    ReadLine => read_line(path: impl AsRef<Path>) -> String => Null;
    ReadLines => read_lines(path: impl AsRef<Path>) -> Vec<String> => Null;
    Fread => fread(file: &File, start: u64) -> Vec<u8> => Null;
    Tail => tail(path: impl AsRef<Path>, count: Option<u64>) -> Vec<u8> => Null;
    Hash => hash(path: impl AsRef<Path>, algorithm: HashAlgorithm) -> String => Null;
    Mkdirp => mkdirp(path: impl AsRef<Path>, mode: Option<u32>) -> PathBuf => Null;
    MkdirpFile => mkdirp_file(path: impl AsRef<Path>) -> PathBuf => Null;
    ReadChunks => read_chunks(
        path: impl AsRef<Path>,
        length: Option<usize>,
        start: u64,
        on_chunk: impl FnMut(&[u8], u64) -> Result<ControlFlow<()>>,
    ) -> () => False;
    Write => write(path: impl AsRef<Path>, data: impl AsRef<[u8]>, opts: &FileOptions) -> () => False;
    WriteLines => write_lines[L: ToLines + ?Sized](
        path: impl AsRef<Path>,
        lines: &L,
        opts: &FileOptions,
    ) -> () => False;
    Append => append(path: impl AsRef<Path>, data: impl AsRef<[u8]>, opts: &FileOptions) -> () => False;
    Touch => touch(path: impl AsRef<Path>) -> () => False;
    Copy => copy(src: impl AsRef<Path>, dst: impl AsRef<Path>, opts: &FileOptions) -> () => False;
    Link => link(src: impl AsRef<Path>, dst: impl AsRef<Path>, opts: &FileOptions) -> () => False;
    Symlink => symlink(src: impl AsRef<Path>, dst: impl AsRef<Path>, opts: &FileOptions) -> () => False;
    Unlink => unlink(path: impl AsRef<Path>) -> () => Code;
}
