use derive_setters::Setters;

/// Destination handling shared by `write`, `append`, `copy`, `link` and
/// `symlink`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Setters)]
#[setters(strip_option)]
pub struct FileOptions {
    /// Create missing parent directories of the destination first.
    pub mkdirp: bool,
    /// Remove an existing destination first. A missing destination is fine.
    pub unlink: bool,
    /// Permission bits for a newly created file, subject to the umask.
    pub mode: Option<u32>,
    /// For `link`: surface the hard-link failure instead of copying.
    pub no_copy: bool,
}

pub type WriteOptions = FileOptions;
pub type CopyOptions = FileOptions;
