use std::path::Path;

use anyhow::Context;
use derive_setters::Setters;
use filekit_path::Platform;

/// Chunk size used by streaming reads unless configured otherwise.
pub const DEFAULT_READ_BUF_SIZE: usize = 8192;

const READ_BUF_SIZE_VAR: &str = "FILEKIT_READ_BUF_SIZE";
const CYGWIN_ROOT_VAR: &str = "FILEKIT_CYGWIN_ROOT";

/// Conventional Cygwin install locations, probed in order.
const CYGWIN_ROOTS: [&str; 2] = ["C:/cygwin", "D:/cygwin"];

#[derive(Debug, Clone, PartialEq, Eq, Setters)]
#[setters(into, strip_option)]
pub struct Config {
    /// Capacity of the buffer used by every chunked read.
    pub read_buf_size: usize,
    /// Dialect family consulted by the path transforms.
    pub platform: Platform,
    /// Cygwin installation root, only meaningful on Windows.
    pub cygwin_root: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        let platform = Platform::host();
        Self {
            read_buf_size: DEFAULT_READ_BUF_SIZE,
            platform,
            cygwin_root: detect_cygwin_root(platform),
        }
    }
}

impl Config {
    /// Defaults overridden by `FILEKIT_READ_BUF_SIZE` and
    /// `FILEKIT_CYGWIN_ROOT`.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Some(raw) = lookup(READ_BUF_SIZE_VAR) {
            let size: usize = raw
                .trim()
                .parse()
                .with_context(|| format!("Failed to parse {READ_BUF_SIZE_VAR}={raw}"))?;
            anyhow::ensure!(size > 0, "{READ_BUF_SIZE_VAR} must be greater than zero");
            config.read_buf_size = size;
        }

        if let Some(root) = lookup(CYGWIN_ROOT_VAR).filter(|root| !root.is_empty()) {
            config.cygwin_root = Some(root);
        }

        Ok(config)
    }
}

/// First conventional Cygwin root that exists, checked on Windows only.
pub fn detect_cygwin_root(platform: Platform) -> Option<String> {
    if !platform.is_windows() {
        return None;
    }
    CYGWIN_ROOTS
        .iter()
        .find(|root| Path::new(root).is_dir())
        .map(|root| root.to_string())
}
