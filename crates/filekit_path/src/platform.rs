use strum_macros::{Display, EnumString};

/// Host family consulted by every dialect transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Platform {
    Posix,
    Windows,
}

impl Platform {
    /// Platform of the running process.
    pub fn host() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Posix
        }
    }

    pub fn is_windows(self) -> bool {
        matches!(self, Self::Windows)
    }

    /// Whether symbolic links can be created without falling back to links
    /// or copies.
    pub fn supports_symlinks(self) -> bool {
        !self.is_windows()
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::host()
    }
}
