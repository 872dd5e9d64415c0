use std::path::Path;

use lazy_static::lazy_static;
use regex::{Captures, Regex, RegexBuilder};

use crate::{Platform, collapse};

lazy_static! {
    static ref DRIVE: Regex = Regex::new(r"^[A-Za-z]:").unwrap();
    static ref ABSOLUTE: Regex = Regex::new(r"^(/|[A-Za-z]:)").unwrap();
    static ref CYGDRIVE: Regex = Regex::new(r"^/cygdrive/([A-Za-z])(/(.*))?$").unwrap();
}

/// Converts paths between the POSIX, Windows and Cygwin dialects.
///
/// Off Windows every dialect transform is the identity (except
/// [`PathNormalizer::win_to_unix`] with `force`), so a normalizer built for
/// [`Platform::Posix`] only collapses `.`/`..` segments.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PathNormalizer {
    platform: Platform,
    cygwin_root: Option<String>,
}

impl PathNormalizer {
    pub fn new(platform: Platform, cygwin_root: Option<String>) -> Self {
        Self { platform, cygwin_root }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn cygwin_root(&self) -> Option<&str> {
        self.cygwin_root.as_deref()
    }

    /// `C:\xxx\yyy` becomes `c:/xxx/yyy`.
    pub fn win_to_unix(&self, path: &str, force: bool) -> String {
        if !force && !self.platform.is_windows() {
            return path.to_string();
        }
        let path = path.replace('\\', "/");
        DRIVE
            .replace(&path, |caps: &Captures<'_>| caps[0].to_lowercase())
            .into_owned()
    }

    /// Maps Cygwin paths onto the Windows filesystem.
    ///
    /// The first matching rule wins:
    /// `/cygdrive/x/rest` becomes `x:/rest`, `/usr/lib/rest` and
    /// `/usr/bin/rest` land under `<root>/lib` and `<root>/bin`, any other
    /// rooted path lands under the lower-cased Cygwin root. Without a
    /// configured root only the `/cygdrive` rule applies.
    pub fn cyg_to_unix(&self, path: &str) -> String {
        if !self.platform.is_windows() {
            return path.to_string();
        }
        if let Some(caps) = CYGDRIVE.captures(path) {
            let rest = caps.get(3).map_or("", |m| m.as_str());
            return format!("{}:/{rest}", &caps[1]);
        }
        let Some(root) = self.cygwin_root.as_deref() else {
            return path.to_string();
        };
        if let Some(rest) = path.strip_prefix("/usr/lib/") {
            format!("{root}/lib/{rest}")
        } else if let Some(rest) = path.strip_prefix("/usr/bin/") {
            format!("{root}/bin/{rest}")
        } else if let Some(rest) = path.strip_prefix('/') {
            format!("{}/{rest}", root.to_lowercase())
        } else {
            path.to_string()
        }
    }

    /// `c:/xxx/yyy` becomes `C:\xxx\yyy`.
    pub fn unix_to_win(&self, path: &str) -> String {
        if !self.platform.is_windows() {
            return path.to_string();
        }
        DRIVE
            .replace(path, |caps: &Captures<'_>| caps[0].to_uppercase())
            .replace('/', "\\")
    }

    /// Maps a Windows path to its Cygwin spelling: paths inside the Cygwin
    /// root become rooted at `/`, other drive paths go under `/cygdrive`.
    pub fn win_to_cyg(&self, path: &str) -> String {
        if !self.platform.is_windows() {
            return path.to_string();
        }
        let mut path = self.win_to_unix(path, false);
        if let Some(root) = self.cygwin_root.as_deref() {
            let root = self.win_to_unix(root, true);
            let pattern = format!("^{}/?", regex::escape(&root));
            if let Ok(prefix) = RegexBuilder::new(&pattern).case_insensitive(true).build() {
                path = prefix.replace(&path, "/").into_owned();
            }
        }
        DRIVE
            .replace(&path, |caps: &Captures<'_>| {
                format!("/cygdrive/{}", caps[0][..1].to_lowercase())
            })
            .into_owned()
    }

    /// Canonical form of `path`: collapsed, forward-slashed, Cygwin paths
    /// resolved to their Windows location.
    ///
    /// The result is a fixed point: normalizing it again returns it as is.
    pub fn normalize(&self, path: &str) -> String {
        let collapsed = collapse(path, self.platform);
        let mapped = self.cyg_to_unix(&self.win_to_unix(&collapsed, false));
        // Rule outputs may carry the root's drive case or backslashes.
        self.win_to_unix(&mapped, false)
    }
}

/// True for `/...` and drive-letter paths such as `C:/dir`.
pub fn is_absolute(path: &str) -> bool {
    ABSOLUTE.is_match(path)
}

/// Anchors a relative `path`.
///
/// Returns `base2/path` when `base2` is non-empty and that path exists,
/// `base1/path` otherwise. Empty and absolute paths are returned unchanged.
pub fn absolutize(path: &str, base1: &str, base2: Option<&str>) -> String {
    if path.is_empty() || is_absolute(path) {
        return path.to_string();
    }
    if let Some(base2) = base2.filter(|base| !base.is_empty()) {
        let candidate = format!("{base2}/{path}");
        if Path::new(&candidate).exists() {
            return candidate;
        }
    }
    format!("{base1}/{path}")
}
