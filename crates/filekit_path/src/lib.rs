//! # filekit_path
//!
//! Textual transforms between the three path dialects filekit understands:
//! POSIX (`/a/b`), Windows drive-letter (`C:\a\b`, `C:/a/b`) and Cygwin
//! (`/cygdrive/c/a/b`, `/usr/...`).
//!
//! Nothing here touches the filesystem except [`absolutize`], which probes
//! for the existence of a candidate path. Every dialect-sensitive transform
//! takes its [`Platform`] from the [`PathNormalizer`] it is called on, so the
//! Windows and Cygwin rules can be exercised on any host.

mod collapse;
mod normalizer;
mod platform;

pub use collapse::collapse;
pub use normalizer::{PathNormalizer, absolutize, is_absolute};
pub use platform::Platform;
