//! # Safe surface
//!
//! [`SafeFileKit`] exposes the [`filekit_fs::FileKit`] operations without
//! errors: each wrapped call returns a sentinel and records the cause of a
//! failure, retrievable with [`SafeFileKit::errno`] and
//! [`SafeFileKit::last_error`].
//!
//! | sentinel | success | failure |
//! |----------|---------|---------|
//! | [`SentinelKind::Null`] | `Some(value)` | `None` |
//! | [`SentinelKind::False`] | `true` | `false` |
//! | [`SentinelKind::Code`] | `None` | `Some(code)` |
//!
//! [`SENTINELS`] lists which sentinel every [`Operation`] uses.
//!
//! ```no_run
//! use filekit_safe::SafeFileKit;
//!
//! let fs = SafeFileKit::default();
//! if fs.read("/no/such/file").is_none() {
//!     eprintln!("read failed: {:?}", fs.errno());
//! }
//! ```

mod last_error;
mod safe;
mod sentinel;


pub use filekit_fs::{ErrorCode, FileKit};
pub use filekit_path::Platform;

pub use crate::last_error::{Failure, LastError};
pub use crate::safe::{Operation, SENTINELS, SafeFileKit};
pub use crate::sentinel::{Code, False, Null, Sentinel, SentinelKind};
