use filekit_fs::ErrorCode;
use strum_macros::Display;

/// Shape of the value a safe operation returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum SentinelKind {
    /// `Some(value)` on success, `None` on failure.
    Null,
    /// `true` on success, `false` on failure.
    False,
    /// `None` on success, `Some(code)` on failure.
    Code,
}

/// Maps the outcome of an operation yielding `T` onto a sentinel value.
pub trait Sentinel<T> {
    type Output;
    const KIND: SentinelKind;

    fn pass(value: T) -> Self::Output;
    fn fail(code: ErrorCode) -> Self::Output;
}

pub struct Null;

impl<T> Sentinel<T> for Null {
    type Output = Option<T>;
    const KIND: SentinelKind = SentinelKind::Null;

    fn pass(value: T) -> Self::Output {
        Some(value)
    }

    fn fail(_: ErrorCode) -> Self::Output {
        None
    }
}

pub struct False;

impl Sentinel<()> for False {
    type Output = bool;
    const KIND: SentinelKind = SentinelKind::False;

    fn pass(_: ()) -> Self::Output {
        true
    }

    fn fail(_: ErrorCode) -> Self::Output {
        false
    }
}

pub struct Code;

impl Sentinel<()> for Code {
    type Output = Option<ErrorCode>;
    const KIND: SentinelKind = SentinelKind::Code;

    fn pass(_: ()) -> Self::Output {
        None
    }

    fn fail(code: ErrorCode) -> Self::Output {
        Some(code)
    }
}
