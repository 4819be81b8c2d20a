//! `pgval` error types.
use std::{backtrace::Backtrace, fmt};

use crate::{encode::EncodeError, scan::ScanError};

/// A specialized [`Result`] type for `pgval` operation.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// All possible error from `pgval` library.
pub struct Error {
    backtrace: Backtrace,
    kind: ErrorKind,
}

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }
}

/// All possible error kind from `pgval` library.
pub enum ErrorKind {
    Encode(EncodeError),
    Scan(ScanError),
    #[cfg(feature = "json")]
    Json(serde_json::Error),
}

macro_rules! from {
    (<$ty:ty>$pat:pat => $body:expr) => {
        impl From<$ty> for Error {
            fn from($pat: $ty) -> Self {
                let backtrace = std::backtrace::Backtrace::capture();
                Self { backtrace, kind: $body }
            }
        }
    };
}

from!(<ErrorKind>e => e);
from!(<EncodeError>e => ErrorKind::Encode(e));
from!(<ScanError>e => ErrorKind::Scan(e));
#[cfg(feature = "json")]
from!(<serde_json::Error>e => ErrorKind::Json(e));

impl std::error::Error for Error { }

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind, f)?;

        if let std::backtrace::BacktraceStatus::Captured = self.backtrace.status() {
            let mut backtrace = self.backtrace.to_string();
            write!(f, "\n\n")?;
            writeln!(f, "Stack backtrace:")?;
            backtrace.truncate(backtrace.trim_end().len());
            write!(f, "{}", backtrace)?;
        }

        Ok(())
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{self}\"")
    }
}

impl std::error::Error for ErrorKind { }

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encode(e) => e.fmt(f),
            Self::Scan(e) => e.fmt(f),
            #[cfg(feature = "json")]
            Self::Json(e) => e.fmt(f),
        }
    }
}

impl fmt::Debug for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{self}\"")
    }
}
