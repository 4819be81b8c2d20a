//! Scanning wire values into native destinations.
use std::{any::Any, fmt, str::Utf8Error};

use crate::{common::ByteStr, text::ScanText};

/// A native destination a wire value is scanned into.
///
/// The destination counterpart of [`Encode`][crate::Encode]: codecs
/// inspect the concrete shape at plan resolution, with the [`ScanText`]
/// capability hook as the fallback for user types. Only a `ScanText`
/// destination can represent SQL NULL.
pub trait ScanTarget: Any {
    /// Upcast for shape inspection.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Runtime capability test for the text-consuming fallback.
    fn as_scan_text(&mut self) -> Option<&mut dyn ScanText> {
        None
    }
}

macro_rules! scan_target {
    ($ty:ty) => {
        impl ScanTarget for $ty {
            fn as_any_mut(&mut self) -> &mut dyn Any {
                self
            }
        }
    };
}

scan_target!(String);
scan_target!(ByteStr);
scan_target!(Vec<u8>);
scan_target!(char);

/// A resolved, reusable scan strategy bound to one exact destination shape.
///
/// Plans hold no per-value state. The caller may keep a plan keyed by
/// `(oid, format, destination shape)` and invoke it for every row.
pub trait ScanPlan {
    /// Scan a wire value into `target`.
    ///
    /// [`None`] is the NULL wire marker; an empty buffer is an explicit
    /// empty value.
    ///
    /// # Panics
    ///
    /// `target` must have the shape the plan was resolved with.
    fn scan(&self, src: Option<&[u8]>, target: &mut dyn ScanTarget) -> Result<(), ScanError>;
}

macro_rules! from {
    (<$ty:ty>$pat:pat => $body:expr) => {
        impl From<$ty> for ScanError {
            fn from($pat: $ty) -> Self {
                $body
            }
        }
    };
}

/// An error when scanning a wire value into a destination.
pub enum ScanError {
    /// NULL cannot be represented by the destination shape.
    Null {
        /// Name of the destination shape.
        target: &'static str,
    },
    /// Destination is a single char but source held a different count.
    CharCount {
        /// Number of chars the source decoded to.
        found: usize,
    },
    /// Postgres returned non utf8 text.
    Utf8(Utf8Error),
    /// Custom text-consuming destination failed.
    ScanText(Box<dyn std::error::Error + Send + Sync>),
}

impl ScanError {
    /// NULL-into-`T` error naming the destination shape.
    pub fn null<T: ?Sized>() -> ScanError {
        ScanError::Null { target: std::any::type_name::<T>() }
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("failed to scan value, ")?;
        match self {
            Self::Null { target } => write!(f, "cannot scan NULL into {target}"),
            Self::CharCount { found } => write!(f, "expected a single char, found {found}"),
            Self::Utf8(e) => write!(f, "{e}"),
            Self::ScanText(e) => write!(f, "{e}"),
        }
    }
}

from!(<Utf8Error>e => Self::Utf8(e));

impl fmt::Debug for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{self}\"")
    }
}

impl std::error::Error for ScanError { }

#[cfg(test)]
mod test {
    use super::ScanError;

    #[test]
    fn null_error_names_the_destination_shape() {
        let err = ScanError::null::<String>();
        assert!(err.to_string().contains("String"), "{err}");

        let err = ScanError::null::<char>();
        assert!(err.to_string().contains("char"), "{err}");
    }
}
