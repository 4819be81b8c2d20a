//! Value encoding toward the wire.
use bytes::Bytes;
use std::{any::Any, fmt};

use crate::{common::ByteStr, text::ToText};

/// A native value offered to a codec for encoding.
///
/// The concrete shape of a bound parameter is only known at the call site,
/// so codecs inspect it at runtime: the directly supported shapes are
/// matched by type, everything else falls through to the [`ToText`]
/// capability hook. A user type opts in by implementing this trait and
/// overriding [`as_text`][Encode::as_text].
pub trait Encode: Any {
    /// Upcast for shape inspection.
    fn as_any(&self) -> &dyn Any;

    /// Runtime capability test for the text-producing fallback.
    fn as_text(&self) -> Option<&dyn ToText> {
        None
    }
}

macro_rules! encode {
    ($ty:ty) => {
        impl Encode for $ty {
            fn as_any(&self) -> &dyn Any {
                self
            }
        }
    };
}

encode!(String);
encode!(ByteStr);
encode!(Vec<u8>);
encode!(Bytes);
encode!(char);

/// A resolved, reusable encode strategy bound to one exact value shape.
///
/// Plans hold no per-value state. Resolution is the expensive half of
/// encoding, so the caller may keep a plan keyed by
/// `(oid, format, value shape)` and invoke it for every row.
pub trait EncodePlan {
    /// Encode `value` into wire bytes.
    ///
    /// [`None`] is the NULL wire marker, distinct from empty bytes which
    /// encode an explicit empty value.
    ///
    /// # Panics
    ///
    /// `value` must have the shape the plan was resolved with.
    fn encode(&self, value: &dyn Encode) -> Result<Option<Bytes>, EncodeError>;
}

/// An error when encoding a value.
pub enum EncodeError {
    /// Custom text-producing value failed to render itself.
    ToText(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("failed to encode value, ")?;
        match self {
            Self::ToText(e) => write!(f, "{e}"),
        }
    }
}

impl fmt::Debug for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{self}\"")
    }
}

impl std::error::Error for EncodeError { }
