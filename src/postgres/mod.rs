//! Postgres wire-level contracts consumed by the conversion core.
//!
//! - [`Oid`] and the well-known [`oid`] constants
//! - [`FormatCode`]
mod pg_format;
mod pg_type;

pub use pg_format::FormatCode;
pub use pg_type::{Oid, oid};
