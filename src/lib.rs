//! Postgres value conversion.
//!
//! The surrounding driver hands this crate a `(oid, format, bytes | NULL)`
//! triple per decoded value, and a native value plus a desired
//! `(oid, format)` per bound parameter; this crate never talks to a socket.
//! Conversion strategies are resolved once per shape into cheap, reusable
//! plan objects, then invoked per row.
//!
//! # Examples
//!
//! Encoding and scanning through the registry:
//!
//! ```
//! use pgval::{FormatCode, TypeRegistry, postgres::oid};
//!
//! # fn main() -> pgval::Result<()> {
//! let mut registry = TypeRegistry::new();
//!
//! // encode: native value to wire bytes
//! let value = String::from("postgres");
//! let plan = registry
//!     .encode_plan(oid::TEXT, FormatCode::Text, &value)
//!     .expect("strings encode as text");
//! let bytes = plan.encode(&value)?;
//! assert_eq!(bytes.as_deref(), Some(&b"postgres"[..]));
//!
//! // scan: wire bytes into a native destination
//! let mut name = String::new();
//! let plan = registry
//!     .scan_plan(oid::TEXT, FormatCode::Text, &mut name)
//!     .expect("strings scan from text");
//! plan.scan(bytes.as_deref(), &mut name)?;
//! assert_eq!(name, "postgres");
//! # Ok(())
//! # }
//! ```
//!
//! NULL is an explicit marker at every boundary, distinct from an empty
//! buffer; destinations that cannot represent it reject it:
//!
//! ```
//! use pgval::{FormatCode, Text, TypeRegistry, postgres::oid};
//!
//! let mut registry = TypeRegistry::new();
//!
//! let mut plain = String::new();
//! let plan = registry.scan_plan(oid::TEXT, FormatCode::Text, &mut plain).unwrap();
//! assert!(plan.scan(None, &mut plain).is_err());
//!
//! let mut nullable = Text::null();
//! let plan = registry.scan_plan(oid::TEXT, FormatCode::Text, &mut nullable).unwrap();
//! plan.scan(None, &mut nullable).unwrap();
//! assert!(!nullable.valid);
//! ```
//!
//! Enumerated types get a dedicated codec that interns decoded members,
//! one codec (and one member cache) per enum oid from the catalog:
//!
//! ```
//! use pgval::{EnumCodec, TypeRegistry};
//!
//! let mut registry = TypeRegistry::new();
//! registry.register(16_392, EnumCodec::default());
//! ```

pub mod common;

// Wire contract
pub mod postgres;

// Value
mod text;

// Conversion
pub mod encode;
pub mod scan;
pub mod codec;
pub mod registry;

mod error;

pub use common::ByteStr;
pub use postgres::{FormatCode, Oid};
pub use text::{ScanText, Text, ToText};

pub use codec::{Codec, EnumCodec, TextCodec};
pub use encode::{Encode, EncodeError, EncodePlan};
pub use scan::{ScanError, ScanPlan, ScanTarget};

pub use registry::TypeRegistry;
pub use error::{Error, Result};
