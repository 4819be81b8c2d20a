
/// Postgres object identifier.
///
/// The oid type is implemented as an unsigned four-byte integer.
///
/// <https://www.postgresql.org/docs/current/datatype-oid.html>
pub type Oid = u32;

/// Well-known oids of the character string type family.
///
/// Type oids are normally discovered from the server catalog by the
/// surrounding driver; these constants cover the built-in types whose oids
/// are stable across server versions.
pub mod oid {
    use super::Oid;

    macro_rules! oid {
        ($name:ident, $oid:literal, $doc:literal) => {
            #[doc = $doc]
            pub const $name: Oid = $oid;
        };
    }

    oid!(NAME, 19, "`name` 63-byte type for storing system identifiers");
    oid!(TEXT, 25, "`text` variable-length string, no limit specified");
    oid!(UNKNOWN, 705, "`unknown` pseudo-type representing an undetermined type");
    oid!(ACLITEM, 1033, "`aclitem` access control list entry");
    oid!(BPCHAR, 1042, "`bpchar` char(length), blank-padded string, fixed storage length");
    oid!(VARCHAR, 1043, "`varchar` varchar(length), non-blank-padded string, variable storage length");
    oid!(CSTRING, 2275, "`cstring` C-style string pseudo-type");
}
