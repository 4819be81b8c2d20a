//! Interning codec for enumerated types.
use bytes::Bytes;
use std::{any::TypeId, cell::RefCell, collections::HashMap, rc::Rc};

use super::{
    Codec, downcast_mut,
    text::{ScanByteVec, ScanChar, resolve_encode_text},
};
use crate::{
    common::{ByteStr, verbose},
    encode::{Encode, EncodePlan},
    postgres::FormatCode,
    scan::{ScanError, ScanPlan, ScanTarget},
    text::Text,
};

/// Member map from exact wire byte content to its canonical string.
type Members = Rc<RefCell<HashMap<Vec<u8>, ByteStr>>>;

/// Codec layering string interning over text decode.
///
/// Every distinct byte content decoded through one `EnumCodec` is
/// allocated once; later decodes of the same content return clones of
/// that single [`ByteStr`]. The member map never evicts and lives until
/// the codec is dropped, so the codec is meant for types with a small
/// set of values, true enums and small lookup-coded columns. High
/// cardinality text is a misuse the codec does not guard against.
///
/// The map is not synchronized: the codec and the scan plans it resolves
/// are `!Send + !Sync` and belong to one logical flow of control.
/// Construct a fresh codec, with its own map, per scope that must not
/// share members.
#[derive(Debug, Default)]
pub struct EnumCodec {
    members: Members,
}

impl EnumCodec {
    /// Decode a wire value into its canonical interned string.
    ///
    /// NULL decodes to [`None`] without touching the member map.
    /// Decoding fails only on non utf8 content.
    pub fn decode_value(&self, src: Option<&[u8]>) -> Result<Option<ByteStr>, ScanError> {
        match src {
            None => Ok(None),
            Some(src) => lookup_and_cache(&self.members, src).map(Some),
        }
    }
}

/// Look up `src` in the member map, interning it on first sight.
fn lookup_and_cache(members: &Members, src: &[u8]) -> Result<ByteStr, ScanError> {
    let mut members = members.borrow_mut();
    if let Some(found) = members.get(src) {
        return Ok(found.clone());
    }
    let interned = ByteStr::from_utf8(Bytes::copy_from_slice(src))?;
    verbose!("interning enum member {interned}");
    members.insert(src.to_vec(), interned.clone());
    Ok(interned)
}

impl Codec for EnumCodec {
    fn format_supported(&self, format: FormatCode) -> bool {
        matches!(format, FormatCode::Text | FormatCode::Binary)
    }

    fn preferred_format(&self) -> FormatCode {
        FormatCode::Text
    }

    /// Interning is a decode only optimization, encoding is the shared
    /// text family dispatch.
    fn resolve_encode(&self, _format: FormatCode, value: &dyn Encode)
        -> Option<Box<dyn EncodePlan>>
    {
        resolve_encode_text(value)
    }

    fn resolve_scan(&self, _format: FormatCode, target: &mut dyn ScanTarget)
        -> Option<Box<dyn ScanPlan>>
    {
        let shape = target.as_any_mut().type_id();
        if shape == TypeId::of::<String>() {
            Some(Box::new(ScanEnumString { members: Rc::clone(&self.members) }))
        } else if shape == TypeId::of::<ByteStr>() {
            Some(Box::new(ScanEnumByteStr { members: Rc::clone(&self.members) }))
        } else if shape == TypeId::of::<Vec<u8>>() {
            // byte buffers are short lived and mutable, never interned
            Some(Box::new(ScanByteVec))
        } else if target.as_scan_text().is_some() {
            Some(Box::new(ScanEnumText { members: Rc::clone(&self.members) }))
        } else if shape == TypeId::of::<char>() {
            Some(Box::new(ScanChar))
        } else {
            None
        }
    }
}

/// Scans into `String` through the member map.
///
/// An owned string cannot share the interned storage, it receives a copy
/// of the canonical content; the map still holds one entry per distinct
/// content.
struct ScanEnumString {
    members: Members,
}

impl ScanPlan for ScanEnumString {
    fn scan(&self, src: Option<&[u8]>, target: &mut dyn ScanTarget) -> Result<(), ScanError> {
        let Some(src) = src else {
            return Err(ScanError::null::<String>());
        };
        let interned = lookup_and_cache(&self.members, src)?;
        *downcast_mut::<String>(target) = interned.as_str().into();
        Ok(())
    }
}

/// Scans into [`ByteStr`], sharing the interned instance.
struct ScanEnumByteStr {
    members: Members,
}

impl ScanPlan for ScanEnumByteStr {
    fn scan(&self, src: Option<&[u8]>, target: &mut dyn ScanTarget) -> Result<(), ScanError> {
        let Some(src) = src else {
            return Err(ScanError::null::<ByteStr>());
        };
        *downcast_mut::<ByteStr>(target) = lookup_and_cache(&self.members, src)?;
        Ok(())
    }
}

/// Scans through the text-consuming capability, sharing the interned
/// instance.
struct ScanEnumText {
    members: Members,
}

impl ScanPlan for ScanEnumText {
    fn scan(&self, src: Option<&[u8]>, target: &mut dyn ScanTarget) -> Result<(), ScanError> {
        let text = match src {
            None => Text::null(),
            Some(src) => Text::new(lookup_and_cache(&self.members, src)?),
        };
        target
            .as_scan_text()
            .expect("target shape differs from the resolved plan")
            .scan_text(text)
    }
}

#[cfg(test)]
mod test {
    use super::EnumCodec;
    use crate::{
        codec::Codec,
        common::ByteStr,
        postgres::FormatCode,
        scan::ScanError,
        text::Text,
    };

    fn ptr(string: &ByteStr) -> *const u8 {
        string.as_str().as_ptr()
    }

    #[test]
    fn decode_interns_one_instance_per_content() {
        let codec = EnumCodec::default();
        let a = codec.decode_value(Some(b"red")).unwrap().unwrap();
        let b = codec.decode_value(Some(b"red")).unwrap().unwrap();
        let c = codec.decode_value(Some(b"green")).unwrap().unwrap();

        assert_eq!(a, "red");
        assert_eq!(c, "green");
        assert_eq!(ptr(&a), ptr(&b));
        assert_ne!(ptr(&a), ptr(&c));
        assert_eq!(codec.members.borrow().len(), 2);
    }

    #[test]
    fn null_decodes_without_touching_the_map() {
        let codec = EnumCodec::default();
        assert!(codec.decode_value(None).unwrap().is_none());
        assert!(codec.members.borrow().is_empty());
    }

    #[test]
    fn text_destinations_share_the_interned_instance() {
        let codec = EnumCodec::default();
        let mut first = Text::null();
        let mut second = Text::null();
        let plan = codec.resolve_scan(FormatCode::Text, &mut first).unwrap();

        plan.scan(Some(b"blue"), &mut first).unwrap();
        plan.scan(Some(b"blue"), &mut second).unwrap();
        assert_eq!(first, Text::new("blue"));
        assert_eq!(ptr(&first.string), ptr(&second.string));
    }

    #[test]
    fn bytestr_destinations_share_the_interned_instance() {
        let codec = EnumCodec::default();
        let mut first = ByteStr::default();
        let mut second = ByteStr::default();
        let plan = codec.resolve_scan(FormatCode::Binary, &mut first).unwrap();

        plan.scan(Some(b"red"), &mut first).unwrap();
        plan.scan(Some(b"red"), &mut second).unwrap();
        assert_eq!(ptr(&first), ptr(&second));
    }

    #[test]
    fn string_destinations_route_through_the_map() {
        let codec = EnumCodec::default();
        let mut out = String::new();
        let plan = codec.resolve_scan(FormatCode::Text, &mut out).unwrap();

        plan.scan(Some(b"red"), &mut out).unwrap();
        assert_eq!(out, "red");
        assert_eq!(codec.members.borrow().len(), 1);

        assert!(matches!(plan.scan(None, &mut out), Err(ScanError::Null { .. })));
    }

    #[test]
    fn byte_destinations_bypass_the_map() {
        let codec = EnumCodec::default();
        let mut buf = Vec::new();
        let plan = codec.resolve_scan(FormatCode::Text, &mut buf).unwrap();

        plan.scan(Some(b"red"), &mut buf).unwrap();
        assert_eq!(buf, b"red");
        assert!(codec.members.borrow().is_empty());
    }

    #[test]
    fn null_into_text_is_null_and_uncached() {
        let codec = EnumCodec::default();
        let mut text = Text::new("old");
        let plan = codec.resolve_scan(FormatCode::Text, &mut text).unwrap();

        plan.scan(None, &mut text).unwrap();
        assert_eq!(text, Text::null());
        assert!(codec.members.borrow().is_empty());
    }

    #[test]
    fn encode_does_not_consult_the_map() {
        let codec = EnumCodec::default();
        let value = String::from("red");
        let encoded = codec
            .resolve_encode(FormatCode::Text, &value)
            .unwrap()
            .encode(&value)
            .unwrap();

        assert_eq!(encoded.as_deref(), Some(&b"red"[..]));
        assert!(codec.members.borrow().is_empty());
    }
}
