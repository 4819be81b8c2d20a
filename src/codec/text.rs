//! Generic codec for the character string type family.
use bytes::Bytes;
use std::any::TypeId;

use super::{Codec, downcast_mut, downcast_ref};
use crate::{
    common::ByteStr,
    encode::{Encode, EncodeError, EncodePlan},
    postgres::FormatCode,
    scan::{ScanError, ScanPlan, ScanTarget},
    text::Text,
};

/// Codec for the character string type family.
///
/// `text`, `varchar`, `char(n)`, `name`, and `unknown` all transmit their
/// content verbatim in both formats, so one codec covers the family. The
/// codec performs no length validation, truncation, or trimming:
///
/// - `char(n)` columns come back blank-padded to the declared width, in
///   characters rather than bytes, exactly as the server stored them, and
///   an encoded empty string reads back as the full padding.
/// - `name` is a fixed 63-byte server type; over-length values are
///   silently truncated by the server. The limit is a compile-time server
///   constant the client cannot reliably know, so this side stays a plain
///   pass-through.
#[derive(Debug, Default)]
pub struct TextCodec;

impl Codec for TextCodec {
    fn format_supported(&self, format: FormatCode) -> bool {
        matches!(format, FormatCode::Text | FormatCode::Binary)
    }

    fn preferred_format(&self) -> FormatCode {
        FormatCode::Text
    }

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
            Some(Box::new(ScanString))
        } else if shape == TypeId::of::<ByteStr>() {
            Some(Box::new(ScanByteStr))
        } else if shape == TypeId::of::<Vec<u8>>() {
            Some(Box::new(ScanByteVec))
        } else if target.as_scan_text().is_some() {
            Some(Box::new(ScanViaText))
        } else if shape == TypeId::of::<char>() {
            Some(Box::new(ScanChar))
        } else {
            None
        }
    }
}

/// Encode shape dispatch shared by every codec in the text family.
///
/// Ordered tests, first match wins, the [`ToText`][crate::ToText]
/// capability is the final fallback.
pub(super) fn resolve_encode_text(value: &dyn Encode) -> Option<Box<dyn EncodePlan>> {
    let shape = value.as_any().type_id();
    if shape == TypeId::of::<String>() {
        Some(Box::new(EncodeString))
    } else if shape == TypeId::of::<ByteStr>() {
        Some(Box::new(EncodeByteStr))
    } else if shape == TypeId::of::<Vec<u8>>() {
        Some(Box::new(EncodeByteVec))
    } else if shape == TypeId::of::<Bytes>() {
        Some(Box::new(EncodeBytes))
    } else if shape == TypeId::of::<char>() {
        Some(Box::new(EncodeChar))
    } else if value.as_text().is_some() {
        Some(Box::new(EncodeToText))
    } else {
        None
    }
}

// ===== Encode plans =====

struct EncodeString;

impl EncodePlan for EncodeString {
    fn encode(&self, value: &dyn Encode) -> Result<Option<Bytes>, EncodeError> {
        let string = downcast_ref::<String>(value);
        Ok(Some(Bytes::copy_from_slice(string.as_bytes())))
    }
}

struct EncodeByteStr;

impl EncodePlan for EncodeByteStr {
    fn encode(&self, value: &dyn Encode) -> Result<Option<Bytes>, EncodeError> {
        let string = downcast_ref::<ByteStr>(value);
        Ok(Some(string.clone().into_bytes()))
    }
}

struct EncodeByteVec;

impl EncodePlan for EncodeByteVec {
    fn encode(&self, value: &dyn Encode) -> Result<Option<Bytes>, EncodeError> {
        let buf = downcast_ref::<Vec<u8>>(value);
        Ok(Some(Bytes::copy_from_slice(buf)))
    }
}

struct EncodeBytes;

impl EncodePlan for EncodeBytes {
    fn encode(&self, value: &dyn Encode) -> Result<Option<Bytes>, EncodeError> {
        Ok(Some(downcast_ref::<Bytes>(value).clone()))
    }
}

struct EncodeChar;

impl EncodePlan for EncodeChar {
    fn encode(&self, value: &dyn Encode) -> Result<Option<Bytes>, EncodeError> {
        let ch = *downcast_ref::<char>(value);
        let mut buf = [0u8; 4];
        Ok(Some(Bytes::copy_from_slice(ch.encode_utf8(&mut buf).as_bytes())))
    }
}

struct EncodeToText;

impl EncodePlan for EncodeToText {
    fn encode(&self, value: &dyn Encode) -> Result<Option<Bytes>, EncodeError> {
        let text = value
            .as_text()
            .expect("value shape differs from the resolved plan")
            .to_text()?;
        Ok(match text.valid {
            true => Some(text.string.into_bytes()),
            false => None,
        })
    }
}

// ===== Scan plans =====

struct ScanString;

impl ScanPlan for ScanString {
    fn scan(&self, src: Option<&[u8]>, target: &mut dyn ScanTarget) -> Result<(), ScanError> {
        let Some(src) = src else {
            return Err(ScanError::null::<String>());
        };
        let src = std::str::from_utf8(src)?;
        *downcast_mut::<String>(target) = src.into();
        Ok(())
    }
}

struct ScanByteStr;

impl ScanPlan for ScanByteStr {
    fn scan(&self, src: Option<&[u8]>, target: &mut dyn ScanTarget) -> Result<(), ScanError> {
        let Some(src) = src else {
            return Err(ScanError::null::<ByteStr>());
        };
        *downcast_mut::<ByteStr>(target) = ByteStr::from_utf8(Bytes::copy_from_slice(src))?;
        Ok(())
    }
}

/// Byte destinations always receive a fresh copy, never a slice of the
/// wire buffer. NULL clears the buffer.
pub(super) struct ScanByteVec;

impl ScanPlan for ScanByteVec {
    fn scan(&self, src: Option<&[u8]>, target: &mut dyn ScanTarget) -> Result<(), ScanError> {
        let buf = downcast_mut::<Vec<u8>>(target);
        buf.clear();
        if let Some(src) = src {
            buf.extend_from_slice(src);
        }
        Ok(())
    }
}

struct ScanViaText;

impl ScanPlan for ScanViaText {
    fn scan(&self, src: Option<&[u8]>, target: &mut dyn ScanTarget) -> Result<(), ScanError> {
        let text = match src {
            None => Text::null(),
            Some(src) => Text::new(ByteStr::from_utf8(Bytes::copy_from_slice(src))?),
        };
        target
            .as_scan_text()
            .expect("target shape differs from the resolved plan")
            .scan_text(text)
    }
}

/// The source must hold exactly one character.
pub(super) struct ScanChar;

impl ScanPlan for ScanChar {
    fn scan(&self, src: Option<&[u8]>, target: &mut dyn ScanTarget) -> Result<(), ScanError> {
        let Some(src) = src else {
            return Err(ScanError::null::<char>());
        };
        let src = std::str::from_utf8(src)?;
        let mut chars = src.chars();
        let (Some(ch), None) = (chars.next(), chars.next()) else {
            return Err(ScanError::CharCount { found: src.chars().count() });
        };
        *downcast_mut::<char>(target) = ch;
        Ok(())
    }
}
