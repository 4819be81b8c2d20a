//! Nullable text value and the capability contracts built on it.
use std::{any::Any, fmt};

use crate::{
    common::ByteStr,
    encode::{Encode, EncodeError},
    scan::{ScanError, ScanTarget},
};

/// Postgres nullable text value.
///
/// `valid` unset represents SQL NULL, in which case `string` is empty and
/// must be ignored. A valid empty `string` is the empty string, a distinct
/// value. The content is a [`ByteStr`] so cloning a `Text`, or handing the
/// same decoded value to many consumers, shares one allocation.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Text {
    pub string: ByteStr,
    pub valid: bool,
}

impl Text {
    /// A valid text value.
    pub fn new(string: impl Into<ByteStr>) -> Text {
        Text { string: string.into(), valid: true }
    }

    /// The SQL NULL text value.
    pub const fn null() -> Text {
        Text { string: ByteStr::from_static(""), valid: false }
    }

    /// View as an [`Option`], `NULL` being [`None`].
    pub fn as_option(&self) -> Option<&str> {
        match self.valid {
            true => Some(self.string.as_str()),
            false => None,
        }
    }
}

impl From<String> for Text {
    fn from(value: String) -> Self {
        Text::new(value)
    }
}

impl From<&'static str> for Text {
    fn from(value: &'static str) -> Self {
        Text::new(value)
    }
}

impl fmt::Debug for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.valid {
            true => fmt::Debug::fmt(&self.string, f),
            false => f.write_str("NULL"),
        }
    }
}

// ===== Capabilities =====

/// Capability for values that can render themselves as [`Text`].
///
/// Implementing this is how a user type opts into text encoding: codecs
/// fall back to it when the value is none of the directly supported
/// shapes. Returning a `Text` with `valid` unset encodes SQL NULL.
pub trait ToText {
    /// Returns the text representation of self.
    fn to_text(&self) -> Result<Text, EncodeError>;
}

/// Capability for destinations that can observe SQL NULL.
///
/// Implementing this is how a user type opts into text decoding. Unlike
/// the plain destination shapes, a `ScanText` destination is always handed
/// NULL sources, as a `Text` with `valid` unset.
pub trait ScanText {
    /// Accept a decoded text value.
    fn scan_text(&mut self, text: Text) -> Result<(), ScanError>;
}

impl ToText for Text {
    fn to_text(&self) -> Result<Text, EncodeError> {
        Ok(self.clone())
    }
}

impl ScanText for Text {
    fn scan_text(&mut self, text: Text) -> Result<(), ScanError> {
        *self = text;
        Ok(())
    }
}

impl Encode for Text {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_text(&self) -> Option<&dyn ToText> {
        Some(self)
    }
}

impl ScanTarget for Text {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn as_scan_text(&mut self) -> Option<&mut dyn ScanText> {
        Some(self)
    }
}

// ===== Json =====

#[cfg(feature = "serde")]
impl serde::Serialize for Text {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self.valid {
            true => serializer.serialize_str(&self.string),
            false => serializer.serialize_none(),
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Text {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(match Option::<String>::deserialize(deserializer)? {
            Some(string) => Text::new(string),
            None => Text::null(),
        })
    }
}

#[cfg(feature = "json")]
impl Text {
    /// Render as json text, NULL becomes the json `null` literal.
    ///
    /// ```
    /// use pgval::Text;
    ///
    /// assert_eq!(Text::new("a").to_json(), "\"a\"");
    /// assert_eq!(Text::null().to_json(), "null");
    /// ```
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("text serialization is infallible")
    }

    /// Parse json text, the json `null` literal becomes NULL.
    ///
    /// Any json value other than a string or `null` is an error.
    ///
    /// ```
    /// use pgval::Text;
    ///
    /// assert_eq!(Text::from_json("null").unwrap(), Text::null());
    /// assert_eq!(Text::from_json("\"on\"").unwrap(), Text::new("on"));
    /// assert!(Text::from_json("42").is_err());
    /// ```
    pub fn from_json(json: &str) -> crate::Result<Text> {
        serde_json::from_str(json).map_err(Into::into)
    }
}

#[cfg(test)]
mod test {
    use super::Text;

    #[test]
    fn null_is_not_the_empty_string() {
        assert_ne!(Text::null(), Text::new(""));
        assert!(Text::new("").valid);
        assert!(!Text::null().valid);
        assert_eq!(Text::null().as_option(), None);
        assert_eq!(Text::new("").as_option(), Some(""));
    }

    #[test]
    fn default_is_null() {
        assert_eq!(Text::default(), Text::null());
    }

    #[cfg(feature = "json")]
    #[test]
    fn json_round_trip() {
        for text in [Text::new(""), Text::new("foo"), Text::new(" 嗨 ")] {
            assert_eq!(Text::from_json(&text.to_json()).unwrap(), text);
        }

        // NULL collapses to the canonical zero value
        assert_eq!(Text::from_json(&Text::null().to_json()).unwrap(), Text::null());
    }

    #[cfg(feature = "json")]
    #[test]
    fn json_escapes_content() {
        assert_eq!(Text::new("a\"b").to_json(), r#""a\"b""#);
        assert_eq!(Text::from_json(r#""a\"b""#).unwrap(), Text::new("a\"b"));
    }

    #[cfg(feature = "json")]
    #[test]
    fn json_rejects_other_shapes() {
        for json in ["42", "true", "[\"a\"]", "{\"a\":1}"] {
            assert!(Text::from_json(json).is_err(), "{json} should not parse");
        }
    }
}
