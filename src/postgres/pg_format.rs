
/// Postgres data transmission format.
///
/// For specific information, see its variant documentation.
///
/// <https://www.postgresql.org/docs/current/protocol-overview.html#PROTOCOL-FORMAT-CODES>
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatCode {
    /// Text has format code zero.
    ///
    /// In the [`Text`][t] transmitted representation, there is no trailing null character;
    /// the frontend must add one to received values if it wants to process them as C strings.
    /// (The [`Text`][t] format does not allow embedded nulls, by the way.)
    ///
    /// [t]: FormatCode::Text
    Text,
    /// Binary has format code one.
    ///
    /// [`Binary`][b] representations for integers use network byte order (most significant byte first).
    /// For other data types consult the documentation or source code to learn about the binary representation.
    /// Keep in mind that binary representations for complex data types might change across server versions.
    ///
    /// [b]: FormatCode::Binary
    Binary,
}

impl FormatCode {
    /// Return format code for current format.
    pub fn format_code(&self) -> u16 {
        match self {
            FormatCode::Text => 0,
            FormatCode::Binary => 1,
        }
    }

    /// Parse a wire format code.
    ///
    /// Unknown codes are rejected here, at the wire boundary, so codecs only
    /// ever see the two known formats.
    pub fn from_code(code: u16) -> Option<FormatCode> {
        match code {
            0 => Some(FormatCode::Text),
            1 => Some(FormatCode::Binary),
            _ => None,
        }
    }
}
