//! Length-prefix bounds for the binary codec.

/// Max length that can be represented in a single byte per the
/// ledger's serialization encoding.
pub const MAX_SINGLE_BYTE_LENGTH: usize = 192;
/// Max length that can be represented in two bytes.
pub const MAX_DOUBLE_BYTE_LENGTH: usize = 12480;
/// Max value usable in the leading byte of a two-byte length.
pub const MAX_SECOND_BYTE_VALUE: usize = 240;
/// Maximum length that can be encoded in a length prefix.
pub const MAX_LENGTH_VALUE: usize = 918744;
