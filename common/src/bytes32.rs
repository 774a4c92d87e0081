//! Fixed-width `bytes32` encoding of short texts.

use alloy_primitives::B256;
use derive_more::{AsRef, Display, Error};

/// Maximum length (in bytes) of a [`FixedText`].
///
/// The last byte of a `bytes32` slot is reserved for the zero terminator.
pub const MAX_LEN: usize = 31;

/// Short UTF-8 text fitting into a single `bytes32` slot.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(forward)]
pub struct FixedText(String);

impl FixedText {
    /// Creates a new [`FixedText`] if the given `text` fits into a `bytes32`
    /// slot.
    ///
    /// # Errors
    ///
    /// - [`EncodeError::TooLong`] if the `text` exceeds [`MAX_LEN`] bytes;
    /// - [`EncodeError::ContainsNul`] if the `text` contains a zero byte,
    ///   which would be indistinguishable from padding.
    pub fn new(text: impl Into<String>) -> Result<Self, EncodeError> {
        let text = text.into();
        if text.len() > MAX_LEN {
            return Err(EncodeError::TooLong(text.len()));
        }
        if text.contains('\0') {
            return Err(EncodeError::ContainsNul);
        }
        Ok(Self(text))
    }

    /// Encodes this [`FixedText`] into a zero-padded `bytes32` value.
    #[must_use]
    pub fn encode(&self) -> B256 {
        let mut out = B256::ZERO;
        out[..self.0.len()].copy_from_slice(self.0.as_bytes());
        out
    }

    /// Decodes a [`FixedText`] from a zero-padded `bytes32` value.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::MissingTerminator`] if the last byte isn't zero;
    /// - [`DecodeError::InvalidUtf8`] if the bytes before the first zero
    ///   aren't valid UTF-8.
    pub fn decode(bytes: B256) -> Result<Self, DecodeError> {
        if bytes[MAX_LEN] != 0 {
            return Err(DecodeError::MissingTerminator);
        }
        let len = bytes.iter().position(|b| *b == 0).unwrap_or(MAX_LEN);
        let text = std::str::from_utf8(&bytes[..len])
            .map_err(DecodeError::InvalidUtf8)?;
        Ok(Self(text.to_owned()))
    }
}

/// Error of encoding a text into a `bytes32` slot.
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
pub enum EncodeError {
    /// Text is longer than [`MAX_LEN`] bytes.
    #[display("text is {_0} bytes long, while at most 31 bytes fit")]
    TooLong(#[error(not(source))] usize),

    /// Text contains a zero byte.
    #[display("text cannot contain zero bytes")]
    ContainsNul,
}

/// Error of decoding a text from a `bytes32` slot.
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
pub enum DecodeError {
    /// `bytes32` value is not zero-terminated.
    #[display("`bytes32` text is not zero-terminated")]
    MissingTerminator,

    /// Text bytes are not valid UTF-8.
    #[display("`bytes32` text is not valid UTF-8: {_0}")]
    InvalidUtf8(std::str::Utf8Error),
}

#[cfg(test)]
mod spec {
    use alloy_primitives::B256;

    use super::{DecodeError, EncodeError, FixedText};

    #[test]
    fn encodes_with_zero_padding() {
        let encoded = FixedText::new("48.8566").unwrap().encode();

        assert_eq!(&encoded[..7], b"48.8566");
        assert!(encoded[7..].iter().all(|b| *b == 0));
    }

    #[test]
    fn round_trips() {
        for s in [
            "",
            "2.3522",
            "-33.868820",
            "151.209296",
            "ünïcödé",
            "0123456789012345678901234567890",
        ] {
            let text = FixedText::new(s).unwrap();
            assert_eq!(FixedText::decode(text.encode()), Ok(text), "{s}");
        }
    }

    #[test]
    fn rejects_too_long() {
        assert_eq!(
            FixedText::new("01234567890123456789012345678901"),
            Err(EncodeError::TooLong(32)),
        );
        // Multi-byte characters count by their encoded length.
        assert_eq!(
            FixedText::new("é".repeat(16)),
            Err(EncodeError::TooLong(32)),
        );
        assert_eq!(FixedText::new("a\0b"), Err(EncodeError::ContainsNul));
    }

    #[test]
    fn rejects_malformed_bytes() {
        assert_eq!(
            FixedText::decode(B256::repeat_byte(b'a')),
            Err(DecodeError::MissingTerminator),
        );

        let mut invalid = B256::ZERO;
        invalid[0] = 0xff;
        assert!(matches!(
            FixedText::decode(invalid),
            Err(DecodeError::InvalidUtf8(_)),
        ));
    }

    #[test]
    fn decodes_up_to_first_zero() {
        let mut bytes = B256::ZERO;
        bytes[..2].copy_from_slice(b"12");
        bytes[3] = b'x';

        assert_eq!(FixedText::decode(bytes).unwrap().to_string(), "12");
    }
}
