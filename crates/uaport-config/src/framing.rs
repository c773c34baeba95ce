//! Frame header width shared by the gateway and its host process.
//!
//! Every message on the channel is prefixed with a big-endian unsigned length
//! of a fixed width. The width is chosen once at startup and applies to both
//! directions.

use strum::{Display, EnumString};
use thiserror::Error;

/// Width of the big-endian length prefix, in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumString, Display)]
pub enum HeaderWidth {
    /// One-byte prefix; payloads up to 255 bytes.
    #[strum(to_string = "1")]
    One,
    /// Two-byte prefix; payloads up to 65 535 bytes.
    #[strum(to_string = "2")]
    Two,
    /// Four-byte prefix; payloads up to 4 GiB - 1.
    #[default]
    #[strum(to_string = "4")]
    Four,
}

impl HeaderWidth {
    /// Number of header bytes preceding each payload.
    #[must_use]
    pub const fn len(self) -> usize {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Four => 4,
        }
    }

    /// Largest payload length representable in the header.
    #[must_use]
    pub const fn max_payload(self) -> u64 {
        match self {
            Self::One => u8::MAX as u64,
            Self::Two => u16::MAX as u64,
            Self::Four => u32::MAX as u64,
        }
    }
}

/// Error returned when a numeric header width is not supported.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("unsupported frame header width: {0} (expected 1, 2 or 4)")]
pub struct HeaderWidthError(pub u8);

impl TryFrom<u8> for HeaderWidth {
    type Error = HeaderWidthError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            4 => Ok(Self::Four),
            other => Err(HeaderWidthError(other)),
        }
    }
}

impl From<HeaderWidth> for u8 {
    fn from(width: HeaderWidth) -> Self {
        match width {
            HeaderWidth::One => 1,
            HeaderWidth::Two => 2,
            HeaderWidth::Four => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("1", HeaderWidth::One)]
    #[case("2", HeaderWidth::Two)]
    #[case("4", HeaderWidth::Four)]
    fn parses_supported_widths(#[case] input: &str, #[case] expected: HeaderWidth) {
        let parsed: HeaderWidth = input.parse().expect("width should parse");
        assert_eq!(parsed, expected);
        assert_eq!(parsed.to_string(), input);
    }

    #[rstest]
    #[case("0")]
    #[case("3")]
    #[case("8")]
    #[case("four")]
    fn rejects_unsupported_widths(#[case] input: &str) {
        assert!(input.parse::<HeaderWidth>().is_err());
    }

    #[rstest]
    #[case(HeaderWidth::One, 1, 255)]
    #[case(HeaderWidth::Two, 2, 65_535)]
    #[case(HeaderWidth::Four, 4, 4_294_967_295)]
    fn reports_length_and_limit(
        #[case] width: HeaderWidth,
        #[case] len: usize,
        #[case] max: u64,
    ) {
        assert_eq!(width.len(), len);
        assert_eq!(width.max_payload(), max);
    }

    #[test]
    fn numeric_conversion_rejects_three() {
        assert_eq!(HeaderWidth::try_from(3), Err(HeaderWidthError(3)));
        assert_eq!(u8::from(HeaderWidth::Two), 2);
    }
}
