//! Binary-vs-text detection for decrypted secrets.
//!
//! The heuristic is deliberately simple: text payloads never contain a NUL
//! byte, most binary formats contain one early.

use serde::{Deserialize, Serialize};

/// How a payload's content should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    /// Printable as text
    Text,
    /// Should be written to a file
    Binary,
}

/// True if `bytes` contains a zero byte.
pub fn is_binary(bytes: &[u8]) -> bool {
    bytes.contains(&0)
}

/// Classify `bytes` as [`ContentKind::Text`] or [`ContentKind::Binary`].
pub fn classify(bytes: &[u8]) -> ContentKind {
    if is_binary(bytes) {
        ContentKind::Binary
    } else {
        ContentKind::Text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_is_not_binary() {
        assert!(!is_binary(b"hello world\n"));
        assert!(!is_binary("grüße".as_bytes()));
        assert_eq!(classify(b""), ContentKind::Text);
    }

    #[test]
    fn test_zero_byte_is_binary() {
        assert!(is_binary(&[0x25, 0x50, 0x44, 0x46, 0x00]));
        assert_eq!(classify(&[0]), ContentKind::Binary);
    }
}
