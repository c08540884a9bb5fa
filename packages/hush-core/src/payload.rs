//! # Payload Model
//!
//! The plaintext that gets encrypted: content as base64 plus an optional
//! file name.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         WIRE RECORD                                     │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  { "data": "<base64 of content>", "filename": "doc.pdf" | null }       │
//! │                                                                         │
//! │  • data is base64 for text and binary content alike                    │
//! │  • filename is carried, never interpreted                              │
//! │  • unknown fields and a missing "data" are rejected                    │
//! │                                                                         │
//! │  The serialized record is the plaintext that is hashed and encrypted.  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, Zeroizing};

use crate::codec;
use crate::error::{Error, Result};
use crate::sniff::{self, ContentKind};

/// A secret's content and optional file name
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Payload {
    data: String,
    filename: Option<String>,
}

/// On-the-wire shape of [`Payload`]
#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct WireRecord<'a> {
    #[serde(borrow)]
    data: std::borrow::Cow<'a, str>,
    #[serde(default)]
    filename: Option<std::borrow::Cow<'a, str>>,
}

impl Payload {
    /// Payload holding `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut payload = Self::default();
        payload.set_from_bytes(bytes);
        payload
    }

    /// Payload holding the UTF-8 bytes of `text`.
    pub fn from_text(text: &str) -> Self {
        Self::from_bytes(text.as_bytes())
    }

    /// Payload from data the caller already holds as standard base64.
    pub fn from_base64(encoded: impl Into<String>) -> Result<Self> {
        let mut payload = Self::default();
        payload.set_from_base64(encoded)?;
        Ok(payload)
    }

    /// Replace the content with `bytes`.
    pub fn set_from_bytes(&mut self, bytes: &[u8]) {
        self.data.zeroize();
        self.data = codec::encode_standard(bytes);
    }

    /// Replace the content with pre-encoded standard base64.
    ///
    /// Only the alphabet is checked here; a malformed length surfaces when
    /// the content is decoded.
    pub fn set_from_base64(&mut self, encoded: impl Into<String>) -> Result<()> {
        let mut encoded = encoded.into();
        if !codec::is_standard_base64(&encoded) {
            encoded.zeroize();
            return Err(Error::InvalidPayload("data is not base64".into()));
        }

        self.data.zeroize();
        self.data = encoded;
        Ok(())
    }

    /// Attach a file name.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// The content as base64
    pub fn data(&self) -> &str {
        &self.data
    }

    /// The attached file name, if any
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// True if there is no content.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw content bytes.
    pub fn decode_bytes(&self) -> Result<Vec<u8>> {
        codec::decode_standard(&self.data).map_err(|e| Error::InvalidPayload(e.to_string()))
    }

    /// Content as UTF-8 text.
    pub fn decode(&self) -> Result<String> {
        String::from_utf8(self.decode_bytes()?).map_err(|e| {
            let mut bytes = e.into_bytes();
            bytes.zeroize();
            Error::InvalidPayload("content is not valid UTF-8".into())
        })
    }

    /// Whether the content should be shown as text or saved as a file.
    pub fn kind(&self) -> Result<ContentKind> {
        let bytes = Zeroizing::new(self.decode_bytes()?);
        Ok(sniff::classify(&bytes))
    }

    /// Serialize to the JSON wire record. This is the plaintext that is
    /// hashed and encrypted.
    pub fn to_wire_bytes(&self) -> Result<Zeroizing<Vec<u8>>> {
        let record = WireRecord {
            data: self.data.as_str().into(),
            filename: self.filename.as_deref().map(Into::into),
        };
        Ok(Zeroizing::new(serde_json::to_vec(&record)?))
    }

    /// Parse the JSON wire record.
    pub fn from_wire_bytes(bytes: &[u8]) -> Result<Self> {
        let record: WireRecord<'_> = serde_json::from_slice(bytes)
            .map_err(|e| Error::Deserialization(format!("payload record: {}", e)))?;

        let mut payload = Self::default();
        payload.set_from_base64(record.data.into_owned())?;
        payload.filename = record.filename.map(|f| f.into_owned());
        Ok(payload)
    }
}

impl Drop for Payload {
    fn drop(&mut self) {
        self.data.zeroize();
    }
}

impl std::fmt::Debug for Payload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Payload")
            .field("data_len", &self.data.len())
            .field("filename", &self.filename)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_round_trip() {
        let payload = Payload::from_text("hello");
        assert_eq!(payload.data(), "aGVsbG8=");
        assert_eq!(payload.decode().unwrap(), "hello");
        assert_eq!(payload.filename(), None);
    }

    #[test]
    fn test_binary_content() {
        let bytes = [0x89, b'P', b'N', b'G', 0x00, 0xFF];
        let payload = Payload::from_bytes(&bytes).with_filename("image.png");

        assert_eq!(payload.decode_bytes().unwrap(), bytes);
        assert_eq!(payload.kind().unwrap(), ContentKind::Binary);
        assert!(payload.decode().is_err());
    }

    #[test]
    fn test_from_base64_checks_alphabet() {
        assert!(Payload::from_base64("aGVsbG8=").is_ok());
        assert!(matches!(
            Payload::from_base64("a-_b"),
            Err(Error::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_wire_record_includes_null_filename() {
        let wire = Payload::from_text("hi").to_wire_bytes().unwrap();
        assert_eq!(
            std::str::from_utf8(&wire).unwrap(),
            r#"{"data":"aGk=","filename":null}"#
        );
    }

    #[test]
    fn test_wire_round_trip_with_filename() {
        let original = Payload::from_text("report").with_filename("doc.pdf");
        let parsed = Payload::from_wire_bytes(&original.to_wire_bytes().unwrap()).unwrap();

        assert_eq!(parsed, original);
        assert_eq!(parsed.filename(), Some("doc.pdf"));
    }

    #[test]
    fn test_wire_record_without_filename_field() {
        let parsed = Payload::from_wire_bytes(br#"{"data":"aGk="}"#).unwrap();
        assert_eq!(parsed.decode().unwrap(), "hi");
    }

    #[test]
    fn test_wire_record_rejects_unknown_and_missing_fields() {
        assert!(matches!(
            Payload::from_wire_bytes(br#"{"data":"aGk=","extra":1}"#),
            Err(Error::Deserialization(_))
        ));
        assert!(matches!(
            Payload::from_wire_bytes(br#"{"filename":"a.txt"}"#),
            Err(Error::Deserialization(_))
        ));
        assert!(Payload::from_wire_bytes(b"not json").is_err());
    }

    #[test]
    fn test_debug_hides_content() {
        let printed = format!("{:?}", Payload::from_text("top secret"));
        assert!(!printed.contains("dG9wIHNlY3JldA"));
    }
}
