//! Property tests spanning several modules.

use std::sync::Arc;

use proptest::prelude::*;

use crate::codec;
use crate::crypto::{ContentHash, CryptoProvider, SecretEnvelope, SystemCrypto};
use crate::error::Error;
use crate::payload::Payload;
use crate::url::SecretUrl;
use crate::validation::{self, Ttl};

fn provider() -> Arc<dyn CryptoProvider> {
    Arc::new(SystemCrypto)
}

proptest! {
    #[test]
    fn url_safe_codec_roundtrip(bytes in proptest::collection::vec(any::<u8>(), 0..20_000)) {
        let encoded = codec::encode_url_safe(&bytes);
        prop_assert!(codec::is_url_safe_base64(&encoded));
        prop_assert_eq!(codec::decode_url_safe(&encoded).unwrap(), bytes);
    }

    #[test]
    fn standard_codec_roundtrip(bytes in proptest::collection::vec(any::<u8>(), 0..20_000)) {
        let encoded = codec::encode_standard(&bytes);
        prop_assert!(codec::is_standard_base64(&encoded));
        prop_assert_eq!(codec::decode_standard(&encoded).unwrap(), bytes);
    }

    #[test]
    fn envelope_roundtrip(
        key: [u8; 32],
        plaintext in proptest::collection::vec(any::<u8>(), 0..4096)
    ) {
        let sealed = SecretEnvelope::from_key(provider(), &key)
            .unwrap()
            .encrypt(&plaintext)
            .unwrap();

        let opened = SecretEnvelope::from_key(provider(), &key)
            .unwrap()
            .decrypt(sealed.ciphertext())
            .unwrap();
        prop_assert_eq!(opened.as_slice(), plaintext.as_slice());
    }

    #[test]
    fn sealed_secrets_pass_validation(
        plaintext in proptest::collection::vec(any::<u8>(), 1..512)
    ) {
        let sealed = SecretEnvelope::generate(provider()).unwrap().encrypt(&plaintext).unwrap();
        prop_assert!(validation::validate_encrypted_data(sealed.ciphertext()).is_ok());
    }

    #[test]
    fn envelope_rejects_other_keys(
        key: [u8; 32],
        other: [u8; 32],
        plaintext in proptest::collection::vec(any::<u8>(), 0..256)
    ) {
        prop_assume!(key != other);
        let sealed = SecretEnvelope::from_key(provider(), &key)
            .unwrap()
            .encrypt(&plaintext)
            .unwrap();

        let result = SecretEnvelope::from_key(provider(), &other)
            .unwrap()
            .decrypt(sealed.ciphertext());
        prop_assert!(matches!(result, Err(Error::DecryptionFailed)));
    }

    #[test]
    fn payload_wire_roundtrip(
        content in proptest::collection::vec(any::<u8>(), 1..1024),
        filename in proptest::option::of("[a-zA-Z0-9 ._-]{1,40}")
    ) {
        let mut payload = Payload::from_bytes(&content);
        if let Some(name) = &filename {
            payload = payload.with_filename(name.clone());
        }

        let parsed = Payload::from_wire_bytes(&payload.to_wire_bytes().unwrap()).unwrap();
        prop_assert_eq!(parsed.decode_bytes().unwrap(), content);
        prop_assert_eq!(parsed.filename(), filename.as_deref());
    }

    #[test]
    fn secret_url_roundtrip(
        id in "[A-Za-z0-9-]{1,128}",
        key: [u8; 32],
        plaintext in proptest::collection::vec(any::<u8>(), 0..256)
    ) {
        let key = codec::encode_url_safe(&key);
        let hash = ContentHash::compute(&SystemCrypto, &plaintext);
        let built = SecretUrl::build("https://hush.example/", &id, &key, &hash).unwrap();

        let parsed = SecretUrl::parse(&built.to_string()).unwrap();
        prop_assert_eq!(parsed.id(), id.as_str());
        prop_assert_eq!(parsed.key(), key.as_str());
        prop_assert_eq!(parsed.hash(), Some(&hash));
    }

    #[test]
    fn ttl_accepts_every_positive_whole_number(seconds in 1i64..=i64::MAX) {
        prop_assert_eq!(Ttl::new(seconds).unwrap().as_secs(), seconds as u64);
    }

    #[test]
    fn ttl_rejects_non_positive(seconds in i64::MIN..=0) {
        prop_assert!(matches!(Ttl::new(seconds), Err(Error::InvalidTtl(_))));
    }
}
