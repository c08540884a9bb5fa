//! # Secret Envelope Demo
//!
//! This example walks through the offline half of the protocol:
//! 1. Build a payload and seal it in a fresh envelope
//! 2. Assemble the secret URL the recipient would get
//! 3. Parse the URL, open the envelope and verify the content hash
//! 4. Show what a tampered link does
//!
//! ## Run
//!
//! ```bash
//! cargo run --example envelope_demo
//! ```

use std::sync::Arc;

use hush_core::crypto::{ContentHash, CryptoProvider, SecretEnvelope, SystemCrypto};
use hush_core::{Payload, SecretUrl};

fn main() {
    println!("=================================================");
    println!("            HUSH SECRET ENVELOPE DEMO");
    println!("=================================================\n");

    let crypto: Arc<dyn CryptoProvider> = Arc::new(SystemCrypto);

    // =========================================================================
    // STEP 1: Seal a payload
    // =========================================================================
    println!("1. Sealing a payload...\n");

    let payload = Payload::from_text("correct horse battery staple").with_filename("password.txt");
    let plaintext = payload.to_wire_bytes().expect("Failed to serialize payload");
    let hash = ContentHash::compute(crypto.as_ref(), &plaintext);

    let envelope = SecretEnvelope::generate(crypto.clone()).expect("Failed to generate envelope");
    let sealed = envelope.encrypt(&plaintext).expect("Failed to encrypt");

    println!("   Plaintext record: {} bytes", plaintext.len());
    println!("   Ciphertext (base64): {} chars", sealed.ciphertext().len());
    println!("   Content hash: {}", hash);
    println!();

    // =========================================================================
    // STEP 2: Assemble the secret URL
    // =========================================================================
    println!("2. Assembling the secret URL...\n");

    // The server would normally assign this id
    let id = "3f2b9c1e-8d7a-4e6f-9b0c-1a2b3c4d5e6f";
    let url = SecretUrl::build(
        "https://hush.example",
        id,
        &sealed.key_as_url_safe_base64(),
        &hash,
    )
    .expect("Failed to build URL");

    println!("   URL: {}", url);
    println!("   Fetched from: {}", url.retrieval_endpoint());
    println!();

    // =========================================================================
    // STEP 3: Open it again
    // =========================================================================
    println!("3. Parsing the URL and opening the envelope...\n");

    let parsed = SecretUrl::parse(&url.to_string()).expect("Failed to parse URL");
    let opener =
        SecretEnvelope::from_url_key(crypto.clone(), parsed.key()).expect("Failed to load key");
    let opened = opener.decrypt(sealed.ciphertext()).expect("Failed to decrypt");

    match parsed.hash() {
        Some(hash) => {
            hash.verify(crypto.as_ref(), &opened).expect("Hash mismatch");
            println!("   Content hash verified");
        }
        None => println!("   No content hash in URL"),
    }

    let received = Payload::from_wire_bytes(&opened).expect("Failed to parse payload");
    println!("   Filename: {:?}", received.filename());
    println!("   Content: {}", received.decode().expect("Not text"));
    println!();

    // =========================================================================
    // STEP 4: Tampering
    // =========================================================================
    println!("4. Decrypting with the wrong key...\n");

    let wrong = SecretEnvelope::generate(crypto).expect("Failed to generate envelope");
    match wrong.decrypt(sealed.ciphertext()) {
        Ok(_) => println!("   Unexpectedly decrypted!"),
        Err(e) => println!("   Rejected: {} (code {})", e, e.code()),
    }

    println!("\n=================================================");
    println!("                  DEMO COMPLETE");
    println!("=================================================");
}
