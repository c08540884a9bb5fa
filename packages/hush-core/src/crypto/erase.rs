//! Best-effort secret erasure.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  secure_erase(buf)                                                     │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  pass 1: random bytes                                                  │
//! │  pass 2: 0xFF                                                          │
//! │  pass 3: 0x00 via zeroize (volatile writes + compiler fence)          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! This overwrites the buffer it is given. It cannot reach copies the
//! allocator or the OS made earlier (reallocation, swap), which is why key
//! material lives in fixed-size boxed arrays that are never resized.

use rand::RngCore;
use zeroize::Zeroize;

/// Overwrite `buf` several times, ending with zeros.
pub fn secure_erase(buf: &mut [u8]) {
    if buf.is_empty() {
        return;
    }

    // Randomness is only noise here; a failed draw still leaves two passes.
    let _ = rand::rngs::OsRng.try_fill_bytes(buf);
    // The optimizer may drop this pass; it cannot drop the zeroize below.
    buf.fill(0xFF);
    buf.zeroize();
}
