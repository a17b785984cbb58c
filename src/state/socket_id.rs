//! Socket id generation.

use std::sync::atomic::{AtomicU64, Ordering};

/// Generates per-process unique socket ids.
///
/// Format: `s` + 8 base36 characters, e.g. `sAAAAAAAB`. Ids are never
/// reused within a process and carry no meaning across restarts.
pub struct SocketIdGenerator {
    counter: AtomicU64,
}

impl Default for SocketIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SocketIdGenerator {
    pub fn new() -> Self {
        Self {
            counter: AtomicU64::new(1),
        }
    }

    /// Generate the next socket id.
    pub fn next(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("s{}", base36_encode_8(n))
    }
}

/// Encode a number as an 8-character base36 string.
fn base36_encode_8(mut n: u64) -> String {
    const CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    let mut result = [b'A'; 8];

    for slot in result.iter_mut().rev() {
        *slot = CHARS[(n % 36) as usize];
        n /= 36;
    }

    String::from_utf8_lossy(&result).into_owned()
}
