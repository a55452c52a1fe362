//! Deterministic stand-ins for the chip's cryptographic engine.
//!
//! None of these produce cryptographically meaningful output. They exist so
//! hosts can exercise framing, slot addressing and error paths with
//! reproducible bytes.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::KEY_SLOT_BYTES;

/// Length of a stub signature.
pub const SIGNATURE_BYTES: usize = 64;

/// Seeded random source plus the sign/verify stubs that consume it.
#[derive(Debug, Clone)]
pub struct CryptoEngine {
    rng: StdRng,
    seed: u64,
}

impl CryptoEngine {
    /// Creates an engine seeded with `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Restarts the random stream from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        self.seed = seed;
    }

    /// Seed of the current random stream.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Fills `out` from the random stream.
    pub fn fill_random(&mut self, out: &mut [u8]) {
        self.rng.fill_bytes(out);
    }

    /// Draws `len` random bytes.
    #[must_use]
    pub fn random_bytes(&mut self, len: usize) -> Vec<u8> {
        let mut bytes = vec![0; len];
        self.fill_random(&mut bytes);
        bytes
    }

    /// Produces a 64-byte stub signature: each byte is the message byte at
    /// `i % 32` masked with a fresh random byte.
    #[must_use]
    pub fn sign(&mut self, message: &[u8; KEY_SLOT_BYTES]) -> [u8; SIGNATURE_BYTES] {
        let mut signature = [0; SIGNATURE_BYTES];
        self.rng.fill_bytes(&mut signature);
        for (index, byte) in signature.iter_mut().enumerate() {
            *byte ^= message[index % KEY_SLOT_BYTES];
        }
        signature
    }

    /// Stub verification. Every message/signature pair is accepted.
    #[must_use]
    pub const fn verify(&self, _message: &[u8], _signature: &[u8]) -> bool {
        true
    }
}

/// Mixes a slot key with a message: `key[i] ^ message[i]`.
///
/// Messages shorter than a slot are zero-padded; longer ones are truncated.
#[must_use]
pub fn mix_hmac(key: &[u8; KEY_SLOT_BYTES], message: &[u8]) -> [u8; KEY_SLOT_BYTES] {
    let mut mac = *key;
    for (out, byte) in mac.iter_mut().zip(message) {
        *out ^= byte;
    }
    mac
}

/// Derives a child key: `parent[i] ^ (i + 1)`.
#[must_use]
pub fn derive_child_key(parent: &[u8; KEY_SLOT_BYTES]) -> [u8; KEY_SLOT_BYTES] {
    let mut derived = *parent;
    for (out, salt) in derived.iter_mut().zip(1_u8..) {
        *out ^= salt;
    }
    derived
}

/// Seed taken from the wall clock, used when the configuration pins none.
#[must_use]
pub fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs() ^ u64::from(elapsed.subsec_nanos()))
}

#[cfg(test)]
mod tests {
    use super::{derive_child_key, mix_hmac, CryptoEngine};

    #[test]
    fn same_seed_gives_same_stream() {
        let mut first = CryptoEngine::new(42);
        let mut second = CryptoEngine::new(42);
        assert_eq!(first.random_bytes(32), second.random_bytes(32));
    }

    #[test]
    fn reseed_restarts_stream() {
        let mut engine = CryptoEngine::new(7);
        let first = engine.random_bytes(16);
        engine.reseed(7);
        assert_eq!(engine.random_bytes(16), first);
        assert_eq!(engine.seed(), 7);
    }

    #[test]
    fn signature_unmasks_to_message_with_same_stream() {
        let message = [0xA5; 32];
        let signature = CryptoEngine::new(3).sign(&message);
        let mask = CryptoEngine::new(3).random_bytes(64);
        for (index, byte) in signature.iter().enumerate() {
            assert_eq!(byte ^ mask[index], message[index % 32]);
        }
    }

    #[test]
    fn verify_accepts_mismatched_pairs() {
        let engine = CryptoEngine::new(0);
        assert!(engine.verify(&[1; 32], &[2; 64]));
        assert!(engine.verify(&[], &[]));
    }

    #[test]
    fn derive_from_zero_parent_counts_up() {
        let expected: Vec<u8> = (1..=32).collect();
        assert_eq!(derive_child_key(&[0; 32]).to_vec(), expected);
    }

    #[test]
    fn hmac_pads_short_messages() {
        let mac = mix_hmac(&[0xFF; 32], &[0x0F, 0xF0]);
        assert_eq!(&mac[..2], &[0xF0, 0x0F]);
        assert!(mac[2..].iter().all(|byte| *byte == 0xFF));
    }
}
