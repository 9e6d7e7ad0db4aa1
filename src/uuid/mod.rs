//! 64-bit record identifiers
//!
//! A uuid is derived by hashing, never drawn from a persistent counter.
//! Given a seed string it is a pure function of (seed, salt), which is how
//! natural keys work: hashing a normalized username with the database's salt
//! always lands on the same record. Without a seed, a throwaway input is
//! synthesized from the clock and a random value, giving practical (not
//! cryptographic) uniqueness.
//!
//! Byte order is pinned little-endian on both the salt bytes and the digest
//! prefix so that deterministic uuids are reproducible across platforms.

use std::fmt;

use chrono::Utc;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// A 64-bit record identifier, unique within its table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Uuid(u64);

impl Uuid {
    /// Generates a uuid from an optional seed and a salt.
    ///
    /// With a seed, the result is deterministic for identical (seed, salt)
    /// pairs, across calls and across process restarts. Without one, the
    /// input is `"<unix-timestamp>:<random-u32>"` and the result is fresh
    /// with overwhelming probability.
    ///
    /// The store performs no collision detection: a colliding insert is
    /// indistinguishable from a duplicate-key insert and is rejected there.
    pub fn generate(seed: Option<&str>, salt: u64) -> Self {
        let input = match seed {
            Some(s) => s.to_owned(),
            None => format!("{}:{}", Utc::now().timestamp(), OsRng.next_u32()),
        };

        let mut hasher = Sha256::new();
        hasher.update(input.as_bytes());
        hasher.update(salt.to_le_bytes());
        let digest = hasher.finalize();

        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&digest[..8]);
        Uuid(u64::from_le_bytes(prefix))
    }

    /// Wraps a raw 64-bit value
    pub const fn from_raw(value: u64) -> Self {
        Uuid(value)
    }

    /// The raw 64-bit value
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Renders the uuid as 16 zero-padded lowercase hex characters,
    /// high 32 bits before low 32 bits. This is the record's filename stem.
    pub fn to_hex(self) -> String {
        let high = (self.0 >> 32) as u32;
        let low = self.0 as u32;
        format!("{:08x}{:08x}", high, low)
    }

    /// Parses the 16-hex-character rendering back into a uuid.
    ///
    /// Strict inverse of [`Uuid::to_hex`]: exactly 16 hex digits, nothing
    /// else. Returns `None` otherwise.
    pub fn from_hex(hex: &str) -> Option<Self> {
        if hex.len() != 16 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let high = u32::from_str_radix(&hex[..8], 16).ok()?;
        let low = u32::from_str_radix(&hex[8..], 16).ok()?;
        Some(Uuid(((high as u64) << 32) | low as u64))
    }
}

impl fmt::Display for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
