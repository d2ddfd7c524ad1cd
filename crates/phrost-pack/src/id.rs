use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Serialize, Serializer};

use crate::value::Value;

/// Opaque 128-bit entity identifier carried on the wire as two 64-bit halves.
///
/// Uniqueness comes from random generation only; collisions are not checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct EntityId(pub u64, pub u64);

impl EntityId {
    /// Draw 16 bytes from the OS entropy source.
    ///
    /// # Panics
    ///
    /// Panics if the OS entropy source is unavailable.
    pub fn generate() -> Self {
        let mut bytes = [0u8; 16];
        OsRng.fill_bytes(&mut bytes);
        Self::from_bytes(bytes)
    }

    /// First half little-endian, then second half little-endian.
    pub fn to_bytes(self) -> [u8; 16] {
        let mut bytes = [0u8; 16];
        bytes[..8].copy_from_slice(&self.0.to_le_bytes());
        bytes[8..].copy_from_slice(&self.1.to_le_bytes());
        bytes
    }

    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        let mut lo = [0u8; 8];
        let mut hi = [0u8; 8];
        lo.copy_from_slice(&bytes[..8]);
        hi.copy_from_slice(&bytes[8..]);
        Self(u64::from_le_bytes(lo), u64::from_le_bytes(hi))
    }

    /// 32 lowercase hex characters of [`to_bytes`](Self::to_bytes).
    pub fn to_hex(self) -> String {
        hex::encode(self.to_bytes())
    }

    /// The halves as `id1`/`id2` arguments. Wire fields are signed, so the
    /// bits are reinterpreted rather than range-checked.
    pub fn as_args(self) -> [Value; 2] {
        [
            Value::Int(self.0 as i64),
            Value::Int(self.1 as i64),
        ]
    }

    /// Rebuild from decoded signed `id1`/`id2` fields.
    pub fn from_signed(id1: i64, id2: i64) -> Self {
        Self(id1 as u64, id2 as u64)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let hex = self.to_hex();
        write!(
            f,
            "{}-{}-{}-{}-{}",
            &hex[0..8],
            &hex[8..12],
            &hex[12..16],
            &hex[16..20],
            &hex[20..32]
        )
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
