//! Hashing primitives for Kedge.
//!
//! All identities in the network (transactions, blocks, Merkle nodes) are
//! 32-byte double-SHA-256 digests.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// A 32-byte hash value.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Hash([u8; 32]);

impl Hash {
    /// The zero hash (used as a sentinel for "no value").
    pub const ZERO: Self = Self([0u8; 32]);

    /// Create a hash from raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Create from hex string.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s)?;
        if bytes.len() != 32 {
            return Err(Error::invalid_hash(format!(
                "expected 32 bytes, got {}",
                bytes.len()
            )));
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Check if this is the zero hash.
    pub fn is_zero(&self) -> bool {
        self == &Self::ZERO
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// A transaction id.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TxId(pub Hash);

impl TxId {
    /// The zero txid sentinel.
    pub const ZERO: Self = Self(Hash::ZERO);

    /// Check if this is the zero sentinel.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A block hash.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct BlockHash(pub Hash);

impl fmt::Display for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hash arbitrary data with double SHA-256.
pub fn hash(data: &[u8]) -> Hash {
    let first = Sha256::digest(data);
    let second = Sha256::digest(first);
    Hash(second.into())
}

/// Hash two child hashes to produce a parent hash.
/// Used in Merkle tree construction.
pub fn hash_pair(left: Hash, right: Hash) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(left.as_bytes());
    hasher.update(right.as_bytes());
    let first = hasher.finalize();
    let second = Sha256::digest(first);
    Hash(second.into())
}

/// A compressed public key identifying a signer (33 bytes, SEC1 form).
///
/// Point validity is not checked here; the authority layer validates keys
/// when decoding signer tables.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SignerKey([u8; 33]);

impl SignerKey {
    /// Create from raw bytes.
    pub fn from_bytes(bytes: [u8; 33]) -> Self {
        Self(bytes)
    }

    /// Create from a hex string (must decode to exactly 33 bytes).
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s)?;
        if bytes.len() != 33 {
            return Err(Error::invalid_key(format!(
                "expected 33 bytes, got {}",
                bytes.len()
            )));
        }
        let mut arr = [0u8; 33];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 33] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Derive the signer's address: hex of the first 20 bytes of the
    /// key's double SHA-256 digest.
    pub fn address(&self) -> String {
        hex::encode(&hash(&self.0).as_bytes()[..20])
    }
}

impl fmt::Debug for SignerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SignerKey({})", &self.to_hex()[..16])
    }
}

mod signer_key_serde {
    use super::*;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(key: &[u8; 33], s: S) -> std::result::Result<S::Ok, S::Error> {
        // Hex string; serde only derives fixed arrays up to 32 elements
        hex::encode(key).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> std::result::Result<[u8; 33], D::Error> {
        let s = String::deserialize(d)?;
        let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("expected 33 bytes"))
    }
}

impl Serialize for SignerKey {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        signer_key_serde::serialize(&self.0, s)
    }
}

impl<'de> Deserialize<'de> for SignerKey {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        signer_key_serde::deserialize(d).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_basic() {
        let h1 = hash(b"hello");
        let h2 = hash(b"hello");
        let h3 = hash(b"world");

        assert_eq!(h1, h2);
        assert_ne!(h1, h3);
        assert!(!h1.is_zero());
        assert!(Hash::ZERO.is_zero());
    }

    #[test]
    fn test_hash_is_double_sha256() {
        // SHA256(SHA256("hello")) is a known vector
        let h = hash(b"hello");
        assert_eq!(
            h.to_hex(),
            "9595c9df90075148eb06860365df33584b75bff782a510c6cd4883a419833d50"
        );
    }

    #[test]
    fn test_hash_hex_roundtrip() {
        let h = hash(b"test data");
        let hex_str = h.to_hex();
        let h2 = Hash::from_hex(&hex_str).unwrap();
        assert_eq!(h, h2);
    }

    #[test]
    fn test_hash_from_hex_wrong_length() {
        assert!(Hash::from_hex("abcd").is_err());
        assert!(Hash::from_hex("not hex at all").is_err());
    }

    #[test]
    fn test_hash_pair_order_matters() {
        let a = hash(b"a");
        let b = hash(b"b");

        let ab = hash_pair(a, b);
        let ba = hash_pair(b, a);

        assert_ne!(ab, ba);
    }

    #[test]
    fn test_signer_key_hex_roundtrip() {
        let mut bytes = [0u8; 33];
        bytes[0] = 0x02;
        bytes[32] = 0x7f;
        let key = SignerKey::from_bytes(bytes);

        let restored = SignerKey::from_hex(&key.to_hex()).unwrap();
        assert_eq!(key, restored);
    }

    #[test]
    fn test_signer_key_wrong_length() {
        assert!(SignerKey::from_hex("0202").is_err());
    }

    #[test]
    fn test_signer_key_serde_roundtrip() {
        let mut bytes = [0u8; 33];
        bytes[0] = 0x03;
        let key = SignerKey::from_bytes(bytes);

        let encoded = bincode::serialize(&key).unwrap();
        let restored: SignerKey = bincode::deserialize(&encoded).unwrap();
        assert_eq!(key, restored);
    }

    #[test]
    fn test_signer_address_deterministic() {
        let key = SignerKey::from_bytes([0x02; 33]);
        let a1 = key.address();
        let a2 = key.address();
        assert_eq!(a1, a2);
        assert_eq!(a1.len(), 40); // 20 bytes hex
    }
}
