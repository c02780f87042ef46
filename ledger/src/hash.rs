//! SHA-256 content hashes.
//!
//! Hashes are rendered as lowercase hex everywhere they leave the process
//! (wire encoding, canonical encodings, logs). The genesis parent is the one
//! exception and is written as `"1"`.

use {
    serde::{de, Deserialize, Deserializer, Serialize, Serializer},
    sha2::{Digest, Sha256},
    std::{fmt, str::FromStr},
};

pub const HASH_BYTES: usize = 32;

const GENESIS_PARENT_STR: &str = "1";

/// A 32-byte SHA-256 digest.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hash([u8; HASH_BYTES]);

impl Hash {
    /// Parent of the genesis block, rendered as `"1"`. Held as the hash whose
    /// integer value is 1, which is never the digest of real content.
    pub const GENESIS_PARENT: Hash = {
        let mut bytes = [0u8; HASH_BYTES];
        bytes[HASH_BYTES - 1] = 1;
        Hash(bytes)
    };

    pub const fn new_from_array(bytes: [u8; HASH_BYTES]) -> Self {
        Self(bytes)
    }

    pub fn to_bytes(self) -> [u8; HASH_BYTES] {
        self.0
    }

    pub fn is_genesis_parent(&self) -> bool {
        *self == Self::GENESIS_PARENT
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_genesis_parent() {
            return f.write_str(GENESIS_PARENT_STR);
        }
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({self})")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseHashError {
    #[error("invalid hex: {0}")]
    InvalidHex(String),
    #[error("expected {HASH_BYTES} bytes, got {0}")]
    WrongLength(usize),
    #[error("genesis parent must be written as \"{GENESIS_PARENT_STR}\"")]
    NonCanonicalGenesisParent,
}

impl FromStr for Hash {
    type Err = ParseHashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == GENESIS_PARENT_STR {
            return Ok(Self::GENESIS_PARENT);
        }
        let bytes = hex::decode(s).map_err(|e| ParseHashError::InvalidHex(e.to_string()))?;
        let array: [u8; HASH_BYTES] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| ParseHashError::WrongLength(bytes.len()))?;
        let hash = Self(array);
        if hash.is_genesis_parent() {
            return Err(ParseHashError::NonCanonicalGenesisParent);
        }
        Ok(hash)
    }
}

impl Serialize for Hash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Hash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// SHA-256 over a single byte string.
pub fn hash(bytes: &[u8]) -> Hash {
    Hash(Sha256::digest(bytes).into())
}

/// SHA-256 over the concatenation of several byte strings.
pub fn hashv(parts: &[&[u8]]) -> Hash {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    Hash(hasher.finalize().into())
}
