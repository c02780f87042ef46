//! Account addresses.
//!
//! A node's address is its ed25519 public key; there is no separate identity
//! layer. On the wire an address is the standard base64 encoding of the key,
//! except for the sentinel address which is written as `"0"`.

use {
    base64::{engine::general_purpose::STANDARD, Engine as _},
    serde::{de, Deserialize, Deserializer, Serialize, Serializer},
    std::{fmt, str::FromStr},
};

pub const ADDRESS_BYTES: usize = 32;

const SENTINEL_STR: &str = "0";

/// A 32-byte public key used as an account address.
///
/// Ordering is byte-wise; the validator election walks addresses in this
/// order.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address([u8; ADDRESS_BYTES]);

impl Address {
    /// Receiver of stake deposits and sender of genesis credits.
    pub const SENTINEL: Address = Address([0u8; ADDRESS_BYTES]);

    pub const fn new_from_array(bytes: [u8; ADDRESS_BYTES]) -> Self {
        Self(bytes)
    }

    pub fn to_bytes(self) -> [u8; ADDRESS_BYTES] {
        self.0
    }

    pub fn is_sentinel(&self) -> bool {
        *self == Self::SENTINEL
    }

    /// First characters of the encoded address, for log lines.
    pub fn short(&self) -> String {
        let full = self.to_string();
        full.chars().take(8).collect()
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_sentinel() {
            f.write_str(SENTINEL_STR)
        } else {
            f.write_str(&STANDARD.encode(self.0))
        }
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseAddressError {
    #[error("invalid base64: {0}")]
    InvalidBase64(String),
    #[error("expected {ADDRESS_BYTES} key bytes, got {0}")]
    WrongLength(usize),
    #[error("all-zero key must be written as \"{SENTINEL_STR}\"")]
    NonCanonicalSentinel,
}

impl FromStr for Address {
    type Err = ParseAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == SENTINEL_STR {
            return Ok(Self::SENTINEL);
        }
        let bytes = STANDARD
            .decode(s)
            .map_err(|e| ParseAddressError::InvalidBase64(e.to_string()))?;
        let array: [u8; ADDRESS_BYTES] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| ParseAddressError::WrongLength(bytes.len()))?;
        let address = Self(array);
        // One encoding per address, otherwise ids and hashes could diverge.
        if address.is_sentinel() {
            return Err(ParseAddressError::NonCanonicalSentinel);
        }
        Ok(address)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
