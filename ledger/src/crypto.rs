//! Key generation, signing and signature verification.
//!
//! Signatures are ed25519 (SHA-512 digest inside the scheme, deterministic
//! nonces). Verification uses `verify_strict`, which rejects small-order keys
//! and non-canonical signature encodings, so a signature has exactly one
//! accepted byte form.

use {
    crate::address::{Address, ADDRESS_BYTES},
    base64::{engine::general_purpose::STANDARD, Engine as _},
    ed25519_dalek::{Signer, SigningKey, VerifyingKey},
    rand::RngCore,
    serde::{de, Deserialize, Deserializer, Serialize, Serializer},
    std::{fmt, str::FromStr},
};

pub const SIGNATURE_BYTES: usize = 64;
pub const SECRET_KEY_BYTES: usize = 32;

/// Raw ed25519 signature bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature([u8; SIGNATURE_BYTES]);

impl Signature {
    pub const fn new_from_array(bytes: [u8; SIGNATURE_BYTES]) -> Self {
        Self(bytes)
    }

    pub fn to_bytes(self) -> [u8; SIGNATURE_BYTES] {
        self.0
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&STANDARD.encode(self.0))
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({self})")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseSignatureError {
    #[error("invalid base64: {0}")]
    InvalidBase64(String),
    #[error("expected {SIGNATURE_BYTES} signature bytes, got {0}")]
    WrongLength(usize),
}

impl FromStr for Signature {
    type Err = ParseSignatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = STANDARD
            .decode(s)
            .map_err(|e| ParseSignatureError::InvalidBase64(e.to_string()))?;
        let array: [u8; SIGNATURE_BYTES] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| ParseSignatureError::WrongLength(bytes.len()))?;
        Ok(Self(array))
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// A private signing key together with its address.
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generate a fresh keypair from the thread-local CSPRNG.
    pub fn generate() -> Self {
        let mut secret = [0u8; SECRET_KEY_BYTES];
        rand::rng().fill_bytes(&mut secret);
        Self::from_secret_bytes(&secret)
    }

    /// Deterministic keypair from 32 secret bytes.
    pub fn from_secret_bytes(secret: &[u8; SECRET_KEY_BYTES]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(secret),
        }
    }

    pub fn secret_bytes(&self) -> [u8; SECRET_KEY_BYTES] {
        self.signing_key.to_bytes()
    }

    pub fn address(&self) -> Address {
        Address::new_from_array(self.signing_key.verifying_key().to_bytes())
    }

    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature(self.signing_key.sign(message).to_bytes())
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

/// Returns `(private, public)` for a freshly generated key.
pub fn generate_keypair() -> (Keypair, Address) {
    let keypair = Keypair::generate();
    let address = keypair.address();
    (keypair, address)
}

pub fn sign(keypair: &Keypair, message: &[u8]) -> Signature {
    keypair.sign(message)
}

/// Verify `signature` over `message` for the key behind `address`.
///
/// Malformed key material yields `false`, never a panic.
pub fn verify(address: &Address, message: &[u8], signature: &Signature) -> bool {
    let key_bytes: [u8; ADDRESS_BYTES] = address.to_bytes();
    let Ok(verifying_key) = VerifyingKey::from_bytes(&key_bytes) else {
        return false;
    };
    let signature = ed25519_dalek::Signature::from_bytes(&signature.0);
    verifying_key.verify_strict(message, &signature).is_ok()
}
