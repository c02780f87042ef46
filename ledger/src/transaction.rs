//! Signed, fee-bearing transactions.
//!
//! A [`Transaction`] is an immutable value. Its id is derived at construction
//! from the canonical encoding of `(sender, receiver, amount, message, nonce)`
//! and signing produces a new value rather than mutating the old one.
//!
//! Canonical encodings are compact JSON objects with sorted keys. They are the
//! only bytes ever hashed or signed:
//!
//! ```text
//! id material:      {"amount","message","nonce","receiver_address","sender_address"}
//! signing material: id material + {"transaction_id","type"}
//! wire object:      signing material + {"signature"}
//! ```

use {
    crate::{
        address::Address,
        amount::{self, Amount},
        crypto::{self, Keypair, Signature},
        error::TxError,
        hash::{self, Hash},
    },
    serde::{Deserialize, Serialize},
    serde_json::{json, Value},
    std::{fmt, str::FromStr},
};

/// The five transaction types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Coin transfer; costs the sender `amount` plus a 3% fee.
    Coin,
    /// Text message; costs the sender one coin per character.
    Message,
    /// Stake deposit to the sentinel address; costs `amount`, no fee.
    Stake,
    /// Initial allocation in block 0. Unsigned.
    Genesis,
    /// Credit from the bootstrap node to a newly joined node.
    Welcome,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Coin => "coin",
            TransactionKind::Message => "message",
            TransactionKind::Stake => "stake",
            TransactionKind::Genesis => "genesis",
            TransactionKind::Welcome => "welcome",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = TxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "coin" => Ok(TransactionKind::Coin),
            "message" => Ok(TransactionKind::Message),
            "stake" => Ok(TransactionKind::Stake),
            "genesis" => Ok(TransactionKind::Genesis),
            "welcome" => Ok(TransactionKind::Welcome),
            other => Err(TxError::UnknownTransactionType(other.to_string())),
        }
    }
}

/// An immutable ledger transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    sender: Address,
    receiver: Address,
    kind: TransactionKind,
    amount: Amount,
    message: String,
    nonce: u64,
    id: Hash,
    signature: Option<Signature>,
}

impl Transaction {
    /// Build an unsigned transaction and derive its id.
    pub fn new(
        sender: Address,
        receiver: Address,
        kind: TransactionKind,
        amount: Amount,
        message: impl Into<String>,
        nonce: u64,
    ) -> Self {
        Self::from_parts(sender, receiver, kind, amount, message.into(), nonce, None)
    }

    /// The unsigned allocation that opens the chain.
    pub fn genesis(receiver: Address, amount: Amount, message: impl Into<String>) -> Self {
        Self::new(
            Address::SENTINEL,
            receiver,
            TransactionKind::Genesis,
            amount,
            message,
            0,
        )
    }

    /// Rebuild a transaction received from a peer. The id is recomputed, never
    /// taken from the sender.
    pub(crate) fn from_parts(
        sender: Address,
        receiver: Address,
        kind: TransactionKind,
        amount: Amount,
        message: String,
        nonce: u64,
        signature: Option<Signature>,
    ) -> Self {
        let id = Self::compute_id(&sender, &receiver, amount, &message, nonce);
        Self {
            sender,
            receiver,
            kind,
            amount,
            message,
            nonce,
            id,
            signature,
        }
    }

    pub fn compute_id(
        sender: &Address,
        receiver: &Address,
        amount: Amount,
        message: &str,
        nonce: u64,
    ) -> Hash {
        let material = json!({
            "amount": amount,
            "message": message,
            "nonce": nonce,
            "receiver_address": receiver.to_string(),
            "sender_address": sender.to_string(),
        });
        hash::hash(material.to_string().as_bytes())
    }

    pub fn sender(&self) -> &Address {
        &self.sender
    }

    pub fn receiver(&self) -> &Address {
        &self.receiver
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn id(&self) -> &Hash {
        &self.id
    }

    pub fn signature(&self) -> Option<&Signature> {
        self.signature.as_ref()
    }

    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    fn signing_value(&self) -> Value {
        json!({
            "amount": self.amount,
            "message": self.message,
            "nonce": self.nonce,
            "receiver_address": self.receiver.to_string(),
            "sender_address": self.sender.to_string(),
            "transaction_id": self.id.to_string(),
            "type": self.kind.as_str(),
        })
    }

    /// Bytes covered by the signature: every field except the signature.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        self.signing_value().to_string().into_bytes()
    }

    /// The full canonical object, signature included. Blocks hash these.
    pub fn canonical_value(&self) -> Value {
        let mut value = self.signing_value();
        if let Value::Object(fields) = &mut value {
            let signature = match &self.signature {
                Some(signature) => Value::String(signature.to_string()),
                None => Value::Null,
            };
            fields.insert("signature".to_string(), signature);
        }
        value
    }

    /// Returns a signed copy.
    #[must_use]
    pub fn sign(self, keypair: &Keypair) -> Self {
        let signature = keypair.sign(&self.canonical_bytes());
        Self {
            signature: Some(signature),
            ..self
        }
    }

    /// Verify the signature against `signer`.
    ///
    /// Unsigned genesis transactions are exempt and always verify.
    pub fn verify_with(&self, signer: &Address) -> bool {
        match (&self.signature, self.kind) {
            (None, TransactionKind::Genesis) => true,
            (None, _) => false,
            (Some(signature), _) => crypto::verify(signer, &self.canonical_bytes(), signature),
        }
    }

    /// Verify the signature against the sender address.
    pub fn verify(&self) -> bool {
        self.verify_with(&self.sender)
    }

    /// What sending this transaction debits from the sender.
    pub fn sender_cost(&self) -> u128 {
        match self.kind {
            TransactionKind::Coin => amount::coin_transfer_cost(self.amount),
            TransactionKind::Message => amount::message_cost(&self.message),
            TransactionKind::Stake => self.amount as u128,
            TransactionKind::Genesis | TransactionKind::Welcome => 0,
        }
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} -> {} amount={} nonce={} id={}",
            self.kind,
            self.sender.short(),
            self.receiver.short(),
            amount::format_amount(self.amount),
            self.nonce,
            self.id,
        )
    }
}
