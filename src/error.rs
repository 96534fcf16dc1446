use thiserror::Error;

#[derive(Debug, Error)]
pub enum WebPushError {
    #[error("Base64url decode failed: {0}")]
    Base64Decode(String),

    #[error("Invalid {field} length: expected {expected} bytes, got {got}")]
    InvalidKeyLength {
        field: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Public key does not match the supplied private key")]
    KeyMismatch,

    #[error("Public and private keys must be supplied together, or both omitted")]
    IncompleteKeyPair,

    #[error("Invalid subject {0:?}: must be a mailto: address or an absolute https: URL")]
    InvalidSubject(String),

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Invalid expiration {expiration}: must be after {now} and at most {max}")]
    InvalidExpiration { expiration: u64, now: u64, max: u64 },

    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("Encryption failed: {0}")]
    Crypto(String),

    #[error("Payload too large: {size} bytes exceeds maximum {max}")]
    PayloadTooLarge { size: usize, max: usize },

    #[error("Invalid record size {0}: must be at least 18 bytes")]
    InvalidRecordSize(u32),

    #[error("Encrypted message too short: {got} bytes")]
    TruncatedMessage { got: usize },

    #[error("Invalid padding: missing 0x02 delimiter")]
    InvalidPadding,

    #[error("Random number generation failed: {0}")]
    Rng(String),
}
