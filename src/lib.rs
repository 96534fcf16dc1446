//! Cryptographic core of a Web Push sender.
//!
//! This crate provides pure-Rust implementations of:
//! - VAPID sender assertions (RFC 8292): ES256 compact tokens plus the
//!   `Authorization` / `Crypto-Key` header values
//! - Per-subscriber payload encryption (RFC 8291) with the `aes128gcm`
//!   content coding (RFC 8188)
//! - Raw P-256 key material handling and unpadded base64url encoding
//!
//! Everything here is a stateless transformation of its inputs plus
//! fresh OS randomness; calls are independent and safe to run
//! concurrently. HTTP transport, retry policy, and subscription
//! storage stay with the caller.

pub mod base64url;
pub mod encryption;
pub mod error;
pub mod hkdf;
pub mod keys;
pub mod padding;
pub mod subscription;
pub mod vapid;

pub use base64url::{base64url_decode, base64url_encode};
pub use encryption::{
    decrypt, derive_message_keys, encrypt, encrypt_with_record_size, EncryptedMessage,
    MessageKeys, CONTENT_ENCODING,
};
pub use error::WebPushError;
pub use keys::{
    decode_private_key, decode_public_key, encode_private_key, encode_public_key, KeyPair,
    PRIVATE_KEY_LENGTH, PUBLIC_KEY_LENGTH,
};
pub use padding::{max_plaintext_length, DEFAULT_RECORD_SIZE};
pub use subscription::{Subscription, AUTH_SECRET_LENGTH};
pub use vapid::{
    sign_claims, vapid_headers, Claims, Vapid, VapidConfig, VapidHeaders,
    DEFAULT_EXPIRATION_SECONDS, MAX_EXPIRATION_SECONDS,
};
