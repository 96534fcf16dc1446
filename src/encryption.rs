//! Per-message payload encryption (RFC 8291, `aes128gcm` coding).
//!
//! Message body layout (RFC 8188):
//! `[salt:16][record size:4 BE][key id length:1][ephemeral public key:65][ciphertext + tag]`
//!
//! Key schedule per message:
//! ```text
//! ecdh   = ECDH(ephemeral private, receiver public)
//! ikm    = HKDF(salt: auth_secret, ikm: ecdh,
//!               info: "WebPush: info" || 0x00 || receiver || ephemeral, 32)
//! cek    = HKDF(salt, ikm, "Content-Encoding: aes128gcm" || 0x00, 16)
//! nonce  = HKDF(salt, ikm, "Content-Encoding: nonce" || 0x00, 12)
//! ```
//! The ephemeral key pair and salt are fresh per message and never
//! reused; the info string binds the derived keys to exactly this pair
//! of public points.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes128Gcm, Nonce};
use p256::ecdh::EphemeralSecret;
use p256::elliptic_curve::rand_core::OsRng;
use p256::elliptic_curve::sec1::ToEncodedPoint;
use p256::{PublicKey, SecretKey};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::WebPushError;
use crate::hkdf::hkdf_derive;
use crate::keys::PUBLIC_KEY_LENGTH;
use crate::padding::{pad, unpad, DEFAULT_RECORD_SIZE, MIN_RECORD_SIZE, TAG_LENGTH};
use crate::subscription::{Subscription, AUTH_SECRET_LENGTH};

/// Content coding identifier; the transport sets this as `Content-Encoding`.
pub const CONTENT_ENCODING: &str = "aes128gcm";

/// Message salt length.
pub const SALT_LENGTH: usize = 16;
/// AES-128 content encryption key length.
pub const CEK_LENGTH: usize = 16;
/// AES-GCM nonce length.
pub const NONCE_LENGTH: usize = 12;

/// Framing header length: salt + record size + key id length + key id.
const HEADER_LENGTH: usize = SALT_LENGTH + 4 + 1 + PUBLIC_KEY_LENGTH;

const IKM_INFO_PREFIX: &[u8] = b"WebPush: info\0";
const CEK_INFO: &[u8] = b"Content-Encoding: aes128gcm\0";
const NONCE_INFO: &[u8] = b"Content-Encoding: nonce\0";

/// Single-use encryption material for one message.
///
/// Dropped (and zeroized) as soon as the message is sealed; reusing a
/// salt/nonce pair across messages is a correctness violation.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct MessageKeys {
    ephemeral_public: [u8; PUBLIC_KEY_LENGTH],
    salt: [u8; SALT_LENGTH],
    cek: [u8; CEK_LENGTH],
    nonce: [u8; NONCE_LENGTH],
}

impl MessageKeys {
    /// The sender's ephemeral public key, carried in the framing header.
    pub fn ephemeral_public(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.ephemeral_public
    }

    pub fn salt(&self) -> &[u8; SALT_LENGTH] {
        &self.salt
    }
}

/// Derive fresh encryption material for one message to one subscriber.
///
/// Generates the ephemeral key pair and salt internally; the ephemeral
/// private scalar does not outlive this call.
pub fn derive_message_keys(
    receiver_public: &PublicKey,
    auth_secret: &[u8; AUTH_SECRET_LENGTH],
) -> Result<MessageKeys, WebPushError> {
    let mut salt = [0u8; SALT_LENGTH];
    getrandom::getrandom(&mut salt).map_err(|e| WebPushError::Rng(e.to_string()))?;

    let ephemeral_secret = EphemeralSecret::random(&mut OsRng);
    let ephemeral_public: [u8; PUBLIC_KEY_LENGTH] = PublicKey::from(&ephemeral_secret)
        .to_encoded_point(false)
        .as_bytes()
        .try_into()
        .expect("uncompressed P-256 point is 65 bytes");
    let receiver_bytes: [u8; PUBLIC_KEY_LENGTH] = receiver_public
        .to_encoded_point(false)
        .as_bytes()
        .try_into()
        .expect("uncompressed P-256 point is 65 bytes");

    let shared = ephemeral_secret.diffie_hellman(receiver_public);
    let (cek, nonce) = derive_cek_and_nonce(
        shared.raw_secret_bytes().as_slice(),
        auth_secret,
        &receiver_bytes,
        &ephemeral_public,
        &salt,
    )?;

    Ok(MessageKeys {
        ephemeral_public,
        salt,
        cek,
        nonce,
    })
}

/// The RFC 8291 key schedule, shared by both directions.
fn derive_cek_and_nonce(
    ecdh_secret: &[u8],
    auth_secret: &[u8; AUTH_SECRET_LENGTH],
    receiver_public: &[u8; PUBLIC_KEY_LENGTH],
    sender_public: &[u8; PUBLIC_KEY_LENGTH],
    salt: &[u8; SALT_LENGTH],
) -> Result<([u8; CEK_LENGTH], [u8; NONCE_LENGTH]), WebPushError> {
    let mut info = Vec::with_capacity(IKM_INFO_PREFIX.len() + 2 * PUBLIC_KEY_LENGTH);
    info.extend_from_slice(IKM_INFO_PREFIX);
    info.extend_from_slice(receiver_public);
    info.extend_from_slice(sender_public);

    let mut ikm: [u8; 32] = hkdf_derive(ecdh_secret, auth_secret, &info)?;
    let cek = hkdf_derive(&ikm, salt, CEK_INFO);
    let nonce = hkdf_derive(&ikm, salt, NONCE_INFO);
    ikm.zeroize();

    Ok((cek?, nonce?))
}

/// An encrypted message body plus its content coding.
#[derive(Clone, Debug)]
pub struct EncryptedMessage {
    body: Vec<u8>,
}

impl EncryptedMessage {
    /// The complete binary body: framing header followed by ciphertext.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn into_body(self) -> Vec<u8> {
        self.body
    }

    pub fn content_encoding(&self) -> &'static str {
        CONTENT_ENCODING
    }

    pub fn salt(&self) -> &[u8] {
        &self.body[..SALT_LENGTH]
    }

    pub fn record_size(&self) -> u32 {
        u32::from_be_bytes(
            self.body[SALT_LENGTH..SALT_LENGTH + 4]
                .try_into()
                .expect("slice is exactly 4 bytes"),
        )
    }

    pub fn ephemeral_public_key(&self) -> &[u8] {
        &self.body[SALT_LENGTH + 5..HEADER_LENGTH]
    }
}

/// Encrypt a payload for one subscriber with the default record size.
pub fn encrypt(
    plaintext: &[u8],
    subscription: &Subscription,
) -> Result<EncryptedMessage, WebPushError> {
    encrypt_with_record_size(plaintext, subscription, DEFAULT_RECORD_SIZE)
}

/// Encrypt a payload for one subscriber as a single `record_size` record.
pub fn encrypt_with_record_size(
    plaintext: &[u8],
    subscription: &Subscription,
    record_size: u32,
) -> Result<EncryptedMessage, WebPushError> {
    let mut padded = pad(plaintext, record_size)?;
    let keys = derive_message_keys(subscription.receiver_public(), subscription.auth_secret())?;

    let cipher = Aes128Gcm::new_from_slice(&keys.cek)
        .map_err(|e| WebPushError::Crypto(format!("AES-GCM init: {}", e)))?;
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&keys.nonce), padded.as_slice())
        .map_err(|e| WebPushError::Crypto(format!("AES-GCM encrypt: {}", e)))?;
    padded.zeroize();

    let mut body = Vec::with_capacity(HEADER_LENGTH + ciphertext.len());
    body.extend_from_slice(&keys.salt);
    body.extend_from_slice(&record_size.to_be_bytes());
    body.push(PUBLIC_KEY_LENGTH as u8);
    body.extend_from_slice(&keys.ephemeral_public);
    body.extend_from_slice(&ciphertext);

    Ok(EncryptedMessage { body })
}

/// Decrypt an `aes128gcm` message body with the receiver's key material.
pub fn decrypt(
    body: &[u8],
    receiver_secret: &SecretKey,
    auth_secret: &[u8; AUTH_SECRET_LENGTH],
) -> Result<Vec<u8>, WebPushError> {
    if body.len() < HEADER_LENGTH + TAG_LENGTH + 1 {
        return Err(WebPushError::TruncatedMessage { got: body.len() });
    }

    let salt: [u8; SALT_LENGTH] = body[..SALT_LENGTH]
        .try_into()
        .expect("slice is exactly 16 bytes");
    let record_size = u32::from_be_bytes(
        body[SALT_LENGTH..SALT_LENGTH + 4]
            .try_into()
            .expect("slice is exactly 4 bytes"),
    );
    if record_size < MIN_RECORD_SIZE {
        return Err(WebPushError::InvalidRecordSize(record_size));
    }

    let key_id_length = body[SALT_LENGTH + 4] as usize;
    if key_id_length != PUBLIC_KEY_LENGTH {
        return Err(WebPushError::Crypto(format!(
            "unsupported key id length {}, expected an uncompressed P-256 point",
            key_id_length
        )));
    }
    let sender_bytes: [u8; PUBLIC_KEY_LENGTH] = body[SALT_LENGTH + 5..HEADER_LENGTH]
        .try_into()
        .expect("slice is exactly 65 bytes");
    let sender_public = PublicKey::from_sec1_bytes(&sender_bytes).map_err(|_| {
        WebPushError::Crypto("sender public key is not on the P-256 curve".to_string())
    })?;

    let ciphertext = &body[HEADER_LENGTH..];
    if ciphertext.len() > record_size as usize {
        return Err(WebPushError::Crypto(
            "message spans multiple records".to_string(),
        ));
    }

    let receiver_bytes: [u8; PUBLIC_KEY_LENGTH] = receiver_secret
        .public_key()
        .to_encoded_point(false)
        .as_bytes()
        .try_into()
        .expect("uncompressed P-256 point is 65 bytes");

    let shared = p256::ecdh::diffie_hellman(
        receiver_secret.to_nonzero_scalar(),
        sender_public.as_affine(),
    );
    let (mut cek, nonce) = derive_cek_and_nonce(
        shared.raw_secret_bytes().as_slice(),
        auth_secret,
        &receiver_bytes,
        &sender_bytes,
        &salt,
    )?;

    let cipher = Aes128Gcm::new_from_slice(&cek)
        .map_err(|e| WebPushError::Crypto(format!("AES-GCM init: {}", e)))?;
    cek.zeroize();

    let mut record = cipher
        .decrypt(Nonce::from_slice(&nonce), ciphertext)
        .map_err(|_| WebPushError::Crypto("AES-GCM decrypt failed".to_string()))?;

    let plaintext = unpad(&record);
    record.zeroize();
    plaintext
}
