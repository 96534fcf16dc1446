//! Subscriber key material.
//!
//! A push subscription carries the endpoint URL plus two values the
//! browser shared out-of-band: the subscriber's P-256 public key
//! (`p256dh`) and a 16-byte auth secret. Both are validated here once,
//! at the boundary, so the encryption path works on typed material.

use p256::PublicKey;

use crate::base64url::base64url_decode;
use crate::error::WebPushError;
use crate::keys::decode_public_key;

/// Auth secret length fixed by the Web Push key derivation.
pub const AUTH_SECRET_LENGTH: usize = 16;

/// A validated push subscription.
#[derive(Clone, Debug)]
pub struct Subscription {
    endpoint: String,
    receiver_public: PublicKey,
    auth_secret: [u8; AUTH_SECRET_LENGTH],
}

impl Subscription {
    /// Parse a subscription from the caller's base64url strings.
    ///
    /// `p256dh` must decode to a 65-byte uncompressed point on P-256;
    /// `auth` must decode to exactly 16 bytes.
    pub fn new(endpoint: &str, p256dh: &str, auth: &str) -> Result<Self, WebPushError> {
        let receiver_public = decode_public_key(p256dh)?;
        let auth_bytes = base64url_decode(auth)?;
        let auth_secret: [u8; AUTH_SECRET_LENGTH] =
            auth_bytes
                .as_slice()
                .try_into()
                .map_err(|_| WebPushError::InvalidKeyLength {
                    field: "auth secret",
                    expected: AUTH_SECRET_LENGTH,
                    got: auth_bytes.len(),
                })?;
        Ok(Self {
            endpoint: endpoint.to_string(),
            receiver_public,
            auth_secret,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn receiver_public(&self) -> &PublicKey {
        &self.receiver_public
    }

    pub fn auth_secret(&self) -> &[u8; AUTH_SECRET_LENGTH] {
        &self.auth_secret
    }
}
