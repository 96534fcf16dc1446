//! P-256 key material for VAPID signing and message encryption.
//!
//! Keys travel as raw SEC1 bytes, base64url encoded without padding:
//! public keys as 65-byte uncompressed points (`0x04 || x || y`),
//! private keys as 32-byte big-endian scalars.

use p256::ecdsa::SigningKey;
use p256::elliptic_curve::rand_core::OsRng;
use p256::elliptic_curve::sec1::ToEncodedPoint;
use p256::{PublicKey, SecretKey};
use zeroize::Zeroize;

use crate::base64url::{base64url_decode, base64url_encode};
use crate::error::WebPushError;

/// Uncompressed SEC1 P-256 point length.
pub const PUBLIC_KEY_LENGTH: usize = 65;
/// P-256 scalar length.
pub const PRIVATE_KEY_LENGTH: usize = 32;

/// A validated P-256 key pair.
///
/// The public point is always `private · G`; mismatched external key
/// material is rejected at construction.
#[derive(Clone, Debug)]
pub struct KeyPair {
    signing_key: SigningKey,
}

impl KeyPair {
    /// Generate a fresh key pair from the operating system RNG.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::random(&mut OsRng),
        }
    }

    /// Build a key pair from base64url-encoded raw key material.
    ///
    /// Both keys are length- and curve-checked, and the public point
    /// must match the one derived from the private scalar.
    pub fn from_base64(public: &str, private: &str) -> Result<Self, WebPushError> {
        let public_key = decode_public_key(public)?;
        let secret = decode_private_key(private)?;
        if secret.public_key() != public_key {
            return Err(WebPushError::KeyMismatch);
        }
        Ok(Self {
            signing_key: SigningKey::from(&secret),
        })
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }

    /// The uncompressed SEC1 public point.
    pub fn public_key_bytes(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        let point = self.signing_key.verifying_key().to_encoded_point(false);
        point
            .as_bytes()
            .try_into()
            .expect("uncompressed P-256 point is 65 bytes")
    }

    pub fn public_key_base64(&self) -> String {
        base64url_encode(&self.public_key_bytes())
    }

    pub fn private_key_base64(&self) -> String {
        let mut scalar = self.signing_key.to_bytes().to_vec();
        let encoded = base64url_encode(&scalar);
        scalar.zeroize();
        encoded
    }
}

/// Decode and validate a base64url 65-byte uncompressed P-256 public key.
pub fn decode_public_key(input: &str) -> Result<PublicKey, WebPushError> {
    let bytes = decode_key_material(input, "public key", PUBLIC_KEY_LENGTH)?;
    if bytes[0] != 0x04 {
        return Err(WebPushError::InvalidPublicKey(
            "not an uncompressed SEC1 point (missing 0x04 prefix)".to_string(),
        ));
    }
    PublicKey::from_sec1_bytes(&bytes)
        .map_err(|_| WebPushError::InvalidPublicKey("point is not on the P-256 curve".to_string()))
}

/// Decode and validate a base64url 32-byte P-256 private scalar.
pub fn decode_private_key(input: &str) -> Result<SecretKey, WebPushError> {
    let mut bytes = decode_key_material(input, "private key", PRIVATE_KEY_LENGTH)?;
    let secret = SecretKey::from_slice(&bytes)
        .map_err(|_| WebPushError::InvalidPrivateKey("scalar is zero or out of range".to_string()));
    bytes.zeroize();
    secret
}

/// Encode a public key as its unpadded base64url SEC1 form.
pub fn encode_public_key(public_key: &PublicKey) -> String {
    base64url_encode(public_key.to_encoded_point(false).as_bytes())
}

/// Encode a private scalar as unpadded base64url.
pub fn encode_private_key(secret: &SecretKey) -> String {
    let mut scalar = secret.to_bytes().to_vec();
    let encoded = base64url_encode(&scalar);
    scalar.zeroize();
    encoded
}

/// Key material must be strictly unpadded base64url; a padded or
/// standard-alphabet key string is a caller error, not leniently fixed.
fn decode_key_material(
    input: &str,
    field: &'static str,
    expected: usize,
) -> Result<Vec<u8>, WebPushError> {
    if input.contains('=') {
        return Err(WebPushError::Base64Decode(format!(
            "{} must not contain base64 padding",
            field
        )));
    }
    let bytes = base64url_decode(input)?;
    if bytes.len() != expected {
        return Err(WebPushError::InvalidKeyLength {
            field,
            expected,
            got: bytes.len(),
        });
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Key pair from the reference Web Push test suite.
    const VALID_PUBLIC: &str =
        "BF326dtFn8oRwhpL4hoZciv8jdInuXUrL79qGqlYGkz7Fk4jo3iSdglnC9t-DsZM8EDrFeAX8rebK3uN63FUCfE";
    const VALID_PRIVATE: &str = "nx9zGwu-qjfAJeWY-toozP_QC2ntjKkVt9JOjcDNMPw";

    #[test]
    fn generate_produces_valid_material() {
        let pair = KeyPair::generate();
        let public = pair.public_key_bytes();
        assert_eq!(public.len(), PUBLIC_KEY_LENGTH);
        assert_eq!(public[0], 0x04);
    }

    #[test]
    fn generated_pairs_are_unique() {
        let a = KeyPair::generate();
        let b = KeyPair::generate();
        assert_ne!(a.public_key_bytes(), b.public_key_bytes());
    }

    #[test]
    fn accepts_reference_pair() {
        let pair = KeyPair::from_base64(VALID_PUBLIC, VALID_PRIVATE).unwrap();
        assert_eq!(pair.public_key_base64(), VALID_PUBLIC);
        assert_eq!(pair.private_key_base64(), VALID_PRIVATE);
    }

    #[test]
    fn free_encoders_match_pair_encoders() {
        let secret = decode_private_key(VALID_PRIVATE).unwrap();
        assert_eq!(encode_private_key(&secret), VALID_PRIVATE);
        assert_eq!(encode_public_key(&secret.public_key()), VALID_PUBLIC);
    }

    #[test]
    fn base64_round_trip() {
        let pair = KeyPair::generate();
        let restored =
            KeyPair::from_base64(&pair.public_key_base64(), &pair.private_key_base64()).unwrap();
        assert_eq!(restored.public_key_bytes(), pair.public_key_bytes());
    }

    #[test]
    fn rejects_mismatched_pair() {
        let other = KeyPair::generate();
        let err = KeyPair::from_base64(&other.public_key_base64(), VALID_PRIVATE).unwrap_err();
        assert!(matches!(err, WebPushError::KeyMismatch));
    }

    #[test]
    fn rejects_wrong_public_length() {
        let err = decode_public_key(&base64url_encode(&[0x04u8; 33])).unwrap_err();
        assert!(matches!(
            err,
            WebPushError::InvalidKeyLength { expected: 65, .. }
        ));
    }

    #[test]
    fn rejects_wrong_private_length() {
        let err = decode_private_key(&base64url_encode(&[1u8; 16])).unwrap_err();
        assert!(matches!(
            err,
            WebPushError::InvalidKeyLength { expected: 32, .. }
        ));
    }

    #[test]
    fn rejects_missing_point_prefix() {
        let mut bytes = [0u8; PUBLIC_KEY_LENGTH];
        bytes[0] = 0x05;
        let err = decode_public_key(&base64url_encode(&bytes)).unwrap_err();
        assert!(err.to_string().contains("0x04"));
    }

    #[test]
    fn rejects_off_curve_point() {
        // (0, 0) is not on P-256
        let bytes = {
            let mut b = [0u8; PUBLIC_KEY_LENGTH];
            b[0] = 0x04;
            b
        };
        let err = decode_public_key(&base64url_encode(&bytes)).unwrap_err();
        assert!(err.to_string().contains("curve"));
    }

    #[test]
    fn rejects_zero_scalar() {
        assert!(decode_private_key(&base64url_encode(&[0u8; PRIVATE_KEY_LENGTH])).is_err());
    }

    #[test]
    fn rejects_padded_key_strings() {
        let padded = format!("{}=", VALID_PRIVATE);
        assert!(decode_private_key(&padded).is_err());
    }

    #[test]
    fn rejects_standard_alphabet_key_strings() {
        let mangled = VALID_PUBLIC.replace('-', "+");
        assert!(decode_public_key(&mangled).is_err());
    }
}
