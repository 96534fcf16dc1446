//! VAPID (RFC 8292) sender assertions.
//!
//! Produces the compact ES256 token and the `Authorization` /
//! `Crypto-Key` header values a push request carries. Claims are
//! serialized in `aud`, `exp`, `sub` order with no whitespace; the
//! signature is raw 64-byte `r || s`, never ASN.1-DER.

use ecdsa::signature::RandomizedSigner;
use p256::ecdsa::Signature;
use p256::elliptic_curve::rand_core::OsRng;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::base64url::base64url_encode;
use crate::error::WebPushError;
use crate::keys::KeyPair;

/// Default assertion lifetime when the caller supplies no expiration: 12 hours.
pub const DEFAULT_EXPIRATION_SECONDS: u64 = 43_200;
/// Push services reject assertions that expire more than 24 hours out.
pub const MAX_EXPIRATION_SECONDS: u64 = 86_400;

/// Fixed token header; identical bytes for every assertion.
const JWT_HEADER: &str = r#"{"typ":"JWT","alg":"ES256"}"#;

/// Claim set of a sender assertion. Field declaration order is the
/// serialized order and participates in the signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub aud: String,
    pub exp: u64,
    pub sub: String,
}

impl Claims {
    /// Build the claim set for one outbound message.
    ///
    /// The audience is the origin of `endpoint`; path and query are
    /// dropped. An explicit `expiration` must lie in
    /// `(now, now + 24h]` and is rejected otherwise, never clamped.
    pub fn build(
        endpoint: &str,
        subject: &str,
        expiration: Option<u64>,
        now: u64,
    ) -> Result<Self, WebPushError> {
        validate_subject(subject)?;
        let aud = audience(endpoint)?;
        let max = now + MAX_EXPIRATION_SECONDS;
        let exp = match expiration {
            Some(expiration) => {
                if expiration <= now || expiration > max {
                    return Err(WebPushError::InvalidExpiration {
                        expiration,
                        now,
                        max,
                    });
                }
                expiration
            }
            None => now + DEFAULT_EXPIRATION_SECONDS,
        };
        Ok(Self {
            aud,
            exp,
            sub: subject.to_string(),
        })
    }
}

/// Sign a claim set as a compact ES256 token.
///
/// ECDSA is randomized per call, so only the header and payload
/// segments are reproducible for identical inputs.
pub fn sign_claims(claims: &Claims, key_pair: &KeyPair) -> Result<String, WebPushError> {
    let payload = serde_json::to_string(claims)
        .map_err(|e| WebPushError::Signing(format!("claims serialization: {}", e)))?;
    let signing_input = format!(
        "{}.{}",
        base64url_encode(JWT_HEADER.as_bytes()),
        base64url_encode(payload.as_bytes())
    );

    let signature: Signature = key_pair
        .signing_key()
        .try_sign_with_rng(&mut OsRng, signing_input.as_bytes())
        .map_err(|e| WebPushError::Signing(e.to_string()))?;

    Ok(format!(
        "{}.{}",
        signing_input,
        base64url_encode(signature.to_bytes().as_slice())
    ))
}

/// Header values carrying the assertion.
///
/// The caller owns merging `crypto_key` with any other `Crypto-Key`
/// parameters (comma-separated) before putting it on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VapidHeaders {
    pub authorization: String,
    pub crypto_key: String,
}

/// Build the `Authorization` and `Crypto-Key` values for one message.
pub fn vapid_headers(
    endpoint: &str,
    subject: &str,
    key_pair: &KeyPair,
    expiration: Option<u64>,
    now: u64,
) -> Result<VapidHeaders, WebPushError> {
    let claims = Claims::build(endpoint, subject, expiration, now)?;
    let token = sign_claims(&claims, key_pair)?;
    Ok(VapidHeaders {
        authorization: format!("WebPush {}", token),
        crypto_key: format!("p256ecdsa={}", key_pair.public_key_base64()),
    })
}

/// Caller-facing VAPID configuration: a subject plus optionally-present
/// base64url key strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VapidConfig {
    pub subject: String,
    #[serde(default)]
    pub public_key: Option<String>,
    #[serde(default)]
    pub private_key: Option<String>,
}

/// Validated sender identity.
#[derive(Clone, Debug)]
pub struct Vapid {
    pub subject: String,
    pub key_pair: KeyPair,
}

impl VapidConfig {
    /// Validate the configuration into usable signing material.
    ///
    /// With both keys absent a fresh pair is generated; supplying only
    /// one of the two is an error rather than a silent fallback.
    pub fn validate(self) -> Result<Vapid, WebPushError> {
        validate_subject(&self.subject)?;
        let key_pair = match (&self.public_key, &self.private_key) {
            (None, None) => KeyPair::generate(),
            (Some(public), Some(private)) => KeyPair::from_base64(public, private)?,
            _ => return Err(WebPushError::IncompleteKeyPair),
        };
        Ok(Vapid {
            subject: self.subject,
            key_pair,
        })
    }
}

impl Vapid {
    pub fn headers(
        &self,
        endpoint: &str,
        expiration: Option<u64>,
        now: u64,
    ) -> Result<VapidHeaders, WebPushError> {
        vapid_headers(endpoint, &self.subject, &self.key_pair, expiration, now)
    }
}

/// `scheme://host[:port]` origin of the push endpoint, port only when
/// non-default for the scheme.
fn audience(endpoint: &str) -> Result<String, WebPushError> {
    let url = Url::parse(endpoint)
        .map_err(|e| WebPushError::InvalidEndpoint(format!("{}: {}", endpoint, e)))?;
    let host = url
        .host()
        .ok_or_else(|| WebPushError::InvalidEndpoint(format!("{}: missing host", endpoint)))?;

    let host = match host {
        url::Host::Domain(domain) => domain.to_string(),
        url::Host::Ipv4(ip) => ip.to_string(),
        url::Host::Ipv6(ip) => format!("[{}]", ip),
    };

    Ok(match url.port() {
        Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
        None => format!("{}://{}", url.scheme(), host),
    })
}

/// A subject identifies the operator: `mailto:` + an email-like
/// address, or an absolute https URL.
fn validate_subject(subject: &str) -> Result<(), WebPushError> {
    if subject.is_empty() {
        return Err(WebPushError::InvalidSubject(subject.to_string()));
    }
    if let Some(address) = subject.strip_prefix("mailto:") {
        let address = address.trim();
        let email_like = address
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
        if email_like {
            return Ok(());
        }
        return Err(WebPushError::InvalidSubject(subject.to_string()));
    }
    match Url::parse(subject) {
        Ok(url) if url.scheme() == "https" && url.has_host() => Ok(()),
        _ => Err(WebPushError::InvalidSubject(subject.to_string())),
    }
}
