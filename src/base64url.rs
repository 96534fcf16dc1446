use base64ct::{Base64UrlUnpadded, Encoding};

use crate::error::WebPushError;

/// Base64url encode bytes without padding.
pub fn base64url_encode(data: &[u8]) -> String {
    Base64UrlUnpadded::encode_string(data)
}

/// Base64url decode a string to bytes.
///
/// Trailing `=` padding is tolerated and stripped; the standard base64
/// alphabet (`+`, `/`) and embedded padding are rejected.
pub fn base64url_decode(s: &str) -> Result<Vec<u8>, WebPushError> {
    let trimmed = s.trim_end_matches('=');
    if trimmed.contains('=') {
        return Err(WebPushError::Base64Decode(
            "embedded padding character".to_string(),
        ));
    }
    Base64UrlUnpadded::decode_vec(trimmed).map_err(|e| WebPushError::Base64Decode(e.to_string()))
}
