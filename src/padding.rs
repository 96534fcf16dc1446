//! Record padding for the `aes128gcm` content coding.
//!
//! A message occupies one full record: `[plaintext][0x02][zero fill]`,
//! sized so the record plus the 16-byte AEAD tag equals the record
//! size. Padding to a fixed size hides the payload length from the
//! push service.

use crate::error::WebPushError;

/// Default record size; large enough for any push payload.
pub const DEFAULT_RECORD_SIZE: u32 = 4096;
/// AES-GCM authentication tag length.
pub const TAG_LENGTH: usize = 16;
/// Smallest record that can hold a tag plus a delimiter.
pub const MIN_RECORD_SIZE: u32 = 18;

/// Last-record delimiter separating plaintext from zero fill.
const DELIMITER: u8 = 0x02;

/// Largest plaintext that fits a single record of `record_size`.
pub fn max_plaintext_length(record_size: u32) -> usize {
    record_size as usize - TAG_LENGTH - 1
}

/// Pad plaintext to one full record (delimiter plus zero fill).
pub fn pad(plaintext: &[u8], record_size: u32) -> Result<Vec<u8>, WebPushError> {
    if record_size < MIN_RECORD_SIZE {
        return Err(WebPushError::InvalidRecordSize(record_size));
    }
    let max = max_plaintext_length(record_size);
    if plaintext.len() > max {
        return Err(WebPushError::PayloadTooLarge {
            size: plaintext.len(),
            max,
        });
    }

    let mut padded = vec![0u8; record_size as usize - TAG_LENGTH];
    padded[..plaintext.len()].copy_from_slice(plaintext);
    padded[plaintext.len()] = DELIMITER;
    Ok(padded)
}

/// Strip the zero fill and delimiter from a decrypted record.
pub fn unpad(record: &[u8]) -> Result<Vec<u8>, WebPushError> {
    let delimiter_at = record
        .iter()
        .rposition(|&b| b != 0)
        .ok_or(WebPushError::InvalidPadding)?;
    if record[delimiter_at] != DELIMITER {
        return Err(WebPushError::InvalidPadding);
    }
    Ok(record[..delimiter_at].to_vec())
}
