//! Unverified decoding of compact `header.payload.signature` credentials.
//!
//! The signature segment is never checked. A decoded [`ClaimSet`] is a routing hint for
//! deciding which page to show; it is not proof of identity and must not authorize any
//! state change. Only the identity authority that issued the token can verify it.

use base64ct::{Base64, Encoding};

use super::{claims::ClaimSet, error::DecodeError};

const SEGMENT_DELIMITER: char = '.';

/// Decode the payload segment of a compact token into a [`ClaimSet`].
///
/// # Errors
///
/// Returns an error if the token does not have exactly three segments, or if the payload
/// is not base64url encoded UTF-8 JSON object text matching the claim schema.
pub fn decode(raw: &str) -> Result<ClaimSet, DecodeError> {
    let segments: Vec<&str> = raw.split(SEGMENT_DELIMITER).collect();
    let [_, payload, _] = segments.as_slice() else {
        return Err(DecodeError::Segments(segments.len()));
    };

    let bytes =
        Base64::decode_vec(&to_standard_alphabet(payload)).map_err(|_| DecodeError::Base64)?;
    let text = std::str::from_utf8(&bytes).map_err(|_| DecodeError::Utf8)?;

    let value: serde_json::Value = serde_json::from_str(text)?;
    if !value.is_object() {
        return Err(DecodeError::NotAnObject);
    }

    Ok(serde_json::from_value(value)?)
}

/// Map the URL-safe alphabet onto the standard one and restore `=` padding.
fn to_standard_alphabet(segment: &str) -> String {
    let mut standard: String = segment
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    let padding = (4 - standard.len() % 4) % 4;
    standard.extend(std::iter::repeat('=').take(padding));
    standard
}
