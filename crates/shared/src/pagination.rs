//! Cursor-based pagination utilities.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

/// Error type for cursor operations.
#[derive(Debug, Error)]
pub enum CursorError {
    #[error("Invalid cursor format")]
    InvalidFormat,
    #[error("Invalid cursor encoding")]
    InvalidEncoding,
    #[error("Invalid timestamp in cursor")]
    InvalidTimestamp,
    #[error("Invalid ID in cursor")]
    InvalidId,
}

/// Encodes a cursor from a timestamp and record ID.
///
/// The cursor format is base64(RFC3339_timestamp:uuid). The composite keeps
/// ordering stable when multiple records share a timestamp.
pub fn encode_cursor(timestamp: DateTime<Utc>, id: Uuid) -> String {
    let raw = format!(
        "{}:{}",
        timestamp.to_rfc3339_opts(chrono::SecondsFormat::Micros, true),
        id
    );
    URL_SAFE_NO_PAD.encode(raw.as_bytes())
}

/// Decodes a cursor into its timestamp and record ID.
pub fn decode_cursor(cursor: &str) -> Result<(DateTime<Utc>, Uuid), CursorError> {
    let decoded = URL_SAFE_NO_PAD
        .decode(cursor)
        .map_err(|_| CursorError::InvalidEncoding)?;

    let s = String::from_utf8(decoded).map_err(|_| CursorError::InvalidFormat)?;

    // UUIDs are 36 chars; the timestamp portion contains colons of its own.
    let colon_pos = s
        .len()
        .checked_sub(37)
        .filter(|&p| s.as_bytes().get(p) == Some(&b':'))
        .ok_or(CursorError::InvalidFormat)?;

    let timestamp_str = &s[..colon_pos];
    let id_str = &s[colon_pos + 1..];

    let id = Uuid::parse_str(id_str).map_err(|_| CursorError::InvalidId)?;

    let timestamp = DateTime::parse_from_rfc3339(timestamp_str)
        .map_err(|_| CursorError::InvalidTimestamp)?
        .with_timezone(&Utc);

    Ok((timestamp, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_encode_decode_cursor_roundtrip() {
        let timestamp = Utc.with_ymd_and_hms(2025, 3, 10, 7, 15, 0).unwrap();
        let id = Uuid::new_v4();

        let cursor = encode_cursor(timestamp, id);
        let (decoded_ts, decoded_id) = decode_cursor(&cursor).unwrap();

        assert_eq!(decoded_ts, timestamp);
        assert_eq!(decoded_id, id);
    }

    #[test]
    fn test_decode_invalid_base64() {
        assert!(matches!(
            decode_cursor("not-valid-base64!!!"),
            Err(CursorError::InvalidEncoding)
        ));
    }

    #[test]
    fn test_decode_missing_separator() {
        let cursor = URL_SAFE_NO_PAD.encode(b"garbage-without-structure");
        assert!(decode_cursor(&cursor).is_err());
    }

    #[test]
    fn test_decode_invalid_uuid() {
        let cursor = URL_SAFE_NO_PAD.encode(
            format!(
                "{}:{}",
                Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true),
                "not-a-uuid-but-is-36-characters-long"
            )
            .as_bytes(),
        );
        assert!(matches!(decode_cursor(&cursor), Err(CursorError::InvalidId)));
    }

    #[test]
    fn test_decode_invalid_timestamp() {
        let id = Uuid::new_v4();
        let cursor = URL_SAFE_NO_PAD.encode(format!("not-a-timestamp:{}", id).as_bytes());
        assert!(matches!(
            decode_cursor(&cursor),
            Err(CursorError::InvalidTimestamp)
        ));
    }
}
