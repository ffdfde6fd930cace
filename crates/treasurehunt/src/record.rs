//! Core record type and its fixed-width binary codec.
//!
//! Every treasure occupies exactly [`RECORD_SIZE`] bytes on disk, so a data
//! file is a plain array of records and the record count is
//! `file length / RECORD_SIZE`. The layout is explicit and little-endian;
//! it does not depend on in-memory struct layout, so files written on one
//! build are readable on any other.

use std::fmt;
use std::io::Write;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Width of the owner field on disk, including the NUL terminator.
pub const OWNER_FIELD: usize = 64;

/// Width of the clue field on disk, including the NUL terminator.
pub const CLUE_FIELD: usize = 512;

/// Maximum encodable byte length of an owner name.
pub const OWNER_MAX: usize = OWNER_FIELD - 1;

/// Maximum encodable byte length of a clue.
pub const CLUE_MAX: usize = CLUE_FIELD - 1;

/// The exact on-disk size of one record (600 bytes).
///
/// Layout, little-endian:
///
/// ```text
/// [id: i32]          offset   0, 4 bytes
/// [owner: text]      offset   4, 64 bytes, NUL-terminated, zero-padded
/// [latitude: f64]    offset  68, 8 bytes
/// [longitude: f64]   offset  76, 8 bytes
/// [clue: text]       offset  84, 512 bytes, NUL-terminated, zero-padded
/// [value: i32]       offset 596, 4 bytes
/// ```
pub const RECORD_SIZE: usize = 4 + OWNER_FIELD + 8 + 8 + CLUE_FIELD + 4;

/// A single treasure record.
///
/// `id` is unique within a hunt and assigned by the store; the remaining
/// fields are supplied by the contributor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Treasure {
    /// Identifier, unique within the hunt.
    pub id: i32,
    /// Name of the contributor, at most [`OWNER_MAX`] bytes.
    pub owner: String,
    /// Latitude coordinate. Range is not validated.
    pub latitude: f64,
    /// Longitude coordinate. Range is not validated.
    pub longitude: f64,
    /// Free-form clue text, at most [`CLUE_MAX`] bytes.
    pub clue: String,
    /// Point value of the treasure.
    pub value: i32,
}

impl Treasure {
    /// Encode this record into its fixed-width binary form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FieldTooLong`] if `owner` or `clue` exceeds the
    /// capacity of its field.
    pub fn encode(&self) -> Result<Vec<u8>> {
        check_field("owner", &self.owner, OWNER_MAX)?;
        check_field("clue", &self.clue, CLUE_MAX)?;

        let mut buf = Vec::with_capacity(RECORD_SIZE);
        buf.write_i32::<LittleEndian>(self.id)?;
        write_padded(&mut buf, &self.owner, OWNER_FIELD)?;
        buf.write_f64::<LittleEndian>(self.latitude)?;
        buf.write_f64::<LittleEndian>(self.longitude)?;
        write_padded(&mut buf, &self.clue, CLUE_FIELD)?;
        buf.write_i32::<LittleEndian>(self.value)?;

        debug_assert_eq!(buf.len(), RECORD_SIZE);
        Ok(buf)
    }

    /// Decode one record from a buffer of exactly [`RECORD_SIZE`] bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CorruptRecord`] if the buffer has the wrong length
    /// or a text field is not valid UTF-8. A truncated buffer is never
    /// decoded into a partial record.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() != RECORD_SIZE {
            return Err(Error::corrupt(format!(
                "record block is {} bytes, expected {RECORD_SIZE}",
                buf.len()
            )));
        }

        let mut cursor = &buf[..];
        let id = cursor.read_i32::<LittleEndian>()?;
        let owner = read_padded(&mut cursor, "owner", OWNER_FIELD)?;
        let latitude = cursor.read_f64::<LittleEndian>()?;
        let longitude = cursor.read_f64::<LittleEndian>()?;
        let clue = read_padded(&mut cursor, "clue", CLUE_FIELD)?;
        let value = cursor.read_i32::<LittleEndian>()?;

        Ok(Self {
            id,
            owner,
            latitude,
            longitude,
            clue,
            value,
        })
    }
}

impl fmt::Display for Treasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Treasure ID: {}", self.id)?;
        writeln!(f, "Owner: {}", self.owner)?;
        writeln!(f, "Location: {:.6}, {:.6}", self.latitude, self.longitude)?;
        writeln!(f, "Clue: {}", self.clue)?;
        write!(f, "Value: {}", self.value)
    }
}

fn check_field(field: &'static str, text: &str, max: usize) -> Result<()> {
    let len = text.len();
    if len > max {
        return Err(Error::FieldTooLong { field, len, max });
    }
    Ok(())
}

/// Write `text` followed by zero padding up to `width` bytes.
fn write_padded(buf: &mut Vec<u8>, text: &str, width: usize) -> Result<()> {
    buf.write_all(text.as_bytes())?;
    buf.extend(std::iter::repeat(0u8).take(width - text.len()));
    Ok(())
}

/// Consume `width` bytes from `cursor` and return the text up to the first
/// NUL byte.
fn read_padded(cursor: &mut &[u8], field: &'static str, width: usize) -> Result<String> {
    let (raw, rest) = cursor.split_at(width);
    *cursor = rest;

    let end = raw.iter().position(|&b| b == 0).unwrap_or(width);
    let text = std::str::from_utf8(&raw[..end])
        .map_err(|_| Error::corrupt(format!("{field} field is not valid UTF-8")))?;
    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Treasure {
        Treasure {
            id: 1,
            owner: "alice".to_string(),
            latitude: 40.0,
            longitude: -73.0,
            clue: "under the oak".to_string(),
            value: 100,
        }
    }

    #[test]
    fn test_record_size() {
        assert_eq!(RECORD_SIZE, 600);
        let encoded = sample().encode().unwrap();
        assert_eq!(encoded.len(), RECORD_SIZE);
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let treasure = sample();
        let encoded = treasure.encode().unwrap();
        let decoded = Treasure::decode(&encoded).unwrap();
        assert_eq!(decoded, treasure);
    }

    #[test]
    fn test_round_trip_extreme_values() {
        let treasure = Treasure {
            id: i32::MIN,
            owner: String::new(),
            latitude: f64::MAX,
            longitude: f64::MIN_POSITIVE,
            clue: String::new(),
            value: i32::MAX,
        };
        let decoded = Treasure::decode(&treasure.encode().unwrap()).unwrap();
        assert_eq!(decoded, treasure);
    }

    #[test]
    fn test_round_trip_unicode() {
        let mut treasure = sample();
        treasure.owner = "ålice".to_string();
        treasure.clue = "burièd by the 老橡树 🌳".to_string();
        let decoded = Treasure::decode(&treasure.encode().unwrap()).unwrap();
        assert_eq!(decoded.owner, "ålice");
        assert_eq!(decoded.clue, "burièd by the 老橡树 🌳");
    }

    #[test]
    fn test_owner_at_capacity() {
        let mut treasure = sample();
        treasure.owner = "x".repeat(OWNER_MAX);
        let decoded = Treasure::decode(&treasure.encode().unwrap()).unwrap();
        assert_eq!(decoded.owner.len(), OWNER_MAX);
    }

    #[test]
    fn test_owner_too_long() {
        let mut treasure = sample();
        treasure.owner = "x".repeat(OWNER_MAX + 1);
        let err = treasure.encode().unwrap_err();
        assert!(matches!(
            err,
            Error::FieldTooLong { field: "owner", .. }
        ));
    }

    #[test]
    fn test_clue_at_capacity() {
        let mut treasure = sample();
        treasure.clue = "y".repeat(CLUE_MAX);
        let decoded = Treasure::decode(&treasure.encode().unwrap()).unwrap();
        assert_eq!(decoded.clue.len(), CLUE_MAX);
    }

    #[test]
    fn test_clue_too_long() {
        let mut treasure = sample();
        treasure.clue = "y".repeat(CLUE_MAX + 1);
        let err = treasure.encode().unwrap_err();
        assert!(matches!(err, Error::FieldTooLong { field: "clue", .. }));
    }

    #[test]
    fn test_decode_truncated_buffer() {
        let encoded = sample().encode().unwrap();
        let err = Treasure::decode(&encoded[..RECORD_SIZE - 1]).unwrap_err();
        assert!(matches!(err, Error::CorruptRecord(_)));
    }

    #[test]
    fn test_decode_empty_buffer() {
        let err = Treasure::decode(&[]).unwrap_err();
        assert!(matches!(err, Error::CorruptRecord(_)));
    }

    #[test]
    fn test_decode_invalid_utf8() {
        let mut encoded = sample().encode().unwrap();
        // Stomp the owner field with a lone continuation byte.
        encoded[4] = 0xff;
        let err = Treasure::decode(&encoded).unwrap_err();
        assert!(err.to_string().contains("owner"));
    }

    #[test]
    fn test_display_format() {
        let rendered = sample().to_string();
        assert_eq!(
            rendered,
            "Treasure ID: 1\nOwner: alice\nLocation: 40.000000, -73.000000\nClue: under the oak\nValue: 100"
        );
    }

    #[test]
    fn test_serde_round_trip() {
        let treasure = sample();
        let json = serde_json::to_string(&treasure).unwrap();
        let back: Treasure = serde_json::from_str(&json).unwrap();
        assert_eq!(back, treasure);
    }
}
