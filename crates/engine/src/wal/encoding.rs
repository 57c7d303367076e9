//! WAL entry encoding and decoding
//!
//! This module provides encoding/decoding for WAL entries with CRC32 checksums
//! for corruption detection.
//!
//! ## Entry Format
//!
//! ```text
//! [length: u32][type: u8][payload: bytes][crc32: u32]
//! ```
//!
//! - **length**: Total size of type + payload + crc (NOT including length itself)
//! - **type**: Entry type tag (1=Commit)
//! - **payload**: MessagePack-serialized WalEntry
//! - **crc32**: CRC32 checksum over \[type\]\[payload\]

use super::WalEntry;
use crc32fast::Hasher;
use folio_core::{Error, Result};

/// Entry type tag for a committed transaction
pub const TYPE_COMMIT: u8 = 1;

/// Smallest valid value of the length field: type(1) + crc(4)
const MIN_ENTRY_LEN: usize = 5;

fn type_tag(entry: &WalEntry) -> u8 {
    match entry {
        WalEntry::Commit { .. } => TYPE_COMMIT,
    }
}

/// Encode WAL entry to bytes
///
/// Format: `[length: u32][type: u8][payload: bytes][crc32: u32]`
pub fn encode_entry(entry: &WalEntry) -> Result<Vec<u8>> {
    let tag = type_tag(entry);
    let payload = rmp_serde::to_vec(entry).map_err(|e| Error::Serialization(e.to_string()))?;

    let total_len = 1 + payload.len() + 4;
    let total_len_u32 = u32::try_from(total_len).map_err(|_| {
        Error::invalid_input(format!("WAL entry too large: {} bytes", total_len))
    })?;

    let mut buf = Vec::with_capacity(4 + total_len);
    buf.extend_from_slice(&total_len_u32.to_le_bytes());
    buf.push(tag);
    buf.extend_from_slice(&payload);

    let mut hasher = Hasher::new();
    hasher.update(&[tag]);
    hasher.update(&payload);
    buf.extend_from_slice(&hasher.finalize().to_le_bytes());

    Ok(buf)
}

/// Decode WAL entry from bytes with CRC validation
///
/// Returns the decoded entry and the number of bytes consumed.
///
/// # Errors
///
/// - `Error::IncompleteEntry` when the buffer ends before the entry does
///   (a torn write at the tail of the log).
/// - `Error::Corruption` with offset information when the length is invalid,
///   the checksum does not match, the payload cannot be decoded, or the type
///   tag disagrees with the decoded entry.
pub fn decode_entry(buf: &[u8], offset: u64) -> Result<(WalEntry, usize)> {
    if buf.len() < 4 {
        return Err(Error::IncompleteEntry {
            offset,
            have: buf.len(),
            needed: 4,
        });
    }
    let total_len = u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]) as usize;

    if total_len < MIN_ENTRY_LEN {
        return Err(Error::Corruption(format!(
            "offset {}: Invalid entry length {} (minimum is {} bytes: type(1) + crc(4))",
            offset, total_len, MIN_ENTRY_LEN
        )));
    }

    if buf.len() < 4 + total_len {
        return Err(Error::IncompleteEntry {
            offset,
            have: buf.len(),
            needed: 4 + total_len,
        });
    }

    let tag = buf[4];
    let payload = &buf[5..4 + total_len - 4];
    let crc_start = 4 + total_len - 4;
    let expected_crc = u32::from_le_bytes([
        buf[crc_start],
        buf[crc_start + 1],
        buf[crc_start + 2],
        buf[crc_start + 3],
    ]);

    let mut hasher = Hasher::new();
    hasher.update(&[tag]);
    hasher.update(payload);
    let actual_crc = hasher.finalize();

    if actual_crc != expected_crc {
        return Err(Error::Corruption(format!(
            "offset {}: CRC mismatch: expected {:08x}, got {:08x}",
            offset, expected_crc, actual_crc
        )));
    }

    let entry: WalEntry = rmp_serde::from_slice(payload).map_err(|e| {
        Error::Corruption(format!("offset {}: Deserialization failed: {}", offset, e))
    })?;

    if type_tag(&entry) != tag {
        return Err(Error::Corruption(format!(
            "offset {}: Type tag {} does not match entry",
            offset, tag
        )));
    }

    Ok((entry, 4 + total_len))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StoredDoc;
    use crate::transaction::Mutation;
    use folio_core::{DocId, Document};
    use serde_json::json;

    fn sample_entry() -> WalEntry {
        let id = DocId::new();
        let mut body = Document::from_value(json!({
            "name": "Ana Gómez",
            "age": 28,
            "favoriteFoods": ["Sushi", "Pizza"]
        }))
        .unwrap();
        body.set_id(id);
        WalEntry::Commit {
            txn_id: 7,
            timestamp: 1_700_000_000_000_000,
            mutations: vec![
                Mutation::Insert {
                    collection: "people".into(),
                    doc: StoredDoc::new(id, body),
                },
                Mutation::Delete {
                    collection: "people".into(),
                    id,
                },
            ],
        }
    }

    #[test]
    fn test_encode_decode_preserves_entry() {
        let entry = sample_entry();
        let bytes = encode_entry(&entry).unwrap();
        let (decoded, consumed) = decode_entry(&bytes, 0).unwrap();
        assert_eq!(decoded, entry);
        assert_eq!(consumed, bytes.len());
    }

    #[test]
    fn test_decode_consumes_only_first_entry() {
        let first = encode_entry(&sample_entry()).unwrap();
        let mut buf = first.clone();
        buf.extend(encode_entry(&sample_entry()).unwrap());

        let (_, consumed) = decode_entry(&buf, 0).unwrap();
        assert_eq!(consumed, first.len());
    }

    #[test]
    fn test_truncated_entry_is_incomplete() {
        let bytes = encode_entry(&sample_entry()).unwrap();

        let err = decode_entry(&bytes[..2], 10).unwrap_err();
        assert!(matches!(err, Error::IncompleteEntry { offset: 10, needed: 4, .. }));

        let err = decode_entry(&bytes[..bytes.len() - 1], 0).unwrap_err();
        assert!(matches!(err, Error::IncompleteEntry { .. }));
    }

    #[test]
    fn test_flipped_payload_bit_is_corruption() {
        let mut bytes = encode_entry(&sample_entry()).unwrap();
        let mid = bytes.len() / 2;
        bytes[mid] ^= 0x01;

        let err = decode_entry(&bytes, 64).unwrap_err();
        assert!(matches!(err, Error::Corruption(msg) if msg.contains("offset 64")));
    }

    #[test]
    fn test_tiny_length_is_corruption() {
        let bytes = 2u32.to_le_bytes();
        let err = decode_entry(&bytes, 0).unwrap_err();
        assert!(matches!(err, Error::Corruption(msg) if msg.contains("Invalid entry length")));
    }
}
