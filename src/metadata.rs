//! Frame-0 descriptor: filename, original plaintext size, media type, and
//! whether the payload is wrapped in an encryption envelope.
//!
//! Wire layout: `u32 nameLen | UTF-8 filename | u32 origSize | u32 mimeLen |
//! UTF-8 mime | u8 encryptedFlag`, all integers little-endian.

use byteorder::{ByteOrder, LittleEndian};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("metadata payload shorter than declared: {0}")]
    Truncated(&'static str),
    #[error("metadata string is not valid UTF-8")]
    InvalidUtf8,
}

/// The frame-0 descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    pub name: String,
    pub original_size: u32,
    pub mime: String,
    pub encrypted: bool,
}

/// Serialize a metadata descriptor into a packet payload.
pub fn encode_metadata(meta: &FileMetadata) -> Vec<u8> {
    let name_bytes = meta.name.as_bytes();
    let mime_bytes = meta.mime.as_bytes();

    let mut out = Vec::with_capacity(4 + name_bytes.len() + 4 + 4 + mime_bytes.len() + 1);

    let mut len_buf = [0u8; 4];
    LittleEndian::write_u32(&mut len_buf, name_bytes.len() as u32);
    out.extend_from_slice(&len_buf);
    out.extend_from_slice(name_bytes);

    LittleEndian::write_u32(&mut len_buf, meta.original_size);
    out.extend_from_slice(&len_buf);

    LittleEndian::write_u32(&mut len_buf, mime_bytes.len() as u32);
    out.extend_from_slice(&len_buf);
    out.extend_from_slice(mime_bytes);

    out.push(meta.encrypted as u8);
    out
}

/// Parse a metadata descriptor out of a frame-0 payload.
pub fn decode_metadata(payload: &[u8]) -> Result<FileMetadata, MetadataError> {
    let mut offset = 0usize;

    let name_len = read_u32(payload, &mut offset, "name length")? as usize;
    let name = read_string(payload, &mut offset, name_len)?;

    let original_size = read_u32(payload, &mut offset, "original size")?;

    let mime_len = read_u32(payload, &mut offset, "mime length")? as usize;
    let mime = read_string(payload, &mut offset, mime_len)?;

    let encrypted_flag = *payload
        .get(offset)
        .ok_or(MetadataError::Truncated("encrypted flag"))?;

    Ok(FileMetadata {
        name,
        original_size,
        mime,
        encrypted: encrypted_flag != 0,
    })
}

fn read_u32(payload: &[u8], offset: &mut usize, field: &'static str) -> Result<u32, MetadataError> {
    let end = offset.checked_add(4).ok_or(MetadataError::Truncated(field))?;
    let slice = payload.get(*offset..end).ok_or(MetadataError::Truncated(field))?;
    *offset = end;
    Ok(LittleEndian::read_u32(slice))
}

fn read_string(payload: &[u8], offset: &mut usize, len: usize) -> Result<String, MetadataError> {
    let end = offset.checked_add(len).ok_or(MetadataError::Truncated("string"))?;
    let slice = payload.get(*offset..end).ok_or(MetadataError::Truncated("string"))?;
    *offset = end;
    String::from_utf8(slice.to_vec()).map_err(|_| MetadataError::InvalidUtf8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let meta = FileMetadata {
            name: "a.bin".to_string(),
            original_size: 256,
            mime: "application/octet-stream".to_string(),
            encrypted: false,
        };
        let payload = encode_metadata(&meta);
        let decoded = decode_metadata(&payload).unwrap();
        assert_eq!(decoded, meta);
    }

    #[test]
    fn roundtrip_encrypted() {
        let meta = FileMetadata {
            name: "secret.txt".to_string(),
            original_size: 11,
            mime: "text/plain".to_string(),
            encrypted: true,
        };
        let payload = encode_metadata(&meta);
        let decoded = decode_metadata(&payload).unwrap();
        assert!(decoded.encrypted);
    }

    #[test]
    fn empty_name_and_mime() {
        let meta = FileMetadata {
            name: String::new(),
            original_size: 0,
            mime: String::new(),
            encrypted: false,
        };
        let payload = encode_metadata(&meta);
        let decoded = decode_metadata(&payload).unwrap();
        assert_eq!(decoded, meta);
    }

    #[test]
    fn truncated_payload_is_malformed() {
        let meta = FileMetadata {
            name: "file.txt".to_string(),
            original_size: 42,
            mime: "text/plain".to_string(),
            encrypted: false,
        };
        let mut payload = encode_metadata(&meta);
        payload.truncate(payload.len() - 3);
        assert!(decode_metadata(&payload).is_err());
    }

    #[test]
    fn non_utf8_name_is_rejected() {
        let mut payload = Vec::new();
        payload.extend_from_slice(&2u32.to_le_bytes());
        payload.extend_from_slice(&[0xFF, 0xFE]); // invalid UTF-8
        payload.extend_from_slice(&0u32.to_le_bytes());
        payload.extend_from_slice(&0u32.to_le_bytes());
        payload.push(0);
        assert!(matches!(decode_metadata(&payload), Err(MetadataError::InvalidUtf8)));
    }
}
