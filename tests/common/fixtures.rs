//! Synthetic media payloads for upload tests.
//!
//! The server only sniffs magic numbers, so a correct signature plus padding
//! is enough to stand in for real files.

/// Minimal payload recognized as image/png.
pub fn png_bytes() -> Vec<u8> {
    let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.extend_from_slice(&[0u8; 56]);
    bytes
}

/// Minimal payload recognized as video/mp4.
pub fn mp4_bytes() -> Vec<u8> {
    let mut bytes = vec![0x00, 0x00, 0x00, 0x20];
    bytes.extend_from_slice(b"ftypisom");
    bytes.extend_from_slice(&[0u8; 52]);
    bytes
}

/// A payload no sniffer recognizes.
pub fn garbage_bytes() -> Vec<u8> {
    b"this is not any known media container".to_vec()
}
