//! Just enough PNG header reading to report image size.

use std::fmt;

/// The 8 bytes every PNG starts with.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

/// Width and height from the IHDR chunk.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Dimensions {
    /// Pixels wide
    pub width: u32,
    /// Pixels high
    pub height: u32,
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Reads width/height from bytes 16..24, `None` if it doesn't look like a PNG.
pub fn dimensions(bytes: &[u8]) -> Option<Dimensions> {
    if bytes.len() < 24 || bytes[..8] != PNG_SIGNATURE {
        return None;
    }
    let width = u32::from_be_bytes(bytes[16..20].try_into().ok()?);
    let height = u32::from_be_bytes(bytes[20..24].try_into().ok()?);
    Some(Dimensions { width, height })
}

/// `1024x1024`, or `unknown-dimensions`
pub fn describe(bytes: &[u8]) -> String {
    dimensions(bytes)
        .map(|dims| dims.to_string())
        .unwrap_or_else(|| "unknown-dimensions".to_string())
}

#[cfg(test)]
pub(crate) fn header_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = PNG_SIGNATURE.to_vec();
    bytes.extend_from_slice(&13u32.to_be_bytes());
    bytes.extend_from_slice(b"IHDR");
    bytes.extend_from_slice(&width.to_be_bytes());
    bytes.extend_from_slice(&height.to_be_bytes());
    bytes.extend_from_slice(&[8, 6, 0, 0, 0]);
    bytes
}
