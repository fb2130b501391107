use crate::error::ImageError;

/// Byte order of a raw program image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum ByteOrder {
    /// Least-significant byte first.
    Little,
    /// Most-significant byte first.
    #[default]
    Big,
}

/// Converts a raw byte image into 16-bit words.
///
/// # Errors
///
/// Returns [`ImageError::OddLength`] when `bytes` does not hold a whole
/// number of words.
pub fn words_from_bytes(bytes: &[u8], order: ByteOrder) -> Result<Vec<u16>, ImageError> {
    if !bytes.len().is_multiple_of(2) {
        return Err(ImageError::OddLength { len: bytes.len() });
    }

    Ok(bytes
        .chunks_exact(2)
        .map(|pair| {
            let pair = [pair[0], pair[1]];
            match order {
                ByteOrder::Little => u16::from_le_bytes(pair),
                ByteOrder::Big => u16::from_be_bytes(pair),
            }
        })
        .collect())
}
