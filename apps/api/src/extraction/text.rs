use super::ExtractionError;

const UTF8_BOM: &str = "\u{feff}";

/// Decodes a plain-text upload as UTF-8, dropping a leading byte-order mark.
pub fn decode_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let text = std::str::from_utf8(bytes).map_err(|e| ExtractionError::Encoding(e.to_string()))?;
    Ok(text.strip_prefix(UTF8_BOM).unwrap_or(text).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_plain_utf8() {
        assert_eq!(decode_text("Café owner".as_bytes()).unwrap(), "Café owner");
    }

    #[test]
    fn test_decode_strips_bom() {
        let bytes = b"\xEF\xBB\xBFSkills: Rust";
        assert_eq!(decode_text(bytes).unwrap(), "Skills: Rust");
    }

    #[test]
    fn test_decode_invalid_utf8_errors() {
        let err = decode_text(&[0xff, 0xfe, 0x00]).unwrap_err();
        assert!(matches!(err, ExtractionError::Encoding(_)));
    }
}
