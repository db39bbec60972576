//! Text decoding for comment input.

use std::borrow::Cow;

const BOM: char = '\u{feff}';

/// Decodes raw input bytes to text.
///
/// Valid UTF-8 is returned as is. Anything else is decoded as Windows-1252,
/// the single-byte superset of ISO-8859-1, which maps every byte to a
/// character, so decoding never fails.
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(err) => {
            tracing::debug!(
                valid_up_to = err.valid_up_to(),
                "input is not UTF-8, decoding as windows-1252"
            );
            let (text, _) = encoding_rs::WINDOWS_1252.decode_without_bom_handling(bytes);
            text
        }
    }
}

/// Removes a leading byte order mark.
pub fn strip_bom(text: &str) -> &str {
    text.strip_prefix(BOM).unwrap_or(text)
}

/// Decodes file or argument bytes into trimmed comment content.
pub fn normalize_content(bytes: &[u8]) -> String {
    strip_bom(&decode_text(bytes)).trim().to_string()
}
