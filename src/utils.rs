// src/utils.rs
use anyhow::Result;

/// Encode an identifier as a single path segment. ASCII letters, digits and
/// `-` pass through; every other byte becomes `_XX` (uppercase hex), so
/// distinct identifiers never share a segment.
pub fn encode_path_segment(name: &str) -> String {
    if name.is_empty() {
        return "_".to_string();
    }

    let mut encoded = String::with_capacity(name.len());
    for byte in name.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            encoded.push(char::from(byte));
        } else {
            encoded.push_str(&format!("_{:02X}", byte));
        }
    }
    encoded
}

/// Get file extension in lowercase
pub fn get_file_extension(filename: &str) -> Option<String> {
    std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Validate file extension against allowed types
pub fn validate_file_extension(filename: &str, allowed: &[&str]) -> Result<()> {
    let ext = get_file_extension(filename)
        .ok_or_else(|| anyhow::anyhow!("File has no extension: {}", filename))?;

    if !allowed.contains(&ext.as_str()) {
        anyhow::bail!(
            "Unsupported file extension: {}. Allowed: {:?}",
            ext,
            allowed
        );
    }

    Ok(())
}

/// Truncate to `max` characters for table output
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_path_segment() {
        assert_eq!(encode_path_segment("abc-123X"), "abc-123X");
        assert_eq!(encode_path_segment("../etc"), "_2E_2E_2Fetc");
        assert_eq!(encode_path_segment("a/b"), "a_2Fb");
        assert_eq!(encode_path_segment("a_b"), "a_5Fb");
        assert_eq!(encode_path_segment("ö"), "_C3_B6");
        assert_eq!(encode_path_segment(""), "_");
    }

    #[test]
    fn test_encoded_segments_do_not_collide() {
        let ids = ["a/b", "a_b", "a.b", "a b", "a_2Fb", "ab"];
        let encoded: std::collections::HashSet<String> =
            ids.iter().map(|id| encode_path_segment(id)).collect();
        assert_eq!(encoded.len(), ids.len());
        assert!(encoded.iter().all(|seg| !seg.contains('/') && !seg.contains('.')));
    }

    #[test]
    fn test_get_file_extension() {
        assert_eq!(get_file_extension("transcript.PDF"), Some("pdf".to_string()));
        assert_eq!(get_file_extension("noext"), None);
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension("t.pdf", &["pdf"]).is_ok());
        assert!(validate_file_extension("t.docx", &["pdf"]).is_err());
        assert!(validate_file_extension("noext", &["pdf"]).is_err());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Backend Engineer", 10), "Backend...");
        assert_eq!(truncate("Mühendislik Fakültesi", 8), "Mühen...");
    }
}
