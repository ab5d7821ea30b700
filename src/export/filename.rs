use sha2::{Digest, Sha256};

/// Extension of the final text document.
pub const OUTPUT_EXT: &str = "md";

/// Maximum length of the sanitized stem, before the hash suffix.
const MAX_STEM_LEN: usize = 120;

/// Deterministic, filesystem-safe output filename:
/// `{sanitized date-key_channel_display-name}--{short_hash(url)}.md`.
///
/// Character substitution alone cannot guarantee two distinct display
/// names never collide, so an 8-hex-char hash of the task URL is appended;
/// a collision then requires identical URLs, whose outputs are identical
/// anyway.
pub fn output_filename(date_key: &str, channel: &str, display_name: &str, url: &str) -> String {
    let stem = sanitize(&format!("{date_key}_{channel}_{display_name}"));
    format!("{stem}--{}.{OUTPUT_EXT}", short_hash(url))
}

fn sanitize(input: &str) -> String {
    let mut cleaned = String::with_capacity(input.len());
    let mut prev_underscore = false;
    for c in input.chars() {
        let mapped = if is_forbidden(c) { '_' } else { c };
        if mapped == '_' {
            if !prev_underscore {
                cleaned.push('_');
            }
            prev_underscore = true;
        } else {
            cleaned.push(mapped);
            prev_underscore = false;
        }
    }
    let mut stem: String = cleaned.trim_matches(&['_', ' ', '.'][..]).to_string();
    if stem.is_empty() {
        stem = "untitled".to_string();
    }
    if stem.len() > MAX_STEM_LEN {
        // Truncate on a char boundary
        let cut = (0..=MAX_STEM_LEN)
            .rev()
            .find(|i| stem.is_char_boundary(*i))
            .unwrap_or(0);
        stem.truncate(cut);
    }
    stem
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn short_hash(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    let mut hex = String::with_capacity(8);
    for byte in digest.iter().take(4) {
        use std::fmt::Write;
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}
