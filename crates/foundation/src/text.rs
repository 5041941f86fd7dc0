/// Escapes text for use inside HTML element content or a quoted attribute value.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// First sentence of `body` (up to and including the first `.`), trimmed to
/// at most `max_chars` characters with an ellipsis.
pub fn summary(body: &str, max_chars: usize) -> String {
    let body = body.trim();
    let sentence = match body.find(". ") {
        Some(end) => &body[..=end],
        None => body,
    };
    if sentence.chars().count() <= max_chars {
        return sentence.to_string();
    }
    let mut out: String = sentence.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}
