// Status content sanitizer
//
// Mastodon delivers status bodies as HTML. The timeline only needs readable
// text, so this is a byte scanner with two states rather than an HTML
// parser:
//
//   [Text] ──'<'──▶ [InTag] ──'>'──▶ [Text]
//
// - In Text, six named entities are decoded and everything else is copied.
// - Entering a tag that starts with `<br` emits a newline.
// - Every `<p` after the first emits a blank line; the first is absorbed.
// - A tag ends at its next '>' byte. Quotes are not tracked, so a '>' inside
//   an attribute value ends the tag early.

/// Entities decoded in text; anything else starting with '&' is copied as is
const ENTITIES: &[(&[u8], u8)] = &[
    (b"&amp;", b'&'),
    (b"&lt;", b'<'),
    (b"&gt;", b'>'),
    (b"&quot;", b'"'),
    (b"&apos;", b'\''),
    (b"&#39;", b'\''),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Text,
    InTag,
}

/// Strip markup from a status `content` field
pub fn sanitize(html: &str) -> String {
    let src = html.as_bytes();
    let mut out = Vec::with_capacity(src.len());
    let mut state = ScanState::Text;
    let mut paragraphs = 0usize;
    let mut i = 0;

    while i < src.len() {
        let rest = &src[i..];
        let byte = rest[0];

        if byte == b'<' {
            state = ScanState::InTag;
        }

        match state {
            ScanState::InTag => {
                if rest.starts_with(b"<br") {
                    out.push(b'\n');
                }
                if rest.starts_with(b"<p") {
                    paragraphs += 1;
                    if paragraphs >= 2 {
                        out.extend_from_slice(b"\n\n");
                    }
                }
            }
            ScanState::Text if byte == b'&' => {
                if let Some((name, ch)) = ENTITIES.iter().find(|(name, _)| rest.starts_with(name)) {
                    out.push(*ch);
                    i += name.len();
                    continue;
                }
                out.push(byte);
            }
            ScanState::Text => out.push(byte),
        }

        if byte == b'>' {
            state = ScanState::Text;
        }
        i += 1;
    }

    // Only ASCII bytes are ever dropped, so this is valid UTF-8 whenever the
    // input was.
    match String::from_utf8(out) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paragraphs_and_entities() {
        assert_eq!(sanitize("<p>A&amp;B</p><p>C</p>"), "A&B\n\nC");
    }

    #[test]
    fn first_paragraph_is_absorbed() {
        assert_eq!(sanitize("<p>only</p>"), "only");
    }

    #[test]
    fn third_paragraph_also_gets_blank_line() {
        assert_eq!(sanitize("<p>a</p><p>b</p><p>c</p>"), "a\n\nb\n\nc");
    }

    #[test]
    fn br_variants_emit_newline() {
        assert_eq!(sanitize("a<br>b<br/>c<br />d"), "a\nb\nc\nd");
    }

    #[test]
    fn all_six_entities_decode() {
        assert_eq!(
            sanitize("&amp;&lt;&gt;&quot;&apos;&#39;"),
            "&<>\"''"
        );
    }

    #[test]
    fn unknown_entities_pass_through() {
        assert_eq!(sanitize("a &nbsp; b &copy;"), "a &nbsp; b &copy;");
        assert_eq!(sanitize("AT&T"), "AT&T");
    }

    #[test]
    fn links_keep_their_text() {
        let html = r#"<p>see <a href="https://example.com" rel="nofollow"><span class="invisible">https://</span><span>example.com</span></a></p>"#;
        assert_eq!(sanitize(html), "see https://example.com");
    }

    #[test]
    fn quoted_gt_ends_tag_early() {
        // The scanner does not track quotes: the '>' inside the attribute
        // ends the tag and the remainder of the attribute leaks as text.
        assert_eq!(sanitize(r#"<a title="x>y">z</a>"#), r#"y">z"#);
    }

    #[test]
    fn pre_counts_as_paragraph() {
        assert_eq!(sanitize("<p>a</p><pre>b</pre>"), "a\n\nb");
    }

    #[test]
    fn multibyte_text_survives() {
        assert_eq!(sanitize("<p>日本語 &amp; 🔃</p>"), "日本語 & 🔃");
    }

    #[test]
    fn bare_gt_in_text_is_kept() {
        assert_eq!(sanitize("a > b"), "a > b");
    }
}
