//! Markup stripping and text sanitisation.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TAG_REGEX: Regex =
        Regex::new(r#"(?s)<!--.*?-->|</?[A-Za-z!?](?:[^>"']|"[^"]*"|'[^']*')*>"#).unwrap();
    static ref ENTITY_REGEX: Regex = Regex::new(r"&(?:lt|gt);").unwrap();
}

/// Removes every markup tag (and comment) from `html`, leaving the text between
/// tags untouched. A `>` inside a quoted attribute value does not end the tag.
pub fn strip_tags(html: &str) -> String {
    TAG_REGEX.replace_all(html, "").into_owned()
}

/// Makes untrusted text safe to persist and later render: tags are stripped,
/// control characters become spaces, whitespace runs collapse and any stray
/// angle brackets are entity-encoded.
pub fn sanitize_text_field(raw: &str) -> String {
    let stripped = strip_tags(raw);

    let spaced: String = stripped
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();

    spaced
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Truncates output of [`sanitize_text_field`] to at most `max` characters
/// without splitting an `&lt;` or `&gt;` entity.
pub fn truncate_sanitized(value: &str, max: usize) -> String {
    let Some((cut, _)) = value.char_indices().nth(max) else {
        return value.to_string();
    };

    let cut = ENTITY_REGEX
        .find_iter(value)
        .find(|entity| entity.start() < cut && cut < entity.end())
        .map_or(cut, |entity| entity.start());

    value[..cut].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_tags_removes_markup() {
        assert_eq!(strip_tags("<b>Hello</b>"), "Hello");
        assert_eq!(
            strip_tags(r#"<p class="intro">Hi <a href="https://example.com">there</a></p>"#),
            "Hi there"
        );
        assert_eq!(strip_tags("line one<br/>line two"), "line oneline two");
    }

    #[test]
    fn test_strip_tags_handles_angle_brackets_in_quoted_attributes() {
        assert_eq!(
            strip_tags(r#"<a title="x>y" href="https://e.com">link</a>"#),
            "link"
        );
        assert_eq!(strip_tags("<img alt='a > b'>caption"), "caption");
        assert_eq!(
            sanitize_text_field(r#"<span data-note="1 > 0">ok</span>"#),
            "ok"
        );
    }

    #[test]
    fn test_strip_tags_keeps_whitespace_between_tags() {
        assert_eq!(
            strip_tags("<ul>\n  <li>one</li>\n  <li>two</li>\n</ul>"),
            "\n  one\n  two\n"
        );
    }

    #[test]
    fn test_strip_tags_removes_comments_and_doctype() {
        assert_eq!(
            strip_tags("<!DOCTYPE html><html><!-- hidden\n note -->Body</html>"),
            "Body"
        );
    }

    #[test]
    fn test_strip_tags_leaves_plain_text_unchanged() {
        for text in ["Hello", "1 < 2 and 3 > 2", "  padded  \n", ""] {
            assert_eq!(strip_tags(text), text);
        }
    }

    #[test]
    fn test_sanitize_text_field() {
        assert_eq!(
            sanitize_text_field("  <script>x</script>Welcome\r\n\tback\u{0}!  "),
            "xWelcome back !"
        );
        assert_eq!(sanitize_text_field("a < b"), "a &lt; b");
        assert_eq!(sanitize_text_field("jane@example.com"), "jane@example.com");
    }

    #[test]
    fn test_truncate_sanitized_never_splits_entities() {
        let sanitized = sanitize_text_field(&format!("{}<x", "a".repeat(510)));

        assert_eq!(truncate_sanitized(&sanitized, 512), "a".repeat(510));
        assert_eq!(truncate_sanitized(&sanitized, 514), format!("{}&lt;", "a".repeat(510)));
        assert_eq!(truncate_sanitized("a &gt; b", 50), "a &gt; b");
        assert_eq!(truncate_sanitized("a & b", 3), "a &");
    }

    #[test]
    fn test_truncate_sanitized_counts_characters() {
        assert_eq!(truncate_sanitized("héllo", 2), "hé");
        assert_eq!(truncate_sanitized("héllo", 5), "héllo");
        assert_eq!(truncate_sanitized("héllo", 50), "héllo");
    }
}
