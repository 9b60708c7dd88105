//! Markup stripping for feed summaries.

use std::sync::LazyLock;

use regex::Regex;

// Non-greedy and dot-matches-newline, so a tag split across lines is still one tag.
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<.*?>").expect("valid tag regex"));

/// Strip every `<...>` tag and trim surrounding whitespace.
///
/// Entities such as `&amp;` are left as-is. `None` and empty input yield an
/// empty string. Applying it twice gives the same result as applying it once.
#[must_use]
pub fn sanitize(html: Option<&str>) -> String {
    let Some(html) = html else {
        return String::new();
    };
    TAG_RE.replace_all(html, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_returns_empty() {
        assert_eq!(sanitize(None), "");
    }

    #[test]
    fn empty_returns_empty() {
        assert_eq!(sanitize(Some("")), "");
    }

    #[test]
    fn strips_tags_and_trims() {
        assert_eq!(
            sanitize(Some("  <p>Researchers <b>found</b>...</p>\n")),
            "Researchers found..."
        );
    }

    #[test]
    fn strips_tags_spanning_lines() {
        assert_eq!(
            sanitize(Some("<img\n  src=\"a.jpg\"\n/>Caption")),
            "Caption"
        );
    }

    #[test]
    fn leaves_entities_encoded() {
        assert_eq!(sanitize(Some("<p>Tea &amp; biscuits</p>")), "Tea &amp; biscuits");
    }

    #[test]
    fn unmatched_angle_brackets_survive() {
        assert_eq!(sanitize(Some("3 < 5 and 7 > 2")), "3  2");
        assert_eq!(sanitize(Some("a < b")), "a < b");
    }

    #[test]
    fn is_idempotent() {
        let inputs = [
            "",
            "plain text",
            "<p>hello</p>",
            "  <div>\n<p>nested <em>markup</em></p>\n</div>  ",
            "<<a>b>",
            "<a<b>>c",
            "x < y <z> w > v",
            "<a\n<b>>",
            "trailing <",
            "> leading",
            "<p> </p> <br/> text <span>",
        ];
        for input in inputs {
            let once = sanitize(Some(input));
            let twice = sanitize(Some(&once));
            assert_eq!(once, twice, "not idempotent for {input:?}");
        }
    }
}
