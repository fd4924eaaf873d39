//! Inline span parser: Markdown links, bare URLs and bold spans.
//!
//! Single left-to-right pass; the three patterns are alternatives of one regex, so the
//! earliest match wins and matched contents are taken literally (no nesting).

use std::sync::LazyLock;

use regex::Regex;

static INLINE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\[(?P<label>[^\]]+)\]\((?P<target>[^)\s]+)\)|(?P<url>https?://\S+)|\*\*(?P<bold>[^*]+)\*\*",
    )
    .expect("inline span pattern is valid")
});

/// Sentence punctuation that is not part of a bare URL when it trails it.
const URL_TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')'];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpanKind {
    Plain,
    Bold,
    Link { url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub kind: SpanKind,
}

impl Span {
    fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            kind: SpanKind::Plain,
        }
    }
}

/// Splits a line into styled spans. Adjacent plain text is merged and empty segments dropped.
pub fn parse_spans(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut cursor = 0;

    for caps in INLINE_PATTERN.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        push_plain(&mut spans, &text[cursor..whole.start()]);

        if let (Some(label), Some(target)) = (caps.name("label"), caps.name("target")) {
            spans.push(Span {
                text: label.as_str().to_string(),
                kind: SpanKind::Link {
                    url: target.as_str().to_string(),
                },
            });
        } else if let Some(url) = caps.name("url") {
            let raw = url.as_str();
            let trimmed = raw.trim_end_matches(URL_TRAILING_PUNCTUATION);
            if trimmed.contains("://") && !trimmed.ends_with("://") {
                spans.push(Span {
                    text: trimmed.to_string(),
                    kind: SpanKind::Link {
                        url: trimmed.to_string(),
                    },
                });
                push_plain(&mut spans, &raw[trimmed.len()..]);
            } else {
                push_plain(&mut spans, raw);
            }
        } else if let Some(bold) = caps.name("bold") {
            spans.push(Span {
                text: bold.as_str().to_string(),
                kind: SpanKind::Bold,
            });
        }

        cursor = whole.end();
    }

    push_plain(&mut spans, &text[cursor..]);
    spans
}

/// Appends plain text, merging it into a preceding plain span.
fn push_plain(spans: &mut Vec<Span>, text: &str) {
    if text.is_empty() {
        return;
    }
    match spans.last_mut() {
        Some(last) if last.kind == SpanKind::Plain => last.text.push_str(text),
        _ => spans.push(Span::plain(text)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(text: &str, url: &str) -> Span {
        Span {
            text: text.to_string(),
            kind: SpanKind::Link {
                url: url.to_string(),
            },
        }
    }

    fn bold(text: &str) -> Span {
        Span {
            text: text.to_string(),
            kind: SpanKind::Bold,
        }
    }

    #[test]
    fn test_plain_text_is_single_span() {
        assert_eq!(parse_spans("Just text"), vec![Span::plain("Just text")]);
    }

    #[test]
    fn test_bold_item_and_link() {
        assert_eq!(
            parse_spans("**Bold** item [link](http://x.test)"),
            vec![bold("Bold"), Span::plain(" item "), link("link", "http://x.test")]
        );
    }

    #[test]
    fn test_bare_url_strips_trailing_punctuation() {
        assert_eq!(
            parse_spans("See https://jane.dev/work. Thanks"),
            vec![
                Span::plain("See "),
                link("https://jane.dev/work", "https://jane.dev/work"),
                Span::plain(". Thanks"),
            ]
        );
    }

    #[test]
    fn test_bare_url_in_parentheses() {
        assert_eq!(
            parse_spans("(https://x.test)"),
            vec![
                Span::plain("("),
                link("https://x.test", "https://x.test"),
                Span::plain(")"),
            ]
        );
    }

    #[test]
    fn test_markdown_link_target_is_not_reparsed_as_bare_url() {
        let spans = parse_spans("[GitHub](https://github.com/jane)");
        assert_eq!(spans, vec![link("GitHub", "https://github.com/jane")]);
    }

    #[test]
    fn test_unclosed_bold_stays_plain() {
        assert_eq!(parse_spans("**not closed"), vec![Span::plain("**not closed")]);
    }

    #[test]
    fn test_multiple_bold_spans() {
        assert_eq!(
            parse_spans("**A** and **B**"),
            vec![bold("A"), Span::plain(" and "), bold("B")]
        );
    }

    #[test]
    fn test_bare_scheme_only_is_plain() {
        assert_eq!(parse_spans("http://."), vec![Span::plain("http://.")]);
    }
}
