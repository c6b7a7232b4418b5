//! The `&`-prefixed style mini-language.
//!
//! `&0`-`&9` and `&a`-`&f` select colors, `&l` bold, `&o` italic, `&n`
//! underline, `&m` strikethrough, `&r` resets everything. Code letters are
//! case-insensitive. A color code also clears active formatting. Unknown
//! codes and a trailing lone `&` stay literal.

use serde::Serialize;

/// A run of text with one style applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Span {
    pub text: String,
    /// Hex color, e.g. "#FFAA00". None = default color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<&'static str>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub bold: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub italic: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub underline: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub strikethrough: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Style {
    color: Option<&'static str>,
    bold: bool,
    italic: bool,
    underline: bool,
    strikethrough: bool,
}

/// Parse a raw `&`-coded string into styled spans.
///
/// Empty text runs are dropped, so `"&l&cboom"` yields one span.
pub fn parse_spans(input: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut style = Style::default();
    let mut text = String::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '&' {
            text.push(c);
            continue;
        }

        let Some(&code) = chars.peek() else {
            // Trailing lone '&' is literal
            text.push('&');
            break;
        };

        match apply_code(style, code) {
            Some(next) => {
                chars.next();
                flush(&mut spans, &mut text, style);
                style = next;
            }
            None => {
                // Unknown code: keep '&' literal, code char handled next loop
                text.push('&');
            }
        }
    }

    flush(&mut spans, &mut text, style);
    spans
}

/// Apply one code character to a style, or None if the code is unknown.
fn apply_code(style: Style, code: char) -> Option<Style> {
    if let Some(color) = color_for(code.to_ascii_lowercase()) {
        // Color codes clear active formatting
        return Some(Style {
            color: Some(color),
            ..Style::default()
        });
    }
    match code.to_ascii_lowercase() {
        'l' => Some(Style {
            bold: true,
            ..style
        }),
        'o' => Some(Style {
            italic: true,
            ..style
        }),
        'n' => Some(Style {
            underline: true,
            ..style
        }),
        'm' => Some(Style {
            strikethrough: true,
            ..style
        }),
        'r' => Some(Style::default()),
        _ => None,
    }
}

fn color_for(code: char) -> Option<&'static str> {
    let color = match code {
        '0' => "#000000",
        '1' => "#0000AA",
        '2' => "#00AA00",
        '3' => "#00AAAA",
        '4' => "#AA0000",
        '5' => "#AA00AA",
        '6' => "#FFAA00",
        '7' => "#AAAAAA",
        '8' => "#555555",
        '9' => "#5555FF",
        'a' => "#55FF55",
        'b' => "#55FFFF",
        'c' => "#FF5555",
        'd' => "#FF55FF",
        'e' => "#FFFF55",
        'f' => "#FFFFFF",
        _ => return None,
    };
    Some(color)
}

fn flush(spans: &mut Vec<Span>, text: &mut String, style: Style) {
    if text.is_empty() {
        return;
    }
    spans.push(Span {
        text: std::mem::take(text),
        color: style.color,
        bold: style.bold,
        italic: style.italic,
        underline: style.underline,
        strikethrough: style.strikethrough,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_single_span() {
        let spans = parse_spans("hello");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "hello");
        assert_eq!(spans[0].color, None);
        assert!(!spans[0].bold);
    }

    #[test]
    fn test_color_and_bold() {
        let spans = parse_spans("&6&lGold");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "Gold");
        assert_eq!(spans[0].color, Some("#FFAA00"));
        assert!(spans[0].bold);
    }

    #[test]
    fn test_color_resets_formatting() {
        let spans = parse_spans("&l&cboom");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].color, Some("#FF5555"));
        assert!(!spans[0].bold);
    }

    #[test]
    fn test_reset_code() {
        let spans = parse_spans("&c&lred&rplain");
        assert_eq!(spans.len(), 2);
        assert!(spans[0].bold);
        assert_eq!(spans[1].text, "plain");
        assert_eq!(spans[1].color, None);
        assert!(!spans[1].bold);
    }

    #[test]
    fn test_uppercase_codes() {
        let spans = parse_spans("&A&Lgreen");
        assert_eq!(spans[0].color, Some("#55FF55"));
        assert!(spans[0].bold);
    }

    #[test]
    fn test_unknown_code_literal() {
        let spans = parse_spans("&zodd");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "&zodd");
    }

    #[test]
    fn test_trailing_ampersand_literal() {
        let spans = parse_spans("text&");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "text&");
    }

    #[test]
    fn test_multiple_formats_accumulate() {
        let spans = parse_spans("&n&mdone");
        assert!(spans[0].underline);
        assert!(spans[0].strikethrough);
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_spans("").is_empty());
    }
}
