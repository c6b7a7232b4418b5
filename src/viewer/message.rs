//! Wire protocol between the service and viewer clients.
//!
//! Inbound (client to server), JSON with a `type` discriminator:
//!
//! ```json
//! {"type": "hello", "name": "Steve", "world": "nether", "health": 20.0, ...}
//! {"type": "context", "name": "Steve", "health": 12.5, ...}
//! ```
//!
//! Outbound: one `display` message per rendered panel, or `clear` when the
//! panel is disabled.

use serde::{Deserialize, Serialize};

use crate::board::DisplayState;
use crate::render::{ClientContext, Span, parse_spans};

/// Message received from a viewer client.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientMessage {
    /// First message after connect, registers the client
    Hello(ClientContext),
    /// Subsequent context update
    Context(ClientContext),
}

impl ClientMessage {
    pub fn parse(text: &str) -> Option<Self> {
        serde_json::from_str(text).ok()
    }
}

/// Styled text: the raw `&`-coded string plus its parsed spans.
#[derive(Debug, Serialize)]
pub struct StyledText {
    pub text: String,
    pub spans: Vec<Span>,
}

impl StyledText {
    fn from_raw(text: String) -> Self {
        let spans = parse_spans(&text);
        Self { text, spans }
    }
}

/// One body line on the wire.
#[derive(Debug, Serialize)]
pub struct WireLine {
    #[serde(flatten)]
    pub styled: StyledText,
    pub score: i32,
}

/// Message sent to a viewer client.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerMessage {
    Display {
        title: StyledText,
        lines: Vec<WireLine>,
        seq: u64,
    },
    Clear,
}

impl ServerMessage {
    /// Build a display message from a rendered state.
    pub fn display(state: &DisplayState) -> Self {
        Self::Display {
            title: StyledText::from_raw(state.title.clone()),
            lines: state
                .lines
                .iter()
                .map(|line| WireLine {
                    styled: StyledText::from_raw(line.text.clone()),
                    score: line.score,
                })
                .collect(),
            seq: state.seq,
        }
    }

    pub fn clear() -> Self {
        Self::Clear
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::DisplayLine;

    #[test]
    fn test_parse_hello() {
        let msg = ClientMessage::parse(r#"{"type":"hello","name":"Steve","level":3}"#).unwrap();
        match msg {
            ClientMessage::Hello(ctx) => {
                assert_eq!(ctx.name, "Steve");
                assert_eq!(ctx.level, 3);
                // Unspecified fields fall back to defaults
                assert_eq!(ctx.food, 20);
            }
            _ => panic!("expected hello"),
        }
    }

    #[test]
    fn test_parse_context_update() {
        let msg = ClientMessage::parse(r#"{"type":"context","name":"Steve","health":4.5}"#);
        assert!(matches!(msg, Some(ClientMessage::Context(_))));
    }

    #[test]
    fn test_parse_rejects_unknown_type() {
        assert!(ClientMessage::parse(r#"{"type":"page","path":"/"}"#).is_none());
        assert!(ClientMessage::parse("not json").is_none());
    }

    #[test]
    fn test_display_message_json() {
        let state = DisplayState {
            client: "Steve".to_string(),
            title: "&6Title".to_string(),
            lines: vec![DisplayLine {
                text: "&7hi".to_string(),
                score: 1,
            }],
            seq: 9,
        };

        let json = ServerMessage::display(&state).to_json();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "display");
        assert_eq!(value["seq"], 9);
        assert_eq!(value["title"]["text"], "&6Title");
        assert_eq!(value["title"]["spans"][0]["color"], "#FFAA00");
        assert_eq!(value["lines"][0]["score"], 1);
    }

    #[test]
    fn test_clear_message_json() {
        let json = ServerMessage::clear().to_json();
        assert_eq!(json, r#"{"type":"clear"}"#);
    }
}
