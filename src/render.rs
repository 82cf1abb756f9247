//! Conversation rendering
//!
//! Pure projection of messages into display lines. Left-to-right profiles
//! get plain wrapped text. Right-to-left profiles get every line wrapped in a
//! Unicode right-to-left isolate and right-aligned to the display width, so
//! a terminal with bidi support lays the text out right-to-left and a
//! partial streamed reply is never shown left-aligned.
//!
//! Nothing in this module performs I/O; the presenter decides where the
//! lines go.

use crate::profile::TextDirection;
use crate::session::{Message, Role};
use unicode_width::UnicodeWidthStr;

/// RIGHT-TO-LEFT ISOLATE
pub const RLI: char = '\u{2067}';
/// POP DIRECTIONAL ISOLATE
pub const PDI: char = '\u{2069}';

/// Narrowest width a message is wrapped to
const MIN_WIDTH: usize = 8;

/// A message projected into display lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub role: Role,
    pub direction: TextDirection,
    pub lines: Vec<String>,
}

impl RenderedMessage {
    /// All lines joined with newlines
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Render a block of text for the given direction
///
/// Always returns at least one line, so empty or partial content renders
/// without special cases.
///
/// # Examples
///
/// ```
/// use chatline::profile::TextDirection;
/// use chatline::render::{is_rtl_formatted, render_text};
///
/// let lines = render_text("hello", TextDirection::Ltr, 40);
/// assert_eq!(lines, vec!["hello".to_string()]);
///
/// let lines = render_text("مرحبا", TextDirection::Rtl, 40);
/// assert!(lines.iter().all(|l| is_rtl_formatted(l)));
/// ```
pub fn render_text(text: &str, direction: TextDirection, width: usize) -> Vec<String> {
    let width = width.max(MIN_WIDTH);
    let mut lines: Vec<String> = textwrap::wrap(text, width)
        .into_iter()
        .map(|line| line.into_owned())
        .collect();
    if lines.is_empty() {
        lines.push(String::new());
    }

    match direction {
        TextDirection::Ltr => lines,
        TextDirection::Rtl => lines
            .into_iter()
            .map(|line| rtl_line(&line, width))
            .collect(),
    }
}

fn rtl_line(line: &str, width: usize) -> String {
    let pad = width.saturating_sub(UnicodeWidthStr::width(line));
    format!("{}{}{}{}", " ".repeat(pad), RLI, line, PDI)
}

/// Render a single message
pub fn render_message(message: &Message, direction: TextDirection, width: usize) -> RenderedMessage {
    RenderedMessage {
        role: message.role,
        direction,
        lines: render_text(&message.content, direction, width),
    }
}

/// Render a whole conversation in order
///
/// A trailing user message without a reply (a failed turn) is rendered
/// like any other message.
pub fn render_conversation(
    messages: &[Message],
    direction: TextDirection,
    width: usize,
) -> Vec<RenderedMessage> {
    messages
        .iter()
        .map(|m| render_message(m, direction, width))
        .collect()
}

/// Whether a rendered line carries right-to-left formatting
pub fn is_rtl_formatted(line: &str) -> bool {
    let body = line.trim_start_matches(' ');
    body.starts_with(RLI) && body.ends_with(PDI)
}
