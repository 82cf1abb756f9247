//! Terminal presentation of session events
//!
//! [`TerminalPresenter`] is the observer used by the binary. While a reply
//! streams it redraws the whole accumulated text after every chunk, so the
//! user sees it grow in place. Right-to-left profiles are redrawn through
//! the RTL renderer on every update.
//!
//! When output is not a terminal the presenter does not move the cursor:
//! left-to-right replies are written chunk by chunk and right-to-left
//! replies are written once, fully rendered, when the turn completes.

use std::io::Write;

use colored::Colorize;
use crossterm::{cursor, queue, terminal};

use crate::observer::{SessionEvent, SessionObserver};
use crate::profile::{Profile, TextDirection};
use crate::render::render_text;
use crate::session::{Message, Role};

/// Width used when the terminal size is unknown
const FALLBACK_WIDTH: usize = 80;

/// Observer writing a conversation to a terminal
pub struct TerminalPresenter<W: Write + Send> {
    out: W,
    width: Option<usize>,
    redraw: bool,
    echo_user: bool,
    direction: TextDirection,
    drawn_lines: usize,
    streamed_any: bool,
}

impl TerminalPresenter<std::io::Stdout> {
    /// Presenter on stdout, redrawing in place when stdout is a terminal
    pub fn stdout(width: Option<usize>) -> Self {
        use std::io::IsTerminal;
        let redraw = std::io::stdout().is_terminal();
        Self::new(std::io::stdout(), width, redraw)
    }
}

impl<W: Write + Send> TerminalPresenter<W> {
    pub fn new(out: W, width: Option<usize>, redraw: bool) -> Self {
        Self {
            out,
            width,
            redraw,
            echo_user: false,
            direction: TextDirection::Ltr,
            drawn_lines: 0,
            streamed_any: false,
        }
    }

    /// Also print user messages as they are recorded
    ///
    /// The interactive loop leaves this off because the line editor already
    /// shows what was typed.
    pub fn with_echo_user(mut self, echo: bool) -> Self {
        self.echo_user = echo;
        self
    }

    /// Direction used for messages recorded before any reply streams
    pub fn with_direction(mut self, direction: TextDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn width(&self) -> usize {
        let width = self.width.unwrap_or_else(|| {
            terminal::size()
                .map(|(cols, _)| cols as usize)
                .unwrap_or(FALLBACK_WIDTH)
        });
        // Keep one column free so a full line never triggers the terminal's
        // own wrap, which would break the redraw line count
        width.saturating_sub(1).max(1)
    }

    fn role_header(role: Role) -> String {
        match role {
            Role::User => format!("{}", "user".bold().cyan()),
            Role::Assistant => format!("{}", "assistant".bold().green()),
        }
    }

    fn write_lines(&mut self, lines: &[String]) -> std::io::Result<()> {
        write!(self.out, "{}", lines.join("\n"))
    }

    fn erase_drawn(&mut self) -> std::io::Result<()> {
        if self.drawn_lines == 0 {
            return Ok(());
        }
        queue!(self.out, cursor::MoveToColumn(0))?;
        if self.drawn_lines > 1 {
            queue!(self.out, cursor::MoveUp((self.drawn_lines - 1) as u16))?;
        }
        queue!(self.out, terminal::Clear(terminal::ClearType::FromCursorDown))?;
        Ok(())
    }

    fn on_user_message(&mut self, message: &Message, direction: TextDirection) -> std::io::Result<()> {
        if !self.echo_user {
            return Ok(());
        }
        let lines = render_text(&message.content, direction, self.width());
        writeln!(self.out, "{}", Self::role_header(Role::User))?;
        self.write_lines(&lines)?;
        writeln!(self.out)
    }

    fn on_stream_started(&mut self) -> std::io::Result<()> {
        self.drawn_lines = 0;
        self.streamed_any = false;
        writeln!(self.out, "{}", Self::role_header(Role::Assistant))?;
        self.out.flush()
    }

    fn on_stream_updated(
        &mut self,
        chunk: &str,
        accumulated: &str,
        direction: TextDirection,
    ) -> std::io::Result<()> {
        self.streamed_any = true;
        if self.redraw {
            self.erase_drawn()?;
            let lines = render_text(accumulated, direction, self.width());
            self.write_lines(&lines)?;
            self.drawn_lines = lines.len();
        } else if direction == TextDirection::Ltr {
            write!(self.out, "{}", chunk)?;
        }
        self.out.flush()
    }

    fn on_assistant_message(&mut self, message: &Message, direction: TextDirection) -> std::io::Result<()> {
        if !self.redraw && direction == TextDirection::Rtl {
            let lines = render_text(&message.content, direction, self.width());
            self.write_lines(&lines)?;
        }
        writeln!(self.out)?;
        self.drawn_lines = 0;
        self.out.flush()
    }

    fn on_turn_failed(&mut self, error: &str) -> std::io::Result<()> {
        if self.streamed_any {
            writeln!(self.out)?;
        }
        self.drawn_lines = 0;
        writeln!(self.out, "{}", error.red())?;
        self.out.flush()
    }

    fn on_profile_changed(&mut self, profile: &Profile) -> std::io::Result<()> {
        writeln!(
            self.out,
            "\nSwitched to {} ({}). Conversation cleared.",
            profile.colored_tag(),
            profile.text_direction()
        )?;
        writeln!(self.out, "{}\n", profile.placeholder().dimmed())?;
        self.out.flush()
    }
}

impl<W: Write + Send> SessionObserver for TerminalPresenter<W> {
    fn on_event(&mut self, event: &SessionEvent<'_>) {
        let result = match event {
            SessionEvent::MessageAppended(message) => match message.role {
                Role::User => self.on_user_message(message, self.direction),
                Role::Assistant => self.on_assistant_message(message, self.direction),
            },
            SessionEvent::StreamStarted { direction } => {
                self.direction = *direction;
                self.on_stream_started()
            }
            SessionEvent::StreamUpdated {
                chunk,
                accumulated,
                direction,
            } => self.on_stream_updated(chunk, accumulated, *direction),
            SessionEvent::TurnFailed { error } => self.on_turn_failed(error),
            SessionEvent::ProfileChanged(profile) => {
                self.direction = profile.text_direction();
                self.on_profile_changed(profile)
            }
        };

        if let Err(e) = result {
            tracing::debug!("Failed to write to terminal: {}", e);
        }
    }
}
