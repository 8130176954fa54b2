//! Command parsing for the line console.
//!
//! This module parses input lines into structured [`Command`] values. Numeric
//! overlay fields are passed through as typed so the console reports
//! malformed numbers the same way for every frontend.

use marquee_app::Input;
use marquee_core::{DraftField, OverlayForm};
use marquee_proto::OverlayId;

/// Parsed command from one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start streaming from a source.
    Start {
        /// Source feed address.
        url: String,
    },

    /// Reload the playing stream's overlays.
    Refresh,

    /// Create an overlay.
    Add {
        /// Raw fields as typed.
        form: OverlayForm,
    },

    /// Flip an overlay's visibility.
    Toggle {
        /// Overlay to flip.
        id: OverlayId,
    },

    /// Delete an overlay.
    Delete {
        /// Overlay to delete.
        id: OverlayId,
    },

    /// Open an overlay in the editor.
    Edit {
        /// Overlay to edit.
        id: OverlayId,
    },

    /// Change a field of the open draft.
    Set {
        /// Field to change.
        field: DraftField,
        /// Raw value.
        value: String,
    },

    /// Commit the open draft.
    Save,

    /// Discard the open draft.
    Cancel,

    /// Print the console again.
    List,

    /// Show which overlays cover a point.
    At {
        /// Horizontal offset.
        x: u32,
        /// Vertical offset.
        y: u32,
    },

    /// Print the command summary.
    Help,

    /// Quit the application.
    Quit,

    /// Blank line.
    Empty,

    /// Unknown or invalid command.
    Unknown {
        /// The original input.
        input: String,
    },

    /// Command with missing or invalid arguments.
    InvalidArgs {
        /// Command name.
        command: String,
        /// Error message.
        error: String,
    },
}

impl Command {
    /// Runtime input for this command, or `None` for commands the terminal
    /// answers itself.
    pub fn into_input(self) -> Option<Input> {
        match self {
            Self::Start { url } => Some(Input::StartStream { rtsp_url: url }),
            Self::Refresh => Some(Input::Refresh),
            Self::Add { form } => Some(Input::Create(form)),
            Self::Toggle { id } => Some(Input::ToggleVisibility(id)),
            Self::Delete { id } => Some(Input::Delete(id)),
            Self::Edit { id } => Some(Input::OpenEditor(id)),
            Self::Set { field, value } => Some(Input::SetField { field, value }),
            Self::Save => Some(Input::CommitEdit),
            Self::Cancel => Some(Input::CancelEdit),
            Self::List => Some(Input::Redraw),
            Self::At { x, y } => Some(Input::Inspect { x, y }),
            Self::Quit => Some(Input::Quit),
            Self::Help | Self::Empty | Self::Unknown { .. } | Self::InvalidArgs { .. } => None,
        }
    }
}

/// Command summary printed by `help`.
pub const HELP: &str = "\
commands:
  start <rtsp_url>                           start a stream
  refresh                                    reload overlays
  add <top> <left> <width> <height> <text>   create an overlay
  toggle <id>                                show or hide an overlay
  delete <id>                                delete an overlay
  edit <id>                                  open an overlay in the editor
  set <text|top|left|width|height> <value>   change the open draft
  save | cancel                              commit or discard the draft
  list                                       print overlays
  at <x> <y>                                 overlays under a point
  quit                                       leave";

/// Parse one input line into a command.
pub fn parse(input: &str) -> Command {
    let input = input.trim();
    if input.is_empty() {
        return Command::Empty;
    }

    let (command, rest) = match input.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (input, ""),
    };
    let parts: Vec<&str> = rest.split_whitespace().collect();

    match command {
        "start" => match parts.as_slice() {
            [url] => Command::Start { url: (*url).to_string() },
            _ => usage("start", "start <rtsp_url>"),
        },

        "refresh" => Command::Refresh,

        "add" => match parts.as_slice() {
            [top, left, width, height, _, ..] => {
                // Text is everything after the fourth field, spacing kept.
                let text = nth_rest(rest, 4);
                Command::Add {
                    form: OverlayForm {
                        text: text.to_string(),
                        top: (*top).to_string(),
                        left: (*left).to_string(),
                        width: (*width).to_string(),
                        height: (*height).to_string(),
                    },
                }
            },
            _ => usage("add", "add <top> <left> <width> <height> <text>"),
        },

        "toggle" => with_id(&parts, "toggle", |id| Command::Toggle { id }),
        "delete" | "rm" => with_id(&parts, "delete", |id| Command::Delete { id }),
        "edit" => with_id(&parts, "edit", |id| Command::Edit { id }),

        "set" => match parts.first() {
            Some(name) if parts.len() > 1 => match DraftField::from_name(name) {
                Some(field) => Command::Set { field, value: nth_rest(rest, 1).to_string() },
                None => Command::InvalidArgs {
                    command: "set".into(),
                    error: format!("Unknown field {name:?}"),
                },
            },
            _ => usage("set", "set <text|top|left|width|height> <value>"),
        },

        "save" => Command::Save,
        "cancel" => Command::Cancel,
        "list" | "ls" => Command::List,

        "at" => match parts.as_slice() {
            [x, y] => match (x.parse::<u32>(), y.parse::<u32>()) {
                (Ok(x), Ok(y)) => Command::At { x, y },
                _ => Command::InvalidArgs { command: "at".into(), error: "Invalid point".into() },
            },
            _ => usage("at", "at <x> <y>"),
        },

        "help" | "?" => Command::Help,
        "quit" | "q" => Command::Quit,

        _ => Command::Unknown { input: input.to_string() },
    }
}

fn usage(command: &str, usage: &str) -> Command {
    Command::InvalidArgs { command: command.into(), error: format!("Usage: {usage}") }
}

fn with_id(parts: &[&str], command: &str, build: impl FnOnce(OverlayId) -> Command) -> Command {
    match parts {
        [id] => build(OverlayId::new(*id)),
        _ => usage(command, &format!("{command} <id>")),
    }
}

/// `rest` with its first `n` whitespace-separated words removed.
fn nth_rest(rest: &str, n: usize) -> &str {
    let mut remaining = rest.trim_start();
    for _ in 0..n {
        remaining = match remaining.split_once(char::is_whitespace) {
            Some((_, tail)) => tail.trim_start(),
            None => "",
        };
    }
    remaining
}
