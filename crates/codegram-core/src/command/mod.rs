//! Command grammar: a fixed table of slash commands.
//!
//! The first whitespace-delimited token, case-insensitive, names the
//! command. Everything after it is the argument string.

pub mod router;

/// Character that marks text as a command rather than a message.
pub const COMMAND_PREFIX: char = '/';

/// The commands the gateway understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Start,
    Help,
    Sessions,
    NewSession,
    Projects,
    NewProject,
    Project,
}

/// One row of the dispatch table.
#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
    pub name: &'static str,
    pub kind: CommandKind,
    /// Whether the handler receives the argument string.
    pub args_required: bool,
}

pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec { name: "/start", kind: CommandKind::Start, args_required: false },
    CommandSpec { name: "/help", kind: CommandKind::Help, args_required: false },
    CommandSpec { name: "/sessions", kind: CommandKind::Sessions, args_required: false },
    CommandSpec { name: "/newsession", kind: CommandKind::NewSession, args_required: false },
    CommandSpec { name: "/projects", kind: CommandKind::Projects, args_required: false },
    CommandSpec { name: "/newproject", kind: CommandKind::NewProject, args_required: true },
    CommandSpec { name: "/project", kind: CommandKind::Project, args_required: true },
];

/// Inbound text split into command token and arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand<'a> {
    /// Lowercased command token, any `@botname` suffix removed.
    pub name: String,
    /// Trimmed remainder; empty when absent.
    pub args: &'a str,
}

/// Split `text` into a command token and its arguments.
///
/// Returns `None` for text that does not start with [`COMMAND_PREFIX`].
pub fn parse(text: &str) -> Option<ParsedCommand<'_>> {
    let text = text.trim_start();
    if !text.starts_with(COMMAND_PREFIX) {
        return None;
    }

    let (token, rest) = match text.find(char::is_whitespace) {
        Some(idx) => (&text[..idx], &text[idx..]),
        None => (text, ""),
    };

    // Group chats address commands as "/help@SomeBot".
    let token = token.split('@').next().unwrap_or(token);

    Some(ParsedCommand {
        name: token.to_lowercase(),
        args: rest.trim(),
    })
}

/// Find the table row for a parsed command token.
pub fn lookup(name: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|spec| spec.name == name)
}
