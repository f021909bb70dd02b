//! Console commands.
//!
//! Each line typed on the user list screen parses into one [`Command`],
//! which maps onto exactly one controller intent.

use thiserror::Error;

use crate::domain::{EditableField, RecordId};

/// Documentation for one command, shown by `help`.
#[derive(Debug, Clone)]
pub struct CommandHelp {
    /// Usage line.
    pub usage: &'static str,
    /// Short aliases.
    pub aliases: &'static str,
    /// What it does.
    pub description: &'static str,
}

impl CommandHelp {
    /// Returns help for every command.
    pub fn all() -> Vec<CommandHelp> {
        vec![
            CommandHelp {
                usage: "next",
                aliases: "n",
                description: "Go to the next page",
            },
            CommandHelp {
                usage: "prev",
                aliases: "p",
                description: "Go to the previous page",
            },
            CommandHelp {
                usage: "reload",
                aliases: "r",
                description: "Fetch the current page again",
            },
            CommandHelp {
                usage: "search [text]",
                aliases: "/",
                description: "Filter this page by name or email; no text clears",
            },
            CommandHelp {
                usage: "edit <id>",
                aliases: "e",
                description: "Edit a user in place",
            },
            CommandHelp {
                usage: "set <first|last|email> <value>",
                aliases: "s",
                description: "Change a field of the user being edited",
            },
            CommandHelp {
                usage: "save",
                aliases: "w",
                description: "Save the user being edited",
            },
            CommandHelp {
                usage: "cancel",
                aliases: "c",
                description: "Discard the edit",
            },
            CommandHelp {
                usage: "delete <id>",
                aliases: "d",
                description: "Delete a user",
            },
            CommandHelp {
                usage: "dismiss",
                aliases: "x",
                description: "Clear notifications",
            },
            CommandHelp {
                usage: "logout",
                aliases: "",
                description: "Sign out",
            },
            CommandHelp {
                usage: "help",
                aliases: "?",
                description: "Show this list",
            },
            CommandHelp {
                usage: "quit",
                aliases: "q",
                description: "Exit",
            },
        ]
    }

    /// Renders the help table.
    pub fn render() -> String {
        Self::all()
            .iter()
            .map(|help| {
                let aliases = if help.aliases.is_empty() {
                    String::new()
                } else {
                    format!("({})", help.aliases)
                };
                format!("  {:<32} {:<5} {}", help.usage, aliases, help.description)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// One user intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    NextPage,
    PreviousPage,
    Reload,
    Search(String),
    Edit(RecordId),
    Set(EditableField, String),
    Save,
    Cancel,
    Delete(RecordId),
    Dismiss,
    Logout,
    Help,
    Quit,
}

/// Why a line did not parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("type a command, or `help`")]
    Empty,
    #[error("unknown command `{0}`; type `help`")]
    Unknown(String),
    #[error("`{command}` needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
    #[error("`{0}` is not a user id")]
    InvalidId(String),
    #[error("unknown field `{0}`; use first, last or email")]
    UnknownField(String),
}

impl Command {
    /// Parses one input line.
    pub fn parse(line: &str) -> Result<Command, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Err(CommandError::Empty);
        }

        // `/text` searches without a space.
        if let Some(term) = line.strip_prefix('/') {
            return Ok(Command::Search(term.trim().to_string()));
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_lowercase().as_str() {
            "next" | "n" => Ok(Command::NextPage),
            "prev" | "previous" | "p" => Ok(Command::PreviousPage),
            "reload" | "r" => Ok(Command::Reload),
            "search" => Ok(Command::Search(rest.to_string())),
            "edit" | "e" => Ok(Command::Edit(parse_id("edit", rest)?)),
            "delete" | "d" => Ok(Command::Delete(parse_id("delete", rest)?)),
            "set" | "s" => parse_set(rest),
            "save" | "w" => Ok(Command::Save),
            "cancel" | "c" => Ok(Command::Cancel),
            "dismiss" | "x" => Ok(Command::Dismiss),
            "logout" | "signout" => Ok(Command::Logout),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn parse_id(command: &'static str, arg: &str) -> Result<RecordId, CommandError> {
    if arg.is_empty() {
        return Err(CommandError::MissingArgument {
            command,
            argument: "a user id",
        });
    }
    arg.parse::<u64>()
        .map(RecordId::from)
        .map_err(|_| CommandError::InvalidId(arg.to_string()))
}

fn parse_set(rest: &str) -> Result<Command, CommandError> {
    let (name, value) = match rest.split_once(char::is_whitespace) {
        Some((name, value)) => (name, value.trim()),
        None => (rest, ""),
    };
    if name.is_empty() {
        return Err(CommandError::MissingArgument {
            command: "set",
            argument: "a field and a value",
        });
    }
    let field =
        EditableField::parse(name).ok_or_else(|| CommandError::UnknownField(name.to_string()))?;
    // An empty value is allowed: fields are free-form.
    Ok(Command::Set(field, value.to_string()))
}
