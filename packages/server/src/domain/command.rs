//! Commands typed by chat users.
//!
//! A line of input becomes a [`Command`] (name, flags, arguments), which is
//! then resolved into a closed [`Action`] the dispatcher can execute.

use std::str::FromStr;

use parley_shared::time::message_time;

use super::error::CommandError;

/// Flag selecting a broadcast `send`
pub const FLAG_ALL: &str = "-all";
/// Flag selecting a direct `send`
pub const FLAG_USER: &str = "-user";

/// The set of commands the relay understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    List,
    Bye,
    Send,
}

impl CommandKind {
    /// Flags this command may carry
    pub fn allowed_flags(self) -> &'static [&'static str] {
        match self {
            Self::List | Self::Bye => &[],
            Self::Send => &[FLAG_ALL, FLAG_USER],
        }
    }
}

impl FromStr for CommandKind {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "list" => Ok(Self::List),
            "bye" => Ok(Self::Bye),
            "send" => Ok(Self::Send),
            other => Err(CommandError::UnknownCommand(other.to_string())),
        }
    }
}

/// A structured line of client input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// First token of the line
    pub name: String,
    /// Tokens starting with `-`, in input order
    pub flags: Vec<String>,
    /// Tokens that are not one of the collected flags, in input order
    pub args: Vec<String>,
    /// When the line was received; display only
    pub sent_at: String,
}

impl Command {
    /// Parse one line of input.
    ///
    /// A token is an argument only if it equals none of the collected flags,
    /// so a dash-prefixed word can never be part of a message body.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut tokens = line.split_whitespace();
        let name = tokens.next().ok_or(CommandError::Empty)?.to_string();
        let rest: Vec<&str> = tokens.collect();

        let flags: Vec<String> = rest
            .iter()
            .filter(|token| token.starts_with('-'))
            .map(|token| token.to_string())
            .collect();
        let args = rest
            .iter()
            .filter(|token| !flags.iter().any(|flag| flag == *token))
            .map(|token| token.to_string())
            .collect();

        Ok(Self {
            name,
            flags,
            args,
            sent_at: message_time(),
        })
    }

    /// Validate the command and turn it into an [`Action`].
    pub fn resolve(self) -> Result<Action, CommandError> {
        let kind: CommandKind = self.name.parse()?;

        let allowed = kind.allowed_flags();
        if !self.flags.is_empty() && !self.flags.iter().any(|flag| allowed.contains(&flag.as_str()))
        {
            return Err(CommandError::InvalidFlags {
                command: self.name,
                flags: self.flags,
            });
        }

        match kind {
            CommandKind::List => Ok(Action::List),
            CommandKind::Bye => Ok(Action::Bye),
            CommandKind::Send => {
                let selected = match self.flags.as_slice() {
                    [flag] if flag == FLAG_ALL => Some(FLAG_ALL),
                    [flag] if flag == FLAG_USER => Some(FLAG_USER),
                    _ => None,
                };
                match selected {
                    Some(FLAG_ALL) => Ok(Action::SendAll {
                        message: self.args.join(" "),
                    }),
                    Some(_) => {
                        let mut args = self.args.into_iter();
                        let target = args.next().ok_or(CommandError::MissingTarget)?;
                        Ok(Action::SendUser {
                            target,
                            message: args.collect::<Vec<_>>().join(" "),
                        })
                    }
                    None => Err(CommandError::InvalidFlags {
                        command: self.name,
                        flags: self.flags,
                    }),
                }
            }
        }
    }
}

/// A validated command, ready to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Show the connected peers to the requester
    List,
    /// Leave the chat
    Bye,
    /// Broadcast a message to every peer, requester included
    SendAll { message: String },
    /// Send a message to one named peer
    SendUser { target: String, message: String },
}
