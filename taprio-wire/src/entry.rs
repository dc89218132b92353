use std::{fmt, str::FromStr};

use crate::error::{Error, Result};

/// Gate operation performed by a schedule entry.
///
/// The discriminants are the `TC_TAPRIO_CMD_*` values carried on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CommandKind {
    /// Open the gates in the mask and close all others (`S`).
    #[default]
    SetGates = 0,
    /// Set the gates and hold the MAC for preemptible traffic (`H`).
    SetAndHold = 1,
    /// Set the gates and release the MAC for preemptible traffic (`R`).
    SetAndRelease = 2,
}

impl CommandKind {
    /// Every command, in wire order.
    pub const ALL: [Self; 3] = [Self::SetGates, Self::SetAndHold, Self::SetAndRelease];

    /// Parse a command token. Only the exact single-letter tokens are accepted.
    pub fn parse(token: &str) -> Result<Self> {
        match token {
            "S" => Ok(Self::SetGates),
            "H" => Ok(Self::SetAndHold),
            "R" => Ok(Self::SetAndRelease),
            _ => Err(Error::InvalidCommand(token.to_owned())),
        }
    }

    /// The token [`CommandKind::parse`] accepts for this command.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SetGates => "S",
            Self::SetAndHold => "H",
            Self::SetAndRelease => "R",
        }
    }
}

impl FromStr for CommandKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<CommandKind> for u8 {
    fn from(value: CommandKind) -> Self {
        value as u8
    }
}

impl TryFrom<u8> for CommandKind {
    type Error = u8;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::SetGates),
            1 => Ok(Self::SetAndHold),
            2 => Ok(Self::SetAndRelease),
            _ => Err(value),
        }
    }
}

/// One timed instruction of a gate control list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ScheduleEntry {
    /// Position of the entry in its list.
    pub index: u32,
    /// What happens to the gates when the entry starts.
    pub command: CommandKind,
    /// Bit `i` opens the gate of traffic class `i`.
    pub gate_mask: u32,
    /// How long this gate state holds, in nanoseconds.
    pub interval: u32,
}

impl ScheduleEntry {
    /// Create an entry from its four fields.
    pub fn new(index: u32, command: CommandKind, gate_mask: u32, interval: u32) -> Self {
        Self { index, command, gate_mask, interval }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_tokens_round_trip() {
        for command in CommandKind::ALL {
            assert_eq!(CommandKind::parse(command.as_str()).unwrap(), command);
            assert_eq!(CommandKind::try_from(u8::from(command)), Ok(command));
        }
    }

    #[test]
    fn command_parse_is_exact() {
        for token in ["s", "h", "r", "SS", "", " S", "X"] {
            assert!(matches!(CommandKind::parse(token), Err(Error::InvalidCommand(t)) if t == token));
        }
    }

    #[test]
    fn unknown_command_byte() {
        assert_eq!(CommandKind::try_from(3), Err(3));
    }
}
