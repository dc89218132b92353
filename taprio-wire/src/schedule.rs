//! Schedule sources.
//!
//! A schedule comes either from a file with one entry per line, or from a single row given as
//! four adjacent tokens. The two are mutually exclusive.
//!
//! # File Format
//!
//! ```text
//! S 01 300000
//! H 02 300000
//! R 04 400000
//! ```
//!
//! Each line holds a command (`S`, `H` or `R`), a hexadecimal gate mask and a decimal interval
//! in nanoseconds. Entries are numbered in file order; the file carries no index.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use crate::entry::{CommandKind, ScheduleEntry};
use crate::error::{Error, Result};
use crate::numeric::{Radix, parse_unsigned};

/// Upper bound on the number of entries in a list, keeping every container within the 16-bit
/// attribute length.
pub const MAX_SCHEDULE_ENTRIES: usize = 1024;

/// The gate control list of a configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Schedule {
    #[default]
    None,
    /// An ordered list, typically read from a schedule file.
    EntryList(Vec<ScheduleEntry>),
    /// One entry with an externally chosen index.
    SingleEntry(ScheduleEntry),
}

impl Schedule {
    /// Whether no schedule was given.
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// The entries of the schedule, in order.
    pub fn entries(&self) -> &[ScheduleEntry] {
        match self {
            Self::None => &[],
            Self::EntryList(entries) => entries,
            Self::SingleEntry(entry) => std::slice::from_ref(entry),
        }
    }
}

/// The raw tokens of a `sched-row`, parsed only once the source is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedRow {
    /// Entry index, decimal.
    pub index: String,
    /// `S`, `H` or `R`.
    pub command: String,
    /// Gate mask, hexadecimal.
    pub gate_mask: String,
    /// Interval in nanoseconds, any base.
    pub interval: String,
}

impl SchedRow {
    pub fn new(
        index: impl Into<String>,
        command: impl Into<String>,
        gate_mask: impl Into<String>,
        interval: impl Into<String>,
    ) -> Self {
        Self {
            index: index.into(),
            command: command.into(),
            gate_mask: gate_mask.into(),
            interval: interval.into(),
        }
    }

    /// Parse the row. Any malformed token fails the whole row.
    pub fn parse(&self) -> Result<ScheduleEntry> {
        Ok(ScheduleEntry {
            index: parse_unsigned("sched-row index", &self.index, Radix::Decimal)?,
            command: CommandKind::parse(&self.command)?,
            gate_mask: parse_unsigned("sched-row gate mask", &self.gate_mask, Radix::Auto)?,
            interval: parse_unsigned("sched-row interval", &self.interval, Radix::Auto)?,
        })
    }
}

/// Resolve the schedule from its possible sources.
///
/// Conflicting sources are rejected before the file is opened or the row parsed.
pub fn resolve(file: Option<&Path>, row: Option<&SchedRow>) -> Result<Schedule> {
    match (file, row) {
        (Some(_), Some(_)) => Err(Error::ConflictingScheduleSource),
        (Some(path), None) => load_file(path).map(Schedule::EntryList),
        (None, Some(row)) => row.parse().map(Schedule::SingleEntry),
        (None, None) => Ok(Schedule::None),
    }
}

/// Read a schedule file. The file is closed before this returns, on every path.
pub fn load_file(path: &Path) -> Result<Vec<ScheduleEntry>> {
    let file = File::open(path).map_err(|source| Error::ScheduleFileUnavailable {
        path: PathBuf::from(path),
        source,
    })?;

    let entries = read_entries(BufReader::new(file))?;
    tracing::debug!(path = %path.display(), entries = entries.len(), "read schedule file");

    Ok(entries)
}

/// Read schedule entries from a line-oriented reader, numbering them from zero.
///
/// Blank lines are skipped. Any bad line aborts the read and discards what was read so far.
pub fn read_entries<R: BufRead>(reader: R) -> Result<Vec<ScheduleEntry>> {
    let mut entries = Vec::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let mut fields = line.split_whitespace();

        let Some(command) = fields.next() else {
            continue;
        };
        let (Some(gate_mask), Some(interval), None) = (fields.next(), fields.next(), fields.next())
        else {
            return Err(Error::MalformedScheduleLine { line: line_no + 1, content: line });
        };

        if entries.len() == MAX_SCHEDULE_ENTRIES {
            return Err(Error::ScheduleTooLarge(entries.len() + 1));
        }

        let entry = ScheduleEntry {
            index: entries.len() as u32,
            command: CommandKind::parse(command)?,
            gate_mask: parse_unsigned("gate mask", gate_mask, Radix::Hex)?,
            interval: parse_unsigned("interval", interval, Radix::Decimal)?,
        };
        tracing::trace!(?entry, "parsed schedule entry");
        entries.push(entry);
    }

    Ok(entries)
}
