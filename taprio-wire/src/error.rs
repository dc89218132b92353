use std::{io, path::PathBuf};

/// Errors produced while building, encoding or decoding a taprio configuration.
///
/// Every variant is terminal for the current invocation: nothing is retried and no partial
/// configuration is ever returned alongside an error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Both a schedule file and a single schedule row were given.
    #[error("specifying both \"sched-file\" and \"sched-row\" is not allowed")]
    ConflictingScheduleSource,
    /// The schedule file could not be opened.
    #[error("could not open schedule file {}: {source}", path.display())]
    ScheduleFileUnavailable {
        /// The path as given.
        path: PathBuf,
        /// Why opening failed.
        #[source]
        source: io::Error,
    },
    /// A command token other than `S`, `H` or `R`, or an unknown command byte on the wire.
    #[error("invalid schedule entry command: {0:?}")]
    InvalidCommand(String),
    /// A token that does not parse as the integer the field expects.
    #[error("illegal {field}: {token:?}")]
    MalformedNumericToken {
        /// The option or field being parsed.
        field: &'static str,
        /// The offending token.
        token: String,
    },
    /// A queue range not in `count@offset` notation.
    #[error("illegal queue pair {0:?}, expected count@offset")]
    MalformedQueuePair(String),
    /// A clock name that does not match any [`ClockId`](crate::ClockId).
    #[error("illegal value for \"clockid\": {0:?}, it must be a valid SYS-V id (i.e. CLOCK_TAI)")]
    UnknownClockId(String),
    /// The clock id was set more than once.
    #[error("\"clockid\" given more than once")]
    DuplicateClockId,
    /// A decoded buffer has no priority map attribute.
    #[error("missing priority map attribute")]
    MissingPriorityMap,
    /// `num_tc` above [`TC_QOPT_MAX_QUEUE`](crate::TC_QOPT_MAX_QUEUE).
    #[error("num_tc {0} exceeds the maximum of {max}", max = crate::TC_QOPT_MAX_QUEUE)]
    TooManyTrafficClasses(u8),
    /// More priority map entries than priorities.
    #[error("{0} priorities exceed the maximum of {max}", max = crate::TC_QOPT_MAX_QUEUE)]
    TooManyPriorities(usize),
    /// More queue ranges than traffic classes can have.
    #[error("{0} queue ranges exceed the maximum of {max}", max = crate::TC_QOPT_MAX_QUEUE)]
    TooManyQueues(usize),
    /// The number of preemption flags differs from `num_tc`.
    #[error("preemption needs one flag per traffic class: expected {expected}, got {actual}")]
    PreemptionCount {
        /// The configured `num_tc`.
        expected: usize,
        /// The number of flags given.
        actual: usize,
    },
    /// A schedule with more than [`MAX_SCHEDULE_ENTRIES`](crate::MAX_SCHEDULE_ENTRIES) entries.
    #[error("{0} schedule entries exceed the maximum of {max}", max = crate::MAX_SCHEDULE_ENTRIES)]
    ScheduleTooLarge(usize),
    /// A single-entry container that does not hold exactly one entry.
    #[error("single-entry schedule holds {0} entries, expected exactly one")]
    SingleEntryCount(usize),
    /// A schedule file line that is not `<command> <gate mask> <interval>`.
    #[error("malformed schedule line {line}: {content:?}")]
    MalformedScheduleLine {
        /// 1-based line number.
        line: usize,
        /// The line as read.
        content: String,
    },
    /// An attribute header that is truncated or claims more bytes than remain.
    #[error("malformed attribute at offset {offset}")]
    MalformedAttribute {
        /// Byte offset of the header within the attribute sequence being walked.
        offset: usize,
    },
    /// A scalar attribute shorter than its type.
    #[error("attribute {kind} too short: expected {expected} bytes, got {actual}")]
    TruncatedAttribute {
        /// Attribute type, flags stripped.
        kind: u16,
        /// Size of the scalar type.
        expected: usize,
        /// Payload length found.
        actual: usize,
    },
    /// An attribute whose length does not fit the 16-bit netlink length field.
    #[error("attribute {kind} is {len} bytes, more than a netlink attribute can carry")]
    AttributeTooLarge {
        /// Attribute type as written, flags included.
        kind: u16,
        /// Length including the header.
        len: usize,
    },
    /// Reading a schedule file failed after it was opened.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Result alias for [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
