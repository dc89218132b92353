use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

use crate::TC_QOPT_MAX_QUEUE;
use crate::clock::{CLOCKID_INVALID, ClockId};
use crate::error::{Error, Result};
use crate::numeric::{Radix, parse_unsigned};
use crate::schedule::{self, SchedRow, Schedule};

/// A contiguous range of hardware queues serving one traffic class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct QueueRange {
    /// Number of queues.
    pub count: u16,
    /// Index of the first queue.
    pub offset: u16,
}

impl QueueRange {
    /// A range of `count` queues starting at `offset`.
    pub const fn new(count: u16, offset: u16) -> Self {
        Self { count, offset }
    }

    /// Drop trailing `0@0` ranges. On the wire they are indistinguishable from unused slots.
    pub fn trim_unused(queues: &mut Vec<Self>) {
        while queues.last() == Some(&Self::default()) {
            queues.pop();
        }
    }
}

impl FromStr for QueueRange {
    type Err = Error;

    /// Parse the `count@offset` notation.
    fn from_str(s: &str) -> Result<Self> {
        let malformed = || Error::MalformedQueuePair(s.to_owned());

        let (count, offset) = s.split_once('@').ok_or_else(malformed)?;
        Ok(Self {
            count: parse_unsigned("queue count", count, Radix::Decimal).map_err(|_| malformed())?,
            offset: parse_unsigned("queue offset", offset, Radix::Decimal)
                .map_err(|_| malformed())?,
        })
    }
}

/// A complete taprio configuration, as sent to or received from the kernel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleConfig {
    /// Number of traffic classes. Zero leaves the priority map out of the encoding.
    pub num_tc: u8,
    /// Priority to traffic class map.
    pub priority_map: [u8; TC_QOPT_MAX_QUEUE],
    /// Queue ranges, one per traffic class. Never ends in a `0@0` range.
    pub queues: Vec<QueueRange>,
    /// Raw clock id, [`CLOCKID_INVALID`] when unset.
    pub clock_id: i32,
    /// Schedule start, in nanoseconds. Zero is left out of the encoding, as are the other times.
    pub base_time: i64,
    /// Length of one schedule cycle, in nanoseconds.
    pub cycle_time: i64,
    /// How long a gate may stay open past its interval, in nanoseconds.
    pub extension_time: i64,
    /// Bit `i` marks traffic class `i` as preemptible.
    pub preemption_mask: u32,
    /// The gate control list.
    pub schedule: Schedule,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            num_tc: 0,
            priority_map: [0; TC_QOPT_MAX_QUEUE],
            queues: Vec::new(),
            clock_id: CLOCKID_INVALID,
            base_time: 0,
            cycle_time: 0,
            extension_time: 0,
            preemption_mask: 0,
            schedule: Schedule::None,
        }
    }
}

impl ScheduleConfig {
    /// The configured clock, if the raw id is a known one.
    pub fn clock(&self) -> Option<ClockId> {
        ClockId::from_raw(self.clock_id)
    }
}

/// Accumulates options in any order and validates them once in [`ConfigBuilder::build`].
///
/// # Example
///
/// ```
/// use taprio_wire::{ClockId, ConfigBuilder, SchedRow};
///
/// let config = ConfigBuilder::new()
///     .with_num_tc(2)
///     .with_priority_map(&[0, 0, 1, 1])
///     .with_clock_id(ClockId::Tai)
///     .with_sched_row(SchedRow::new("0", "S", "0x3", "1000"))
///     .build()
///     .unwrap();
///
/// assert_eq!(config.schedule.entries().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    num_tc: u8,
    priority_map: Vec<u8>,
    queues: Vec<QueueRange>,
    clock_ids: Vec<ClockId>,
    base_time: i64,
    cycle_time: i64,
    extension_time: i64,
    preemption: Option<Vec<bool>>,
    sched_file: Option<PathBuf>,
    sched_row: Option<SchedRow>,
}

impl ConfigBuilder {
    /// An empty builder; [`build`](Self::build) on it yields the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of traffic classes.
    pub fn with_num_tc(mut self, num_tc: u8) -> Self {
        self.num_tc = num_tc;
        self
    }

    /// Set the leading priorities of the map. The remaining ones map to class 0.
    pub fn with_priority_map(mut self, map: &[u8]) -> Self {
        self.priority_map = map.to_vec();
        self
    }

    /// Set the queue range of each traffic class, in class order.
    pub fn with_queues(mut self, queues: Vec<QueueRange>) -> Self {
        self.queues = queues;
        self
    }

    /// Set the reference clock. Setting it more than once is an error at build time.
    pub fn with_clock_id(mut self, clock_id: ClockId) -> Self {
        self.clock_ids.push(clock_id);
        self
    }

    /// Set the schedule start, in nanoseconds on the configured clock.
    pub fn with_base_time(mut self, base_time: i64) -> Self {
        self.base_time = base_time;
        self
    }

    /// Set the cycle length in nanoseconds.
    pub fn with_cycle_time(mut self, cycle_time: i64) -> Self {
        self.cycle_time = cycle_time;
        self
    }

    /// Set the cycle extension in nanoseconds.
    pub fn with_extension_time(mut self, extension_time: i64) -> Self {
        self.extension_time = extension_time;
        self
    }

    /// One flag per traffic class, in class order.
    pub fn with_preemption(mut self, flags: Vec<bool>) -> Self {
        self.preemption = Some(flags);
        self
    }

    /// Read the schedule from this file at build time.
    pub fn with_sched_file(mut self, path: impl AsRef<Path>) -> Self {
        self.sched_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Use a single schedule row. Conflicts with [`with_sched_file`](Self::with_sched_file).
    pub fn with_sched_row(mut self, row: SchedRow) -> Self {
        self.sched_row = Some(row);
        self
    }

    /// Validate the accumulated options and resolve the schedule.
    ///
    /// The schedule file, if any, is only read after every other check has passed.
    pub fn build(self) -> Result<ScheduleConfig> {
        let clock_id = match self.clock_ids.as_slice() {
            [] => CLOCKID_INVALID,
            [clock] => clock.as_raw(),
            _ => return Err(Error::DuplicateClockId),
        };

        if usize::from(self.num_tc) > TC_QOPT_MAX_QUEUE {
            return Err(Error::TooManyTrafficClasses(self.num_tc));
        }
        if self.queues.len() > TC_QOPT_MAX_QUEUE {
            return Err(Error::TooManyQueues(self.queues.len()));
        }
        if self.priority_map.len() > TC_QOPT_MAX_QUEUE {
            return Err(Error::TooManyPriorities(self.priority_map.len()));
        }

        let preemption_mask = match &self.preemption {
            None => 0,
            Some(flags) if flags.len() != usize::from(self.num_tc) => {
                return Err(Error::PreemptionCount {
                    expected: usize::from(self.num_tc),
                    actual: flags.len(),
                })
            }
            Some(flags) => flags
                .iter()
                .enumerate()
                .filter(|(_, enabled)| **enabled)
                .fold(0u32, |mask, (tc, _)| mask | (1 << tc)),
        };

        let schedule = schedule::resolve(self.sched_file.as_deref(), self.sched_row.as_ref())?;

        let mut priority_map = [0; TC_QOPT_MAX_QUEUE];
        priority_map[..self.priority_map.len()].copy_from_slice(&self.priority_map);

        let mut queues = self.queues;
        QueueRange::trim_unused(&mut queues);

        Ok(ScheduleConfig {
            num_tc: self.num_tc,
            priority_map,
            queues,
            clock_id,
            base_time: self.base_time,
            cycle_time: self.cycle_time,
            extension_time: self.extension_time,
            preemption_mask,
            schedule,
        })
    }
}
