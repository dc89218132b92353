//! # taprio-wire
//!
//! Encoding and decoding of the netlink attributes that configure a Linux `taprio`
//! (time-aware priority shaper) qdisc.
//!
//! A [`ScheduleConfig`] is built with a [`ConfigBuilder`], which validates the options and
//! resolves the gate control list from a schedule file or a single row. [`encode`] turns it into
//! the payload of the qdisc's `TCA_OPTIONS` attribute, and [`decode`] parses such a payload
//! back.
//!
//! ```text
//! TCA_OPTIONS
//! ├── PRIOMAP               struct tc_mqprio_qopt      (num_tc > 0)
//! ├── PREEMPT_MASK          u32                        (non-zero)
//! ├── SCHED_BASE_TIME       s64                        (non-zero)
//! ├── SCHED_CYCLE_TIME      s64                        (non-zero)
//! ├── SCHED_EXTENSION_TIME  s64                        (non-zero)
//! ├── SCHED_CLOCKID         s32                        (always)
//! └── SCHED_ENTRY_LIST | SCHED_SINGLE_ENTRY            (nested)
//!     └── ENTRY                                        (nested)
//!         ├── INDEX         u32
//!         ├── CMD           u8
//!         ├── GATE_MASK     u32
//!         └── INTERVAL      u32
//! ```
#![doc(issue_tracker_base_url = "https://github.com/chainbound/msg-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub mod attr;
pub mod clock;
pub mod config;
mod decode;
mod display;
mod encode;
pub mod entry;
mod error;
pub mod nla;
pub mod numeric;
pub mod qopt;
pub mod schedule;

pub use clock::{CLOCKID_INVALID, ClockId};
pub use config::{ConfigBuilder, QueueRange, ScheduleConfig};
pub use decode::decode;
pub use encode::encode;
pub use entry::{CommandKind, ScheduleEntry};
pub use error::{Error, Result};
pub use schedule::{MAX_SCHEDULE_ENTRIES, SchedRow, Schedule};

/// Maximum number of traffic classes, priorities and queue ranges (`TC_QOPT_MAX_QUEUE`).
pub const TC_QOPT_MAX_QUEUE: usize = 16;
