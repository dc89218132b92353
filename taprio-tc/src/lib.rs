//! # taprio-tc
//!
//! The command-line side of taprio configuration: [`args`] turns `tc`-style option tokens into a
//! validated [`taprio_wire::ScheduleConfig`], and [`request`] wraps its encoding into the
//! `RTM_NEWQDISC` message that installs the qdisc through [`rtnetlink`].
#![doc(issue_tracker_base_url = "https://github.com/chainbound/msg-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub mod args;
pub mod request;

pub use request::{QdiscTaprioRequest, QdiscTarget, parse_handle};
