//! Taprio attribute numbering, from `<linux/pkt_sched.h>`.
//!
//! These values are the contract with the kernel and must not change.

// TCA_OPTIONS sub-attributes.
/// `struct tc_mqprio_qopt` record.
pub const TCA_TAPRIO_ATTR_PRIOMAP: u16 = 1;
/// Nested list of [`TCA_TAPRIO_SCHED_ENTRY`] records.
pub const TCA_TAPRIO_ATTR_SCHED_ENTRY_LIST: u16 = 2;
/// Schedule base time, `s64` nanoseconds.
pub const TCA_TAPRIO_ATTR_SCHED_BASE_TIME: u16 = 3;
/// Nested container holding exactly one [`TCA_TAPRIO_SCHED_ENTRY`].
pub const TCA_TAPRIO_ATTR_SCHED_SINGLE_ENTRY: u16 = 4;
/// Clock the schedule is referenced to, `s32`.
pub const TCA_TAPRIO_ATTR_SCHED_CLOCKID: u16 = 5;
/// Alignment padding for 64-bit attributes. Never emitted.
pub const TCA_TAPRIO_PAD: u16 = 6;
/// Bitmask of preemptible traffic classes, `u32`.
pub const TCA_TAPRIO_ATTR_PREEMPT_MASK: u16 = 7;
/// Schedule cycle time, `s64` nanoseconds.
pub const TCA_TAPRIO_ATTR_SCHED_CYCLE_TIME: u16 = 8;
/// Schedule cycle time extension, `s64` nanoseconds.
pub const TCA_TAPRIO_ATTR_SCHED_EXTENSION_TIME: u16 = 9;

/// A single schedule entry inside a list or single-entry container.
pub const TCA_TAPRIO_SCHED_ENTRY: u16 = 1;

/// Entry index, `u32`.
pub const TCA_TAPRIO_SCHED_ENTRY_INDEX: u16 = 1;
/// Entry command, one byte (see [`CommandKind`](crate::CommandKind)).
pub const TCA_TAPRIO_SCHED_ENTRY_CMD: u16 = 2;
/// Entry gate mask, `u32`.
pub const TCA_TAPRIO_SCHED_ENTRY_GATE_MASK: u16 = 3;
/// Entry interval, `u32` nanoseconds.
pub const TCA_TAPRIO_SCHED_ENTRY_INTERVAL: u16 = 4;

// From <linux/netlink.h>.
/// Set on attributes whose payload is itself a sequence of attributes.
pub const NLA_F_NESTED: u16 = 1 << 15;
/// Set on attributes whose payload is in network byte order.
pub const NLA_F_NET_BYTEORDER: u16 = 1 << 14;
/// Strips the flag bits from an attribute type.
pub const NLA_TYPE_MASK: u16 = !(NLA_F_NESTED | NLA_F_NET_BYTEORDER);
/// Attribute payloads are padded to this alignment.
pub const NLA_ALIGNTO: usize = 4;
/// Size of the `struct nlattr` header (length + type).
pub const NLA_HEADER_SIZE: usize = 4;

/// Round `len` up to the attribute alignment.
#[inline]
pub const fn nla_align(len: usize) -> usize {
    (len + NLA_ALIGNTO - 1) & !(NLA_ALIGNTO - 1)
}
