use bytes::Bytes;

use crate::TC_QOPT_MAX_QUEUE;
use crate::attr::*;
use crate::config::ScheduleConfig;
use crate::entry::ScheduleEntry;
use crate::error::{Error, Result};
use crate::nla::NlaWriter;
use crate::qopt::MqprioQopt;
use crate::schedule::{MAX_SCHEDULE_ENTRIES, Schedule};

/// Encode a configuration into the attributes carried by the qdisc's `TCA_OPTIONS`.
///
/// Attributes are written in a fixed order and only when they carry information: the priority
/// map when `num_tc > 0`, the preemption mask and the three times when non-zero. The clock id is
/// always written, even when unset.
///
/// A configuration produced by [`ConfigBuilder`](crate::ConfigBuilder) or [`decode`](crate::decode)
/// always encodes. One assembled by hand fails with [`Error::ScheduleTooLarge`] when its schedule
/// has more than [`MAX_SCHEDULE_ENTRIES`] entries, since the container could not hold them.
pub fn encode(config: &ScheduleConfig) -> Result<Bytes> {
    let entries = config.schedule.entries().len();
    if entries > MAX_SCHEDULE_ENTRIES {
        return Err(Error::ScheduleTooLarge(entries));
    }

    let mut writer = NlaWriter::new();

    if config.num_tc > 0 {
        writer.put(TCA_TAPRIO_ATTR_PRIOMAP, &priomap(config).to_bytes());
    }

    if config.preemption_mask != 0 {
        writer.put_u32(TCA_TAPRIO_ATTR_PREEMPT_MASK, config.preemption_mask);
    }

    if config.base_time != 0 {
        writer.put_i64(TCA_TAPRIO_ATTR_SCHED_BASE_TIME, config.base_time);
    }

    if config.cycle_time != 0 {
        writer.put_i64(TCA_TAPRIO_ATTR_SCHED_CYCLE_TIME, config.cycle_time);
    }

    if config.extension_time != 0 {
        writer.put_i64(TCA_TAPRIO_ATTR_SCHED_EXTENSION_TIME, config.extension_time);
    }

    writer.put_i32(TCA_TAPRIO_ATTR_SCHED_CLOCKID, config.clock_id);

    match &config.schedule {
        Schedule::None => {}
        Schedule::EntryList(entries) => {
            let mut list = writer.nest(TCA_TAPRIO_ATTR_SCHED_ENTRY_LIST | NLA_F_NESTED);
            for entry in entries {
                put_entry(&mut list, entry);
            }
        }
        Schedule::SingleEntry(entry) => {
            let mut single = writer.nest(TCA_TAPRIO_ATTR_SCHED_SINGLE_ENTRY | NLA_F_NESTED);
            put_entry(&mut single, entry);
        }
    }

    let bytes = writer.finish()?;
    tracing::debug!(len = bytes.len(), num_tc = config.num_tc, entries, "encoded taprio options");

    Ok(bytes)
}

fn priomap(config: &ScheduleConfig) -> MqprioQopt {
    let mut qopt = MqprioQopt {
        num_tc: config.num_tc,
        prio_tc_map: config.priority_map,
        ..Default::default()
    };
    for (tc, queue) in config.queues.iter().take(TC_QOPT_MAX_QUEUE).enumerate() {
        qopt.count[tc] = queue.count;
        qopt.offset[tc] = queue.offset;
    }
    qopt
}

fn put_entry(writer: &mut NlaWriter, entry: &ScheduleEntry) {
    let mut nest = writer.nest(TCA_TAPRIO_SCHED_ENTRY);
    nest.put_u32(TCA_TAPRIO_SCHED_ENTRY_INDEX, entry.index);
    nest.put_u8(TCA_TAPRIO_SCHED_ENTRY_CMD, entry.command.into());
    nest.put_u32(TCA_TAPRIO_SCHED_ENTRY_GATE_MASK, entry.gate_mask);
    nest.put_u32(TCA_TAPRIO_SCHED_ENTRY_INTERVAL, entry.interval);
}
