use crate::attr::*;
use crate::config::{QueueRange, ScheduleConfig};
use crate::entry::{CommandKind, ScheduleEntry};
use crate::error::{Error, Result};
use crate::nla::{Nla, NlaIter};
use crate::qopt::{MQPRIO_QOPT_LEN, MqprioQopt};
use crate::schedule::{MAX_SCHEDULE_ENTRIES, Schedule};

/// Decode the attributes of a qdisc's `TCA_OPTIONS` into a configuration.
///
/// The priority map is mandatory. Every other attribute is optional and decodes to its default
/// when absent. Unknown attribute types are skipped.
pub fn decode(buf: &[u8]) -> Result<ScheduleConfig> {
    let mut qopt = None;
    let mut config = ScheduleConfig::default();
    let mut entry_list = None;
    let mut single_entry = None;

    for nla in NlaIter::new(buf) {
        let nla = nla?;
        match nla.kind {
            TCA_TAPRIO_ATTR_PRIOMAP => {
                qopt = Some(MqprioQopt::from_bytes(nla.payload).ok_or_else(|| {
                    Error::TruncatedAttribute {
                        kind: nla.kind,
                        expected: MQPRIO_QOPT_LEN,
                        actual: nla.payload.len(),
                    }
                })?);
            }
            TCA_TAPRIO_ATTR_PREEMPT_MASK => config.preemption_mask = nla.get_u32()?,
            TCA_TAPRIO_ATTR_SCHED_BASE_TIME => config.base_time = nla.get_i64()?,
            TCA_TAPRIO_ATTR_SCHED_CYCLE_TIME => config.cycle_time = nla.get_i64()?,
            TCA_TAPRIO_ATTR_SCHED_EXTENSION_TIME => config.extension_time = nla.get_i64()?,
            TCA_TAPRIO_ATTR_SCHED_CLOCKID => config.clock_id = nla.get_i32()?,
            TCA_TAPRIO_ATTR_SCHED_ENTRY_LIST => entry_list = Some(decode_entries(&nla)?),
            TCA_TAPRIO_ATTR_SCHED_SINGLE_ENTRY => {
                let entries = decode_entries(&nla)?;
                let [entry] = entries.as_slice() else {
                    return Err(Error::SingleEntryCount(entries.len()));
                };
                single_entry = Some(*entry);
            }
            kind => tracing::trace!(kind, len = nla.payload.len(), "skipping unknown attribute"),
        }
    }

    let qopt = qopt.ok_or(Error::MissingPriorityMap)?;
    config.num_tc = qopt.num_tc;
    config.priority_map = qopt.prio_tc_map;
    // The record always carries 16 slots; unused trailing ones are not part of the configuration.
    config.queues = qopt
        .count
        .into_iter()
        .zip(qopt.offset)
        .map(|(count, offset)| QueueRange { count, offset })
        .collect();
    QueueRange::trim_unused(&mut config.queues);

    config.schedule = match (entry_list, single_entry) {
        (Some(_), Some(_)) => return Err(Error::ConflictingScheduleSource),
        (Some(entries), None) => Schedule::EntryList(entries),
        (None, Some(entry)) => Schedule::SingleEntry(entry),
        (None, None) => Schedule::None,
    };

    tracing::debug!(
        num_tc = config.num_tc,
        clock_id = config.clock_id,
        entries = config.schedule.entries().len(),
        "decoded taprio options"
    );

    Ok(config)
}

/// Decode every entry record nested in a schedule container. Records of other types are skipped.
///
/// More than [`MAX_SCHEDULE_ENTRIES`] entries fail with [`Error::ScheduleTooLarge`], so every
/// decoded configuration can be encoded again.
fn decode_entries(container: &Nla<'_>) -> Result<Vec<ScheduleEntry>> {
    let mut entries = Vec::new();
    let mut count = 0;
    for record in container.nested() {
        let record = record?;
        if record.kind != TCA_TAPRIO_SCHED_ENTRY {
            tracing::trace!(kind = record.kind, "skipping unknown schedule record");
            continue;
        }
        count += 1;
        if count <= MAX_SCHEDULE_ENTRIES {
            entries.push(decode_entry(&record)?);
        }
    }

    if count > MAX_SCHEDULE_ENTRIES {
        return Err(Error::ScheduleTooLarge(count));
    }
    Ok(entries)
}

/// Decode one entry. Missing fields keep their zero default.
fn decode_entry(record: &Nla<'_>) -> Result<ScheduleEntry> {
    let mut entry = ScheduleEntry::default();
    for field in record.nested() {
        let field = field?;
        match field.kind {
            TCA_TAPRIO_SCHED_ENTRY_INDEX => entry.index = field.get_u32()?,
            TCA_TAPRIO_SCHED_ENTRY_CMD => {
                let raw = field.get_u8()?;
                entry.command = CommandKind::try_from(raw)
                    .map_err(|raw| Error::InvalidCommand(format!("{raw:#04x}")))?;
            }
            TCA_TAPRIO_SCHED_ENTRY_GATE_MASK => entry.gate_mask = field.get_u32()?,
            TCA_TAPRIO_SCHED_ENTRY_INTERVAL => entry.interval = field.get_u32()?,
            _ => {}
        }
    }
    Ok(entry)
}
