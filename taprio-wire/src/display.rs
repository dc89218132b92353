use std::fmt;

use crate::config::ScheduleConfig;

/// Renders the configuration the way `tc qdisc show` prints a taprio qdisc.
///
/// ```text
/// tc 2 map 0 0 1 1 0 0 0 0 0 0 0 0 0 0 0 0
///     queues:(0:0) (1:1)
///     clockid TAI
///     base-time 0 cycle-time 0 extension-time 0
///     preempt-mask 0x0
///         index 0 cmd S gate-mask 0x3 interval 1000
/// ```
impl fmt::Display for ScheduleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tc {} map", self.num_tc)?;
        for tc in self.priority_map {
            write!(f, " {tc}")?;
        }

        write!(f, "\n\tqueues:")?;
        for tc in 0..usize::from(self.num_tc) {
            let queue = self.queues.get(tc).copied().unwrap_or_default();
            let first = i64::from(queue.offset);
            let last = first + i64::from(queue.count) - 1;
            if tc > 0 {
                f.write_str(" ")?;
            }
            write!(f, "({first}:{last})")?;
        }

        match self.clock() {
            Some(clock) => write!(f, "\n\tclockid {clock}")?,
            None => write!(f, "\n\tclockid invalid")?,
        }

        write!(
            f,
            "\n\tbase-time {} cycle-time {} extension-time {}",
            self.base_time, self.cycle_time, self.extension_time
        )?;
        write!(f, "\n\tpreempt-mask {:#x}", self.preemption_mask)?;

        for entry in self.schedule.entries() {
            write!(
                f,
                "\n\t\tindex {} cmd {} gate-mask {:#x} interval {}",
                entry.index, entry.command, entry.gate_mask, entry.interval
            )?;
        }

        Ok(())
    }
}
