//! Walks `tc qdisc ... taprio` option tokens into a [`ConfigBuilder`].
//!
//! Tokens are only consumed here; every cross-option check (duplicate clock, conflicting
//! schedule sources, preemption flag count) happens once in [`ConfigBuilder::build`], so the
//! order of options never changes the outcome.

use std::{iter::Peekable, vec};

use taprio_wire::{
    ClockId, ConfigBuilder, QueueRange, SchedRow, ScheduleConfig, TC_QOPT_MAX_QUEUE,
    numeric::{Radix, parse_signed, parse_unsigned},
};

/// Option summary printed alongside usage errors.
pub const USAGE: &str = "\
Usage: ... taprio clockid CLOCKID
                  [num_tc NUMBER] [map P0 P1 ...]
                  [queues COUNT@OFFSET COUNT@OFFSET ...]
                  [ [sched-file FILE] | [sched-row INDEX CMD GATE-MASK INTERVAL] ]
                  [base-time TIME] [extension-time TIME] [cycle-time TIME]
                  [preemption TC0 TC1 TC2 ...]

CLOCKID must be a valid SYS-V id (i.e. CLOCK_TAI)";

/// Errors from walking the option tokens.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A token that is not an option keyword.
    #[error("unknown argument {0:?}")]
    UnknownArgument(String),
    /// An option at the end of the tokens without its value.
    #[error("\"{0}\" is missing a value")]
    MissingValue(&'static str),
    /// `help` was given.
    #[error("help requested")]
    Help,
    /// A value or combination of options the configuration rejects.
    #[error(transparent)]
    Config(#[from] taprio_wire::Error),
}

impl Error {
    /// Whether the usage text should accompany this error.
    pub const fn wants_usage(&self) -> bool {
        matches!(self, Self::UnknownArgument(_) | Self::MissingValue(_) | Self::Help)
    }
}

/// Result alias for [`enum@Error`].
pub type Result<T> = std::result::Result<T, Error>;

type Tokens = Peekable<vec::IntoIter<String>>;

/// Parse option tokens and build the validated configuration.
pub fn parse<I, S>(args: I) -> Result<ScheduleConfig>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Ok(parse_options(args)?.build()?)
}

/// Walk option tokens into a builder, without validating across options.
pub fn parse_options<I, S>(args: I) -> Result<ConfigBuilder>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let tokens: Vec<String> = args.into_iter().map(|arg| arg.as_ref().to_owned()).collect();
    let mut tokens = tokens.into_iter().peekable();
    let mut builder = ConfigBuilder::new();

    while let Some(keyword) = tokens.next() {
        builder = match keyword.as_str() {
            "num_tc" => {
                let num_tc = value(&mut tokens, "num_tc")?;
                builder.with_num_tc(parse_unsigned("num_tc", &num_tc, Radix::Decimal)?)
            }
            "map" => {
                let map = values(&mut tokens, |token| {
                    parse_unsigned::<u8>("map", token, Radix::Decimal).ok()
                });
                builder.with_priority_map(&map)
            }
            "queues" => {
                let mut queues = Vec::new();
                // A token not starting with a digit ends the list and is read as the next option.
                while queues.len() < TC_QOPT_MAX_QUEUE {
                    let Some(pair) = tokens.next_if(|t| t.starts_with(|c: char| c.is_ascii_digit()))
                    else {
                        break;
                    };
                    queues.push(pair.parse::<QueueRange>()?);
                }
                builder.with_queues(queues)
            }
            "sched-file" => builder.with_sched_file(value(&mut tokens, "sched-file")?),
            "sched-row" => builder.with_sched_row(SchedRow::new(
                value(&mut tokens, "sched-row")?,
                value(&mut tokens, "sched-row")?,
                value(&mut tokens, "sched-row")?,
                value(&mut tokens, "sched-row")?,
            )),
            "base-time" => {
                let time = value(&mut tokens, "base-time")?;
                builder.with_base_time(parse_signed("base-time", &time)?)
            }
            "cycle-time" => {
                let time = value(&mut tokens, "cycle-time")?;
                builder.with_cycle_time(parse_signed("cycle-time", &time)?)
            }
            "extension-time" => {
                let time = value(&mut tokens, "extension-time")?;
                builder.with_extension_time(parse_signed("extension-time", &time)?)
            }
            "preemption" => {
                let flags = values(&mut tokens, |token| {
                    parse_unsigned::<u8>("preemption", token, Radix::Auto).ok().map(|v| v != 0)
                });
                builder.with_preemption(flags)
            }
            "clockid" => {
                let name = value(&mut tokens, "clockid")?;
                builder.with_clock_id(ClockId::from_name(&name)?)
            }
            "help" => return Err(Error::Help),
            _ => return Err(Error::UnknownArgument(keyword)),
        };
    }

    tracing::trace!(?builder, "parsed taprio options");
    Ok(builder)
}

fn value(tokens: &mut Tokens, option: &'static str) -> Result<String> {
    tokens.next().ok_or(Error::MissingValue(option))
}

/// Consume up to [`TC_QOPT_MAX_QUEUE`] tokens for as long as `parse` accepts them.
fn values<T>(tokens: &mut Tokens, parse: impl Fn(&str) -> Option<T>) -> Vec<T> {
    let mut values = Vec::new();
    while values.len() < TC_QOPT_MAX_QUEUE {
        let Some(value) = tokens.peek().and_then(|token| parse(token)) else {
            break;
        };
        tokens.next();
        values.push(value);
    }
    values
}
