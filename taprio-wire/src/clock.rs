use std::{fmt, str::FromStr};

use crate::error::{Error, Result};

/// Value carried when no clock was configured.
pub const CLOCKID_INVALID: i32 = -1;

/// The clocks a taprio schedule can be referenced to.
///
/// The discriminants are the Linux `CLOCK_*` ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ClockId {
    /// `CLOCK_REALTIME`
    Realtime = 0,
    /// `CLOCK_MONOTONIC`
    Monotonic = 1,
    /// `CLOCK_BOOTTIME`
    Boottime = 7,
    /// `CLOCK_TAI`, the usual choice for time-aware shaping.
    Tai = 11,
}

impl ClockId {
    /// Every supported clock, in the order names are matched.
    pub const ALL: [Self; 4] = [Self::Realtime, Self::Tai, Self::Boottime, Self::Monotonic];

    /// Look up a clock by name, case-insensitively, with or without the `CLOCK_` prefix.
    pub fn from_name(name: &str) -> Result<Self> {
        let bare = match name.get(..6) {
            Some(prefix) if prefix.eq_ignore_ascii_case("CLOCK_") => &name[6..],
            _ => name,
        };

        Self::ALL
            .into_iter()
            .find(|clock| clock.name().eq_ignore_ascii_case(bare))
            .ok_or_else(|| Error::UnknownClockId(name.to_owned()))
    }

    /// The name without the `CLOCK_` prefix.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Realtime => "REALTIME",
            Self::Monotonic => "MONOTONIC",
            Self::Boottime => "BOOTTIME",
            Self::Tai => "TAI",
        }
    }

    /// The raw `clockid_t` value.
    pub const fn as_raw(self) -> i32 {
        self as i32
    }

    /// Map a raw id back to a known clock.
    pub fn from_raw(raw: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|clock| clock.as_raw() == raw)
    }
}

impl FromStr for ClockId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

impl fmt::Display for ClockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_match_case_insensitively() {
        assert_eq!(ClockId::from_name("tai").unwrap(), ClockId::Tai);
        assert_eq!(ClockId::from_name("CLOCK_TAI").unwrap(), ClockId::Tai);
        assert_eq!(ClockId::from_name("clock_monotonic").unwrap(), ClockId::Monotonic);
        assert_eq!(ClockId::from_name("BootTime").unwrap(), ClockId::Boottime);
        assert_eq!(ClockId::from_name("REALTIME").unwrap(), ClockId::Realtime);
    }

    #[test]
    fn unknown_names_are_rejected() {
        for name in ["", "CLOCK_", "UTC", "CLOCK_PROCESS_CPUTIME_ID", "TAIX"] {
            assert!(matches!(ClockId::from_name(name), Err(Error::UnknownClockId(n)) if n == name));
        }
    }

    #[test]
    fn raw_ids_round_trip() {
        for clock in ClockId::ALL {
            assert_eq!(ClockId::from_raw(clock.as_raw()), Some(clock));
        }
        assert_eq!(ClockId::Tai.as_raw(), 11);
        assert_eq!(ClockId::from_raw(CLOCKID_INVALID), None);
        assert_eq!(ClockId::from_raw(5), None);
    }
}
